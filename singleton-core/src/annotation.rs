use crate::concurrency::ConcurrencyManagementType;

/// 单例组件注解元数据 - 用于inventory收集
///
/// 由 `#[derive(Singleton)]` 宏在编译期提交，构建阶段由
/// [`SingletonDescriptionProcessor::scan_annotations`](crate::SingletonDescriptionProcessor::scan_annotations)
/// 扫描并应用到描述符。
#[derive(Debug)]
pub struct SingletonRegistration {
    pub component_name: &'static str,
    pub component_class_name: &'static str,

    /// 声明组件的 Rust 模块路径，用于按扫描路径过滤
    pub module_path: &'static str,

    /// 是否标注了 #[startup]
    pub init_on_startup: bool,

    /// 按声明顺序排列的 #[concurrency_management] 注解
    pub concurrency_management: &'static [ConcurrencyManagementType],
}

inventory::collect!(SingletonRegistration);

impl SingletonRegistration {
    /// 注册项是否位于扫描路径之下
    pub fn is_under(&self, scan_path: &str) -> bool {
        self.module_path == scan_path
            || self
                .module_path
                .strip_prefix(scan_path)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

/// 所有已提交的注解元数据
pub fn registrations() -> impl Iterator<Item = &'static SingletonRegistration> {
    inventory::iter::<SingletonRegistration>.into_iter()
}

/// Singleton trait - 标记一个类型为单例组件
///
/// 通过 #[derive(Singleton)] 宏自动实现
///
/// # 示例
///
/// ```ignore
/// use singleton_core_macros::Singleton;
///
/// #[derive(Singleton)]
/// #[singleton("ConfigCache")]
/// #[startup]
/// #[concurrency_management("bean")]
/// struct ConfigCache;
/// ```
pub trait Singleton: Sized + 'static {
    /// 获取组件名称
    fn component_name() -> &'static str;

    /// 是否在启动时初始化
    fn init_on_startup() -> bool {
        false
    }

    /// 声明的并发管理类型（按声明顺序）
    fn concurrency_management() -> &'static [ConcurrencyManagementType] {
        &[]
    }
}
