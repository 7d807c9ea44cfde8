use crate::concurrency::ConcurrencyManagementType;
use crate::description::ComponentDescription;
use std::fmt;

/// 单例组件的运行时配置
///
/// 构建阶段结束后由描述符生成，之后不可变，交给容器装配组件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingletonComponentConfiguration {
    description: ComponentDescription,
    init_on_startup: bool,
    concurrency_management: Option<ConcurrencyManagementType>,
}

impl SingletonComponentConfiguration {
    pub(crate) fn new(
        description: ComponentDescription,
        init_on_startup: bool,
        concurrency_management: Option<ConcurrencyManagementType>,
    ) -> Self {
        Self {
            description,
            init_on_startup,
            concurrency_management,
        }
    }

    pub fn component_name(&self) -> &str {
        self.description.component_name()
    }

    pub fn component_class_name(&self) -> &str {
        self.description.component_class_name()
    }

    pub fn module_name(&self) -> &str {
        self.description.module_name()
    }

    pub fn application_name(&self) -> &str {
        self.description.application_name()
    }

    pub fn is_init_on_startup(&self) -> bool {
        self.init_on_startup
    }

    /// 未在启动时初始化的单例在首次使用时创建
    pub fn is_lazy(&self) -> bool {
        !self.init_on_startup
    }

    /// 显式声明的并发管理类型
    pub fn concurrency_management_type(&self) -> Option<ConcurrencyManagementType> {
        self.concurrency_management
    }

    /// 实际生效的并发管理类型，未声明时默认由容器管理
    pub fn effective_concurrency_management(&self) -> ConcurrencyManagementType {
        self.concurrency_management
            .unwrap_or(ConcurrencyManagementType::Container)
    }
}

impl fmt::Display for SingletonComponentConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} ({}) startup={} concurrency={}",
            self.application_name(),
            self.module_name(),
            self.component_name(),
            self.component_class_name(),
            self.init_on_startup,
            self.effective_concurrency_management()
        )
    }
}
