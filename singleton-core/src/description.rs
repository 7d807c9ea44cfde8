//! 组件描述符
//!
//! 构建阶段收集的组件元数据。单例组件描述符在通用的组件身份之上
//! 额外记录启动标志和并发管理分类，构建结束后转换为运行时配置。

use crate::concurrency::{
    ConcurrencyClassification, ConcurrencyClassificationGuard, ConcurrencyManagementType,
};
use crate::configuration::SingletonComponentConfiguration;
use crate::error::ConflictingClassificationError;

/// 组件身份 - 一个模块内的一个具名组件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescription {
    component_name: String,
    component_class_name: String,
    module_name: String,
    application_name: String,
}

impl ComponentDescription {
    pub fn new(
        component_name: impl Into<String>,
        component_class_name: impl Into<String>,
        module_name: impl Into<String>,
        application_name: impl Into<String>,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            component_class_name: component_class_name.into(),
            module_name: module_name.into(),
            application_name: application_name.into(),
        }
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn component_class_name(&self) -> &str {
        &self.component_class_name
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }
}

/// 单例组件描述符
///
/// 由注解扫描和部署描述符处理填充，每个组件一个实例。
/// 并发管理分类只能通过 [`bean_managed_concurrency`](Self::bean_managed_concurrency)
/// 和 [`container_managed_concurrency`](Self::container_managed_concurrency) 修改。
#[derive(Debug, Clone)]
pub struct SingletonComponentDescription {
    description: ComponentDescription,

    /// 是否在应用启动时立即初始化（@Startup）
    init_on_startup: bool,

    concurrency: ConcurrencyClassificationGuard,
}

impl SingletonComponentDescription {
    /// 创建新的单例组件描述符
    ///
    /// # 参数
    /// * `component_name` - 组件名称
    /// * `component_class_name` - 组件实现类型的完整名称
    /// * `module_name` - 所属模块名称
    /// * `application_name` - 所属应用名称
    pub fn new(
        component_name: impl Into<String>,
        component_class_name: impl Into<String>,
        module_name: impl Into<String>,
        application_name: impl Into<String>,
    ) -> Self {
        Self {
            description: ComponentDescription::new(
                component_name,
                component_class_name,
                module_name,
                application_name,
            ),
            init_on_startup: false,
            concurrency: ConcurrencyClassificationGuard::new(),
        }
    }

    pub fn component_description(&self) -> &ComponentDescription {
        &self.description
    }

    pub fn component_name(&self) -> &str {
        self.description.component_name()
    }

    /// 是否标记为启动时初始化
    pub fn is_init_on_startup(&self) -> bool {
        self.init_on_startup
    }

    /// 标记为启动时初始化，标志一旦设置不会被重置
    pub fn init_on_startup(&mut self) {
        self.init_on_startup = true;
    }

    /// 显式声明的并发管理类型，未声明时返回 None
    pub fn concurrency_management_type(&self) -> Option<ConcurrencyManagementType> {
        self.concurrency.management_type()
    }

    pub fn concurrency_classification(&self) -> ConcurrencyClassification {
        self.concurrency.current_classification()
    }

    /// 标记为 bean-managed 并发
    ///
    /// # Errors
    ///
    /// 组件已经标记为 container-managed 时失败
    pub fn bean_managed_concurrency(
        &mut self,
    ) -> std::result::Result<(), ConflictingClassificationError> {
        self.concurrency
            .mark_bean_managed(self.description.component_name())
    }

    /// 标记为 container-managed 并发
    ///
    /// # Errors
    ///
    /// 组件已经标记为 bean-managed 时失败
    pub fn container_managed_concurrency(
        &mut self,
    ) -> std::result::Result<(), ConflictingClassificationError> {
        self.concurrency
            .mark_container_managed(self.description.component_name())
    }

    pub fn mark_concurrency_management(
        &mut self,
        management_type: ConcurrencyManagementType,
    ) -> std::result::Result<(), ConflictingClassificationError> {
        match management_type {
            ConcurrencyManagementType::Bean => self.bean_managed_concurrency(),
            ConcurrencyManagementType::Container => self.container_managed_concurrency(),
        }
    }

    /// 构建运行时配置
    pub fn construct_component_configuration(&self) -> SingletonComponentConfiguration {
        SingletonComponentConfiguration::new(
            self.description.clone(),
            self.init_on_startup,
            self.concurrency_management_type(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description() -> SingletonComponentDescription {
        SingletonComponentDescription::new(
            "ConfigCache",
            "app::cache::ConfigCache",
            "cache-module",
            "shop",
        )
    }

    #[test]
    fn test_new_description_defaults() {
        let description = description();

        assert_eq!(description.component_name(), "ConfigCache");
        assert_eq!(
            description.component_description().component_class_name(),
            "app::cache::ConfigCache"
        );
        assert_eq!(description.component_description().module_name(), "cache-module");
        assert_eq!(description.component_description().application_name(), "shop");
        assert!(!description.is_init_on_startup());
        assert_eq!(description.concurrency_management_type(), None);
    }

    #[test]
    fn test_init_on_startup_is_sticky() {
        let mut description = description();
        description.init_on_startup();
        description.init_on_startup();

        assert!(description.is_init_on_startup());
    }

    #[test]
    fn test_conflict_names_component() {
        let mut description = description();
        description.bean_managed_concurrency().unwrap();

        let err = description.container_managed_concurrency().unwrap_err();
        assert_eq!(err.component, "ConfigCache");
        assert_eq!(err.existing, ConcurrencyManagementType::Bean);
        assert_eq!(err.requested, ConcurrencyManagementType::Container);
        assert_eq!(
            description.concurrency_classification(),
            ConcurrencyClassification::BeanManaged
        );
    }

    #[test]
    fn test_mark_by_type_dispatches() {
        let mut description = description();
        description
            .mark_concurrency_management(ConcurrencyManagementType::Container)
            .unwrap();
        description.container_managed_concurrency().unwrap();

        assert_eq!(
            description.concurrency_management_type(),
            Some(ConcurrencyManagementType::Container)
        );
        assert!(description
            .mark_concurrency_management(ConcurrencyManagementType::Bean)
            .is_err());
    }

    #[test]
    fn test_construct_component_configuration() {
        let mut description = description();
        description.init_on_startup();
        description.bean_managed_concurrency().unwrap();

        let configuration = description.construct_component_configuration();
        assert_eq!(configuration.component_name(), "ConfigCache");
        assert!(configuration.is_init_on_startup());
        assert_eq!(
            configuration.concurrency_management_type(),
            Some(ConcurrencyManagementType::Bean)
        );
    }
}
