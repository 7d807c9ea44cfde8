//! 单例组件描述符注册表
//!
//! 一个模块内按组件名保存描述符。注册表可以被多个构建线程共享，
//! 因此内部用读写锁保护；单个描述符的修改仍然在一次 `modify` 调用内完成。

use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::configuration::SingletonComponentConfiguration;
use crate::description::SingletonComponentDescription;
use crate::error::{DescriptorError, DescriptorResult};

pub struct DescriptionRegistry {
    module_name: String,

    /// 按组件名排序的描述符
    descriptions: RwLock<BTreeMap<String, SingletonComponentDescription>>,
}

impl DescriptionRegistry {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            descriptions: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// 注册描述符
    ///
    /// # Errors
    ///
    /// 同名组件已经注册时返回 [`DescriptorError::DuplicateComponent`]
    pub fn register(&self, description: SingletonComponentDescription) -> DescriptorResult<()> {
        let name = description.component_name().to_string();
        let mut descriptions = self.descriptions.write();

        if descriptions.contains_key(&name) {
            return Err(DescriptorError::DuplicateComponent {
                component: name,
                module: self.module_name.clone(),
            });
        }

        tracing::debug!(
            "Registered singleton description '{}' in module '{}'",
            name,
            self.module_name
        );
        descriptions.insert(name, description);
        Ok(())
    }

    pub fn contains(&self, component_name: &str) -> bool {
        self.descriptions.read().contains_key(component_name)
    }

    pub fn len(&self) -> usize {
        self.descriptions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.read().is_empty()
    }

    /// 所有组件名称（已排序）
    pub fn component_names(&self) -> Vec<String> {
        self.descriptions.read().keys().cloned().collect()
    }

    /// 修改指定组件的描述符
    ///
    /// 闭包返回错误时，错误原样返回给调用方。
    pub fn modify<F, T>(&self, component_name: &str, modifier: F) -> DescriptorResult<T>
    where
        F: FnOnce(&mut SingletonComponentDescription) -> DescriptorResult<T>,
    {
        let mut descriptions = self.descriptions.write();
        let description = descriptions.get_mut(component_name).ok_or_else(|| {
            DescriptorError::UnknownComponent {
                component: component_name.to_string(),
                module: self.module_name.clone(),
            }
        })?;

        modifier(description)
    }

    /// 读取指定组件的描述符
    pub fn with_description<F, T>(&self, component_name: &str, reader: F) -> Option<T>
    where
        F: FnOnce(&SingletonComponentDescription) -> T,
    {
        self.descriptions.read().get(component_name).map(reader)
    }

    /// 为所有组件构建运行时配置（按组件名排序）
    pub fn construct_configurations(&self) -> Vec<SingletonComponentConfiguration> {
        self.descriptions
            .read()
            .values()
            .map(SingletonComponentDescription::construct_component_configuration)
            .collect()
    }
}

impl std::fmt::Debug for DescriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptionRegistry")
            .field("module_name", &self.module_name)
            .field("components", &self.component_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::ConcurrencyManagementType;

    fn description(name: &str) -> SingletonComponentDescription {
        SingletonComponentDescription::new(name, format!("app::{}", name), "core", "shop")
    }

    #[test]
    fn test_register_and_list() {
        let registry = DescriptionRegistry::new("core");
        assert!(registry.is_empty());

        registry.register(description("Ledger")).unwrap();
        registry.register(description("Audit")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Ledger"));
        assert!(!registry.contains("Missing"));
        assert_eq!(registry.component_names(), vec!["Audit", "Ledger"]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = DescriptionRegistry::new("core");
        registry.register(description("Ledger")).unwrap();

        let err = registry.register(description("Ledger")).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::DuplicateComponent {
                component: "Ledger".to_string(),
                module: "core".to_string(),
            }
        );
    }

    #[test]
    fn test_modify_unknown_component() {
        let registry = DescriptionRegistry::new("core");

        let result = registry.modify("Ledger", |d| {
            d.init_on_startup();
            Ok(())
        });
        assert!(matches!(
            result,
            Err(DescriptorError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn test_modify_propagates_conflict_without_corrupting_state() {
        let registry = DescriptionRegistry::new("core");
        registry.register(description("Ledger")).unwrap();

        registry
            .modify("Ledger", |d| Ok(d.container_managed_concurrency()?))
            .unwrap();
        let err = registry
            .modify("Ledger", |d| Ok(d.bean_managed_concurrency()?))
            .unwrap_err();

        assert!(matches!(err, DescriptorError::ConflictingClassification(_)));
        assert_eq!(
            registry.with_description("Ledger", |d| d.concurrency_management_type()),
            Some(Some(ConcurrencyManagementType::Container))
        );
    }

    #[test]
    fn test_construct_configurations_in_name_order() {
        let registry = DescriptionRegistry::new("core");
        registry.register(description("Ledger")).unwrap();
        registry.register(description("Audit")).unwrap();
        registry
            .modify("Audit", |d| {
                d.init_on_startup();
                Ok(())
            })
            .unwrap();

        let configurations = registry.construct_configurations();
        assert_eq!(configurations.len(), 2);
        assert_eq!(configurations[0].component_name(), "Audit");
        assert!(configurations[0].is_init_on_startup());
        assert_eq!(configurations[1].component_name(), "Ledger");
        assert!(!configurations[1].is_init_on_startup());
    }
}
