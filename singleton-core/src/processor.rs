//! 单例组件描述符处理器
//!
//! 构建阶段的入口：先扫描 `#[derive(Singleton)]` 注解元数据，
//! 再合并部署描述符，最后把每个描述符转换为运行时配置。
//! 任意组件出错都会终止整个部署单元的处理。

use anyhow::Context;

use crate::annotation::{self, SingletonRegistration};
use crate::configuration::SingletonComponentConfiguration;
use crate::deployment::{DeploymentDescriptor, SingletonMetadata};
use crate::description::SingletonComponentDescription;
use crate::error::{DescriptorError, DescriptorResult, Result};
use crate::registry::DescriptionRegistry;

/// 部署单元 - 一个应用中的一个模块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentUnit {
    application_name: String,
    module_name: String,

    /// 注解扫描的模块路径前缀，未设置时不扫描注解
    scan_path: Option<String>,
}

impl DeploymentUnit {
    pub fn new(application_name: impl Into<String>, module_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            module_name: module_name.into(),
            scan_path: None,
        }
    }

    /// 设置注解扫描路径，例如 `"shop::billing"`
    pub fn with_scan_path(mut self, scan_path: impl Into<String>) -> Self {
        self.scan_path = Some(scan_path.into());
        self
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn scan_path(&self) -> Option<&str> {
        self.scan_path.as_deref()
    }
}

pub struct SingletonDescriptionProcessor {
    unit: DeploymentUnit,
    registry: DescriptionRegistry,
}

impl SingletonDescriptionProcessor {
    pub fn new(unit: DeploymentUnit) -> Self {
        let registry = DescriptionRegistry::new(unit.module_name());
        Self { unit, registry }
    }

    pub fn unit(&self) -> &DeploymentUnit {
        &self.unit
    }

    pub fn registry(&self) -> &DescriptionRegistry {
        &self.registry
    }

    /// 扫描并应用扫描路径下的所有注解元数据
    ///
    /// 返回应用的注册项数量
    pub fn scan_annotations(&self) -> Result<usize> {
        let Some(scan_path) = self.unit.scan_path() else {
            tracing::debug!(
                "No scan path configured for module '{}', skipping annotation scan",
                self.unit.module_name()
            );
            return Ok(0);
        };

        tracing::info!("Starting singleton annotation scan under '{}'", scan_path);

        let mut registrations: Vec<_> = annotation::registrations()
            .filter(|registration| registration.is_under(scan_path))
            .collect();
        registrations.sort_by_key(|registration| registration.component_name);

        let total = registrations.len();
        if total == 0 {
            tracing::warn!("No singleton components found under '{}'", scan_path);
            return Ok(0);
        }

        for (idx, registration) in registrations.iter().enumerate() {
            tracing::debug!(
                "Applying singleton annotations [{}/{}]: '{}'",
                idx + 1,
                total,
                registration.component_name
            );

            self.apply_registration(registration).map_err(|e| {
                tracing::error!("{:#}", e);
                e
            })?;
        }

        tracing::info!(
            "Singleton annotation scan completed, found {} component(s)",
            total
        );
        Ok(total)
    }

    /// 应用一个组件的注解元数据
    pub fn apply_registration(&self, registration: &SingletonRegistration) -> Result<()> {
        self.try_apply_registration(registration)
            .with_context(|| self.failure_context(registration.component_name))
    }

    fn try_apply_registration(&self, registration: &SingletonRegistration) -> DescriptorResult<()> {
        self.registry.register(SingletonComponentDescription::new(
            registration.component_name,
            registration.component_class_name,
            self.unit.module_name(),
            self.unit.application_name(),
        ))?;

        self.registry.modify(registration.component_name, |description| {
            if registration.init_on_startup {
                description.init_on_startup();
            }
            for management_type in registration.concurrency_management {
                description.mark_concurrency_management(*management_type)?;
            }
            Ok(())
        })
    }

    /// 合并部署描述符
    pub fn apply_deployment_descriptor(&self, descriptor: &DeploymentDescriptor) -> Result<()> {
        tracing::info!(
            "Applying deployment descriptor to module '{}' ({} singleton entries)",
            self.unit.module_name(),
            descriptor.singletons().len()
        );

        for metadata in descriptor.singletons() {
            self.apply_metadata(metadata).map_err(|e| {
                tracing::error!("{:#}", e);
                e
            })?;
        }
        Ok(())
    }

    /// 合并一个部署描述符条目
    pub fn apply_metadata(&self, metadata: &SingletonMetadata) -> Result<()> {
        self.try_apply_metadata(metadata)
            .with_context(|| self.failure_context(&metadata.name))
    }

    fn try_apply_metadata(&self, metadata: &SingletonMetadata) -> DescriptorResult<()> {
        let name = metadata.name.as_str();

        match (self.registry.contains(name), metadata.class.as_deref()) {
            (false, Some(class)) => {
                self.registry.register(SingletonComponentDescription::new(
                    name,
                    class,
                    self.unit.module_name(),
                    self.unit.application_name(),
                ))?;
            }
            (false, None) => {
                return Err(DescriptorError::InvalidDescriptor(format!(
                    "singleton '{}' is not annotated and declares no class",
                    name
                )));
            }
            (true, Some(class)) => {
                let existing = self.registry.with_description(name, |description| {
                    description
                        .component_description()
                        .component_class_name()
                        .to_string()
                });
                if existing.as_deref() != Some(class) {
                    return Err(DescriptorError::InvalidDescriptor(format!(
                        "singleton '{}' declares class '{}' but is implemented by '{}'",
                        name,
                        class,
                        existing.unwrap_or_default()
                    )));
                }
            }
            (true, None) => {}
        }

        self.registry.modify(name, |description| {
            match metadata.init_on_startup {
                Some(true) => description.init_on_startup(),
                Some(false) if description.is_init_on_startup() => {
                    tracing::debug!(
                        "Singleton '{}' keeps init-on-startup from its annotations",
                        name
                    );
                }
                _ => {}
            }
            if let Some(management_type) = metadata.concurrency_management {
                description.mark_concurrency_management(management_type)?;
            }
            Ok(())
        })
    }

    /// 扫描注解并合并部署描述符（如果有）
    pub fn process(&self, descriptor: Option<&DeploymentDescriptor>) -> Result<()> {
        self.scan_annotations()?;
        if let Some(descriptor) = descriptor {
            self.apply_deployment_descriptor(descriptor)?;
        }

        tracing::info!(
            "Processed {} singleton component(s) for {}/{}",
            self.registry.len(),
            self.unit.application_name(),
            self.unit.module_name()
        );
        Ok(())
    }

    /// 结束构建阶段，生成所有运行时配置
    pub fn finish(self) -> Vec<SingletonComponentConfiguration> {
        self.registry.construct_configurations()
    }

    fn failure_context(&self, component_name: &str) -> String {
        format!(
            "Failed to process singleton component '{}' in module '{}'",
            component_name,
            self.unit.module_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrency::ConcurrencyManagementType;
    use crate::error::ConflictingClassificationError;

    static CONFIG_CACHE: SingletonRegistration = SingletonRegistration {
        component_name: "ConfigCache",
        component_class_name: "shop::cache::ConfigCache",
        module_path: "shop::cache",
        init_on_startup: true,
        concurrency_management: &[ConcurrencyManagementType::Bean],
    };

    static CONFLICTING: SingletonRegistration = SingletonRegistration {
        component_name: "Conflicting",
        component_class_name: "shop::cache::Conflicting",
        module_path: "shop::cache",
        init_on_startup: false,
        concurrency_management: &[
            ConcurrencyManagementType::Container,
            ConcurrencyManagementType::Bean,
        ],
    };

    fn processor() -> SingletonDescriptionProcessor {
        SingletonDescriptionProcessor::new(DeploymentUnit::new("shop", "cache-module"))
    }

    #[test]
    fn test_apply_registration() {
        let processor = processor();
        processor.apply_registration(&CONFIG_CACHE).unwrap();

        let configurations = processor.finish();
        assert_eq!(configurations.len(), 1);
        assert_eq!(configurations[0].component_name(), "ConfigCache");
        assert_eq!(configurations[0].module_name(), "cache-module");
        assert_eq!(configurations[0].application_name(), "shop");
        assert!(configurations[0].is_init_on_startup());
        assert_eq!(
            configurations[0].concurrency_management_type(),
            Some(ConcurrencyManagementType::Bean)
        );
    }

    #[test]
    fn test_conflicting_annotations_abort() {
        let processor = processor();
        let err = processor.apply_registration(&CONFLICTING).unwrap_err();

        assert!(err.to_string().contains("Conflicting"));
        assert!(err.to_string().contains("cache-module"));

        let conflict = match err.downcast_ref::<DescriptorError>() {
            Some(DescriptorError::ConflictingClassification(conflict)) => conflict.clone(),
            other => panic!("Expected ConflictingClassification, got {:?}", other),
        };
        assert_eq!(
            conflict,
            ConflictingClassificationError {
                component: "Conflicting".to_string(),
                existing: ConcurrencyManagementType::Container,
                requested: ConcurrencyManagementType::Bean,
            }
        );
    }

    #[test]
    fn test_duplicate_registration_aborts() {
        let processor = processor();
        processor.apply_registration(&CONFIG_CACHE).unwrap();

        let err = processor.apply_registration(&CONFIG_CACHE).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DescriptorError>(),
            Some(DescriptorError::DuplicateComponent { .. })
        ));
    }

    #[test]
    fn test_descriptor_declares_new_singleton() {
        let processor = processor();
        let descriptor: DeploymentDescriptor = r#"
            [[singleton]]
            name = "Ledger"
            class = "shop::billing::Ledger"
            concurrency-management = "container"
        "#
        .parse()
        .unwrap();

        processor.apply_deployment_descriptor(&descriptor).unwrap();

        let configurations = processor.finish();
        assert_eq!(configurations.len(), 1);
        assert_eq!(configurations[0].component_class_name(), "shop::billing::Ledger");
        assert!(configurations[0].is_lazy());
        assert_eq!(
            configurations[0].concurrency_management_type(),
            Some(ConcurrencyManagementType::Container)
        );
    }

    #[test]
    fn test_descriptor_agreeing_with_annotations() {
        let processor = processor();
        processor.apply_registration(&CONFIG_CACHE).unwrap();

        let descriptor: DeploymentDescriptor = r#"
            [[singleton]]
            name = "ConfigCache"
            init-on-startup = false
            concurrency-management = "bean"
        "#
        .parse()
        .unwrap();
        processor.apply_deployment_descriptor(&descriptor).unwrap();

        let configurations = processor.finish();
        // 启动标志一旦设置就不会被重置
        assert!(configurations[0].is_init_on_startup());
        assert_eq!(
            configurations[0].concurrency_management_type(),
            Some(ConcurrencyManagementType::Bean)
        );
    }

    #[test]
    fn test_descriptor_conflicting_with_annotations() {
        let processor = processor();
        processor.apply_registration(&CONFIG_CACHE).unwrap();

        let descriptor: DeploymentDescriptor = r#"
            [[singleton]]
            name = "ConfigCache"
            concurrency-management = "container"
        "#
        .parse()
        .unwrap();

        let err = processor.apply_deployment_descriptor(&descriptor).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DescriptorError>(),
            Some(DescriptorError::ConflictingClassification(_))
        ));
        assert_eq!(
            processor
                .registry()
                .with_description("ConfigCache", |d| d.concurrency_management_type()),
            Some(Some(ConcurrencyManagementType::Bean))
        );
    }

    #[test]
    fn test_descriptor_without_class_for_unknown_singleton() {
        let processor = processor();
        let descriptor: DeploymentDescriptor = r#"
            [[singleton]]
            name = "Ghost"
        "#
        .parse()
        .unwrap();

        let err = processor.apply_deployment_descriptor(&descriptor).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DescriptorError>(),
            Some(DescriptorError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn test_descriptor_class_mismatch() {
        let processor = processor();
        processor.apply_registration(&CONFIG_CACHE).unwrap();

        let descriptor: DeploymentDescriptor = r#"
            [[singleton]]
            name = "ConfigCache"
            class = "shop::cache::OtherCache"
        "#
        .parse()
        .unwrap();

        let err = processor.apply_deployment_descriptor(&descriptor).unwrap_err();
        assert!(format!("{:#}", err).contains("shop::cache::OtherCache"));
    }

    #[test]
    fn test_scan_without_scan_path_is_noop() {
        let processor = processor();
        assert_eq!(processor.scan_annotations().unwrap(), 0);
        processor.process(None).unwrap();
        assert!(processor.registry().is_empty());
    }
}
