//! 部署描述符
//!
//! 以 TOML 描述模块内的单例组件，作用与注解相同，
//! 在注解扫描之后合并到描述符上：
//!
//! ```toml
//! [[singleton]]
//! name = "ConfigCache"
//! class = "shop::cache::ConfigCache"
//! init-on-startup = true
//! concurrency-management = "bean"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::concurrency::ConcurrencyManagementType;
use crate::error::{DescriptorError, DescriptorResult};

/// 单个单例组件的部署元数据
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SingletonMetadata {
    /// 组件名称
    pub name: String,

    /// 组件实现类型，声明新组件时必填
    #[serde(default)]
    pub class: Option<String>,

    #[serde(default)]
    pub init_on_startup: Option<bool>,

    #[serde(default)]
    pub concurrency_management: Option<ConcurrencyManagementType>,
}

/// 部署描述符
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentDescriptor {
    #[serde(default, rename = "singleton")]
    singletons: Vec<SingletonMetadata>,
}

impl DeploymentDescriptor {
    /// 从文件加载部署描述符
    pub fn from_file(path: impl AsRef<Path>) -> DescriptorResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DescriptorError::InvalidDescriptor(format!(
                "Failed to read deployment descriptor {:?}: {}",
                path, e
            ))
        })?;

        content.parse()
    }

    pub fn singletons(&self) -> &[SingletonMetadata] {
        &self.singletons
    }

    fn validate(&self) -> DescriptorResult<()> {
        for metadata in &self.singletons {
            if metadata.name.trim().is_empty() {
                return Err(DescriptorError::InvalidDescriptor(
                    "singleton entry with empty name".to_string(),
                ));
            }
            if matches!(&metadata.class, Some(class) if class.trim().is_empty()) {
                return Err(DescriptorError::InvalidDescriptor(format!(
                    "singleton '{}' has an empty class",
                    metadata.name
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for DeploymentDescriptor {
    type Err = DescriptorError;

    fn from_str(content: &str) -> DescriptorResult<Self> {
        let descriptor: DeploymentDescriptor = toml::from_str(content).map_err(|e| {
            DescriptorError::InvalidDescriptor(format!("Failed to parse TOML: {}", e))
        })?;

        descriptor.validate()?;
        Ok(descriptor)
    }
}
