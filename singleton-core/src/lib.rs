// singleton-core: 单例组件的构建期描述符
//
// 在组件实例化并装配进容器之前，收集单例组件的元数据：
// - 启动时初始化标志（@Startup）
// - 并发管理分类（bean-managed / container-managed），一旦确定即锁定
// - 注解扫描与部署描述符合并
// - 生成不可变的运行时配置

pub mod annotation;
pub mod concurrency;
pub mod configuration;
pub mod deployment;
pub mod description;
pub mod error;
pub mod logging;
pub mod processor;
pub mod registry;

// 重新导出常用类型
pub use annotation::{Singleton, SingletonRegistration};
pub use concurrency::{
    ConcurrencyClassification, ConcurrencyClassificationGuard, ConcurrencyManagementType,
};
pub use configuration::SingletonComponentConfiguration;
pub use deployment::{DeploymentDescriptor, SingletonMetadata};
pub use description::{ComponentDescription, SingletonComponentDescription};
pub use error::{ConflictingClassificationError, DescriptorError, DescriptorResult, Result};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use processor::{DeploymentUnit, SingletonDescriptionProcessor};
pub use registry::DescriptionRegistry;

// 导出 inventory，供宏使用
pub use inventory;

/// Prelude 模块，包含常用的 traits 和类型
pub mod prelude {
    pub use crate::annotation::{Singleton, SingletonRegistration};
    pub use crate::concurrency::{
        ConcurrencyClassification, ConcurrencyClassificationGuard, ConcurrencyManagementType,
    };
    pub use crate::configuration::SingletonComponentConfiguration;
    pub use crate::deployment::DeploymentDescriptor;
    pub use crate::description::SingletonComponentDescription;
    pub use crate::error::{ConflictingClassificationError, DescriptorError, Result};
    pub use crate::logging::{LogFormat, LogLevel, LoggingConfig};
    pub use crate::processor::{DeploymentUnit, SingletonDescriptionProcessor};
    pub use crate::registry::DescriptionRegistry;
    // Re-export anyhow for convenience
    pub use anyhow::{anyhow, Context};
}
