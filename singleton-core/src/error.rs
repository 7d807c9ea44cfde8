/// 统一的错误处理类型
///
/// 构建流程（注解扫描、部署描述符合并）使用 anyhow::Result 作为统一返回类型，
/// 通过 .context() 附加组件名与模块名等上下文信息。
///
/// 领域内可以精确匹配的失败使用下面的 thiserror 类型表达，
/// 调用方可以通过 `anyhow::Error::downcast_ref` 取回。
///
/// # 示例
///
/// ```rust,ignore
/// use anyhow::Context;
///
/// registry
///     .modify(name, |description| Ok(description.bean_managed_concurrency()?))
///     .with_context(|| format!("Failed to process singleton component '{}'", name))?;
/// ```
pub use anyhow::Result;

use crate::concurrency::ConcurrencyManagementType;
use thiserror::Error;

/// 并发管理类型冲突
///
/// 组件已经锁定为某一种并发管理类型后，又被要求切换为另一种时产生。
/// 这是配置编写错误（例如同一组件上的注解与部署描述符相互矛盾），不可恢复。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{component} bean has been marked for {existing} concurrency management, cannot change it to {requested} now!")]
pub struct ConflictingClassificationError {
    /// 组件名称
    pub component: String,

    /// 已经锁定的并发管理类型
    pub existing: ConcurrencyManagementType,

    /// 本次请求的并发管理类型
    pub requested: ConcurrencyManagementType,
}

/// 描述符构建错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error(transparent)]
    ConflictingClassification(#[from] ConflictingClassificationError),

    #[error("Duplicate singleton component '{component}' in module '{module}'")]
    DuplicateComponent { component: String, module: String },

    #[error("Unknown singleton component '{component}' in module '{module}'")]
    UnknownComponent { component: String, module: String },

    #[error("Invalid deployment descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Logging initialization failed: {0}")]
    LoggingInitFailed(String),
}

pub type DescriptorResult<T> = std::result::Result<T, DescriptorError>;
