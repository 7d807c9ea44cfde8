//! 单例组件的并发管理分类
//!
//! 一个单例组件的并发访问要么由组件自身负责（bean-managed），
//! 要么由容器负责（container-managed）。分类一旦确定就被锁定：
//! 重复请求同一分类是无操作，请求另一种分类则立即失败。

use crate::error::ConflictingClassificationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 并发管理类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyManagementType {
    /// 组件自身同步并发调用
    Bean,

    /// 容器同步并发调用
    Container,
}

impl FromStr for ConcurrencyManagementType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bean" => Ok(ConcurrencyManagementType::Bean),
            "container" => Ok(ConcurrencyManagementType::Container),
            _ => Err(format!("Invalid concurrency management type: {}", s)),
        }
    }
}

impl fmt::Display for ConcurrencyManagementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyManagementType::Bean => write!(f, "BEAN"),
            ConcurrencyManagementType::Container => write!(f, "CONTAINER"),
        }
    }
}

/// 描述符当前的并发管理分类
///
/// `Unset` 是一等状态：在任何 mutator 成功之前，分类就处于这里。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConcurrencyClassification {
    #[default]
    Unset,
    BeanManaged,
    ContainerManaged,
}

impl ConcurrencyClassification {
    /// 锁定后的并发管理类型，未设置时返回 None
    pub fn management_type(self) -> Option<ConcurrencyManagementType> {
        match self {
            ConcurrencyClassification::Unset => None,
            ConcurrencyClassification::BeanManaged => Some(ConcurrencyManagementType::Bean),
            ConcurrencyClassification::ContainerManaged => {
                Some(ConcurrencyManagementType::Container)
            }
        }
    }

    pub fn is_set(self) -> bool {
        self != ConcurrencyClassification::Unset
    }
}

impl From<ConcurrencyManagementType> for ConcurrencyClassification {
    fn from(management_type: ConcurrencyManagementType) -> Self {
        match management_type {
            ConcurrencyManagementType::Bean => ConcurrencyClassification::BeanManaged,
            ConcurrencyManagementType::Container => ConcurrencyClassification::ContainerManaged,
        }
    }
}

/// 并发管理分类守卫
///
/// 嵌入在单例组件描述符中，只通过两个 mutator 和一个读取方法暴露分类，
/// 从而在整个构建阶段维持锁定不变量。
///
/// 守卫本身不做任何同步：它属于单个描述符，构建阶段只由一个线程修改。
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyClassificationGuard {
    classification: ConcurrencyClassification,
}

impl ConcurrencyClassificationGuard {
    /// 创建处于 `Unset` 状态的守卫
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求 bean-managed 并发
    ///
    /// # Errors
    ///
    /// 已锁定为 container-managed 时返回 [`ConflictingClassificationError`]，
    /// 分类保持不变。
    pub fn mark_bean_managed(
        &mut self,
        component: &str,
    ) -> std::result::Result<(), ConflictingClassificationError> {
        self.mark(component, ConcurrencyManagementType::Bean)
    }

    /// 请求 container-managed 并发
    ///
    /// # Errors
    ///
    /// 已锁定为 bean-managed 时返回 [`ConflictingClassificationError`]，
    /// 分类保持不变。
    pub fn mark_container_managed(
        &mut self,
        component: &str,
    ) -> std::result::Result<(), ConflictingClassificationError> {
        self.mark(component, ConcurrencyManagementType::Container)
    }

    /// 按类型请求分类，`component` 只用于错误信息
    pub fn mark(
        &mut self,
        component: &str,
        requested: ConcurrencyManagementType,
    ) -> std::result::Result<(), ConflictingClassificationError> {
        match self.classification.management_type() {
            None => {
                tracing::debug!(
                    "Singleton '{}' locked to {} concurrency management",
                    component,
                    requested
                );
                self.classification = requested.into();
                Ok(())
            }
            Some(existing) if existing == requested => Ok(()),
            Some(existing) => Err(ConflictingClassificationError {
                component: component.to_string(),
                existing,
                requested,
            }),
        }
    }

    /// 当前分类
    pub fn current_classification(&self) -> ConcurrencyClassification {
        self.classification
    }

    /// 当前锁定的并发管理类型，未设置时返回 None
    pub fn management_type(&self) -> Option<ConcurrencyManagementType> {
        self.classification.management_type()
    }
}
