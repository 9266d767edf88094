//! 标识生成策略（strategy）
//!
//! 每个策略回答两个问题：是否适用于某实体（`supports`），以及如何为其生成标识
//! （`generate_id`）。内置两种实现：
//! - `UuidIdGenerationStrategy`：本地生成随机 UUID；
//! - `DbSequenceIdGenerationStrategy`：调用远端序列存储过程。
//!
//! 策略集合保持开放，第三方可自行实现 trait 并注册到 `IdGenerationService`。
//!
mod db_sequence_strategy;
mod uuid_strategy;

pub use db_sequence_strategy::DbSequenceIdGenerationStrategy;
pub use uuid_strategy::UuidIdGenerationStrategy;

use crate::{entity::Persistable, error::GenerationFailure, session::Session};
use async_trait::async_trait;
use std::sync::Arc;

/// 标识生成策略
///
/// 实现应无状态（或只读状态），构造一次后可在多线程间复用。
#[async_trait]
pub trait IdGenerationStrategy: Send + Sync {
    /// 策略名（用于日志与错误）
    fn name(&self) -> &'static str;

    /// 纯判定：不得失败，不得修改实体或外部状态
    fn supports(&self, entity: &dyn Persistable) -> bool;

    /// 生成标识；服务保证每次持久化在命中后仅调用一次
    async fn generate_id(
        &self,
        session: &dyn Session,
        entity: &dyn Persistable,
    ) -> Result<String, GenerationFailure>;
}

#[async_trait]
impl<T> IdGenerationStrategy for Arc<T>
where
    T: IdGenerationStrategy + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn supports(&self, entity: &dyn Persistable) -> bool {
        (**self).supports(entity)
    }

    async fn generate_id(
        &self,
        session: &dyn Session,
        entity: &dyn Persistable,
    ) -> Result<String, GenerationFailure> {
        (**self).generate_id(session, entity).await
    }
}
