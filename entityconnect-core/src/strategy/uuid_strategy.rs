use crate::{
    entity::Persistable, error::GenerationFailure, session::Session,
    strategy::IdGenerationStrategy,
};
use async_trait::async_trait;
use uuid::Uuid;

/// 本地随机 UUID（v4）策略
///
/// 适用于声明了 `UuidAsPrimaryKey` 能力的实体；输出为 36 位小写带连字符的规范文本。
/// 随机源为操作系统 CSPRNG，不访问会话。
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerationStrategy;

impl UuidIdGenerationStrategy {
    pub const NAME: &'static str = "uuid";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdGenerationStrategy for UuidIdGenerationStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supports(&self, entity: &dyn Persistable) -> bool {
        entity.as_uuid_keyed().is_some()
    }

    async fn generate_id(
        &self,
        _session: &dyn Session,
        _entity: &dyn Persistable,
    ) -> Result<String, GenerationFailure> {
        Ok(Uuid::new_v4().to_string())
    }
}
