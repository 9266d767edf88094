//! 持久化前置钩子（IdGenerator）
//!
//! 持久化层在插入实体前调用 `before_persist`：生成标识并写入实体主键。
//! 主键一经写入不再改变，对已有主键的实体再次调用会被拒绝。
//!
use crate::{
    config::IdGenerationConfig,
    entity::{Identifiable, Persistable},
    error::{ConfigError, PersistError},
    service::IdGenerationService,
    session::{SequenceProcedure, Session},
    strategy::{DbSequenceIdGenerationStrategy, UuidIdGenerationStrategy},
};
use tracing::debug;

/// 默认装配：`[uuid, db_sequence]`
#[derive(Debug, Clone)]
pub struct IdGenerator {
    service: IdGenerationService,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        let service = IdGenerationService::default()
            .with_strategy(UuidIdGenerationStrategy::new())
            .with_strategy(DbSequenceIdGenerationStrategy::new(
                SequenceProcedure::default(),
            ));
        Self { service }
    }

    pub fn with_service(service: IdGenerationService) -> Self {
        Self { service }
    }

    pub fn from_config(config: &IdGenerationConfig) -> Result<Self, ConfigError> {
        IdGenerationService::from_config(config).map(Self::with_service)
    }

    pub fn service(&self) -> &IdGenerationService {
        &self.service
    }

    pub async fn generate(
        &self,
        session: &dyn Session,
        entity: &dyn Persistable,
    ) -> Result<String, PersistError> {
        Ok(self.service.generate(session, entity).await?)
    }

    /// 为新实体生成并写入主键，返回写入的值
    pub async fn before_persist<E>(
        &self,
        session: &dyn Session,
        entity: &mut E,
    ) -> Result<String, PersistError>
    where
        E: Persistable + Identifiable,
    {
        if let Some(existing) = entity.id() {
            return Err(PersistError::IdAlreadyAssigned {
                entity_type: entity.entity_type().into_owned(),
                id: existing.to_string(),
            });
        }

        let id = self.generate(session, &*entity).await?;
        debug!(entity = %entity.entity_type(), id = %id, "id assigned before persist");
        entity.assign_id(id.clone());
        Ok(id)
    }
}
