use crate::{
    entity::Persistable,
    error::GenerationFailure,
    session::{SequenceProcedure, Session},
    strategy::IdGenerationStrategy,
};
use async_trait::async_trait;
use tracing::debug;

/// 远端序列策略
///
/// 适用于暴露组件名（`Detail`）的实体：从会话取得连接，调用
/// `procedure(IN component_name, OUT generated_id)` 并返回输出参数。
/// - 连接与语句句柄离开作用域即释放，失败路径同样如此；
/// - 不重试、不回退到本地生成，输出为 NULL 时视为失败；
/// - 唯一性由远端过程保证，这里不做本地校验。
#[derive(Debug, Default, Clone)]
pub struct DbSequenceIdGenerationStrategy {
    procedure: SequenceProcedure,
}

impl DbSequenceIdGenerationStrategy {
    pub const NAME: &'static str = "db_sequence";

    pub fn new(procedure: SequenceProcedure) -> Self {
        Self { procedure }
    }

    pub fn procedure(&self) -> &SequenceProcedure {
        &self.procedure
    }
}

#[async_trait]
impl IdGenerationStrategy for DbSequenceIdGenerationStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supports(&self, entity: &dyn Persistable) -> bool {
        entity.as_detail().is_some()
    }

    async fn generate_id(
        &self,
        session: &dyn Session,
        entity: &dyn Persistable,
    ) -> Result<String, GenerationFailure> {
        let Some(detail) = entity.as_detail() else {
            return Err(GenerationFailure::Unsupported {
                strategy: Self::NAME,
                entity_type: entity.entity_type().into_owned(),
            });
        };
        let component = detail.component_name();

        debug!(procedure = %self.procedure, component, "calling sequence procedure");

        // 声明顺序保证 stmt 先于 conn 释放
        let mut conn = session.obtain_connection().await?;
        let mut stmt = conn.prepare_call(&self.procedure).await?;
        let generated = stmt.execute(component).await?;

        generated.ok_or_else(|| GenerationFailure::MissingOutput {
            procedure: self.procedure.to_string(),
            component: component.to_string(),
        })
    }
}
