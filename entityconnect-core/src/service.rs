//! 标识生成服务（IdGenerationService）
//!
//! 持有按注册顺序排列的策略列表，为实体选取第一个声明适用的策略并执行。
//! 构造后不可变，不持有任何实体数据，可在多线程间共享；
//! 每个调用方需提供自己的会话。
//!
use crate::{
    config::{IdGenerationConfig, StrategyKind},
    entity::Persistable,
    error::{ConfigError, IdGenResult, IdGenerationError},
    session::Session,
    strategy::{DbSequenceIdGenerationStrategy, IdGenerationStrategy, UuidIdGenerationStrategy},
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

#[derive(Clone, Default)]
pub struct IdGenerationService {
    strategies: Vec<Arc<dyn IdGenerationStrategy>>,
}

impl IdGenerationService {
    pub fn new(strategies: Vec<Arc<dyn IdGenerationStrategy>>) -> Self {
        Self { strategies }
    }

    /// 在末尾追加一个策略（仅用于构造阶段）
    pub fn with_strategy<S>(mut self, strategy: S) -> Self
    where
        S: IdGenerationStrategy + 'static,
    {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// 按配置中的顺序装配内置策略
    pub fn from_config(config: &IdGenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let procedure = config.procedure()?;

        let strategies = config
            .strategies
            .iter()
            .map(|kind| -> Arc<dyn IdGenerationStrategy> {
                match kind {
                    StrategyKind::Uuid => Arc::new(UuidIdGenerationStrategy::new()),
                    StrategyKind::DbSequence => {
                        Arc::new(DbSequenceIdGenerationStrategy::new(procedure.clone()))
                    }
                }
            })
            .collect();

        Ok(Self::new(strategies))
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// 为实体生成标识
    ///
    /// - 第一个 `supports` 为真的策略胜出，其结果（或错误）立即返回；
    /// - 无策略适用时返回 `NoApplicableStrategy`，且不调用任何 `generate_id`。
    #[instrument(level = "debug", skip_all, fields(entity = %entity.entity_type()))]
    pub async fn generate(
        &self,
        session: &dyn Session,
        entity: &dyn Persistable,
    ) -> IdGenResult<String> {
        let Some(strategy) = self.strategies.iter().find(|s| s.supports(entity)) else {
            warn!(strategies = ?self.strategy_names(), "no applicable id generation strategy");
            return Err(IdGenerationError::NoApplicableStrategy {
                entity_type: entity.entity_type().into_owned(),
            });
        };

        let name = strategy.name();
        debug!(strategy = name, "id generation strategy matched");

        match strategy.generate_id(session, entity).await {
            Ok(id) => {
                debug!(strategy = name, id = %id, "id generated");
                Ok(id)
            }
            Err(source) => {
                error!(strategy = name, error = %source, "id generation failed");
                Err(IdGenerationError::Generation {
                    strategy: name,
                    source,
                })
            }
        }
    }
}

impl fmt::Debug for IdGenerationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerationService")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Detail, UuidAsPrimaryKey};
    use crate::error::GenerationFailure;
    use crate::session::Connection;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoSession;

    #[async_trait]
    impl Session for NoSession {
        async fn obtain_connection<'s>(
            &'s self,
        ) -> Result<Box<dyn Connection + 's>, GenerationFailure> {
            Err(GenerationFailure::ConnectionAcquisition {
                reason: "no database in unit tests".into(),
            })
        }
    }

    // 可控的策略：固定判定结果，记录调用次数
    struct ScriptedStrategy {
        name: &'static str,
        claims: bool,
        reply: &'static str,
        supports_calls: AtomicUsize,
        generate_calls: AtomicUsize,
    }

    impl ScriptedStrategy {
        fn new(name: &'static str, claims: bool, reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                claims,
                reply,
                supports_calls: AtomicUsize::new(0),
                generate_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl IdGenerationStrategy for ScriptedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports(&self, _entity: &dyn Persistable) -> bool {
            self.supports_calls.fetch_add(1, Ordering::SeqCst);
            self.claims
        }

        async fn generate_id(
            &self,
            _session: &dyn Session,
            _entity: &dyn Persistable,
        ) -> Result<String, GenerationFailure> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    struct Anything;
    impl Persistable for Anything {}

    #[tokio::test]
    async fn test_first_applicable_strategy_wins() {
        let skip = ScriptedStrategy::new("skip", false, "never");
        let first = ScriptedStrategy::new("first", true, "from-first");
        let second = ScriptedStrategy::new("second", true, "from-second");
        let service = IdGenerationService::new(vec![
            skip.clone() as Arc<dyn IdGenerationStrategy>,
            first.clone(),
            second.clone(),
        ]);

        let id = service.generate(&NoSession, &Anything).await.unwrap();

        assert_eq!(id, "from-first");
        assert_eq!(skip.generate_calls.load(Ordering::SeqCst), 0);
        assert_eq!(first.generate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.supports_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_applicable_strategy_names_entity() {
        let a = ScriptedStrategy::new("a", false, "x");
        let b = ScriptedStrategy::new("b", false, "y");
        let service =
            IdGenerationService::new(vec![a.clone() as Arc<dyn IdGenerationStrategy>, b.clone()]);

        let err = service.generate(&NoSession, &Anything).await.unwrap_err();

        assert!(matches!(
            err,
            IdGenerationError::NoApplicableStrategy { ref entity_type } if entity_type == "Anything"
        ));
        assert_eq!(a.supports_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.supports_calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.generate_calls.load(Ordering::SeqCst), 0);
        assert_eq!(b.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_service_always_fails() {
        let service = IdGenerationService::default();
        assert!(service.is_empty());

        let err = service.generate(&NoSession, &Anything).await.unwrap_err();
        assert!(err.is_no_applicable_strategy());
    }

    struct Both;
    impl UuidAsPrimaryKey for Both {}
    impl Detail for Both {
        fn component_name(&self) -> &str {
            "both"
        }
    }
    impl Persistable for Both {
        fn as_uuid_keyed(&self) -> Option<&dyn UuidAsPrimaryKey> {
            Some(self)
        }
        fn as_detail(&self) -> Option<&dyn Detail> {
            Some(self)
        }
    }

    #[tokio::test]
    async fn test_overlap_is_resolved_by_registration_order() {
        let service = IdGenerationService::default()
            .with_strategy(DbSequenceIdGenerationStrategy::default())
            .with_strategy(UuidIdGenerationStrategy::new());

        // db_sequence 排在前面：即使实体同时声明 UUID 能力，也会走远端调用（此处失败）
        let err = service.generate(&NoSession, &Both).await.unwrap_err();
        assert!(matches!(
            err,
            IdGenerationError::Generation {
                strategy: "db_sequence",
                source: GenerationFailure::ConnectionAcquisition { .. }
            }
        ));

        let reordered = IdGenerationService::default()
            .with_strategy(UuidIdGenerationStrategy::new())
            .with_strategy(DbSequenceIdGenerationStrategy::default());
        let id = reordered.generate(&NoSession, &Both).await.unwrap();
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn test_from_config_keeps_order() {
        let config = IdGenerationConfig::builder()
            .strategies(vec![StrategyKind::DbSequence, StrategyKind::Uuid])
            .build();
        let service = IdGenerationService::from_config(&config).unwrap();
        assert_eq!(service.strategy_names(), vec!["db_sequence", "uuid"]);
        assert_eq!(service.len(), 2);
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let config = IdGenerationConfig::builder()
            .sequence_procedure("drop table; --")
            .build();
        assert!(IdGenerationService::from_config(&config).is_err());
    }

    #[test]
    fn test_debug_lists_strategy_names() {
        let service = IdGenerationService::default().with_strategy(UuidIdGenerationStrategy::new());
        assert_eq!(
            format!("{service:?}"),
            r#"IdGenerationService { strategies: ["uuid"] }"#
        );
    }
}
