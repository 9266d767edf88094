//! 标识生成统一错误定义
//!
//! 分为两层：
//! - `GenerationFailure`：单个策略在生成标识时的失败（连接获取、存储过程调用等）；
//! - `IdGenerationError`：生成服务对调用方暴露的错误（无可用策略 / 策略失败）。
//!
//! 服务层不做任何重试或语义转换，策略失败原样包裹后交给调用方。
//!
use thiserror::Error;

/// 策略生成标识失败（连接获取失败同样归属于此类）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("connection acquisition failed: {reason}")]
    ConnectionAcquisition { reason: String },
    #[error("prepare call failed: procedure={procedure}, reason={reason}")]
    PrepareCall { procedure: String, reason: String },
    #[error("procedure call failed: procedure={procedure}, reason={reason}")]
    ProcedureCall { procedure: String, reason: String },
    #[error("procedure returned no value: procedure={procedure}, component={component}")]
    MissingOutput { procedure: String, component: String },
    #[error("database error: {reason}")]
    Database { reason: String },
    #[error("entity not supported: strategy={strategy}, entity={entity_type}")]
    Unsupported {
        strategy: &'static str,
        entity_type: String,
    },
}

/// 生成服务对外错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IdGenerationError {
    #[error("no suitable strategy found for entity: {entity_type}")]
    NoApplicableStrategy { entity_type: String },
    #[error("strategy {strategy} failed: {source}")]
    Generation {
        strategy: &'static str,
        #[source]
        source: GenerationFailure,
    },
}

impl IdGenerationError {
    /// 是否为“无可用策略”错误（通常意味着实体未声明所需能力）
    pub fn is_no_applicable_strategy(&self) -> bool {
        matches!(self, IdGenerationError::NoApplicableStrategy { .. })
    }

    /// 若为策略失败，返回底层失败原因
    pub fn failure(&self) -> Option<&GenerationFailure> {
        match self {
            IdGenerationError::Generation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// 持久化前置钩子错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to generate id: {0}")]
    IdGeneration(#[from] IdGenerationError),
    #[error("id already assigned: entity={entity_type}, id={id}")]
    IdAlreadyAssigned { entity_type: String, id: String },
}

/// 配置错误
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {reason}")]
    Invalid { reason: String },
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// 统一 Result 类型别名
pub type IdGenResult<T> = Result<T, IdGenerationError>;

// 允许在基础设施层直接使用 `?` 将 sqlx 错误转换为 GenerationFailure
#[cfg(feature = "infra-sqlx")]
impl From<sqlx::Error> for GenerationFailure {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                GenerationFailure::ConnectionAcquisition {
                    reason: err.to_string(),
                }
            }
            other => GenerationFailure::Database {
                reason: other.to_string(),
            },
        }
    }
}
