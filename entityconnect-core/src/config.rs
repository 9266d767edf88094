//! 标识生成配置
//!
//! 描述内置策略的注册顺序与远端序列过程名，可由 serde 反序列化，
//! 也可从环境变量读取：
//! - `ENTITYCONNECT_STRATEGIES`：逗号分隔，如 `uuid,db_sequence`
//! - `ENTITYCONNECT_SEQUENCE_PROCEDURE`：如 `generateId`
//!
use crate::{error::ConfigError, session::SequenceProcedure};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const ENV_STRATEGIES: &str = "ENTITYCONNECT_STRATEGIES";
pub const ENV_SEQUENCE_PROCEDURE: &str = "ENTITYCONNECT_SEQUENCE_PROCEDURE";

/// 内置策略种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Uuid,
    DbSequence,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Uuid => "uuid",
            StrategyKind::DbSequence => "db_sequence",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "uuid" => Ok(StrategyKind::Uuid),
            "db_sequence" => Ok(StrategyKind::DbSequence),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

fn default_strategies() -> Vec<StrategyKind> {
    vec![StrategyKind::Uuid, StrategyKind::DbSequence]
}

/// 标识生成配置
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdGenerationConfig {
    /// 策略注册顺序（先命中者胜出）
    #[builder(default = default_strategies())]
    pub strategies: Vec<StrategyKind>,
    /// 远端序列存储过程名
    #[builder(default = SequenceProcedure::DEFAULT_NAME.to_string(), into)]
    pub sequence_procedure: String,
}

impl Default for IdGenerationConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            sequence_procedure: SequenceProcedure::DEFAULT_NAME.to_string(),
        }
    }
}

impl IdGenerationConfig {
    /// 从进程环境变量读取，缺失项使用默认值
    ///
    /// 仅是 `from_lookup` 的薄封装，解析与校验的测试都经由 `from_lookup`，
    /// 避免在并行测试中修改进程环境（`std::env::set_var` 在 2024 edition 中为 unsafe）。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（便于测试与嵌入其他配置层）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_STRATEGIES).filter(|v| !v.trim().is_empty()) {
            config.strategies = raw
                .split(',')
                .map(StrategyKind::from_str)
                .collect::<Result<Vec<_>, _>>()?;
        }

        if let Some(name) = lookup(ENV_SEQUENCE_PROCEDURE).filter(|v| !v.trim().is_empty()) {
            config.sequence_procedure = name.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategies.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "at least one strategy must be configured".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for kind in &self.strategies {
            if !seen.insert(kind) {
                return Err(ConfigError::Invalid {
                    reason: format!("duplicate strategy: {kind}"),
                });
            }
        }

        self.procedure().map(|_| ())
    }

    pub fn procedure(&self) -> Result<SequenceProcedure, ConfigError> {
        SequenceProcedure::new(self.sequence_procedure.as_str())
    }
}
