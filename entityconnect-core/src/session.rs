//! 会话与连接端口（Session / Connection）
//!
//! 生成核心只借用调用方提供的会话，从中取得连接并准备存储过程调用。
//! 连接与语句句柄均以拥有所有权的值返回，离开作用域即释放（`Drop`），
//! 因此在调用失败的路径上同样不会泄漏资源。语句句柄借用连接，
//! 保证总是先于连接释放。
//!
use crate::error::{ConfigError, GenerationFailure};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// 调用方的会话（事务）上下文
#[async_trait]
pub trait Session: Send + Sync {
    /// 获取一个连接；返回的句柄在 drop 时归还/关闭
    async fn obtain_connection<'s>(
        &'s self,
    ) -> Result<Box<dyn Connection + 's>, GenerationFailure>;
}

#[async_trait]
impl<T> Session for Arc<T>
where
    T: Session + ?Sized,
{
    async fn obtain_connection<'s>(
        &'s self,
    ) -> Result<Box<dyn Connection + 's>, GenerationFailure> {
        (**self).obtain_connection().await
    }
}

/// 已获取的连接
#[async_trait]
pub trait Connection: Send {
    /// 准备一次存储过程调用；返回的语句句柄借用本连接
    async fn prepare_call<'c>(
        &'c mut self,
        procedure: &SequenceProcedure,
    ) -> Result<Box<dyn CallableStatement + 'c>, GenerationFailure>;
}

/// 已准备的存储过程调用：`procedure(IN component TEXT, OUT id TEXT)`
#[async_trait]
pub trait CallableStatement: Send {
    /// 以组件名作为输入参数执行，返回输出参数（可能为 NULL）
    async fn execute(&mut self, component_name: &str) -> Result<Option<String>, GenerationFailure>;
}

/// 远端序列存储过程名
///
/// 名称会被拼接进调用语句，因此只接受普通 SQL 标识符，
/// 可选一级 schema 限定（如 `ids.generateId`）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceProcedure {
    name: String,
}

impl SequenceProcedure {
    pub const DEFAULT_NAME: &'static str = "generateId";

    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if !is_valid_procedure_name(&name) {
            return Err(ConfigError::Invalid {
                reason: format!("sequence procedure name is not a plain identifier: {name:?}"),
            });
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for SequenceProcedure {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
        }
    }
}

impl fmt::Display for SequenceProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn is_valid_procedure_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2 && parts.iter().all(|p| is_identifier(p))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
