//! 基础设施适配（infra）
//!
//! 仅在启用 `infra-sqlx` 特性时编译：提供基于 sqlx/Postgres 的 `Session` 实现。
//!
mod postgres;

pub use postgres::{PgConnectionSession, PgPoolSession, call_sql};
