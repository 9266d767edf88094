//! 实体标识生成核心库（entityconnect-core）
//!
//! 在实体持久化前为其生成主键，支持多种策略并按注册顺序分派：
//! - 实体能力（`entity`）：`UuidAsPrimaryKey`、`Detail`（组件名）与 `Identifiable`
//! - 策略（`strategy`）：本地随机 UUID 与远端序列存储过程
//! - 生成服务（`service`）：首个声明适用的策略胜出
//! - 持久化前置钩子（`generator`）：生成并写入不可变主键
//! - 会话端口（`session`）：连接与语句句柄以 RAII 方式释放
//! - 配置（`config`）与统一错误（`error`）
//!
//! 本 crate 不依赖具体存储；启用 `infra-sqlx` 特性后提供 Postgres 会话实现（`infra`）。
//!
//! 典型用法：
//! 1. 使用 `#[detail(uuid)]` 或 `#[detail(component = "...")]` 声明实体；
//! 2. 构造 `IdGenerator`（默认 `[uuid, db_sequence]`，或由 `IdGenerationConfig` 装配）；
//! 3. 在插入前以当前会话调用 `IdGenerator::before_persist`。
//!
pub mod config;
pub mod entity;
pub mod error;
pub mod generator;
#[cfg(feature = "infra-sqlx")]
pub mod infra;
pub mod service;
pub mod session;
pub mod strategy;

// 允许在本 crate 内部通过 ::entityconnect_core 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::entityconnect_core 路径。
extern crate self as entityconnect_core;
