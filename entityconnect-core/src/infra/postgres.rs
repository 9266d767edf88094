//! Postgres 会话实现
//!
//! 远端过程形如 `generateId(IN component_name TEXT, OUT generated_id TEXT)`，
//! 通过 `CALL name($1, NULL)` 调用，返回单行单列的输出参数。
//!
use crate::{
    error::GenerationFailure,
    session::{CallableStatement, Connection, SequenceProcedure, Session},
};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, pool::PoolConnection, postgres::Postgres};
use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

/// 生成存储过程调用语句（过程名已在 `SequenceProcedure` 中校验）
pub fn call_sql(procedure: &SequenceProcedure) -> String {
    format!("CALL {}($1, NULL)", procedure.name())
}

/// 基于连接池的会话：每次调用从池中取连接，drop 时归还
#[derive(Debug, Clone)]
pub struct PgPoolSession {
    pool: PgPool,
}

impl PgPoolSession {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, GenerationFailure> {
        Ok(Self::new(PgPool::connect(url).await?))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Session for PgPoolSession {
    async fn obtain_connection<'s>(
        &'s self,
    ) -> Result<Box<dyn Connection + 's>, GenerationFailure> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| GenerationFailure::ConnectionAcquisition {
                reason: e.to_string(),
            })?;
        trace!("pooled connection acquired");
        Ok(Box::new(PooledConnection(conn)))
    }
}

/// 借用调用方已打开的连接（例如事务内），使调用参与调用方的事务
pub struct PgConnectionSession<'t> {
    conn: Mutex<&'t mut PgConnection>,
}

impl<'t> PgConnectionSession<'t> {
    pub fn new(conn: &'t mut PgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl<'t> Session for PgConnectionSession<'t> {
    async fn obtain_connection<'s>(
        &'s self,
    ) -> Result<Box<dyn Connection + 's>, GenerationFailure> {
        let guard = self.conn.lock().await;
        Ok(Box::new(BorrowedConnection(guard)))
    }
}

struct PooledConnection(PoolConnection<Postgres>);

#[async_trait]
impl Connection for PooledConnection {
    async fn prepare_call<'c>(
        &'c mut self,
        procedure: &SequenceProcedure,
    ) -> Result<Box<dyn CallableStatement + 'c>, GenerationFailure> {
        Ok(Box::new(PgCallStatement::new(&mut self.0, procedure)))
    }
}

struct BorrowedConnection<'s, 't>(MutexGuard<'s, &'t mut PgConnection>);

#[async_trait]
impl<'s, 't> Connection for BorrowedConnection<'s, 't> {
    async fn prepare_call<'c>(
        &'c mut self,
        procedure: &SequenceProcedure,
    ) -> Result<Box<dyn CallableStatement + 'c>, GenerationFailure> {
        Ok(Box::new(PgCallStatement::new(&mut self.0, procedure)))
    }
}

struct PgCallStatement<'c> {
    conn: &'c mut PgConnection,
    procedure: String,
    sql: String,
}

impl<'c> PgCallStatement<'c> {
    fn new(conn: &'c mut PgConnection, procedure: &SequenceProcedure) -> Self {
        Self {
            conn,
            procedure: procedure.name().to_string(),
            sql: call_sql(procedure),
        }
    }
}

#[async_trait]
impl<'c> CallableStatement for PgCallStatement<'c> {
    async fn execute(&mut self, component_name: &str) -> Result<Option<String>, GenerationFailure> {
        sqlx::query_scalar::<_, Option<String>>(&self.sql)
            .bind(component_name)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| GenerationFailure::ProcedureCall {
                procedure: self.procedure.clone(),
                reason: e.to_string(),
            })
    }
}
