/// 标识生成示例
/// 演示默认装配 `[uuid, db_sequence]`：UUID 实体在本地生成主键，
/// 组件实体通过（内存模拟的）存储过程按组件名递增生成主键。
use async_trait::async_trait;
use entityconnect_core::entity::Identifiable;
use entityconnect_core::error::GenerationFailure;
use entityconnect_core::generator::IdGenerator;
use entityconnect_core::session::{CallableStatement, Connection, SequenceProcedure, Session};
use entityconnect_macros::detail;
use std::collections::HashMap;
use std::sync::Mutex;

// ============================================================================
// 实体定义
// ============================================================================

#[detail(uuid)]
struct Customer {
    name: String,
}

#[detail(component = "invoice")]
struct Invoice {
    customer_id: String,
    amount_cents: i64,
}

#[detail]
struct AuditEntry {
    action: String,
}

// ============================================================================
// 内存序列会话：模拟 generateId(IN component, OUT id)
// ============================================================================

#[derive(Default)]
struct InMemorySequences {
    next: Mutex<HashMap<String, u64>>,
}

struct InMemoryConnection<'s>(&'s InMemorySequences);
struct InMemoryCall<'s>(&'s InMemorySequences);

#[async_trait]
impl Session for InMemorySequences {
    async fn obtain_connection<'s>(
        &'s self,
    ) -> Result<Box<dyn Connection + 's>, GenerationFailure> {
        Ok(Box::new(InMemoryConnection(self)))
    }
}

#[async_trait]
impl<'s> Connection for InMemoryConnection<'s> {
    async fn prepare_call<'c>(
        &'c mut self,
        _procedure: &SequenceProcedure,
    ) -> Result<Box<dyn CallableStatement + 'c>, GenerationFailure> {
        Ok(Box::new(InMemoryCall(self.0)))
    }
}

#[async_trait]
impl<'s> CallableStatement for InMemoryCall<'s> {
    async fn execute(&mut self, component_name: &str) -> Result<Option<String>, GenerationFailure> {
        let mut next = self
            .0
            .next
            .lock()
            .map_err(|e| GenerationFailure::Database {
                reason: e.to_string(),
            })?;
        let counter = next.entry(component_name.to_string()).or_insert(1000);
        *counter += 1;

        let prefix: String = component_name.chars().take(3).collect();
        Ok(Some(format!("{}-{}", prefix.to_uppercase(), counter)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let generator = IdGenerator::new();
    let session = InMemorySequences::default();

    let mut customer = Customer {
        name: "Ada".into(),
        ..Default::default()
    };
    generator.before_persist(&session, &mut customer).await?;
    println!("customer {} -> {:?}", customer.name, customer.id());

    for amount_cents in [1200, 4550] {
        let mut invoice = Invoice {
            customer_id: customer.id().unwrap_or_default().to_string(),
            amount_cents,
            ..Default::default()
        };
        generator.before_persist(&session, &mut invoice).await?;
        println!(
            "invoice for {} ({} cents) -> {:?}",
            invoice.customer_id,
            invoice.amount_cents,
            invoice.id()
        );
    }

    let mut audit = AuditEntry {
        action: "login".into(),
        ..Default::default()
    };
    match generator.before_persist(&session, &mut audit).await {
        Ok(id) => println!("unexpected id for audit entry: {id}"),
        Err(e) => println!("audit entry {} not persisted: {e}", audit.action),
    }

    Ok(())
}
