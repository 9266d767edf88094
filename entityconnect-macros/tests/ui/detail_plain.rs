use entityconnect_core::entity::Persistable;
use entityconnect_macros::detail;

// 已有 id 字段时复用原定义并移至最前
#[detail]
struct AuditEntry {
    action: String,
    id: Option<String>,
}

fn main() {
    let entry = AuditEntry::default();
    assert!(entry.id.is_none());
    assert!(entry.as_uuid_keyed().is_none());
    assert!(entry.as_detail().is_none());
    let _ = entry.action;
}
