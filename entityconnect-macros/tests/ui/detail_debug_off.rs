use entityconnect_core::entity::Persistable;
use entityconnect_macros::detail;

#[detail(uuid, component = "ledger", debug = false)]
struct Ledger {
    secret: String,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ledger(..)")
    }
}

fn main() {
    let ledger = Ledger::default();
    assert_eq!(format!("{:?}", ledger), "Ledger(..)");
    assert!(ledger.as_uuid_keyed().is_some());
    assert!(ledger.as_detail().is_some());
    let _ = ledger.secret;
}
