use entityconnect_core::entity::{Detail, Persistable};
use entityconnect_macros::detail;

#[detail(component = "invoice")]
struct Invoice {
    amount_cents: i64,
}

fn main() {
    let invoice = Invoice {
        amount_cents: 1200,
        ..Default::default()
    };
    assert_eq!(invoice.component_name(), "invoice");
    let detail = invoice.as_detail().expect("component declared");
    assert_eq!(detail.component_name(), "invoice");
    assert!(invoice.as_uuid_keyed().is_none());
    assert_eq!(invoice.amount_cents, 1200);
}
