use entityconnect_core::entity::{Identifiable, Persistable};
use entityconnect_macros::detail;

#[detail(uuid)]
struct Envelope<T> {
    payload: T,
}

#[detail(component = "batch")]
struct Batch<K, V> {
    entries: Vec<(K, V)>,
}

fn assert_persistable<P: Persistable>(_: &P) {}

fn main() {
    let mut envelope = Envelope::<u32>::default();
    assert_persistable(&envelope);
    assert!(envelope.as_uuid_keyed().is_some());
    assert_eq!(envelope.entity_type(), "Envelope<u32>");
    envelope.assign_id("e-1".to_string());
    assert_eq!(envelope.id(), Some("e-1"));
    let _ = envelope.payload;

    let batch = Batch::<String, i64>::default();
    assert_eq!(batch.as_detail().map(|d| d.component_name()), Some("batch"));
    assert_eq!(batch.entity_type(), "Batch<String, i64>");
    assert!(batch.entries.is_empty());
}
