use entityconnect_core::entity::{Identifiable, Persistable};
use entityconnect_macros::detail;

#[detail(uuid)]
#[derive(Clone)]
struct Note {
    body: String,
}

fn main() {
    let mut note = Note::default();
    assert!(note.id().is_none());
    assert!(note.as_uuid_keyed().is_some());
    assert!(note.as_detail().is_none());
    assert_eq!(note.entity_type(), "Note");

    note.assign_id("6f1c2a40-0000-4000-8000-000000000000".to_string());
    assert_eq!(note.id(), Some("6f1c2a40-0000-4000-8000-000000000000"));
    let _ = format!("{:?}", note.clone());
    let _ = note.body;
}
