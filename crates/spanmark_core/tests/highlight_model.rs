use spanmark_core::{field_color, FieldKey, Highlight, KnowledgeUnit};
use uuid::Uuid;

#[test]
fn highlight_new_derives_color_from_field_id() {
    let unit = KnowledgeUnit::new("employment");
    let highlight = Highlight::new(unit.id, "person", 5, 9, "John");

    assert!(!highlight.id.is_nil());
    assert_eq!(highlight.ku_id, unit.id);
    assert_eq!(highlight.field_id, "person");
    assert_eq!(highlight.color, field_color("person"));
}

#[test]
fn highlights_on_same_field_share_a_color() {
    let ku_id = Uuid::new_v4();
    let first = Highlight::new(ku_id, "person", 0, 4, "Dear");
    let second = Highlight::new(ku_id, "person", 5, 9, "John");

    assert_eq!(first.color, second.color);
    assert_ne!(first.id, second.id);
}

#[test]
fn field_key_identifies_exactly_one_slot() {
    let ku_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let highlight = Highlight::with_id(Uuid::new_v4(), ku_id, "company", 3, 7, "ACME");

    assert_eq!(highlight.field_key(), FieldKey::new(ku_id, "company"));
    assert_ne!(highlight.field_key(), FieldKey::new(ku_id, "person"));
}

#[test]
fn highlight_serialization_uses_expected_wire_fields() {
    let ku_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let id = Uuid::parse_str("99999999-8888-4777-8666-555555555555").unwrap();
    let highlight = Highlight::with_id(id, ku_id, "person", 5, 9, "John");

    let json = serde_json::to_value(&highlight).unwrap();
    assert_eq!(json["fieldId"], "person");
    assert_eq!(json["kuId"], ku_id.to_string());
    assert_eq!(json["startOffset"], 5);
    assert_eq!(json["endOffset"], 9);
    assert_eq!(json["text"], "John");
    assert_eq!(json["color"], field_color("person"));
}

#[test]
fn knowledge_unit_with_id_keeps_caller_identity() {
    let id = Uuid::parse_str("00000000-0000-4000-8000-000000000001").unwrap();
    let unit = KnowledgeUnit::with_id(id, "sentiment");

    assert_eq!(unit.id, id);
    assert_eq!(unit.schema_id, "sentiment");
    assert!(unit.fields().is_empty());
}
