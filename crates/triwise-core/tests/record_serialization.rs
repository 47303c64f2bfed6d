use triwise_core::{CombinationRecord, Factor, RECORD_FIELDS};

#[test]
fn serializes_record_with_contract_field_names() {
    let record = CombinationRecord {
        quantity: 50,
        category_total: 17,
        category: "Malay".to_string(),
        sub_category: "Fish".to_string(),
        sub_category_count: 6,
    };

    let json = serde_json::to_string_pretty(&record).expect("serialize record");
    let expected = r#"{
  "Total Vendor": 50,
  "Number of vendor": 17,
  "Cuisene Type": "Malay",
  "Main Ingredient": "Fish",
  "No. of vendor per ingredient": 6
}"#;
    assert_eq!(json, expected);
}

#[test]
fn record_fields_follow_serialization_order() {
    let record = CombinationRecord {
        quantity: 1,
        category_total: 1,
        category: "a".to_string(),
        sub_category: "b".to_string(),
        sub_category_count: 1,
    };
    let value = serde_json::to_value(&record).expect("serialize record");
    let object = value.as_object().expect("record object");
    for field in RECORD_FIELDS {
        assert!(object.contains_key(field), "missing field {field}");
    }
    assert_eq!(object.len(), RECORD_FIELDS.len());
}

#[test]
fn factor_uses_parameter_key() {
    let factor: Factor =
        serde_json::from_str(r#"{"parameter":"Total Vendor","values":["50","80"]}"#)
            .expect("parse factor");
    assert_eq!(factor.name, "Total Vendor");
    assert_eq!(factor.values, vec!["50", "80"]);
}
