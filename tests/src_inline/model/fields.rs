use super::*;

#[test]
fn test_number_range_validation() {
    let purity = FieldDef::number("purity", Some(0.0), Some(1.0));
    assert!(purity.validate(&AnnotationValue::Number(0.42)).is_ok());
    assert!(purity.validate(&AnnotationValue::Number(0.0)).is_ok());
    assert!(purity.validate(&AnnotationValue::Number(1.0)).is_ok());
    let err = purity.validate(&AnnotationValue::Number(1.5)).unwrap_err();
    assert_eq!(err.field, "purity");
    assert!(purity.validate(&AnnotationValue::Number(-0.1)).is_err());
    assert!(purity.validate(&AnnotationValue::Number(f64::NAN)).is_err());
    assert!(
        purity
            .validate(&AnnotationValue::Text("0.5".to_string()))
            .is_err()
    );
}

#[test]
fn test_open_ended_number() {
    let ploidy = FieldDef::number("ploidy", Some(0.0), None);
    assert!(ploidy.validate(&AnnotationValue::Number(3.7)).is_ok());
    assert!(ploidy.validate(&AnnotationValue::Number(-1.0)).is_err());
}

#[test]
fn test_categorical_and_list_validation() {
    let call = FieldDef::categorical("call", &["pass", "fail"]);
    assert!(call.validate(&AnnotationValue::Text("pass".to_string())).is_ok());
    assert!(call.validate(&AnnotationValue::Text("maybe".to_string())).is_err());

    let tags = FieldDef::list("tags", &["low_cov", "contaminated"]);
    let ok = AnnotationValue::List(vec!["low_cov".to_string()]);
    let bad = AnnotationValue::List(vec!["low_cov".to_string(), "other".to_string()]);
    assert!(tags.validate(&ok).is_ok());
    assert!(tags.validate(&bad).is_err());

    let free = FieldDef::list("free", &[]);
    assert!(free.validate(&bad).is_ok());
    assert!(FieldDef::text("notes").validate(&AnnotationValue::Text(String::new())).is_ok());
}

#[test]
fn test_parse_by_kind() {
    let purity = FieldDef::number("purity", None, None);
    assert_eq!(purity.parse(" 0.42 ").unwrap(), AnnotationValue::Number(0.42));
    assert!(purity.parse("high").is_err());

    let tags = FieldDef::list("tags", &[]);
    assert_eq!(
        tags.parse("a, b,,c ").unwrap(),
        AnnotationValue::List(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
    assert_eq!(
        FieldDef::text("notes").parse("looks clonal").unwrap(),
        AnnotationValue::Text("looks clonal".to_string())
    );
}

#[test]
fn test_field_def_json_shape() {
    let def: FieldDef =
        serde_json::from_str(r#"{"name":"purity","kind":"number","min":0,"max":1}"#).unwrap();
    assert_eq!(def, FieldDef::number("purity", Some(0.0), Some(1.0)));

    let text: FieldDef = serde_json::from_str(r#"{"name":"notes","kind":"text"}"#).unwrap();
    assert_eq!(text.kind, FieldKind::Text);

    let json = serde_json::to_string(&FieldDef::categorical("call", &["a"])).unwrap();
    assert_eq!(json, r#"{"name":"call","kind":"categorical","options":["a"]}"#);
}

#[test]
fn test_value_display() {
    assert_eq!(AnnotationValue::Number(0.5).to_string(), "0.5");
    assert_eq!(
        AnnotationValue::List(vec!["a".to_string(), "b".to_string()]).to_string(),
        "a, b"
    );
}
