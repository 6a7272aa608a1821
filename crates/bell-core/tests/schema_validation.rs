//! JsonSchema validation for the core value types that cross crate and
//! process boundaries (the CLI prints them, hosts persist them).

use pretty_assertions::assert_eq;
use schemars::schema_for;

use bell_core::{CoreError, EntityKind, EntityRef, Meaning, Uri};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! validates {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

validates!(entity_ref_schema, EntityRef, EntityRef::section("math-101"));

validates!(
    uri_schema,
    Uri,
    Uri::new("http://schooltool.org/ns/advising", "Advising").with_description("Advisors")
);

validates!(meaning_schema, Meaning, Meaning::ACTIVE_PARENT);

#[test]
fn entity_ref_json_shape() {
    let value = serde_json::to_value(EntityRef::new(EntityKind::Person, "jonas")).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "id": "per-jonas", "kind": "person" })
    );
}

#[test]
fn core_errors_render_their_input() {
    let err = "janitor".parse::<EntityKind>().unwrap_err();
    assert_eq!(err.to_string(), "Unknown entity kind: janitor");
    let err = EntityRef::parse(EntityKind::Group, "per-jonas").unwrap_err();
    assert!(matches!(err, CoreError::InvalidEntityId { ref id, .. } if id == "per-jonas"));
}

#[test]
fn uri_without_description_deserializes() {
    let uri: Uri = serde_json::from_str(
        r#"{ "uri": "http://schooltool.org/ns/membership", "name": "Membership" }"#,
    )
    .unwrap();
    assert_eq!(uri.as_str(), "http://schooltool.org/ns/membership");
    assert_eq!(uri.description(), "");
}
