#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::error::SchemaError;
use serde_json::json;

fn parse(value: serde_json::Value) -> Result<ModuleConfig, SchemaError> {
    parse_module_config(&value.to_string(), ConfigFormat::Json, "test.config")
}

fn minimal(name: &str) -> serde_json::Value {
    json!({
        "Module Data": { "Class Name": name, "Namespace": ["korali", "solver"] }
    })
}

#[test]
fn test_minimal_module() {
    let config = parse(json!({
        "Module Data": { "Class Name": "Foo", "Namespace": ["korali"] },
        "Configuration Settings": [
            { "Name": "Bar", "Type": "int", "Description": "A bar.", "Default": 5 }
        ]
    }))
    .unwrap();

    assert_eq!(config.name, "Foo");
    assert_eq!(config.namespace, vec!["korali".to_string()]);
    assert!(config.parent.is_none());
    assert_eq!(config.configurable_items.len(), 1);
    let bar = &config.configurable_items[0];
    assert_eq!(bar.name, KeyPath::new(["Bar"]));
    assert_eq!(bar.declared_type, "int");
    assert_eq!(bar.default, Some(json!(5)));
    assert_eq!(config.qualified_name(), "korali::Foo");
}

#[test]
fn test_missing_class_name_is_schema_error() {
    let err = parse(json!({
        "Module Data": { "Namespace": ["korali"] },
        "Configuration Settings": []
    }))
    .unwrap_err();
    match err {
        SchemaError::MissingField { field, .. } => assert_eq!(field, "Module Data.Class Name"),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn test_missing_module_data_is_schema_error() {
    let err = parse(json!({ "Configuration Settings": [] })).unwrap_err();
    assert!(matches!(err, SchemaError::MissingField { ref field, .. } if field == "Module Data"));
}

#[test]
fn test_missing_namespace_is_schema_error() {
    let err = parse(json!({ "Module Data": { "Class Name": "Foo" } })).unwrap_err();
    assert!(matches!(err, SchemaError::MissingField { ref field, .. } if field == "Module Data.Namespace"));
}

#[test]
fn test_entry_without_type_is_malformed() {
    let mut value = minimal("Foo");
    value["Configuration Settings"] = json!([{ "Name": "Bar", "Description": "no type" }]);
    let err = parse(value).unwrap_err();
    match err {
        SchemaError::Malformed { message, .. } => assert!(message.contains("Type"), "{message}"),
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn test_entry_with_unknown_key_is_malformed() {
    let mut value = minimal("Foo");
    value["Configuration Settings"] = json!([{
        "Name": "Bar", "Type": "int", "Description": "typo below", "Defualt": 3
    }]);
    assert!(matches!(parse(value).unwrap_err(), SchemaError::Malformed { .. }));
}

#[test]
fn test_unknown_top_level_key_is_tolerated() {
    let mut value = minimal("Foo");
    value["Compatible Solvers"] = json!(["CMAES"]);
    assert!(parse(value).is_ok());
}

#[test]
fn test_explicit_null_default_is_kept() {
    let mut value = minimal("Foo");
    value["Configuration Settings"] = json!([{
        "Name": "Problem", "Type": "korali::Problem*", "Description": "p", "Default": null
    }]);
    let config = parse(value).unwrap();
    assert_eq!(config.configurable_items[0].default, Some(serde_json::Value::Null));
}

#[test]
fn test_order_is_preserved() {
    let mut value = minimal("Foo");
    value["Configuration Settings"] = json!([
        { "Name": "Zeta", "Type": "int", "Description": "z" },
        { "Name": "Alpha", "Type": "int", "Description": "a" },
        { "Name": "Mid", "Type": "int", "Description": "m" }
    ]);
    value["Available Operations"] = json!([
        { "Name": "Second", "Description": "" },
        { "Name": "First", "Description": "" }
    ]);
    let config = parse(value).unwrap();
    let names: Vec<_> = config
        .configurable_items
        .iter()
        .map(|i| i.name.label())
        .collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    assert_eq!(config.available_operations[0].name, "Second");
}

#[test]
fn test_colliding_members_are_rejected() {
    let mut value = minimal("Foo");
    value["Configuration Settings"] = json!([
        { "Name": "Max Value", "Type": "int", "Description": "" }
    ]);
    value["Internal Settings"] = json!([
        { "Name": "Max-Value", "Type": "int", "Description": "" }
    ]);
    let err = parse(value).unwrap_err();
    assert!(matches!(err, SchemaError::Duplicate { kind: "member", ref name, .. } if name == "_maxValue"));
}

#[test]
fn test_duplicate_operations_are_rejected() {
    let mut value = minimal("Foo");
    value["Available Operations"] = json!([
        { "Name": "Evaluate", "Description": "" },
        { "Name": "Evaluate", "Description": "" }
    ]);
    assert!(matches!(
        parse(value).unwrap_err(),
        SchemaError::Duplicate { kind: "operation", .. }
    ));
}

#[test]
fn test_empty_key_path_is_rejected() {
    let mut value = minimal("Foo");
    value["Configuration Settings"] = json!([{ "Name": [], "Type": "int", "Description": "" }]);
    assert!(matches!(parse(value).unwrap_err(), SchemaError::EmptyKeyPath { .. }));
}

#[test]
fn test_key_path_without_identifier_characters_is_rejected() {
    let mut value = minimal("Foo");
    value["Configuration Settings"] = json!([{ "Name": ["π"], "Type": "double", "Description": "" }]);
    let err = parse(value).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::NoIdentifier { ref section, ref path, .. }
            if section == "Configuration Settings" && path == "['π']"
    ));
}

#[test]
fn test_defaults_must_be_objects() {
    let mut value = minimal("Foo");
    value["Module Defaults"] = json!([1, 2]);
    assert!(matches!(parse(value).unwrap_err(), SchemaError::Malformed { .. }));
}

#[test]
fn test_yaml_format() {
    let yaml = r#"
Module Data:
  Class Name: Foo
  Namespace: [korali, problem]
Available Operations:
  - Name: Evaluate
    Description: Evaluates a sample.
"#;
    let config = parse_module_config(yaml, ConfigFormat::Yaml, "foo.yaml").unwrap();
    assert_eq!(config.qualified_name(), "korali::problem::Foo");
    assert_eq!(config.available_operations[0].handler(), "evaluate");
}

#[test]
fn test_member_identifier() {
    assert_eq!(KeyPath::new(["Bar"]).member_identifier(), "_bar");
    assert_eq!(
        KeyPath::new(["Population Size"]).member_identifier(),
        "_populationSize"
    );
    assert_eq!(
        KeyPath::new(["Initial", "Standard Deviation"]).member_identifier(),
        "_initialStandardDeviation"
    );
    assert_eq!(KeyPath::new(["CMA-ES Sigma"]).member_identifier(), "_cMAESSigma");
}

#[test]
fn test_key_path_display() {
    let path = KeyPath::new(["Max Generations"]).prefixed("Termination Criteria");
    assert_eq!(path.to_string(), "['Termination Criteria']['Max Generations']");
    assert_eq!(path.label(), "Termination Criteria Max Generations");
}

#[test]
fn test_operation_handler_defaults_to_lower_camel() {
    let op = Operation {
        name: "Evaluate Logposterior".to_string(),
        function: None,
        description: String::new(),
    };
    assert_eq!(op.handler(), "evaluateLogposterior");
}

fn module(name: &str, parent: Option<&str>) -> ModuleConfig {
    let mut value = minimal(name);
    if let Some(p) = parent {
        value["Module Data"]["Parent Module"] = json!(p);
    }
    parse_module_config(&value.to_string(), ConfigFormat::Json, &format!("{name}.config")).unwrap()
}

#[test]
fn test_index_resolves_parent_regardless_of_order() {
    let child = module("CMAES", Some("Optimizer"));
    let parent = module("Optimizer", Some("Solver"));
    let root = module("Solver", None);
    let (index, errors) = ModuleIndex::build(&[&child, &parent, &root]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(index.parent_of(0), Some(1));
    assert_eq!(index.parent_of(1), Some(2));
    assert_eq!(index.parent_of(2), None);
    assert_eq!(index.lookup("Solver"), Some(2));
    assert_eq!(index.len(), 3);
    assert_eq!(index.depth(0), 2);
    assert_eq!(index.depth(2), 0);
}

#[test]
fn test_index_reports_unresolved_parent_once() {
    let a = module("A", Some("Missing"));
    let b = module("B", None);
    let (_, errors) = ModuleIndex::build(&[&a, &b]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, 0);
    assert!(matches!(errors[0].1, SchemaError::UnresolvedParent { ref parent, .. } if parent == "Missing"));
}

#[test]
fn test_index_reports_duplicates_and_cycles() {
    let a = module("A", Some("B"));
    let b = module("B", Some("A"));
    let dup = module("A", None);
    let (index, errors) = ModuleIndex::build(&[&a, &b, &dup]);
    assert!(index.depth(0) <= 3);
    let dup_errors: Vec<_> = errors
        .iter()
        .filter(|(_, e)| matches!(e, SchemaError::DuplicateModule { .. }))
        .collect();
    assert_eq!(dup_errors.len(), 1);
    assert_eq!(dup_errors[0].0, 2);
    let cycles = errors
        .iter()
        .filter(|(_, e)| matches!(e, SchemaError::ParentCycle { .. }))
        .count();
    assert_eq!(cycles, 2);
}
