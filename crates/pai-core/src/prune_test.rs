use super::{is_empty_value, prune_empty, prune_empty_map};
use serde_json::{json, Map, Value};

#[test]
fn empty_fields_are_removed_recursively() {
    let value = json!({
        "name": "job",
        "description": "",
        "parameters": {},
        "deployments": [],
        "defaults": {"virtualCluster": "", "deployment": null},
        "taskRoles": {"worker": {"instances": 1, "commands": ["python train.py"], "extraContainerOptions": {}}}
    });

    assert_eq!(
        prune_empty(&value),
        json!({
            "name": "job",
            "taskRoles": {"worker": {"instances": 1, "commands": ["python train.py"]}}
        })
    );
}

#[test]
fn zero_and_false_are_kept() {
    let value = json!({"jobRetryCount": 0, "enabled": false});
    assert_eq!(prune_empty(&value), value);
}

#[test]
fn sequence_elements_are_kept_in_place() {
    let value = json!({"commands": ["", "echo done"], "ports": [{"name": ""}]});
    assert_eq!(
        prune_empty(&value),
        json!({"commands": ["", "echo done"], "ports": [{}]})
    );
}

#[test]
fn pruning_preserves_insertion_order() {
    let mut object = Map::new();
    object.insert("z".to_string(), json!("1"));
    object.insert("empty".to_string(), json!(""));
    object.insert("a".to_string(), json!("2"));

    let keys = prune_empty_map(&object).keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys, vec!["z".to_string(), "a".to_string()]);
}

#[test]
fn scalars_are_not_empty() {
    assert!(is_empty_value(&Value::Null));
    assert!(!is_empty_value(&json!(0)));
    assert!(!is_empty_value(&json!(" ")));
}
