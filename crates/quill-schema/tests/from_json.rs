//! Round-trip: deserialize a schema from its JSON form and navigate it.

use quill_schema::{ElementKind, KeyStep, Located, Schema, locate, lookup};

fn chain(keys: &[&str]) -> Vec<KeyStep> {
    keys.iter()
        .enumerate()
        .map(|(i, k)| KeyStep::new(*k, i as u32))
        .collect()
}

const SOURCE: &str = r#"{
    "$any": {
        "type": "KEY",
        "description": "A user-named rule",
        "keys": {
            "Enabled": { "type": "BOOLEAN", "description": "Whether the rule runs" },
            "Actions": {
                "type": "LIST",
                "entries": [
                    { "type": "ENUM", "dataset": "actions" },
                    { "type": "ENUM", "dataset": "devices" }
                ]
            },
            "Scenes": {
                "type": "KEY",
                "keys": {
                    "$array": {
                        "keys": { "prefix": "slot", "start": 0, "end": 3 },
                        "element": { "description": "Scene bound to {key}" }
                    }
                }
            },
            "Schedule": {
                "type": "KEY",
                "maxDepth": 1,
                "keys": {
                    "At": {},
                    "Repeat": { "type": "BOOLEAN" }
                }
            },
            "Backup": { "type": "KEY", "plugin": "backups", "keys": {} }
        }
    }
}"#;

fn schema() -> Schema {
    serde_json::from_str(SOURCE).expect("schema should deserialize")
}

#[test]
fn wildcard_rule_resolves() {
    let schema = schema();
    match locate(&schema, &chain(&["morning-lights"])) {
        Some(Located::Branch { schema, level }) => {
            assert_eq!(level, 1);
            let keys: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
            assert_eq!(
                keys,
                ["Enabled", "Actions", "Scenes", "Schedule", "Backup"],
                "declaration order survives deserialization"
            );
        }
        other => panic!("expected rule branch, got {other:?}"),
    }
}

#[test]
fn list_resolves_at_rule_level() {
    let schema = schema();
    match locate(&schema, &chain(&["rule", "Actions"])) {
        Some(Located::Node { element, level }) => {
            assert_eq!(element.kind, ElementKind::List);
            assert_eq!(element.entries.len(), 2);
            assert_eq!(level, 1);
        }
        other => panic!("expected list node, got {other:?}"),
    }
}

#[test]
fn numbered_scene_slots_resolve() {
    let schema = schema();
    let element = lookup(&schema, &chain(&["rule", "Scenes", "slot1"])).unwrap();
    assert_eq!(element.description, "Scene bound to slot1");
    assert!(lookup(&schema, &chain(&["rule", "Scenes", "slot7"])).is_none());
}

#[test]
fn schedule_depth_is_capped_for_structure() {
    let schema = schema();
    match locate(&schema, &chain(&["rule", "Schedule", "At", "bogus"])) {
        Some(Located::Branch { schema, level }) => {
            assert_eq!(level, 2);
            assert!(schema.get("Repeat").is_some());
        }
        other => panic!("expected capped branch, got {other:?}"),
    }
}

#[test]
fn gated_element_carries_its_plugin() {
    let schema = schema();
    let element = lookup(&schema, &chain(&["rule", "Backup"])).unwrap();
    assert_eq!(element.plugin.as_deref(), Some("backups"));
}
