//! Sample schema and datasets shared by integration tests.
//!
//! Models a small home-automation rules dialect: a document is a map of
//! user-named rules, each configuring a device, a list of actions, and
//! optional scheduling.

use quill_complete::{Dataset, StaticDatasets};
use quill_schema::{ArrayKeySet, ArrayKeys, Element, ElementKind, Schema};

/// The rules-dialect schema.
///
/// Top level is a wildcard (rules are user-named). Each rule carries a
/// representative spread of element kinds so one fixture exercises every
/// handler.
pub fn sample_schema() -> Schema {
    let scene_slots = Schema::new().with_array(ArrayKeys {
        keys: ArrayKeySet::Numbered {
            prefix: "slot".into(),
            start: 0,
            end: 3,
        },
        element: Element::new(ElementKind::Enum)
            .with_dataset("scenes")
            .describe("Scene bound to {key}"),
    });

    let rule = Schema::new()
        .with_key(
            "Enabled",
            Element::new(ElementKind::Boolean).describe("Whether this rule fires at all"),
        )
        .with_key(
            "Mode",
            Element::new(ElementKind::Text)
                .with_values(["manual", "scheduled", "reactive"])
                .describe("How the rule is driven"),
        )
        .with_key(
            "Device",
            Element::new(ElementKind::Enum)
                .with_dataset("devices")
                .describe("The device this rule controls"),
        )
        .with_key(
            "Actions",
            Element::new(ElementKind::List)
                .with_entries([
                    Element::new(ElementKind::Enum).with_dataset("actions"),
                    Element::new(ElementKind::Enum).with_dataset("devices"),
                ])
                .describe("Action verb followed by its target device"),
        )
        .with_key(
            "Conditions",
            Element::new(ElementKind::List)
                .with_dataset("conditions")
                .with_values(["allow", "deny"])
                .describe("Environmental conditions gating the rule"),
        )
        .with_key(
            "Options",
            Element::new(ElementKind::KeyList).describe("Free-form option overrides"),
        )
        .with_key(
            "Schedule",
            Element::new(ElementKind::Key)
                .with_max_depth(1)
                .with_keys(
                    Schema::new()
                        .with_key("At", Element::new(ElementKind::Text))
                        .with_key("Repeat", Element::new(ElementKind::Boolean)),
                )
                .describe("When the rule runs"),
        )
        .with_key(
            "Scenes",
            Element::new(ElementKind::Key)
                .with_keys(scene_slots)
                .describe("Scene bindings by slot"),
        )
        .with_key(
            "Backup",
            Element::new(ElementKind::Key)
                .gated("backups")
                .with_keys(Schema::new().with_key("Target", Element::new(ElementKind::Text)))
                .describe("Mirror state changes to a backup target"),
        );

    Schema::new().with_wildcard(
        Element::new(ElementKind::Key)
            .with_keys(rule)
            .describe("A named automation rule"),
    )
}

/// Datasets referenced by [`sample_schema`].
pub fn sample_datasets() -> StaticDatasets {
    StaticDatasets::new()
        .with(
            "devices",
            Dataset::from_pairs([
                ("lamp", "Desk lamp"),
                ("heater", "Space heater"),
                ("blinds", "Window blinds"),
            ]),
        )
        .with(
            "actions",
            Dataset::from_pairs([
                ("turn_on", "Power the target on"),
                ("turn_off", "Power the target off"),
                ("toggle", "Flip the target's power state"),
            ]),
        )
        .with(
            "conditions",
            Dataset::from_pairs([("dark", "After sunset"), ("cold", "Below 15C")]),
        )
        .with(
            "scenes",
            Dataset::from_pairs([("evening", "Evening lighting"), ("away", "Away mode")]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_and_datasets_agree_on_names() {
        let schema = sample_schema();
        let rule = schema.wildcard().unwrap().keys.as_ref().unwrap();
        assert!(rule.get("Device").is_some());
        assert_eq!(rule.get("Actions").unwrap().entries.len(), 2);
    }
}
