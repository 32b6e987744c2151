//! Tests for layout settings, page collections and rule configuration.
mod common;
use common::*;
use serde_json::json;
use studio_layout::prelude::*;
use studio_layout::rules::{remove_field_references, switch_selected_field_id};
use studio_layout::settings;

const SETTINGS_JSON: &str = r#"{
  "$schema": "https://altinncdn.no/schemas/json/layout/layoutSettings.schema.v1.json",
  "pages": { "order": ["intro", "details", "summary"], "excludeFromPdf": ["intro"] },
  "receiptLayoutName": "summary"
}"#;

const RULE_CONFIG_JSON: &str = r#"{
  "data": {
    "ruleConnection": {
      "sum": {
        "selectedFunction": "sum",
        "inputParams": { "a": "Input-1", "b": "Input-2" },
        "outParams": { "outParam0": "Input-3" }
      }
    },
    "conditionalRendering": {
      "hideGroup": {
        "selectedFunction": "isTrue",
        "selectedAction": "Hide",
        "inputParams": { "value": "Input-1" },
        "selectedFields": { "f1": "group1", "f2": "Input-2" }
      }
    }
  }
}"#;

fn settings_fixture() -> LayoutSettings {
    serde_json::from_str(SETTINGS_JSON).unwrap()
}

#[test]
fn test_settings_keep_unknown_fields() {
    let settings = settings_fixture();
    assert_eq!(settings.order(), ["intro", "details", "summary"]);
    assert_eq!(settings.receipt_layout_name.as_deref(), Some("summary"));

    let json = serde_json::to_value(&settings).unwrap();
    assert_eq!(json["pages"]["excludeFromPdf"], json!(["intro"]));
    assert!(json["$schema"].is_string());
}

#[test]
fn test_settings_page_operations() {
    let mut settings = settings_fixture();

    settings.add_page("extra").unwrap();
    assert_eq!(
        settings.add_page("extra"),
        Err(SettingsError::PageExists("extra".to_string()))
    );

    settings.move_page("extra", 0).unwrap();
    assert_eq!(settings.order(), ["extra", "intro", "details", "summary"]);

    settings.rename_page("summary", "confirm").unwrap();
    assert_eq!(settings.receipt_layout_name.as_deref(), Some("confirm"));
    assert_eq!(
        settings.rename_page("intro", "details"),
        Err(SettingsError::PageExists("details".to_string()))
    );

    settings.delete_page("confirm").unwrap();
    assert_eq!(settings.receipt_layout_name, None);
    assert_eq!(
        settings.delete_page("confirm"),
        Err(SettingsError::PageNotFound("confirm".to_string()))
    );

    settings.set_receipt_layout(Some("details"));
    assert_eq!(settings.receipt_layout_name.as_deref(), Some("details"));
}

#[test]
fn test_page_collection_helpers() {
    let layouts = pages(vec![("page1", layout_with_group())]);

    let added = settings::add_page(&layouts, "page2").unwrap();
    assert!(added["page2"].is_empty());
    assert_eq!(
        settings::add_page(&added, "page2"),
        Err(SettingsError::PageExists("page2".to_string()))
    );

    let renamed = settings::rename_page(&added, "page1", "start").unwrap();
    assert!(renamed["start"].contains("Input-1"));
    assert!(!renamed.contains_key("page1"));

    let deleted = settings::delete_page(&renamed, "page2").unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(
        settings::delete_page(&deleted, "page2"),
        Err(SettingsError::PageNotFound("page2".to_string()))
    );
}

#[test]
fn test_switch_selected_field_id_rewrites_all_references() {
    let mut config = RuleConfig::from_json(RULE_CONFIG_JSON).unwrap();

    let switched = switch_selected_field_id(&mut config, "Input-1", "name");
    assert_eq!(switched, 2);

    let sum = &config.data.rule_connection["sum"];
    assert_eq!(sum.input_params["a"], json!("name"));
    assert_eq!(sum.input_params["b"], json!("Input-2"));
    let hide = &config.data.conditional_rendering["hideGroup"];
    assert_eq!(hide.input_params["value"], json!("name"));
    assert_eq!(hide.extra["selectedAction"], json!("Hide"));
}

#[test]
fn test_remove_field_references_drops_selected_fields() {
    let mut config = RuleConfig::from_json(RULE_CONFIG_JSON).unwrap();

    assert_eq!(remove_field_references(&mut config, "group1"), 1);
    let hide = &config.data.conditional_rendering["hideGroup"];
    assert_eq!(hide.selected_fields.len(), 1);
    assert_eq!(hide.selected_fields["f2"], json!("Input-2"));

    assert_eq!(remove_field_references(&mut config, "unknown"), 0);
}

#[test]
fn test_empty_rule_config() {
    let config = RuleConfig::from_json("{}").unwrap();
    assert!(config.is_empty());
}
