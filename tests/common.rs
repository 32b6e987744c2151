//! Common test utilities for building layouts, layout files and process tasks.
use tempfile::TempDir;
use studio_layout::prelude::*;
use studio_layout::process::{
    ApplicationMetadata, DataType, LayoutSetConfig, LayoutSets, MemoryProcessBackend, Policy,
    ProcessDiagram, ProcessTask, SignatureConfig, TaskType,
};

/// A layout file with a group and a few components around it:
///
/// `Header-1`, `group1 [Input-1, Input-2]`, `NavigationButtons-1`
#[allow(dead_code)]
pub const PAGE_WITH_GROUP: &str = r#"{
  "$schema": "https://altinncdn.no/schemas/json/layout/layout.schema.v1.json",
  "data": {
    "layout": [
      { "id": "Header-1", "type": "Header", "size": "L", "textResourceBindings": { "title": "header.title" } },
      { "id": "group1", "type": "Group", "children": ["Input-1", "Input-2"], "maxCount": 1 },
      { "id": "Input-1", "type": "Input", "dataModelBindings": { "simpleBinding": "person.name" } },
      { "id": "Input-2", "type": "Input", "required": true },
      { "id": "NavigationButtons-1", "type": "NavigationButtons", "showBackButton": true }
    ],
    "hidden": ["equals", true, true]
  },
  "customRootField": 42
}"#;

/// A multi-page repeating group with page-prefixed children.
#[allow(dead_code)]
pub const PAGE_WITH_MULTI_PAGE_GROUP: &str = r#"{
  "data": {
    "layout": [
      {
        "id": "repeating",
        "type": "RepeatingGroup",
        "children": ["0:field-a", "1:field-b"],
        "edit": { "multiPage": true },
        "dataModelBindings": { "group": "people" }
      },
      { "id": "field-a", "type": "Input" },
      { "id": "field-b", "type": "TextArea" }
    ]
  }
}"#;

#[allow(dead_code)]
pub fn parse_page(json: &str) -> ExternalFormLayout {
    ExternalFormLayout::from_json(json).expect("fixture layout should parse")
}

#[allow(dead_code)]
pub fn layout_with_group() -> InternalLayout {
    InternalLayout::try_from(&parse_page(PAGE_WITH_GROUP)).expect("fixture layout should convert")
}

/// `{ order: { base: [group1] }, containers: { group1 } }` with no child list for the group.
#[allow(dead_code)]
pub fn layout_with_empty_group() -> InternalLayout {
    let mut layout = InternalLayout::empty();
    layout
        .order
        .insert(BASE_CONTAINER_ID.to_string(), vec!["group1".to_string()]);
    layout.containers.insert(
        "group1".to_string(),
        FormContainer::new("group1", ComponentType::Group),
    );
    layout
}

/// A layout holding a single component of the given type.
#[allow(dead_code)]
pub fn layout_with(id: &str, component_type: ComponentType) -> InternalLayout {
    add_component(
        &InternalLayout::empty(),
        FormComponent::new(id, component_type),
        None,
        None,
    )
}

#[allow(dead_code)]
pub fn pages(entries: Vec<(&str, InternalLayout)>) -> FormLayouts {
    entries
        .into_iter()
        .map(|(name, layout)| (name.to_string(), layout))
        .collect()
}

#[allow(dead_code)]
pub fn count_of_type(layout: &InternalLayout, component_type: &ComponentType) -> usize {
    layout
        .components
        .values()
        .filter(|c| &c.component_type == component_type)
        .count()
}

#[allow(dead_code)]
pub fn payment_task(id: &str) -> ProcessTask {
    ProcessTask::new(id, TaskType::Payment)
        .with_payment_config(&format!("{id}-paymentInformation"), &format!("{id}-paymentReceiptPdf"))
}

#[allow(dead_code)]
pub fn signing_task(id: &str, signature_data_type: &str, unique_from: &[&str]) -> ProcessTask {
    ProcessTask::new(id, TaskType::Signing).with_signature_config(SignatureConfig {
        signature_data_type: signature_data_type.to_string(),
        unique_from_signatures_in_data_types: unique_from.iter().map(|s| s.to_string()).collect(),
        ..SignatureConfig::default()
    })
}

/// A backend already holding the data types and layout sets of the given tasks.
#[allow(dead_code)]
pub fn backend_with_tasks(tasks: Vec<ProcessTask>) -> MemoryProcessBackend {
    let mut data_types = Vec::new();
    let mut sets = Vec::new();
    for task in &tasks {
        let task_data_types = [
            task.payment_data_type(),
            task.receipt_pdf_data_type(),
            task.signature_data_type(),
            task.signee_states_data_type(),
        ];
        for data_type in task_data_types.into_iter().flatten() {
            data_types.push(DataType::new(data_type, "application/json").for_task(&task.id));
        }
        sets.push(LayoutSetConfig::for_task(&task.id, None));
    }
    MemoryProcessBackend::new(
        ApplicationMetadata {
            data_types,
            ..ApplicationMetadata::default()
        },
        LayoutSets {
            sets,
            ..LayoutSets::default()
        },
        Policy::default(),
        ProcessDiagram { tasks },
    )
}

/// A fresh, empty directory, removed when the returned guard drops.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("temp dir should be creatable")
}
