use super::item::{FormComponent, FormContainer, FormItem, JsonObject};
use super::kind::ComponentType;
use serde_json::{Value, json};

/// Static configuration of one component type.
#[derive(Debug, Clone)]
pub struct FormItemConfig {
    pub component_type: ComponentType,
    /// Whether items of this type own an ordered list of children.
    pub is_container: bool,
    /// Types that may be placed directly inside a container of this type.
    /// `None` for leaf types.
    pub valid_child_types: Option<&'static [&'static str]>,
    default_properties: fn() -> Value,
}

impl FormItemConfig {
    pub fn default_properties(&self) -> JsonObject {
        match (self.default_properties)() {
            Value::Object(object) => object,
            _ => JsonObject::new(),
        }
    }

    pub fn allows_child(&self, child_type: &ComponentType) -> bool {
        self.valid_child_types
            .is_some_and(|types| types.contains(&child_type.as_str()))
    }
}

const GROUP_CHILDREN: &[&str] = &[
    "Input",
    "TextArea",
    "Checkboxes",
    "RadioButtons",
    "Dropdown",
    "Datepicker",
    "Header",
    "Paragraph",
    "Image",
    "Alert",
    "Panel",
    "AddressComponent",
    "FileUpload",
    "Summary",
    "Button",
    "Group",
    "RepeatingGroup",
    "Accordion",
    "ButtonGroup",
];

const REPEATING_GROUP_CHILDREN: &[&str] = &[
    "Input",
    "TextArea",
    "Checkboxes",
    "RadioButtons",
    "Dropdown",
    "Datepicker",
    "Header",
    "Paragraph",
    "Image",
    "Alert",
    "AddressComponent",
    "FileUpload",
    "Button",
    "Group",
    "RepeatingGroup",
];

const ACCORDION_CHILDREN: &[&str] = &["Paragraph", "Header"];

const ACCORDION_GROUP_CHILDREN: &[&str] = &["Accordion"];

const BUTTON_GROUP_CHILDREN: &[&str] = &[
    "Button",
    "NavigationButtons",
    "PrintButton",
    "InstantiationButton",
    "ActionButton",
];

fn no_defaults() -> Value {
    json!({})
}

fn simple_binding_defaults() -> Value {
    json!({ "dataModelBindings": { "simpleBinding": "" } })
}

fn option_defaults() -> Value {
    json!({ "dataModelBindings": { "simpleBinding": "" }, "optionsId": "" })
}

fn header_defaults() -> Value {
    json!({ "size": "L" })
}

fn image_defaults() -> Value {
    json!({ "image": { "src": {}, "width": "100%", "align": "center" } })
}

fn alert_defaults() -> Value {
    json!({ "severity": "info" })
}

fn panel_defaults() -> Value {
    json!({ "variant": "info", "showIcon": true })
}

fn file_upload_defaults() -> Value {
    json!({
        "maxFileSizeInMB": 25,
        "maxNumberOfAttachments": 1,
        "minNumberOfAttachments": 0,
        "displayMode": "list"
    })
}

fn navigation_buttons_defaults() -> Value {
    json!({ "showBackButton": true })
}

fn repeating_group_defaults() -> Value {
    json!({ "dataModelBindings": { "group": "" }, "maxCount": 2 })
}

fn config(
    component_type: ComponentType,
    valid_child_types: Option<&'static [&'static str]>,
    default_properties: fn() -> Value,
) -> FormItemConfig {
    FormItemConfig {
        component_type,
        is_container: valid_child_types.is_some(),
        valid_child_types,
        default_properties,
    }
}

/// Looks up the configuration of a component type.
pub fn item_config(component_type: &ComponentType) -> FormItemConfig {
    use ComponentType as T;
    let t = component_type.clone();
    match component_type {
        T::Input | T::TextArea | T::Datepicker | T::AddressComponent => {
            config(t, None, simple_binding_defaults)
        }
        T::Checkboxes | T::RadioButtons | T::Dropdown => config(t, None, option_defaults),
        T::Header => config(t, None, header_defaults),
        T::Image => config(t, None, image_defaults),
        T::Alert => config(t, None, alert_defaults),
        T::Panel => config(t, None, panel_defaults),
        T::FileUpload => config(t, None, file_upload_defaults),
        T::NavigationButtons => config(t, None, navigation_buttons_defaults),
        T::Paragraph
        | T::Summary
        | T::Button
        | T::PrintButton
        | T::InstantiationButton
        | T::ActionButton
        | T::Custom(_) => config(t, None, no_defaults),
        T::Group => config(t, Some(GROUP_CHILDREN), no_defaults),
        T::RepeatingGroup => config(t, Some(REPEATING_GROUP_CHILDREN), repeating_group_defaults),
        T::Accordion => config(t, Some(ACCORDION_CHILDREN), no_defaults),
        T::AccordionGroup => config(t, Some(ACCORDION_GROUP_CHILDREN), no_defaults),
        T::ButtonGroup => config(t, Some(BUTTON_GROUP_CHILDREN), no_defaults),
    }
}

pub fn is_container_type(component_type: &ComponentType) -> bool {
    item_config(component_type).is_container
}

/// The "valid child" rule: may `child_type` be placed directly inside a `parent_type` container?
pub fn is_valid_child(parent_type: &ComponentType, child_type: &ComponentType) -> bool {
    item_config(parent_type).allows_child(child_type)
}

/// Creates a new layout item of the given type, filled with the type's default properties.
pub fn generate_form_item(component_type: &ComponentType, id: &str) -> FormItem {
    let config = item_config(component_type);
    let properties = config.default_properties();
    if config.is_container {
        FormItem::Container(FormContainer::from_parts(
            id.to_string(),
            component_type.clone(),
            properties,
        ))
    } else {
        FormItem::Component(FormComponent::from_parts(
            id.to_string(),
            component_type.clone(),
            properties,
        ))
    }
}
