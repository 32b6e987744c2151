use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the `ComponentType` enum together with its string mapping.
///
/// Every known type gets its own variant, anything else is kept verbatim in
/// `ComponentType::Custom` so that layouts written by newer tooling survive a round trip.
macro_rules! define_component_types {
    ( $( ($variant:ident, $name:literal) ),* $(,)? ) => {
        /// The discriminant of a layout item, serialised as its plain type name.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum ComponentType {
            $( $variant, )*
            Custom(String),
        }

        impl ComponentType {
            /// Names of every known component type, in declaration order.
            pub const KNOWN_NAMES: &'static [&'static str] = &[ $( $name, )* ];

            pub fn as_str(&self) -> &str {
                match self {
                    $( ComponentType::$variant => $name, )*
                    ComponentType::Custom(name) => name,
                }
            }
        }

        impl From<&str> for ComponentType {
            fn from(name: &str) -> Self {
                match name {
                    $( $name => ComponentType::$variant, )*
                    other => ComponentType::Custom(other.to_string()),
                }
            }
        }
    };
}

define_component_types! {
    (Input, "Input"),
    (TextArea, "TextArea"),
    (Checkboxes, "Checkboxes"),
    (RadioButtons, "RadioButtons"),
    (Dropdown, "Dropdown"),
    (Datepicker, "Datepicker"),
    (Header, "Header"),
    (Paragraph, "Paragraph"),
    (Image, "Image"),
    (Alert, "Alert"),
    (Panel, "Panel"),
    (AddressComponent, "AddressComponent"),
    (FileUpload, "FileUpload"),
    (Summary, "Summary"),
    (Button, "Button"),
    (NavigationButtons, "NavigationButtons"),
    (PrintButton, "PrintButton"),
    (InstantiationButton, "InstantiationButton"),
    (ActionButton, "ActionButton"),
    (Group, "Group"),
    (RepeatingGroup, "RepeatingGroup"),
    (Accordion, "Accordion"),
    (AccordionGroup, "AccordionGroup"),
    (ButtonGroup, "ButtonGroup"),
}

impl ComponentType {
    /// Iterates over every known component type.
    pub fn known() -> impl Iterator<Item = ComponentType> {
        Self::KNOWN_NAMES.iter().map(|name| ComponentType::from(*name))
    }
}

impl From<String> for ComponentType {
    fn from(name: String) -> Self {
        ComponentType::from(name.as_str())
    }
}

impl From<ComponentType> for String {
    fn from(component_type: ComponentType) -> Self {
        match component_type {
            ComponentType::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
