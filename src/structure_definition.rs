use serde::{Deserialize, Serialize};

use crate::element::ElementDefinition;
use crate::tree::ElementTree;

/// A conformance resource under construction: descriptive metadata plus
/// the ordered element tree. Metadata fields are a fixed passthrough set,
/// copied verbatim between the wire format and this struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fhirVersion", skip_serializing_if = "Option::is_none")]
    pub fhir_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_type: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(rename = "baseDefinition", skip_serializing_if = "Option::is_none")]
    pub base_definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivation: Option<String>,

    #[serde(skip)]
    pub elements: ElementTree,
}

impl StructureDefinition {
    /// Create a definition for the given resource type, seeded with the
    /// synthetic root element.
    pub fn new(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let mut elements = ElementTree::new();
        elements.add_element(ElementDefinition::resource_root(&type_name));
        Self {
            type_name: Some(type_name),
            elements,
            ..Self::default()
        }
    }

    /// The type path of the synthetic root, e.g. `Observation`.
    pub fn root_type(&self) -> Option<&str> {
        self.elements.root().map(|root| root.path.as_str())
    }

    pub fn find_element(&self, id: &str) -> Option<&ElementDefinition> {
        self.elements.find_element(id)
    }

    pub fn find_element_mut(&mut self, id: &str) -> Option<&mut ElementDefinition> {
        self.elements.find_element_mut(id)
    }

    pub fn add_element(&mut self, element: ElementDefinition) {
        self.elements.add_element(element);
    }

    pub fn add_elements(&mut self, elements: Vec<ElementDefinition>) {
        self.elements.add_elements(elements);
    }
}
