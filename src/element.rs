use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::path::capitalize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementType {
    pub code: String,
    #[serde(rename = "targetProfile", skip_serializing_if = "Option::is_none")]
    pub target_profile: Option<Vec<String>>,
}

impl ElementType {
    pub fn new<S: Into<String>>(code: S) -> Self {
        Self {
            code: code.into(),
            target_profile: None,
        }
    }

    pub fn reference<S: Into<String>>(targets: Vec<S>) -> Self {
        Self {
            code: "Reference".to_string(),
            target_profile: Some(targets.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBinding {
    pub strength: String,
    #[serde(rename = "valueSet", skip_serializing_if = "Option::is_none")]
    pub value_set: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDiscriminator {
    #[serde(rename = "type")]
    pub type_name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSlicing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Vec<ElementDiscriminator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
}

/// One constrainable point in a resource's structure.
///
/// `id` is the dotted ancestry path and may contain slice segments
/// (`Observation.component:Lab.code`); `path` is the plain type path
/// without slice names. `slice_name` is set exactly when the element was
/// produced by slicing; re-slice names are `/`-joined chains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementDefinition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub path: String,
    #[serde(rename = "sliceName", skip_serializing_if = "Option::is_none")]
    pub slice_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_info: Option<Vec<ElementType>>,
    #[serde(rename = "mustSupport", skip_serializing_if = "Option::is_none")]
    pub must_support: Option<bool>,
    #[serde(rename = "isModifier", skip_serializing_if = "Option::is_none")]
    pub is_modifier: Option<bool>,
    #[serde(rename = "isSummary", skip_serializing_if = "Option::is_none")]
    pub is_summary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<ElementBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slicing: Option<ElementSlicing>,

    // fixed[x]/pattern[x] keep their concrete wire names (fixedString,
    // patternCodeableConcept, ...) so they are carried as a flattened map.
    #[serde(flatten)]
    pub value_fields: HashMap<String, Value>,

    #[serde(skip)]
    baseline: Option<Box<ElementDefinition>>,
}

impl ElementDefinition {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// The synthetic root element standing for the whole resource.
    pub fn resource_root(type_name: &str) -> Self {
        let mut root = Self::new(type_name, type_name);
        root.min = Some(0);
        root.max = Some("*".to_string());
        root
    }

    pub fn is_choice(&self) -> bool {
        self.path.ends_with("[x]")
    }

    pub fn set_fixed(&mut self, type_name: &str, value: Value) {
        self.clear_assigned_value();
        self.value_fields
            .insert(format!("fixed{}", capitalize(type_name)), value);
    }

    pub fn set_pattern(&mut self, type_name: &str, value: Value) {
        self.clear_assigned_value();
        self.value_fields
            .insert(format!("pattern{}", capitalize(type_name)), value);
    }

    pub fn fixed_value(&self) -> Option<&Value> {
        self.value_fields
            .iter()
            .find(|(key, _)| key.starts_with("fixed"))
            .map(|(_, value)| value)
    }

    pub fn pattern_value(&self) -> Option<&Value> {
        self.value_fields
            .iter()
            .find(|(key, _)| key.starts_with("pattern"))
            .map(|(_, value)| value)
    }

    // An element holds at most one assigned value, fixed or pattern.
    fn clear_assigned_value(&mut self) {
        self.value_fields
            .retain(|key, _| !key.starts_with("fixed") && !key.starts_with("pattern"));
    }

    /// Record the element's current state as its inherited baseline. The
    /// differential reports only divergence from this captured state;
    /// elements without a baseline are locally introduced.
    pub fn capture_baseline(&mut self) {
        self.baseline = None;
        self.baseline = Some(Box::new(self.clone()));
    }

    pub fn baseline(&self) -> Option<&ElementDefinition> {
        self.baseline.as_deref()
    }

    pub(crate) fn clear_baseline(&mut self) {
        self.baseline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_root() {
        let root = ElementDefinition::resource_root("Observation");
        assert_eq!(root.id, "Observation");
        assert_eq!(root.path, "Observation");
        assert_eq!(root.min, Some(0));
        assert_eq!(root.max.as_deref(), Some("*"));
        assert!(root.type_info.is_none());
    }

    #[test]
    fn test_is_choice() {
        let element = ElementDefinition::new("Observation.value[x]", "Observation.value[x]");
        assert!(element.is_choice());

        let element = ElementDefinition::new("Observation.code", "Observation.code");
        assert!(!element.is_choice());
    }

    #[test]
    fn test_assigned_value_is_exclusive() {
        let mut element = ElementDefinition::new("Observation.status", "Observation.status");
        element.set_fixed("code", json!("final"));
        assert_eq!(element.fixed_value(), Some(&json!("final")));
        assert!(element.value_fields.contains_key("fixedCode"));

        element.set_pattern("code", json!("amended"));
        assert!(element.fixed_value().is_none());
        assert_eq!(element.pattern_value(), Some(&json!("amended")));
        assert_eq!(element.value_fields.len(), 1);
    }

    #[test]
    fn test_value_fields_serialize_with_wire_names() {
        let mut element = ElementDefinition::new("Observation.status", "Observation.status");
        element.set_fixed("code", json!("final"));

        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["fixedCode"], json!("final"));
        assert_eq!(value["id"], json!("Observation.status"));
    }

    #[test]
    fn test_baseline_not_nested() {
        let mut element = ElementDefinition::new("Observation.code", "Observation.code");
        element.capture_baseline();
        element.capture_baseline();
        assert!(element.baseline().unwrap().baseline().is_none());
    }
}
