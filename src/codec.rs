use serde_json::{Map, Value, json};

use crate::diff::{calculate_diff, has_diff};
use crate::element::ElementDefinition;
use crate::error::{Result, ShorthandError};
use crate::structure_definition::StructureDefinition;
use crate::tree::ElementTree;

pub const RESOURCE_TYPE: &str = "StructureDefinition";

/// Serialize to the StructureDefinition wire shape: metadata passthrough,
/// `snapshot.element` with every element in tree order, and
/// `differential.element` with the diff views of changed elements in the
/// same relative order.
pub fn to_json(def: &StructureDefinition) -> Result<Value> {
    let mut doc = match serde_json::to_value(def)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    doc.insert(
        "resourceType".to_string(),
        Value::String(RESOURCE_TYPE.to_string()),
    );

    let snapshot = def
        .elements
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let differential = def
        .elements
        .iter()
        .filter(|e| has_diff(e))
        .map(|e| serde_json::to_value(calculate_diff(e)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    doc.insert("snapshot".to_string(), json!({ "element": snapshot }));
    doc.insert("differential".to_string(), json!({ "element": differential }));
    Ok(Value::Object(doc))
}

/// Rebuild a definition from wire JSON. The snapshot is authoritative:
/// the differential is ignored and every rebuilt element is baselined, so
/// a freshly imported resource reports no diff until it is mutated. A
/// resource without a snapshot comes back with only the synthetic root.
pub fn from_json(value: &Value) -> Result<StructureDefinition> {
    let resource_type = value
        .get("resourceType")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if resource_type != RESOURCE_TYPE {
        return Err(ShorthandError::invalid_resource_type(
            RESOURCE_TYPE,
            resource_type,
        ));
    }

    let mut def: StructureDefinition = serde_json::from_value(value.clone())?;

    match value.pointer("/snapshot/element").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                let mut element: ElementDefinition = serde_json::from_value(item.clone())?;
                if element.id.is_empty() {
                    element.id = element.path.clone();
                }
                element.capture_baseline();
                elements.push(element);
            }
            def.elements = ElementTree::from_elements(elements);
        }
        _ => {
            let root = def
                .type_name
                .clone()
                .or_else(|| def.name.clone())
                .ok_or_else(|| ShorthandError::missing_required_field("type"))?;
            let mut elements = ElementTree::new();
            elements.add_element(ElementDefinition::resource_root(&root));
            def.elements = elements;
        }
    }
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_rejects_other_resource_types() {
        let err = from_json(&json!({ "resourceType": "ValueSet" })).unwrap_err();
        assert!(matches!(err, ShorthandError::InvalidResourceType { .. }));
    }

    #[test]
    fn test_from_json_without_snapshot_yields_root_only() {
        let def = from_json(&json!({
            "resourceType": "StructureDefinition",
            "type": "Patient",
            "status": "draft"
        }))
        .unwrap();
        assert_eq!(def.elements.len(), 1);
        assert_eq!(def.root_type(), Some("Patient"));
        assert_eq!(def.status.as_deref(), Some("draft"));
    }

    #[test]
    fn test_from_json_snapshot_is_authoritative() {
        let def = from_json(&json!({
            "resourceType": "StructureDefinition",
            "type": "Patient",
            "snapshot": { "element": [
                { "id": "Patient", "path": "Patient", "min": 0, "max": "*" },
                { "id": "Patient.active", "path": "Patient.active", "min": 0, "max": "1" }
            ]},
            "differential": { "element": [
                { "id": "Patient.active", "path": "Patient.active", "min": 1 }
            ]}
        }))
        .unwrap();
        // the differential is ignored on import
        let active = def.find_element("Patient.active").unwrap();
        assert_eq!(active.min, Some(0));
        assert!(active.baseline().is_some());
    }

    #[test]
    fn test_from_json_derives_missing_element_ids() {
        let def = from_json(&json!({
            "resourceType": "StructureDefinition",
            "type": "Patient",
            "snapshot": { "element": [
                { "path": "Patient" },
                { "path": "Patient.active" }
            ]}
        }))
        .unwrap();
        assert!(def.find_element("Patient.active").is_some());
    }

    #[test]
    fn test_to_json_shape() {
        let mut def = StructureDefinition::new("Patient");
        def.url = Some("http://example.org/StructureDefinition/MyPatient".to_string());
        def.status = Some("active".to_string());

        let value = to_json(&def).unwrap();
        assert_eq!(value["resourceType"], json!("StructureDefinition"));
        assert_eq!(
            value["url"],
            json!("http://example.org/StructureDefinition/MyPatient")
        );
        assert_eq!(value["snapshot"]["element"].as_array().unwrap().len(), 1);
        // the seeded root has no baseline, so it shows up in the differential
        assert_eq!(value["differential"]["element"].as_array().unwrap().len(), 1);
    }
}
