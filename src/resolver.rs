use std::collections::HashMap;

use crate::element::ElementDefinition;
use crate::path::{capitalize, parse_path};
use crate::slicing::{find_named_slice, find_reference_target, slice_choice_type};
use crate::structure_definition::StructureDefinition;
use crate::unfold::unfold;

/// Capability for looking up the definition of a named type, supplied by
/// the caller. The resolver only consults it when traversal needs
/// children that have not been materialized yet.
pub trait TypeResolver {
    fn resolve_type(&self, name: &str) -> Option<&StructureDefinition>;
}

impl TypeResolver for HashMap<String, StructureDefinition> {
    fn resolve_type(&self, name: &str) -> Option<&StructureDefinition> {
        self.get(name)
    }
}

/// Narrow the tree to the single element addressed by a dotted/bracketed
/// rule path, materializing choice slices and referenced-type subtrees on
/// the way. `None` is the normal not-found outcome, never a fault; any
/// elements materialized before a failing token stay in the tree, and a
/// repeated attempt over the same prefix is idempotent.
pub fn resolve<'a>(
    def: &'a mut StructureDefinition,
    path: &str,
    types: &dyn TypeResolver,
) -> Option<&'a mut ElementDefinition> {
    let index = resolve_index(def, path, types)?;
    def.elements.get_mut(index)
}

fn resolve_index(
    def: &mut StructureDefinition,
    path: &str,
    types: &dyn TypeResolver,
) -> Option<usize> {
    let root = def.root_type()?.to_string();
    let full_path = if path.is_empty() {
        root.clone()
    } else {
        format!("{root}.{path}")
    };
    if let Some(index) = def.elements.iter().position(|e| e.path == full_path) {
        return Some(index);
    }

    let segments = parse_path(path);
    if segments.is_empty() {
        return None;
    }

    // Candidates are tracked by id, which stays valid across the
    // insertions made by the slicer and the unfolder mid-walk.
    let mut running = root;
    let mut candidates: Vec<String> = def.elements.iter().map(|e| e.id.clone()).collect();

    for segment in &segments {
        running = format!("{running}.{}", segment.base);
        let mut matched = narrow_by_path(def, &candidates, &running);

        if matched.is_empty()
            && let Some(slice_id) = attempt_choice(def, &candidates, &mut running)
        {
            matched = vec![slice_id];
        }

        if matched.is_empty() && candidates.len() == 1 {
            let unfolded = unfold(def, &candidates[0], types);
            matched = narrow_by_path(def, &unfolded, &running);
            // the token may address a choice the unfold just exposed
            if matched.is_empty()
                && let Some(slice_id) = attempt_choice(def, &unfolded, &mut running)
            {
                matched = vec![slice_id];
            }
        }

        if matched.is_empty() {
            tracing::debug!("no element matches {running}");
            return None;
        }
        candidates = matched;

        if !segment.brackets.is_empty() {
            if let Some(slice_id) = find_named_slice(def, &segment.brackets, &candidates) {
                let mut narrowed = vec![slice_id.clone()];
                narrowed.extend(
                    def.elements
                        .iter()
                        .filter(|e| {
                            e.id
                                .strip_prefix(&slice_id)
                                .is_some_and(|rest| rest.starts_with('.'))
                        })
                        .map(|e| e.id.clone()),
                );
                candidates = narrowed;
            } else if let Some(target_id) =
                find_reference_target(def, &segment.brackets, &candidates, &running)
            {
                candidates = vec![target_id];
            } else {
                return None;
            }
        }
    }

    // Drop stray descendants; ambiguity is a failure, never a pick.
    candidates.retain(|id| {
        def.elements
            .find_element(id)
            .is_some_and(|e| e.path == running)
    });
    match candidates.as_slice() {
        [only] => def.elements.position(only),
        _ => None,
    }
}

fn narrow_by_path(def: &StructureDefinition, ids: &[String], running: &str) -> Vec<String> {
    ids.iter()
        .filter(|id| {
            def.elements
                .find_element(id)
                .is_some_and(|e| path_matches(&e.path, running))
        })
        .cloned()
        .collect()
}

fn path_matches(path: &str, running: &str) -> bool {
    path == running
        || path
            .strip_prefix(running)
            .is_some_and(|rest| rest.starts_with('.'))
}

// A token like `valueString` can address a choice element `value[x]`
// whose allowed types include `string`. The choice is sliced to the
// concrete type, the slice becomes the sole candidate, and the running
// path is rewritten to the slice's path.
fn attempt_choice(
    def: &mut StructureDefinition,
    candidates: &[String],
    running: &mut String,
) -> Option<String> {
    let slice_id = resolve_choice(def, candidates, running)?;
    if let Some(slice) = def.elements.find_element(&slice_id) {
        *running = slice.path.clone();
    }
    Some(slice_id)
}

fn resolve_choice(
    def: &mut StructureDefinition,
    candidates: &[String],
    running: &str,
) -> Option<String> {
    let mut found: Option<(String, String)> = None;
    'outer: for id in candidates {
        let Some(element) = def.elements.find_element(id) else {
            continue;
        };
        let Some(base) = element.path.strip_suffix("[x]") else {
            continue;
        };
        let Some(types) = element.type_info.as_ref() else {
            continue;
        };
        for t in types {
            if format!("{base}{}", capitalize(&t.code)) == running {
                found = Some((element.id.clone(), t.code.clone()));
                break 'outer;
            }
        }
    }
    let (choice_id, code) = found?;
    slice_choice_type(def, &choice_id, &code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    fn observation() -> StructureDefinition {
        let mut def = StructureDefinition::new("Observation");
        let mut status = ElementDefinition::new("Observation.status", "Observation.status");
        status.min = Some(1);
        status.max = Some("1".to_string());
        status.type_info = Some(vec![ElementType::new("code")]);
        def.add_element(status);
        def
    }

    fn no_types() -> HashMap<String, StructureDefinition> {
        HashMap::new()
    }

    #[test]
    fn test_resolve_fast_path() {
        let mut def = observation();
        let element = resolve(&mut def, "status", &no_types()).unwrap();
        assert_eq!(element.path, "Observation.status");
    }

    #[test]
    fn test_resolve_empty_path_yields_root() {
        let mut def = observation();
        let element = resolve(&mut def, "", &no_types()).unwrap();
        assert_eq!(element.path, "Observation");
    }

    #[test]
    fn test_resolve_unknown_path() {
        let mut def = observation();
        assert!(resolve(&mut def, "bodySite", &no_types()).is_none());
    }

    #[test]
    fn test_resolve_rejects_sole_stray_descendant() {
        // a snapshot can carry a child whose own parent element is absent;
        // the child must not stand in for it
        let mut def = observation();
        def.add_element(ElementDefinition::new(
            "Observation.component.code",
            "Observation.component.code",
        ));
        assert!(resolve(&mut def, "component", &no_types()).is_none());
    }

    #[test]
    fn test_path_matches_is_segment_aware() {
        assert!(path_matches("Observation.status", "Observation.status"));
        assert!(path_matches("Observation.status.id", "Observation.status"));
        assert!(!path_matches("Observation.statusReason", "Observation.status"));
    }
}
