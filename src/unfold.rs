use crate::resolver::TypeResolver;
use crate::structure_definition::StructureDefinition;

/// Materialize the children of an element whose type has its own element
/// subtree. The referenced definition is fetched through the caller's
/// `TypeResolver`; every element but its root is copied, re-rooted under
/// the current element's id and path, and inserted through the tree.
///
/// Already-present descendants are returned as-is, which makes repeated
/// traversal over the same path prefix idempotent. An empty result means
/// the element has no single resolvable type; the resolver reports that
/// as not-found.
pub fn unfold(
    def: &mut StructureDefinition,
    element_id: &str,
    types: &dyn TypeResolver,
) -> Vec<String> {
    let Some(element) = def.elements.find_element(element_id) else {
        return Vec::new();
    };
    let element_path = element.path.clone();

    let existing: Vec<String> = def
        .elements
        .iter()
        .filter(|e| {
            e.id
                .strip_prefix(element_id)
                .is_some_and(|rest| rest.starts_with('.'))
        })
        .map(|e| e.id.clone())
        .collect();
    if !existing.is_empty() {
        return existing;
    }

    let type_code = match def
        .elements
        .find_element(element_id)
        .and_then(|e| e.type_info.as_deref())
    {
        Some([only]) => only.code.clone(),
        _ => return Vec::new(),
    };
    let Some(source) = types.resolve_type(&type_code) else {
        tracing::debug!("cannot unfold {element_id}: unresolvable type {type_code}");
        return Vec::new();
    };
    let Some(source_root) = source.elements.root() else {
        return Vec::new();
    };
    let source_root_id = source_root.id.clone();
    let source_root_path = source_root.path.clone();

    let mut copies = Vec::new();
    for source_element in source.elements.iter().skip(1) {
        let (Some(id_suffix), Some(path_suffix)) = (
            source_element.id.strip_prefix(&source_root_id),
            source_element.path.strip_prefix(&source_root_path),
        ) else {
            continue;
        };
        let mut copy = source_element.clone();
        copy.id = format!("{element_id}{id_suffix}");
        copy.path = format!("{element_path}{path_suffix}");
        copy.capture_baseline();
        copies.push(copy);
    }

    let ids: Vec<String> = copies.iter().map(|e| e.id.clone()).collect();
    tracing::debug!(
        "unfolded {} elements of {type_code} under {element_id}",
        ids.len()
    );
    def.elements.add_elements(copies);
    ids
}
