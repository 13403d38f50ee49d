use crate::element::{ElementDiscriminator, ElementSlicing};
use crate::error::{Result, ShorthandError};
use crate::path::capitalize;
use crate::structure_definition::StructureDefinition;

/// Specialize a choice element (`value[x]`) to one of its allowed types.
///
/// The choice element gets the fixed type-slicing policy (discriminator
/// `type` on `$this`, open, unordered) the first time it is sliced. The
/// new slice keeps the choice's path, is named after the concrete segment
/// (`valueString`), and narrows the type list to the single matched type.
/// Re-invoking for the same choice/type pair returns the existing slice.
pub fn slice_choice_type(
    def: &mut StructureDefinition,
    choice_id: &str,
    code: &str,
) -> Option<String> {
    let (template, matched_type, slice_name) = {
        let choice = def.elements.find_element(choice_id)?;
        let base_segment = choice
            .path
            .rsplit('.')
            .next()
            .and_then(|segment| segment.strip_suffix("[x]"))?;
        let matched = choice
            .type_info
            .as_ref()?
            .iter()
            .find(|t| t.code == code)?
            .clone();
        let slice_name = format!("{base_segment}{}", capitalize(code));
        (choice.clone(), matched, slice_name)
    };

    let slice_id = format!("{choice_id}:{slice_name}");
    if def.elements.find_element(&slice_id).is_some() {
        return Some(slice_id);
    }

    if let Some(choice) = def.elements.find_element_mut(choice_id)
        && choice.slicing.is_none()
    {
        choice.slicing = Some(ElementSlicing {
            discriminator: Some(vec![ElementDiscriminator {
                type_name: "type".to_string(),
                path: "$this".to_string(),
            }]),
            rules: Some("open".to_string()),
            ordered: Some(false),
        });
    }

    let mut slice = template;
    slice.id = slice_id.clone();
    slice.slice_name = Some(slice_name);
    slice.min = Some(0);
    slice.type_info = Some(vec![matched_type]);
    slice.slicing = None;
    slice.clear_baseline();
    tracing::debug!("created type slice {slice_id} on choice {choice_id}");
    def.elements.add_element(slice);
    Some(slice_id)
}

/// Create a named slice of an element that already carries a slicing
/// configuration. Slicing a slice produces a re-slice whose name is the
/// `/`-joined chain (`Lab/Fine`). Returns the existing slice when the
/// name was already used.
pub fn add_slice(def: &mut StructureDefinition, element_id: &str, name: &str) -> Result<String> {
    let template = def
        .elements
        .find_element(element_id)
        .ok_or_else(|| ShorthandError::missing_element(element_id))?
        .clone();
    if template.slicing.is_none() {
        return Err(ShorthandError::slicing_not_defined(element_id));
    }

    let (slice_id, slice_name) = match &template.slice_name {
        Some(existing) => (
            format!("{element_id}/{name}"),
            format!("{existing}/{name}"),
        ),
        None => (format!("{element_id}:{name}"), name.to_string()),
    };
    if def.elements.find_element(&slice_id).is_some() {
        return Ok(slice_id);
    }

    let mut slice = template;
    slice.id = slice_id.clone();
    slice.slice_name = Some(slice_name);
    slice.min = Some(0);
    slice.slicing = None;
    slice.clear_baseline();
    tracing::debug!("created named slice {slice_id}");
    def.elements.add_element(slice);
    Ok(slice_id)
}

/// Exact named-slice lookup: the candidate whose `sliceName` equals the
/// bracket tokens joined with `/`.
pub fn find_named_slice(
    def: &StructureDefinition,
    brackets: &[String],
    candidates: &[String],
) -> Option<String> {
    let name = brackets.join("/");
    candidates
        .iter()
        .find(|id| {
            def.elements
                .find_element(id)
                .is_some_and(|e| e.slice_name.as_deref() == Some(name.as_str()))
        })
        .cloned()
}

/// Fallback bracket interpretation: the last bracket token names a
/// reference target. With more than one token the leading tokens must
/// match the candidate's slice chain. The version suffix (`|4.0.1`) is
/// stripped from the stored target profile, never expected in the token.
pub fn find_reference_target(
    def: &StructureDefinition,
    brackets: &[String],
    candidates: &[String],
    running: &str,
) -> Option<String> {
    let (target, slice_chain) = brackets.split_last()?;
    let slice_chain = (!slice_chain.is_empty()).then(|| slice_chain.join("/"));

    candidates
        .iter()
        .find(|id| {
            let Some(element) = def.elements.find_element(id) else {
                return false;
            };
            if element.path != running {
                return false;
            }
            if let Some(chain) = &slice_chain
                && element.slice_name.as_deref() != Some(chain.as_str())
            {
                return false;
            }
            element.type_info.as_ref().is_some_and(|types| {
                types.iter().any(|t| {
                    t.code == "Reference"
                        && t.target_profile.as_ref().is_some_and(|profiles| {
                            profiles.iter().any(|p| target_name(p) == target.as_str())
                        })
                })
            })
        })
        .cloned()
}

fn target_name(profile: &str) -> &str {
    let tail = profile.rsplit('/').next().unwrap_or(profile);
    tail.split('|').next().unwrap_or(tail)
}
