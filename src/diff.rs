use crate::element::ElementDefinition;

/// Whether the element carries any locally introduced constraint, judged
/// against its captured baseline. An element without a baseline was
/// introduced locally (a slice, or an element authored from scratch) and
/// always counts.
pub fn has_diff(element: &ElementDefinition) -> bool {
    let Some(base) = element.baseline() else {
        return true;
    };
    element.min != base.min
        || element.max != base.max
        || element.slice_name != base.slice_name
        || element.short != base.short
        || element.type_info != base.type_info
        || element.must_support != base.must_support
        || element.is_modifier != base.is_modifier
        || element.is_summary != base.is_summary
        || element.binding != base.binding
        || element.slicing != base.slicing
        || element.value_fields != base.value_fields
}

/// The minimal differential view: id, path and slice name, plus only the
/// attributes that diverge from the baseline.
pub fn calculate_diff(element: &ElementDefinition) -> ElementDefinition {
    let Some(base) = element.baseline() else {
        let mut diff = element.clone();
        diff.clear_baseline();
        return diff;
    };

    let mut diff = ElementDefinition::new(element.id.clone(), element.path.clone());
    diff.slice_name = element.slice_name.clone();
    if element.min != base.min {
        diff.min = element.min;
    }
    if element.max != base.max {
        diff.max = element.max.clone();
    }
    if element.short != base.short {
        diff.short = element.short.clone();
    }
    if element.type_info != base.type_info {
        diff.type_info = element.type_info.clone();
    }
    if element.must_support != base.must_support {
        diff.must_support = element.must_support;
    }
    if element.is_modifier != base.is_modifier {
        diff.is_modifier = element.is_modifier;
    }
    if element.is_summary != base.is_summary {
        diff.is_summary = element.is_summary;
    }
    if element.binding != base.binding {
        diff.binding = element.binding.clone();
    }
    if element.slicing != base.slicing {
        diff.slicing = element.slicing.clone();
    }
    if element.value_fields != base.value_fields {
        diff.value_fields = element
            .value_fields
            .iter()
            .filter(|(key, value)| base.value_fields.get(*key) != Some(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
    }
    diff
}
