use crate::element::ElementDefinition;

/// Ordered element sequence with hierarchical locality: every element's
/// descendants occupy a contiguous run immediately after it, ahead of its
/// next sibling. Parent/child relationships are carried only by id prefix
/// (`.` for children, `:` for slices), not by links between nodes.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    elements: Vec<ElementDefinition>,
}

// `id` extends `prefix` hierarchically: a child (`.`) or a slice (`:`).
fn extends(prefix: &str, id: &str) -> bool {
    id.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('.') || rest.starts_with(':'))
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tree from an already-ordered element sequence, as found in
    /// a snapshot. The given order is taken as authoritative.
    pub fn from_elements(elements: Vec<ElementDefinition>) -> Self {
        Self { elements }
    }

    /// Insert an element at the end of its parent's contiguous run. The
    /// scan tracks the most recent element whose id is a prefix of the
    /// incoming id, skips that element's descendants, and stops at the
    /// first element that is neither; O(n), which is fine at the
    /// hundreds-of-elements scale of one resource.
    pub fn add_element(&mut self, element: ElementDefinition) {
        let mut index = self.elements.len();
        let mut last_match_id: Option<&str> = None;
        for (i, existing) in self.elements.iter().enumerate() {
            if extends(&existing.id, &element.id) {
                last_match_id = Some(existing.id.as_str());
            } else if !last_match_id.is_some_and(|last| extends(last, &existing.id)) {
                index = i;
                break;
            }
        }
        self.elements.insert(index, element);
    }

    pub fn add_elements(&mut self, elements: Vec<ElementDefinition>) {
        for element in elements {
            self.add_element(element);
        }
    }

    pub fn find_element(&self, id: &str) -> Option<&ElementDefinition> {
        if id.is_empty() {
            return None;
        }
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn find_element_mut(&mut self, id: &str) -> Option<&mut ElementDefinition> {
        if id.is_empty() {
            return None;
        }
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&ElementDefinition> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ElementDefinition> {
        self.elements.get_mut(index)
    }

    pub fn root(&self) -> Option<&ElementDefinition> {
        self.elements.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ElementDefinition> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ElementDefinition> {
        self.elements.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'a> IntoIterator for &'a ElementTree {
    type Item = &'a ElementDefinition;
    type IntoIter = std::slice::Iter<'a, ElementDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
