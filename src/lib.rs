//! octofhir-shorthand - StructureDefinition authoring core.
//!
//! This crate is the structural heart of a FHIR Shorthand-style profile
//! compiler:
//! - an ordered element tree with hierarchical locality
//! - path resolution over dotted/bracketed rule paths, with lazy
//!   materialization of choice slices and referenced-type subtrees
//! - snapshot/differential computation and StructureDefinition JSON
//!   export/import
//!
//! # Quick Start
//!
//! ```ignore
//! use octofhir_shorthand::{StructureDefinition, resolve, to_json};
//! use std::collections::HashMap;
//!
//! let mut profile = octofhir_shorthand::from_json(&base_definition)?;
//! let types: HashMap<String, StructureDefinition> = load_type_registry();
//!
//! // A rule applier locates the element and constrains it directly.
//! if let Some(element) = resolve(&mut profile, "component.code", &types) {
//!     element.min = Some(1);
//! }
//!
//! let exported = to_json(&profile)?;
//! ```
//!
//! # Module Organization
//!
//! - [`element`] - element node and its satellite types
//! - [`tree`] - ordered element container
//! - [`structure_definition`] - the resource under construction
//! - [`path`] - rule path parsing
//! - [`resolver`] - path resolution and the `TypeResolver` seam
//! - [`slicing`] - choice-type and named slicing
//! - [`unfold`] - lazy subtree materialization
//! - [`diff`] - differential computation
//! - [`codec`] - StructureDefinition JSON export/import

pub mod codec;
pub mod diff;
pub mod element;
pub mod error;
pub mod path;
pub mod resolver;
pub mod slicing;
pub mod structure_definition;
pub mod tree;
pub mod unfold;

pub use codec::{RESOURCE_TYPE, from_json, to_json};
pub use diff::{calculate_diff, has_diff};
pub use element::{
    ElementBinding, ElementDefinition, ElementDiscriminator, ElementSlicing, ElementType,
};
pub use error::{Result, ShorthandError};
pub use path::{PathSegment, parse_path};
pub use resolver::{TypeResolver, resolve};
pub use slicing::{add_slice, find_named_slice, find_reference_target, slice_choice_type};
pub use structure_definition::StructureDefinition;
pub use tree::ElementTree;
pub use unfold::unfold;
