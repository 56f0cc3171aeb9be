//! Declarative sort metadata and directive resolution
//!
//! This module provides:
//! - Core traits for sortable record types
//! - Field descriptors declared through a builder
//! - A process-wide metadata registry
//! - Resolution of caller directives into ordering plans
//! - Sort key values for in-process comparison

pub mod fields;
pub mod keys;
pub mod registry;
pub mod resolver;
pub mod traits;


pub use fields::{FieldDeclaration, FieldKind, OrderRule, SortFieldDescriptor, SortFieldsBuilder};
pub use keys::{Collation, SortValue};
pub use registry::{SortMetadataRegistry, TypeSortMetadata};
pub use resolver::{OrderStep, OrderingResolver, ResolvedOrderingPlan, resolve_with};
pub use traits::{FieldValues, SortableRecord};
