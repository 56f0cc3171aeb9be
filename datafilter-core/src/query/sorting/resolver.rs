//! Turns caller sort directives into a flat, validated ordering plan
//!
//! Resolution is pure: it reads the cached [`TypeSortMetadata`] and never
//! touches a query source, so every resolution error surfaces before any I/O.

use super::fields::{FieldKind, SortFieldDescriptor};
use super::keys::Collation;
use super::registry::{LookupMiss, SortMetadataRegistry, TypeSortMetadata};
use super::traits::SortableRecord;
use crate::error::{DataFilterError, Result};
use datafilter_model::{SortDirection, SortDirective};
use tracing::{debug, warn};

/// One ordering operation: the first step of a plan establishes the primary
/// order, every later step only breaks ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderStep {
    pub path: String,
    pub direction: SortDirection,
    pub collation: Collation,
}

impl OrderStep {
    pub fn new(path: impl Into<String>, direction: SortDirection, collation: Collation) -> Self {
        Self {
            path: path.into(),
            direction,
            collation,
        }
    }
}

/// Ordered steps ready to be applied to a query source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrderingPlan {
    record: &'static str,
    steps: Vec<OrderStep>,
}

impl ResolvedOrderingPlan {
    pub fn new(record: &'static str, steps: Vec<OrderStep>) -> Self {
        Self { record, steps }
    }

    /// A plan that leaves the source order untouched.
    pub fn unordered(record: &'static str) -> Self {
        Self::new(record, Vec::new())
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn steps(&self) -> &[OrderStep] {
        &self.steps
    }

    pub fn primary(&self) -> Option<&OrderStep> {
        self.steps.first()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|step| step.path.as_str())
    }
}

impl<'a> IntoIterator for &'a ResolvedOrderingPlan {
    type Item = &'a OrderStep;
    type IntoIter = std::slice::Iter<'a, OrderStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Resolves directives for record types known to a registry.
#[derive(Debug, Clone, Copy)]
pub struct OrderingResolver<'r> {
    registry: &'r SortMetadataRegistry,
}

impl OrderingResolver<'static> {
    /// Resolver over the process-wide registry.
    pub fn global() -> Self {
        Self::new(SortMetadataRegistry::global())
    }
}

impl Default for OrderingResolver<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'r> OrderingResolver<'r> {
    pub fn new(registry: &'r SortMetadataRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r SortMetadataRegistry {
        self.registry
    }

    /// Resolve caller directives for `T`.
    ///
    /// Without directives the declared default chain is used. Mandatory
    /// fields not already in the plan are appended as trailing tie-breakers.
    pub fn resolve<T: SortableRecord>(
        &self,
        directives: &[SortDirective],
    ) -> Result<ResolvedOrderingPlan> {
        let metadata = self.registry.describe::<T>();
        resolve_with(&metadata, directives)
    }

    /// The plan used when a caller supplies no directives.
    pub fn default_plan<T: SortableRecord>(&self) -> Result<ResolvedOrderingPlan> {
        self.resolve::<T>(&[])
    }
}

/// Resolve directives against already built metadata.
pub fn resolve_with(
    metadata: &TypeSortMetadata,
    directives: &[SortDirective],
) -> Result<ResolvedOrderingPlan> {
    let mut plan = PlanBuilder::new(metadata);

    if directives.is_empty() {
        for field in metadata.default_fields() {
            let direction = field
                .default_order()
                .map(|rule| rule.direction)
                .unwrap_or_default();
            plan.push_field(field, direction, field.path())?;
        }
    } else {
        for directive in directives {
            let field = plan.lookup(&directive.sort_column_name)?;
            plan.push_field(field, directive.direction(), &directive.sort_column_name)?;
        }
    }

    for field in metadata.mandatory_fields() {
        let direction = field
            .mandatory_order()
            .map(|rule| rule.direction)
            .unwrap_or_default();
        let mut tail = PlanBuilder::new(metadata);
        tail.push_field(field, direction, field.path())?;
        for step in tail.steps {
            if !plan.contains_path(&step.path) {
                plan.steps.push(step);
            }
        }
    }

    let resolved = ResolvedOrderingPlan::new(metadata.record(), plan.steps);
    debug!(
        target: "datafilter::sorting",
        record = resolved.record(),
        directives = directives.len(),
        steps = ?resolved.steps(),
        "resolved ordering plan"
    );
    Ok(resolved)
}

struct PlanBuilder<'m> {
    metadata: &'m TypeSortMetadata,
    steps: Vec<OrderStep>,
}

impl<'m> PlanBuilder<'m> {
    fn new(metadata: &'m TypeSortMetadata) -> Self {
        Self {
            metadata,
            steps: Vec::new(),
        }
    }

    fn contains_path(&self, path: &str) -> bool {
        self.steps.iter().any(|step| step.path == path)
    }

    fn lookup(&self, name: &str) -> Result<&'m SortFieldDescriptor> {
        self.metadata.lookup(name).map_err(|miss| {
            warn!(
                target: "datafilter::sorting",
                record = self.metadata.record(),
                field = name,
                reason = ?miss,
                "rejected sort field"
            );
            match miss {
                LookupMiss::Unknown => DataFilterError::UnknownSortField {
                    field: name.to_string(),
                    record: self.metadata.record(),
                },
                LookupMiss::Forbidden => DataFilterError::ForbiddenSortField {
                    field: name.to_string(),
                    record: self.metadata.record(),
                },
            }
        })
    }

    /// Expand a logical field: aliases become their targets, everything else
    /// is pushed as a physical field.
    fn push_field(
        &mut self,
        field: &'m SortFieldDescriptor,
        direction: SortDirection,
        requested_as: &str,
    ) -> Result<()> {
        if !field.is_sortable() {
            return Err(self.forbidden(requested_as));
        }

        if field.alias_targets().is_empty() {
            return self.push_physical(field, direction, requested_as);
        }

        for target in field.alias_targets() {
            let target_field = self.lookup(target)?;
            self.push_physical(target_field, direction, target)?;
        }
        Ok(())
    }

    /// A nested record sorts by each of its default-ordered sub-fields.
    fn push_physical(
        &mut self,
        field: &'m SortFieldDescriptor,
        direction: SortDirection,
        requested_as: &str,
    ) -> Result<()> {
        if !field.is_sortable() {
            return Err(self.forbidden(requested_as));
        }

        match field.kind() {
            FieldKind::Nested => {
                for child in field.default_children() {
                    self.push_field(child, direction, child.path())?;
                }
            }
            kind => self
                .steps
                .push(OrderStep::new(field.path(), direction, kind.collation())),
        }
        Ok(())
    }

    fn forbidden(&self, requested_as: &str) -> DataFilterError {
        DataFilterError::ForbiddenSortField {
            field: requested_as.to_string(),
            record: self.metadata.record(),
        }
    }
}
