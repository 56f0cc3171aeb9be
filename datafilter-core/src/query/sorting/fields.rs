//! Field descriptors and the declaration builder
//!
//! Record types describe their sortable fields with [`SortFieldsBuilder`]
//! instead of runtime attribute inspection. Every declaration produces one
//! [`SortFieldDescriptor`]; nested records contribute their own descriptors as
//! children with dotted paths.

use super::keys::Collation;
use super::traits::SortableRecord;
use datafilter_model::SortDirection;
use tracing::warn;

/// Nested records are expanded this many levels below the root record.
const MAX_NESTING_DEPTH: usize = 1;

/// What kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// String-valued; compared case-insensitively.
    Text,
    /// Any other scalar.
    Value,
    /// Nested record; sorting by it sorts by its default-ordered sub-fields.
    Nested,
}

impl FieldKind {
    pub fn collation(self) -> Collation {
        match self {
            FieldKind::Text => Collation::IgnoreCase,
            FieldKind::Value | FieldKind::Nested => Collation::Binary,
        }
    }
}

/// Position in a default or mandatory ordering chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderRule {
    pub index: i32,
    pub direction: SortDirection,
}

/// Sort metadata for one field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortFieldDescriptor {
    name: String,
    path: String,
    kind: FieldKind,
    external_names: Vec<String>,
    sortable: bool,
    excluded: bool,
    alias_targets: Vec<String>,
    default_order: Option<OrderRule>,
    mandatory_order: Option<OrderRule>,
    children: Vec<SortFieldDescriptor>,
}

impl SortFieldDescriptor {
    fn new(name: &str, path: String, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            path,
            kind,
            external_names: Vec::new(),
            sortable: true,
            excluded: false,
            alias_targets: Vec::new(),
            default_order: None,
            mandatory_order: None,
            children: Vec::new(),
        }
    }

    /// Declared field name without the parent prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full dotted path from the root record.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn external_names(&self) -> &[String] {
        &self.external_names
    }

    /// Whether the field itself can be named in a sort directive.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Explicitly forbidden, or nested beyond the supported depth. Unlike an
    /// unsortable nested field, an excluded one also hides its sub-fields.
    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    /// Physical paths this logical field sorts by, empty when it is not an alias.
    pub fn alias_targets(&self) -> &[String] {
        &self.alias_targets
    }

    pub fn default_order(&self) -> Option<OrderRule> {
        self.default_order
    }

    pub fn mandatory_order(&self) -> Option<OrderRule> {
        self.mandatory_order
    }

    pub fn children(&self) -> &[SortFieldDescriptor] {
        &self.children
    }

    /// Canonical name plus every external name, lower-cased.
    pub(crate) fn lookup_keys(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.name.as_str())
            .chain(self.external_names.iter().map(String::as_str))
            .map(str::to_lowercase)
    }

    /// Case-insensitive match on the canonical or any external name.
    pub(crate) fn matches(&self, lowered: &str) -> bool {
        self.lookup_keys().any(|key| key == lowered)
    }

    /// Children carrying a default-order marker, by index then declaration.
    pub(crate) fn children_mut(&mut self) -> &mut [SortFieldDescriptor] {
        &mut self.children
    }

    pub(crate) fn drop_markers(&mut self) {
        self.default_order = None;
        self.mandatory_order = None;
    }

    pub(crate) fn default_children(&self) -> Vec<&SortFieldDescriptor> {
        let mut children: Vec<_> = self
            .children
            .iter()
            .filter(|child| child.sortable && child.default_order.is_some())
            .collect();
        children.sort_by_key(|child| child.default_order.map(|rule| rule.index));
        children
    }

    /// Forbidden fields lose every marker that could make them reachable, and
    /// nested fields without default-ordered children become unsortable.
    pub(crate) fn normalize(&mut self) {
        for child in &mut self.children {
            child.normalize();
        }

        if self.kind == FieldKind::Nested
            && self.sortable
            && self.alias_targets.is_empty()
            && self.default_children().is_empty()
        {
            warn!(
                target: "datafilter::sorting",
                field = %self.path,
                "nested field has no default-ordered sub-fields; it cannot be sorted as a whole"
            );
            self.sortable = false;
        }

        if !self.sortable && (self.default_order.is_some() || self.mandatory_order.is_some()) {
            warn!(
                target: "datafilter::sorting",
                field = %self.path,
                "forbidden field carries default or mandatory markers; dropping them"
            );
            self.drop_markers();
        }
    }
}

/// Collects field declarations for one record type.
#[derive(Debug, Default)]
pub struct SortFieldsBuilder {
    prefix: String,
    depth: usize,
    fields: Vec<SortFieldDescriptor>,
}

impl SortFieldsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn nested_under(prefix: &str, depth: usize) -> Self {
        Self {
            prefix: format!("{prefix}."),
            depth,
            fields: Vec::new(),
        }
    }

    /// Declare a string-valued field.
    pub fn text(&mut self, name: &str) -> FieldDeclaration<'_> {
        self.push(name, FieldKind::Text, Vec::new())
    }

    /// Declare a non-string scalar field.
    pub fn value(&mut self, name: &str) -> FieldDeclaration<'_> {
        self.push(name, FieldKind::Value, Vec::new())
    }

    /// Declare a nested record field, pulling in the sub-record's own
    /// declarations as dotted children.
    pub fn nested<S: SortableRecord>(&mut self, name: &str) -> FieldDeclaration<'_> {
        let path = format!("{}{}", self.prefix, name);
        if self.depth >= MAX_NESTING_DEPTH {
            warn!(
                target: "datafilter::sorting",
                field = %path,
                "nested record declared beyond the supported depth; field is unsortable"
            );
            return self.push(name, FieldKind::Nested, Vec::new()).forbidden();
        }

        let mut children = SortFieldsBuilder::nested_under(&path, self.depth + 1);
        S::describe(&mut children);
        self.push(name, FieldKind::Nested, children.fields)
    }

    fn push(
        &mut self,
        name: &str,
        kind: FieldKind,
        children: Vec<SortFieldDescriptor>,
    ) -> FieldDeclaration<'_> {
        let mut descriptor =
            SortFieldDescriptor::new(name, format!("{}{}", self.prefix, name), kind);
        descriptor.children = children;
        let index = self.fields.len();
        self.fields.push(descriptor);
        FieldDeclaration {
            field: &mut self.fields[index],
        }
    }

    pub(crate) fn finish(mut self) -> Vec<SortFieldDescriptor> {
        for field in &mut self.fields {
            field.normalize();
        }
        self.fields
    }
}

/// Handle for adding markers to the field just declared.
#[derive(Debug)]
pub struct FieldDeclaration<'a> {
    field: &'a mut SortFieldDescriptor,
}

impl FieldDeclaration<'_> {
    /// Alternate wire name (JSON property, query-string binding).
    pub fn external_name(self, name: &str) -> Self {
        self.field.external_names.push(name.to_string());
        self
    }

    /// Used when the caller supplies no sort directives at all.
    pub fn default_order(self, index: i32, direction: SortDirection) -> Self {
        self.field.default_order = Some(OrderRule { index, direction });
        self
    }

    /// Always appended as a tie-breaker unless the caller already sorted by it.
    pub fn mandatory(self, index: i32, direction: SortDirection) -> Self {
        self.field.mandatory_order = Some(OrderRule { index, direction });
        self
    }

    /// Never sortable, not even when named explicitly.
    pub fn forbidden(self) -> Self {
        self.field.sortable = false;
        self.field.excluded = true;
        self
    }

    /// Sort this logical field by the given sibling paths, in order.
    pub fn sort_by<I, S>(self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefix = self
            .field
            .path
            .strip_suffix(self.field.name.as_str())
            .unwrap_or_default()
            .to_string();
        self.field.alias_targets = targets
            .into_iter()
            .map(|target| format!("{prefix}{}", target.as_ref()))
            .collect();
        self
    }
}
