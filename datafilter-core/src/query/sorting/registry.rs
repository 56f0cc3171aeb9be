//! Per-type sort metadata, built once and shared for the process lifetime.

use super::fields::{SortFieldDescriptor, SortFieldsBuilder};
use super::traits::SortableRecord;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{debug, warn};

static GLOBAL_REGISTRY: Lazy<SortMetadataRegistry> = Lazy::new(SortMetadataRegistry::new);

/// Why a field name did not resolve to a sortable descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LookupMiss {
    Unknown,
    Forbidden,
}

/// Immutable sort description of one record type.
#[derive(Debug)]
pub struct TypeSortMetadata {
    record: &'static str,
    fields: Vec<SortFieldDescriptor>,
    /// Lower-cased canonical and external names of top-level fields.
    lookup: HashMap<String, usize>,
    default_chain: Vec<usize>,
    mandatory_chain: Vec<usize>,
}

impl TypeSortMetadata {
    pub fn build<T: SortableRecord>() -> Self {
        let mut builder = SortFieldsBuilder::new();
        T::describe(&mut builder);
        Self::from_fields(T::record_name(), builder.finish())
    }

    pub(crate) fn from_fields(record: &'static str, fields: Vec<SortFieldDescriptor>) -> Self {
        let lookup = build_lookup(record, &fields);
        let mut metadata = Self {
            record,
            fields,
            lookup,
            default_chain: Vec::new(),
            mandatory_chain: Vec::new(),
        };
        metadata.drop_unreachable_markers();

        let fields = &metadata.fields;
        let mut default_chain: Vec<usize> = (0..fields.len())
            .filter(|&i| fields[i].default_order().is_some())
            .collect();
        default_chain.sort_by_key(|&i| fields[i].default_order().map(|rule| rule.index));

        let mut mandatory_chain: Vec<usize> = (0..fields.len())
            .filter(|&i| fields[i].mandatory_order().is_some())
            .collect();
        mandatory_chain.sort_by_key(|&i| fields[i].mandatory_order().map(|rule| rule.index));

        debug!(
            target: "datafilter::sorting",
            record,
            fields = fields.len(),
            defaults = default_chain.len(),
            mandatory = mandatory_chain.len(),
            "built sort metadata"
        );

        metadata.default_chain = default_chain;
        metadata.mandatory_chain = mandatory_chain;
        metadata
    }

    /// Markers on aliases whose targets do not resolve would fail every
    /// request that relies on them; such markers are dropped instead.
    /// Sub-fields go first so that a parent left without default-ordered
    /// children is normalized again before top-level aliases are checked.
    fn drop_unreachable_markers(&mut self) {
        let mut broken_children = Vec::new();
        for (parent, field) in self.fields.iter().enumerate() {
            for (index, child) in field.children().iter().enumerate() {
                if self.has_broken_alias(child) {
                    broken_children.push((parent, index));
                }
            }
        }

        for (parent, index) in broken_children {
            let field = &mut self.fields[parent];
            let child = &mut field.children_mut()[index];
            warn_unreachable(self.record, child);
            child.drop_markers();
            field.normalize();
        }

        let broken: Vec<usize> = (0..self.fields.len())
            .filter(|&index| self.has_broken_alias(&self.fields[index]))
            .collect();

        for index in broken {
            let field = &mut self.fields[index];
            warn_unreachable(self.record, field);
            field.drop_markers();
        }
    }

    fn has_broken_alias(&self, field: &SortFieldDescriptor) -> bool {
        let marked = field.default_order().is_some() || field.mandatory_order().is_some();
        marked
            && field
                .alias_targets()
                .iter()
                .any(|target| self.lookup(target).is_err())
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    /// Top-level descriptors in declaration order.
    pub fn fields(&self) -> &[SortFieldDescriptor] {
        &self.fields
    }

    /// Top-level field by canonical or external name, ignoring case.
    pub fn field(&self, name: &str) -> Option<&SortFieldDescriptor> {
        self.lookup
            .get(&name.trim().to_lowercase())
            .map(|&index| &self.fields[index])
    }

    /// Fields with a default-order marker, by declared index.
    pub fn default_fields(&self) -> impl Iterator<Item = &SortFieldDescriptor> + '_ {
        self.default_chain.iter().map(|&index| &self.fields[index])
    }

    /// Fields with a mandatory marker, by declared index.
    pub fn mandatory_fields(&self) -> impl Iterator<Item = &SortFieldDescriptor> + '_ {
        self.mandatory_chain.iter().map(|&index| &self.fields[index])
    }

    /// Resolve a possibly dotted name. Empty segments are ignored; every
    /// segment is matched case-insensitively. An excluded field anywhere along
    /// the path makes the whole path forbidden, as does naming a field that
    /// cannot be sorted itself.
    pub(crate) fn lookup(&self, name: &str) -> Result<&SortFieldDescriptor, LookupMiss> {
        let mut segments = name
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty());

        let first = segments.next().ok_or(LookupMiss::Unknown)?;
        let mut current = self.field(first).ok_or(LookupMiss::Unknown)?;
        let mut excluded = current.is_excluded();

        for segment in segments {
            let lowered = segment.to_lowercase();
            current = current
                .children()
                .iter()
                .find(|child| child.matches(&lowered))
                .ok_or(LookupMiss::Unknown)?;
            excluded |= current.is_excluded();
        }

        if excluded || !current.is_sortable() {
            Err(LookupMiss::Forbidden)
        } else {
            Ok(current)
        }
    }
}

fn build_lookup(record: &'static str, fields: &[SortFieldDescriptor]) -> HashMap<String, usize> {
    let mut lookup = HashMap::new();
    for (index, field) in fields.iter().enumerate() {
        for key in field.lookup_keys() {
            match lookup.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(slot) if *slot.get() != index => {
                    warn!(
                        target: "datafilter::sorting",
                        record,
                        name = %slot.key(),
                        field = %field.path(),
                        "duplicate sort field name; keeping the first declaration"
                    );
                }
                Entry::Occupied(_) => {}
            }
        }
    }
    lookup
}

fn warn_unreachable(record: &'static str, field: &SortFieldDescriptor) {
    warn!(
        target: "datafilter::sorting",
        record,
        field = %field.path(),
        targets = ?field.alias_targets(),
        "alias targets are unknown or forbidden; dropping default and mandatory markers"
    );
}

/// Process-wide cache of [`TypeSortMetadata`] keyed by record type.
///
/// Entries are published once and never mutated. Concurrent first lookups
/// for the same type may both build the metadata; only the first published
/// value is kept and every caller receives it.
#[derive(Debug, Default)]
pub struct SortMetadataRegistry {
    entries: DashMap<TypeId, Arc<TypeSortMetadata>>,
}

impl SortMetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lazily created process-wide registry.
    pub fn global() -> &'static SortMetadataRegistry {
        &GLOBAL_REGISTRY
    }

    /// Metadata for `T`, building and caching it on first access.
    pub fn describe<T: SortableRecord>(&self) -> Arc<TypeSortMetadata> {
        let key = TypeId::of::<T>();
        if let Some(existing) = self.entries.get(&key) {
            return Arc::clone(existing.value());
        }

        // Built outside the map lock; describing a record never re-enters it.
        let built = Arc::new(TypeSortMetadata::build::<T>());
        let published = self.entries.entry(key).or_insert(built);
        Arc::clone(published.value())
    }

    /// Explicit startup registration; equivalent to a first `describe`.
    pub fn register<T: SortableRecord>(&self) -> Arc<TypeSortMetadata> {
        self.describe::<T>()
    }

    pub fn contains<T: SortableRecord>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::sorting::fields::FieldKind;
    use datafilter_model::SortDirection;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static TALLY_DESCRIBES: AtomicUsize = AtomicUsize::new(0);

    struct Tally;

    impl SortableRecord for Tally {
        fn describe(fields: &mut SortFieldsBuilder) {
            TALLY_DESCRIBES.fetch_add(1, Ordering::SeqCst);
            fields.value("Id");
        }
    }

    struct Counted;

    impl SortableRecord for Counted {
        fn record_name() -> &'static str {
            "Counted"
        }

        fn describe(fields: &mut SortFieldsBuilder) {
            fields.value("Id").mandatory(0, SortDirection::Ascending);
            fields
                .text("Name")
                .external_name("display_name")
                .default_order(1, SortDirection::Ascending);
            fields.value("Created").default_order(0, SortDirection::Descending);
            fields.text("Hidden").forbidden();
        }
    }

    #[test]
    fn describe_is_cached_per_type() {
        let registry = SortMetadataRegistry::new();

        let first = registry.describe::<Tally>();
        let second = registry.register::<Tally>();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(TALLY_DESCRIBES.load(Ordering::SeqCst), 1);
        assert!(registry.contains::<Tally>());
        assert!(!registry.contains::<Counted>());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_first_builds_publish_one_value() {
        let registry = SortMetadataRegistry::new();

        let results: Vec<Arc<TypeSortMetadata>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.describe::<Counted>()))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("describe thread panicked"))
                .collect()
        });

        let published = registry.describe::<Counted>();
        assert!(results.iter().all(|meta| Arc::ptr_eq(meta, &published)));
    }

    #[test]
    fn chains_follow_declared_indices() {
        let meta = TypeSortMetadata::build::<Counted>();

        let defaults: Vec<_> = meta.default_fields().map(|f| f.path()).collect();
        assert_eq!(defaults, vec!["Created", "Name"]);

        let mandatory: Vec<_> = meta.mandatory_fields().map(|f| f.path()).collect();
        assert_eq!(mandatory, vec!["Id"]);
    }

    #[test]
    fn lookup_matches_any_declared_name() {
        let meta = TypeSortMetadata::build::<Counted>();

        assert_eq!(meta.field("NAME").map(|f| f.path()), Some("Name"));
        assert_eq!(meta.field("Display_Name").map(|f| f.path()), Some("Name"));
        assert_eq!(meta.field("name").map(|f| f.kind()), Some(FieldKind::Text));
        assert!(meta.field("missing").is_none());

        assert_eq!(meta.lookup("hidden").err(), Some(LookupMiss::Forbidden));
        assert_eq!(meta.lookup("name.first").err(), Some(LookupMiss::Unknown));
        assert_eq!(meta.lookup("  ").err(), Some(LookupMiss::Unknown));
    }

    struct BrokenAliases;

    impl SortableRecord for BrokenAliases {
        fn record_name() -> &'static str {
            "BrokenAliases"
        }

        fn describe(fields: &mut SortFieldsBuilder) {
            fields.value("Id");
            fields.text("Secret").forbidden();
            fields.text("Name").default_order(1, SortDirection::Ascending);
            fields
                .text("Masked")
                .sort_by(["Secret"])
                .default_order(0, SortDirection::Ascending);
            fields
                .text("Ghost")
                .sort_by(["Missing"])
                .mandatory(0, SortDirection::Ascending);
            fields.nested::<AliasedChild>("Child");
        }
    }

    struct AliasedChild;

    impl SortableRecord for AliasedChild {
        fn describe(fields: &mut SortFieldsBuilder) {
            fields.text("Code");
            fields
                .text("Label")
                .sort_by(["Nope"])
                .default_order(0, SortDirection::Ascending);
        }
    }

    #[test]
    fn markers_on_unresolvable_aliases_are_dropped() {
        let meta = TypeSortMetadata::build::<BrokenAliases>();

        let defaults: Vec<_> = meta.default_fields().map(|f| f.path()).collect();
        assert_eq!(defaults, vec!["Name"]);
        assert_eq!(meta.mandatory_fields().count(), 0);

        let masked = meta.field("Masked").expect("declared");
        assert_eq!(masked.default_order(), None);

        // The child lost its only default marker, so the parent cannot be
        // sorted as a whole, while its plain sub-field stays reachable.
        let child = meta.field("Child").expect("declared");
        assert_eq!(child.children()[1].default_order(), None);
        assert!(!child.is_sortable());
        assert!(meta.lookup("Child.Code").is_ok());

        let plan = crate::query::sorting::resolve_with(&meta, &[]).expect("default plan");
        let paths: Vec<_> = plan.paths().collect();
        assert_eq!(paths, vec!["Name"]);
    }
}
