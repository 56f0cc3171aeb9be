//! Core traits for sortable record types
//!
//! A record type takes part in dynamic sorting by declaring its sortable
//! fields once through [`SortableRecord`]. Storage adapters that sort in
//! process additionally need [`FieldValues`] to read the declared fields.

use super::fields::SortFieldsBuilder;
use super::keys::SortValue;

/// Static sort metadata for a record type.
///
/// `describe` is called at most once per type per registry; the result is
/// cached and never rebuilt.
pub trait SortableRecord: Send + Sync + 'static {
    /// Name used in error messages.
    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Declare sortable fields, their markers and nested sub-records.
    fn describe(fields: &mut SortFieldsBuilder);
}

/// Read access to declared field paths, used by in-process adapters.
///
/// Paths arrive exactly as declared (`"Name"`, `"Address.City"`). Returning
/// `None` means the record cannot be ordered by that path.
pub trait FieldValues {
    fn field_value(&self, path: &str) -> Option<SortValue>;
}
