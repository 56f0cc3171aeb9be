//! Row shapes commonly returned by autocomplete endpoints.

/// Identifier plus display name; the default autocomplete row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NamedItem<K = i64> {
    pub id: K,
    pub name: String,
}

impl<K> NamedItem<K> {
    pub fn new(id: K, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Key/value autocomplete row that can be grouped in the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AutoCompleteItem<K, V> {
    pub group_name: String,
    pub status: bool,
    pub key: K,
    pub value: V,
}
