//! Sort key values for comparing records in process
//!
//! These wrap the values extracted from records and handle missing data
//! explicitly: a missing value sorts after every present value in either
//! direction.

use chrono::{DateTime, Utc};
use datafilter_model::SortDirection;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use uuid::Uuid;

/// How text values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collation {
    /// Byte-wise comparison.
    #[default]
    Binary,
    /// Lower-cased before comparison, independent of storage collation.
    IgnoreCase,
}

/// A single comparable field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortValue {
    Missing,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(OrderedFloat<f64>),
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
}

impl SortValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, SortValue::Missing)
    }

    /// Ascending comparison of two present values.
    ///
    /// Numbers compare across integer and float variants; otherwise values of
    /// different kinds order by kind so the result stays total.
    pub fn compare(&self, other: &Self, collation: Collation) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Missing, Missing) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (UInt(a), UInt(b)) => a.cmp(b),
            (Int(a), UInt(b)) => i128::from(*a).cmp(&i128::from(*b)),
            (UInt(a), Int(b)) => i128::from(*a).cmp(&i128::from(*b)),
            (Float(a), Float(b)) => a.cmp(b),
            (Int(a), Float(b)) => compare_int_float(i128::from(*a), b.0),
            (UInt(a), Float(b)) => compare_int_float(i128::from(*a), b.0),
            (Float(a), Int(b)) => compare_int_float(i128::from(*b), a.0).reverse(),
            (Float(a), UInt(b)) => compare_int_float(i128::from(*b), a.0).reverse(),
            (Text(a), Text(b)) => match collation {
                Collation::Binary => a.cmp(b),
                Collation::IgnoreCase => a.to_lowercase().cmp(&b.to_lowercase()),
            },
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Uuid(a), Uuid(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    /// Compare in the given direction, keeping missing values last.
    pub fn compare_with_order(
        &self,
        other: &Self,
        direction: SortDirection,
        collation: Collation,
    ) -> Ordering {
        match (self.is_missing(), other.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => direction.apply(self.compare(other, collation)),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Bool(_) => 1,
            SortValue::Int(_) | SortValue::UInt(_) | SortValue::Float(_) => 2,
            SortValue::Text(_) => 3,
            SortValue::Timestamp(_) => 4,
            SortValue::Uuid(_) => 5,
        }
    }
}

/// 2^127, the first float above every `i128`.
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Exact comparison of an integer with a float, without rounding the integer.
/// NaN sorts above every number, matching `OrderedFloat`.
fn compare_int_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() || float >= I128_BOUND {
        return Ordering::Less;
    }
    if float < -I128_BOUND {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    // In range and integral, so the cast is exact.
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => whole.partial_cmp(&float).unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

impl From<bool> for SortValue {
    fn from(value: bool) -> Self {
        SortValue::Bool(value)
    }
}

impl From<i32> for SortValue {
    fn from(value: i32) -> Self {
        SortValue::Int(i64::from(value))
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        SortValue::Int(value)
    }
}

impl From<u32> for SortValue {
    fn from(value: u32) -> Self {
        SortValue::UInt(u64::from(value))
    }
}

impl From<u64> for SortValue {
    fn from(value: u64) -> Self {
        SortValue::UInt(value)
    }
}

impl From<f32> for SortValue {
    fn from(value: f32) -> Self {
        SortValue::Float(OrderedFloat(f64::from(value)))
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        SortValue::Float(OrderedFloat(value))
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        SortValue::Text(value)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        SortValue::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for SortValue {
    fn from(value: DateTime<Utc>) -> Self {
        SortValue::Timestamp(value)
    }
}

impl From<Uuid> for SortValue {
    fn from(value: Uuid) -> Self {
        SortValue::Uuid(value)
    }
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SortValue::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_ignores_case_when_asked() {
        let upper = SortValue::from("Beta");
        let lower = SortValue::from("alpha");

        assert_eq!(upper.compare(&lower, Collation::Binary), Ordering::Less);
        assert_eq!(upper.compare(&lower, Collation::IgnoreCase), Ordering::Greater);
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let present = SortValue::from(3);
        let missing = SortValue::from(None::<i64>);

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(
                missing.compare_with_order(&present, direction, Collation::Binary),
                Ordering::Greater
            );
            assert_eq!(
                present.compare_with_order(&missing, direction, Collation::Binary),
                Ordering::Less
            );
        }
    }

    #[test]
    fn numbers_compare_across_variants() {
        assert_eq!(
            SortValue::from(2_i64).compare(&SortValue::from(2.5_f64), Collation::Binary),
            Ordering::Less
        );
        assert_eq!(
            SortValue::from(-1_i64).compare(&SortValue::from(0_u64), Collation::Binary),
            Ordering::Less
        );
    }

    #[test]
    fn large_integers_compare_exactly_with_floats() {
        let boundary = 1_i64 << 53;
        let above = SortValue::from(boundary + 1);
        let exact = SortValue::from(boundary);
        let float = SortValue::from(boundary as f64);

        assert_eq!(above.compare(&float, Collation::Binary), Ordering::Greater);
        assert_eq!(float.compare(&above, Collation::Binary), Ordering::Less);
        assert_eq!(exact.compare(&float, Collation::Binary), Ordering::Equal);
        assert_eq!(
            SortValue::from(u64::MAX).compare(&SortValue::from(f64::INFINITY), Collation::Binary),
            Ordering::Less
        );
        assert_eq!(
            SortValue::from(-3_i64).compare(&SortValue::from(-2.5_f64), Collation::Binary),
            Ordering::Less
        );
        assert_eq!(
            SortValue::from(f64::NAN).compare(&SortValue::from(i64::MAX), Collation::Binary),
            Ordering::Greater
        );
    }

    #[test]
    fn descending_reverses_present_values() {
        let a = SortValue::from(1);
        let b = SortValue::from(2);
        assert_eq!(
            a.compare_with_order(&b, SortDirection::Descending, Collation::Binary),
            Ordering::Greater
        );
    }
}
