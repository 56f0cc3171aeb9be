//! In-process query source over a shared vector of records.

use super::sorting::{FieldValues, OrderStep, SortValue};
use super::source::OrderedQuerySource;
use crate::error::{DataFilterError, Result};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Lazy view over an in-memory collection.
///
/// Cloning a view is cheap; the records themselves are shared. Ordering is
/// stable, so records that tie on every step keep their input order.
pub struct MemorySource<T> {
    items: Arc<Vec<T>>,
    predicate: Option<Predicate<T>>,
    steps: Vec<OrderStep>,
    window: Option<(usize, usize)>,
}

impl<T> MemorySource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::from_shared(Arc::new(items))
    }

    pub fn from_shared(items: Arc<Vec<T>>) -> Self {
        Self {
            items,
            predicate: None,
            steps: Vec::new(),
            window: None,
        }
    }

    /// Keep only records matching `predicate`, in addition to any earlier
    /// filter. The filter applies before ordering and windowing.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        T: 'static,
    {
        let combined: Predicate<T> = match &self.predicate {
            Some(existing) => {
                let existing = Arc::clone(existing);
                Arc::new(move |item: &T| existing(item) && predicate(item))
            }
            None => Arc::new(predicate),
        };

        Self {
            predicate: Some(combined),
            ..self.clone()
        }
    }

    /// Ordering steps applied so far.
    pub fn order_steps(&self) -> &[OrderStep] {
        &self.steps
    }

    /// Current `(offset, limit)` window, if any.
    pub fn window(&self) -> Option<(usize, usize)> {
        self.window
    }

    fn matching(&self) -> impl Iterator<Item = &T> + '_ {
        self.items
            .iter()
            .filter(move |item| self.predicate.as_ref().is_none_or(|keep| keep(*item)))
    }
}

impl<T: FieldValues> MemorySource<T> {
    fn sort_keys(&self, item: &T) -> Result<Vec<SortValue>> {
        self.steps
            .iter()
            .map(|step| {
                item.field_value(&step.path)
                    .ok_or_else(|| DataFilterError::UnsupportedSortPath {
                        path: step.path.clone(),
                    })
            })
            .collect()
    }

    fn compare_keys(&self, left: &[SortValue], right: &[SortValue]) -> Ordering {
        self.steps
            .iter()
            .zip(left.iter().zip(right))
            .map(|(step, (a, b))| a.compare_with_order(b, step.direction, step.collation))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<T> Clone for MemorySource<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            predicate: self.predicate.clone(),
            steps: self.steps.clone(),
            window: self.window,
        }
    }
}

impl<T> fmt::Debug for MemorySource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("items", &self.items.len())
            .field("filtered", &self.predicate.is_some())
            .field("steps", &self.steps)
            .field("window", &self.window)
            .finish()
    }
}

#[async_trait]
impl<T> OrderedQuerySource for MemorySource<T>
where
    T: FieldValues + Clone + Send + Sync + 'static,
{
    type Item = T;

    /// Paths are checked when the view is materialized, against every
    /// record that passes the filter.
    fn apply_order_step(&self, step: &OrderStep) -> Result<Self> {
        let mut next = self.clone();
        next.steps.push(step.clone());
        Ok(next)
    }

    fn apply_skip_take(&self, offset: usize, limit: usize) -> Self {
        // A window on a window narrows the existing one.
        let window = match self.window {
            Some((outer_offset, outer_limit)) => {
                let remaining = outer_limit.saturating_sub(offset);
                (outer_offset.saturating_add(offset), remaining.min(limit))
            }
            None => (offset, limit),
        };

        Self {
            window: Some(window),
            ..self.clone()
        }
    }

    async fn to_list(&self, cancel: &CancellationToken) -> Result<Vec<T>> {
        if cancel.is_cancelled() {
            return Err(DataFilterError::Cancelled);
        }

        let mut rows = self
            .matching()
            .map(|item| Ok((self.sort_keys(item)?, item)))
            .collect::<Result<Vec<_>>>()?;

        if !self.steps.is_empty() {
            rows.sort_by(|(left, _), (right, _)| self.compare_keys(left, right));
        }

        let (offset, limit) = self.window.unwrap_or((0, usize::MAX));
        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn count(&self, cancel: &CancellationToken) -> Result<u64> {
        if cancel.is_cancelled() {
            return Err(DataFilterError::Cancelled);
        }
        Ok(self.matching().count() as u64)
    }
}
