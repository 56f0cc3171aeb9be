#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use datafilter_core::query::{
    FieldValues, MemorySource, OrderStep, OrderedQuerySource, SortFieldsBuilder, SortValue,
    SortableRecord,
};
use datafilter_core::{DataFilterError, Result};
use datafilter_model::SortDirection;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub street: String,
}

impl SortableRecord for Address {
    fn record_name() -> &'static str {
        "Address"
    }

    fn describe(fields: &mut SortFieldsBuilder) {
        fields.text("City").default_order(0, SortDirection::Ascending);
        fields.text("Street");
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestEntity {
    pub id: i64,
    pub name: String,
    pub secret: String,
    pub first: String,
    pub last: String,
    pub address: Address,
}

impl SortableRecord for TestEntity {
    fn record_name() -> &'static str {
        "TestEntity"
    }

    fn describe(fields: &mut SortFieldsBuilder) {
        fields
            .value("Id")
            .external_name("id")
            .mandatory(0, SortDirection::Ascending);
        fields
            .text("Name")
            .external_name("name")
            .default_order(0, SortDirection::Ascending);
        fields.text("Secret").forbidden();
        fields.text("First");
        fields.text("Last");
        fields.text("FullName").sort_by(["Last", "First"]);
        fields.nested::<Address>("Address");
    }
}

impl FieldValues for TestEntity {
    fn field_value(&self, path: &str) -> Option<SortValue> {
        let value = match path {
            "Id" => self.id.into(),
            "Name" => self.name.as_str().into(),
            "Secret" => self.secret.as_str().into(),
            "First" => self.first.as_str().into(),
            "Last" => self.last.as_str().into(),
            "Address.City" => self.address.city.as_str().into(),
            "Address.Street" => self.address.street.as_str().into(),
            _ => return None,
        };
        Some(value)
    }
}

/// Five records named `Test 1` through `Test 5`, stored out of order.
pub fn test_entities() -> Vec<TestEntity> {
    const FIXTURES: [(i64, &str, &str, &str); 5] = [
        (3, "Grace", "Hopper", "Arlington"),
        (1, "Ada", "Lovelace", "London"),
        (5, "Alan", "Turing", "Manchester"),
        (2, "Edsger", "Dijkstra", "Austin"),
        (4, "Barbara", "Liskov", "Boston"),
    ];

    FIXTURES
        .iter()
        .map(|&(id, first, last, city)| TestEntity {
            id,
            name: format!("Test {id}"),
            secret: format!("s{}", 10 - id),
            first: first.to_string(),
            last: last.to_string(),
            address: Address {
                city: city.to_string(),
                street: format!("{id} Main St"),
            },
        })
        .collect()
}

pub fn names(entities: &[TestEntity]) -> Vec<&str> {
    entities.iter().map(|entity| entity.name.as_str()).collect()
}

/// Calls observed by a [`CountingSource`].
#[derive(Debug, Default)]
pub struct SourceCalls {
    order_steps: AtomicUsize,
    skip_takes: AtomicUsize,
    to_lists: AtomicUsize,
    counts: AtomicUsize,
}

impl SourceCalls {
    pub fn order_steps(&self) -> usize {
        self.order_steps.load(Ordering::SeqCst)
    }

    pub fn skip_takes(&self) -> usize {
        self.skip_takes.load(Ordering::SeqCst)
    }

    pub fn to_lists(&self) -> usize {
        self.to_lists.load(Ordering::SeqCst)
    }

    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.order_steps() + self.skip_takes() + self.to_lists() + self.counts()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    /// Every read fails as if the backing store were down.
    Unavailable,
    /// Reads never complete.
    Stalled,
}

/// Wraps a [`MemorySource`] and records every call made to it.
#[derive(Debug, Clone)]
pub struct CountingSource<T> {
    inner: MemorySource<T>,
    calls: Arc<SourceCalls>,
    behavior: Behavior,
}

impl<T> CountingSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::with_behavior(items, Behavior::Normal)
    }

    pub fn with_behavior(items: Vec<T>, behavior: Behavior) -> Self {
        Self {
            inner: MemorySource::new(items),
            calls: Arc::new(SourceCalls::default()),
            behavior,
        }
    }

    pub fn calls(&self) -> Arc<SourceCalls> {
        Arc::clone(&self.calls)
    }

    fn wrap(&self, inner: MemorySource<T>) -> Self {
        Self {
            inner,
            calls: Arc::clone(&self.calls),
            behavior: self.behavior,
        }
    }

    async fn before_read(&self) -> Result<()> {
        match self.behavior {
            Behavior::Normal => Ok(()),
            Behavior::Unavailable => Err(DataFilterError::source_unavailable(anyhow::anyhow!(
                "connection refused"
            ))),
            Behavior::Stalled => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<T> OrderedQuerySource for CountingSource<T>
where
    T: FieldValues + Clone + Send + Sync + 'static,
{
    type Item = T;

    fn apply_order_step(&self, step: &OrderStep) -> Result<Self> {
        self.calls.order_steps.fetch_add(1, Ordering::SeqCst);
        Ok(self.wrap(self.inner.apply_order_step(step)?))
    }

    fn apply_skip_take(&self, offset: usize, limit: usize) -> Self {
        self.calls.skip_takes.fetch_add(1, Ordering::SeqCst);
        self.wrap(self.inner.apply_skip_take(offset, limit))
    }

    async fn to_list(&self, cancel: &CancellationToken) -> Result<Vec<T>> {
        self.calls.to_lists.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        self.inner.to_list(cancel).await
    }

    async fn count(&self, cancel: &CancellationToken) -> Result<u64> {
        self.calls.counts.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        self.inner.count(cancel).await
    }
}
