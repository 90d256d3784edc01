//! Per-namespace scheduling weight.
//!
//! A namespace can carry several resource quotas, each optionally declaring a
//! weight under [`NAMESPACE_WEIGHT_KEY`]. The effective weight is the highest
//! declared one, tracked with a max-heap keyed by quota name.

use crate::config::SnapshotConfig;
use crate::core::{HeapError, Quantity};
use crate::infra::Heap;
use crate::model::ResourceQuota;

/// Quota entry holding a namespace's weight.
pub const NAMESPACE_WEIGHT_KEY: &str = "volcano.sh/namespace.weight";
/// Weight of a namespace without a weighted quota.
pub const DEFAULT_NAMESPACE_WEIGHT: i64 = 1;

/// Snapshot of a namespace's effective weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceInfo {
    /// Namespace name.
    pub name: String,
    /// Effective weight.
    pub weight: i64,
}

/// Weight declared by one quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaItem {
    /// Quota name; the heap key.
    pub name: String,
    /// Declared weight.
    pub weight: i64,
}

impl QuotaItem {
    /// Read the weight declared by `quota` under `weight_key`, falling back to
    /// `default_weight` when the entry is missing or not a quantity.
    #[must_use]
    pub fn from_resource_quota(quota: &ResourceQuota, weight_key: &str, default_weight: i64) -> Self {
        let weight = match quota.spec.hard.get(weight_key) {
            None => default_weight,
            Some(raw) => match raw.parse::<Quantity>().ok().and_then(|q| q.trunc().to_i64()) {
                Some(weight) => weight,
                None => {
                    tracing::warn!(
                        "quota <{}/{}> has invalid weight {raw:?}, using {default_weight}",
                        quota.metadata.namespace,
                        quota.metadata.name
                    );
                    default_weight
                }
            },
        };

        Self {
            name: quota.metadata.name.clone(),
            weight,
        }
    }
}

/// Weights declared by the quotas of one namespace.
#[derive(Debug)]
pub struct NamespaceCollection {
    name: String,
    weight_key: String,
    default_weight: i64,
    quota_weight: Heap<QuotaItem>,
}

impl NamespaceCollection {
    /// Collection for namespace `name` with the default weight key and weight.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &SnapshotConfig::default())
    }

    /// Collection for namespace `name` using the weight key and default
    /// weight from `config`.
    #[must_use]
    pub fn with_config(name: impl Into<String>, config: &SnapshotConfig) -> Self {
        let collection = Self {
            name: name.into(),
            weight_key: config.namespace_weight_key.clone(),
            default_weight: config.default_namespace_weight,
            quota_weight: Heap::new(
                |item: &QuotaItem| item.name.clone(),
                |a: &QuotaItem, b: &QuotaItem| a.weight > b.weight,
            ),
        };

        // Fresh heap, never closed here.
        let _ = collection.update_weight(QuotaItem {
            name: collection.weight_key.clone(),
            weight: collection.default_weight,
        });
        collection
    }

    /// Namespace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace a weight entry.
    ///
    /// # Errors
    ///
    /// Propagates [`HeapError::Closed`] from the underlying heap.
    pub fn update_weight(&self, item: QuotaItem) -> Result<(), HeapError> {
        self.quota_weight.update(item)
    }

    /// Remove a weight entry.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::ObjectNotFound`] if no entry has that name.
    pub fn delete_weight(&self, item: &QuotaItem) -> Result<(), HeapError> {
        self.quota_weight.delete(item).map(|_| ())
    }

    /// Record the weight declared by `quota`.
    ///
    /// # Errors
    ///
    /// Propagates [`HeapError::Closed`] from the underlying heap.
    pub fn update(&self, quota: &ResourceQuota) -> Result<(), HeapError> {
        self.update_weight(self.item_for(quota))
    }

    /// Forget the weight declared by `quota`; unknown quotas are ignored.
    pub fn delete(&self, quota: &ResourceQuota) {
        if let Err(err) = self.delete_weight(&self.item_for(quota)) {
            tracing::debug!("namespace {}: quota {} not tracked: {err}", self.name, quota.metadata.name);
        }
    }

    fn item_for(&self, quota: &ResourceQuota) -> QuotaItem {
        QuotaItem::from_resource_quota(quota, &self.weight_key, self.default_weight)
    }

    /// The namespace's effective weight: the highest declared one.
    #[must_use]
    pub fn snapshot(&self) -> NamespaceInfo {
        let weight = self.quota_weight.peek().map_or_else(
            || {
                tracing::warn!("namespace {}: no quota weight recorded, using default", self.name);
                self.default_weight
            },
            |item| item.weight,
        );

        NamespaceInfo {
            name: self.name.clone(),
            weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectMeta, ResourceQuotaSpec};

    fn quota(name: &str, weight: Option<&str>) -> ResourceQuota {
        let mut hard = crate::model::ResourceList::new();
        if let Some(weight) = weight {
            hard.insert(NAMESPACE_WEIGHT_KEY.to_string(), weight.to_string());
        }
        ResourceQuota {
            metadata: ObjectMeta::named("c1", name),
            spec: ResourceQuotaSpec { hard },
        }
    }

    #[test]
    fn test_default_weight() {
        let collection = NamespaceCollection::new("c1");
        assert_eq!(
            collection.snapshot(),
            NamespaceInfo {
                name: "c1".into(),
                weight: DEFAULT_NAMESPACE_WEIGHT
            }
        );
    }

    #[test]
    fn test_highest_weight_wins() {
        let collection = NamespaceCollection::new("c1");
        collection.update(&quota("q1", Some("10"))).unwrap();
        collection.update(&quota("q2", Some("20"))).unwrap();
        collection.update(&quota("q3", None)).unwrap();
        assert_eq!(collection.snapshot().weight, 20);

        collection.delete(&quota("q2", Some("20")));
        assert_eq!(collection.snapshot().weight, 10);

        collection.update(&quota("q1", Some("3"))).unwrap();
        assert_eq!(collection.snapshot().weight, 3);
    }

    #[test]
    fn test_snapshot_does_not_consume() {
        let collection = NamespaceCollection::new("c1");
        collection.update(&quota("q1", Some("5"))).unwrap();
        for _ in 0..3 {
            assert_eq!(collection.snapshot().weight, 5);
        }
    }

    #[test]
    fn test_delete_unknown_quota_is_ignored() {
        let collection = NamespaceCollection::new("c1");
        collection.delete(&quota("missing", Some("5")));
        assert_eq!(collection.snapshot().weight, DEFAULT_NAMESPACE_WEIGHT);
    }

    #[test]
    fn test_snapshot_falls_back_when_empty() {
        let collection = NamespaceCollection::new("c1");
        collection
            .delete_weight(&QuotaItem {
                name: NAMESPACE_WEIGHT_KEY.into(),
                weight: 0,
            })
            .unwrap();
        assert_eq!(collection.snapshot().weight, DEFAULT_NAMESPACE_WEIGHT);
    }

    #[test]
    fn test_quota_item_weight_parsing() {
        let item = QuotaItem::from_resource_quota(&quota("q", Some("2.7")), NAMESPACE_WEIGHT_KEY, 1);
        assert_eq!(item.weight, 2);

        let item = QuotaItem::from_resource_quota(&quota("q", Some("heavy")), NAMESPACE_WEIGHT_KEY, 1);
        assert_eq!(item.weight, 1);

        let item = QuotaItem::from_resource_quota(&quota("q", None), NAMESPACE_WEIGHT_KEY, 4);
        assert_eq!(item, QuotaItem { name: "q".into(), weight: 4 });
    }
}
