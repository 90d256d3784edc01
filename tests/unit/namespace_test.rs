//! Tests for namespace weight tracking

use gang_scheduler_core::core::{NamespaceCollection, QuotaItem};
use gang_scheduler_core::model::{ObjectMeta, ResourceQuota, ResourceQuotaSpec};

fn quota(name: &str, weight: Option<&str>) -> ResourceQuota {
    ResourceQuota {
        metadata: ObjectMeta::named("team-a", name),
        spec: ResourceQuotaSpec {
            hard: weight
                .map(|w| ("volcano.sh/namespace.weight".to_string(), w.to_string()))
                .into_iter()
                .collect(),
        },
    }
}

#[test]
fn test_highest_quota_weight_wins() {
    let collection = NamespaceCollection::new("team-a");
    collection.update(&quota("q1", Some("3"))).unwrap();
    collection.update(&quota("q2", Some("8"))).unwrap();
    assert_eq!(collection.snapshot().weight, 8);

    collection.delete(&quota("q2", None));
    assert_eq!(collection.snapshot().weight, 3);
}

#[test]
fn test_default_weight_without_quotas() {
    let collection = NamespaceCollection::new("team-b");
    let info = collection.snapshot();
    assert_eq!(info.name, "team-b");
    assert_eq!(info.weight, 1);
}

#[test]
fn test_invalid_weight_falls_back_to_default() {
    let item = QuotaItem::from_resource_quota(&quota("q1", Some("heavy")), "volcano.sh/namespace.weight", 4);
    assert_eq!(item.weight, 4);

    let item = QuotaItem::from_resource_quota(&quota("q1", Some("2.9")), "volcano.sh/namespace.weight", 4);
    assert_eq!(item.weight, 2);
}

#[test]
fn test_deleting_unknown_quota_is_ignored() {
    let collection = NamespaceCollection::new("team-c");
    collection.delete(&quota("missing", None));
    assert_eq!(collection.snapshot().weight, 1);
}
