//! Namespace resource quota records.

use serde::{Deserialize, Serialize};

use super::{ObjectMeta, ResourceList};

/// A resource quota snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceQuota {
    /// Identity; the namespace is the one the quota governs.
    pub metadata: ObjectMeta,
    /// Hard limits.
    pub spec: ResourceQuotaSpec,
}

/// Hard limits of a quota.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceQuotaSpec {
    /// Hard limit per resource name. Also carries the namespace weight.
    pub hard: ResourceList,
}
