//! Classification of resource names (native, extended, hugepages, volumes).

use std::sync::LazyLock;

use regex::Regex;

/// Prefix the quota system prepends to request-scoped resource names.
pub const DEFAULT_RESOURCE_REQUESTS_PREFIX: &str = "requests.";
/// Namespace owned by the cluster itself.
pub const RESOURCE_DEFAULT_NAMESPACE_PREFIX: &str = "kubernetes.io/";
/// Prefix of huge page resources, e.g. `hugepages-2Mi`.
pub const RESOURCE_HUGE_PAGES_PREFIX: &str = "hugepages-";
/// Prefix of attachable volume limits.
pub const RESOURCE_ATTACHABLE_VOLUMES_PREFIX: &str = "attachable-volumes-";

const QUALIFIED_NAME_MAX_LENGTH: usize = 63;

static QUALIFIED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").expect("static pattern compiles")
});

/// True if `name` lives in the `kubernetes.io/` namespace.
#[must_use]
pub fn is_prefixed_native_resource_name(name: &str) -> bool {
    name.contains(RESOURCE_DEFAULT_NAMESPACE_PREFIX)
}

/// True if `name` is unprefixed or lives in the `kubernetes.io/` namespace.
#[must_use]
pub fn is_native_resource_name(name: &str) -> bool {
    !name.contains('/') || is_prefixed_native_resource_name(name)
}

/// True if `name` is a huge page resource.
#[must_use]
pub fn is_huge_page_resource_name(name: &str) -> bool {
    name.starts_with(RESOURCE_HUGE_PAGES_PREFIX)
}

/// True if `name` is an attachable volume resource.
#[must_use]
pub fn is_attachable_volume_resource_name(name: &str) -> bool {
    name.starts_with(RESOURCE_ATTACHABLE_VOLUMES_PREFIX)
}

/// True if `name` is an optionally prefixed qualified name
/// (`[prefix/]name`, name at most 63 characters).
#[must_use]
pub fn is_qualified_name(name: &str) -> bool {
    let local = match name.split_once('/') {
        None => name,
        Some((prefix, local)) => {
            if prefix.is_empty() || local.contains('/') {
                return false;
            }
            local
        }
    };

    !local.is_empty() && local.len() <= QUALIFIED_NAME_MAX_LENGTH && QUALIFIED_NAME.is_match(local)
}

/// True if `name` is a vendor-provided extended resource such as `nvidia.com/gpu`.
#[must_use]
pub fn is_extended_resource_name(name: &str) -> bool {
    if is_native_resource_name(name) || name.starts_with(DEFAULT_RESOURCE_REQUESTS_PREFIX) {
        return false;
    }
    is_qualified_name(&format!("{DEFAULT_RESOURCE_REQUESTS_PREFIX}{name}"))
}

/// True if `name` is tracked as a scalar dimension of a resource vector.
#[must_use]
pub fn is_scalar_resource_name(name: &str) -> bool {
    is_extended_resource_name(name)
        || is_huge_page_resource_name(name)
        || is_prefixed_native_resource_name(name)
        || is_attachable_volume_resource_name(name)
}
