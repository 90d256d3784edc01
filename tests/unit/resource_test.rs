//! Tests for the resource algebra through the public API

use gang_scheduler_core::core::{Quantity, Resource, ResourceError};

fn res(list: &[(&str, &str)]) -> Resource {
    Resource::from_resource_list(list.iter().copied())
}

#[test]
fn test_from_resource_list_scales_cpu_and_scalars() {
    let r = res(&[("cpu", "2"), ("memory", "1Gi"), ("nvidia.com/gpu", "1"), ("pods", "10")]);
    assert_eq!(r.milli_cpu, Quantity::from(2000_i64));
    assert_eq!(r.memory, Quantity::from(1_073_741_824_i64));
    assert_eq!(r.get("nvidia.com/gpu").unwrap(), Quantity::from(1000_i64));
    assert_eq!(r.max_task_num, Some(10));
}

#[test]
fn test_try_from_resource_list_rejects_bad_quantity() {
    let result = Resource::try_from_resource_list([("cpu", "two")]);
    assert!(matches!(result, Err(ResourceError::InvalidQuantity(_))));
}

#[test]
fn test_get_unknown_scalar() {
    let r = res(&[("cpu", "1")]);
    assert!(matches!(r.get("example.com/foo"), Err(ResourceError::UnknownResource(_))));
}

#[test]
fn test_small_differences_are_tolerated() {
    let a = res(&[("cpu", "1"), ("memory", "1Gi")]);
    let b = res(&[("cpu", "1005m"), ("memory", "1Gi")]);
    assert_eq!(a, b);
    assert!(b.less_equal(&a));
    assert!(!b.less_equal_strict(&a));
}

#[test]
fn test_checked_sub_refuses_to_go_negative() {
    let small = res(&[("cpu", "1"), ("memory", "1Gi")]);
    let large = res(&[("cpu", "2"), ("memory", "1Gi")]);
    assert!(matches!(
        small.checked_sub(&large),
        Err(ResourceError::InsufficientResource { .. })
    ));
    let left = large.checked_sub(&small).unwrap();
    assert_eq!(left, res(&[("cpu", "1")]));
}

#[test]
fn test_add_then_sub_is_identity() {
    let base = res(&[("cpu", "4"), ("memory", "8Gi"), ("nvidia.com/gpu", "2")]);
    let delta = res(&[("cpu", "500m"), ("memory", "512Mi"), ("nvidia.com/gpu", "1")]);
    let sum = &base + &delta;
    assert_eq!(&sum - &delta, base);
}

#[test]
fn test_set_max_resource_takes_dimension_maxima() {
    let mut a = res(&[("cpu", "4"), ("memory", "1Gi")]);
    let b = res(&[("cpu", "1"), ("memory", "2Gi"), ("nvidia.com/gpu", "1")]);
    a.set_max_resource(&b);
    assert_eq!(a, res(&[("cpu", "4"), ("memory", "2Gi"), ("nvidia.com/gpu", "1")]));
}

#[test]
fn test_display() {
    let r = res(&[("cpu", "1500m"), ("memory", "1Ki")]);
    assert_eq!(r.to_string(), "cpu 1500.000, memory 1024");
}
