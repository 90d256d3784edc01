//! Tests for the keyed heap through the public API

use std::time::Duration;

use gang_scheduler_core::core::HeapError;
use gang_scheduler_core::infra::Heap;

#[derive(Debug, Clone, PartialEq)]
struct Job {
    name: String,
    priority: i32,
}

fn job(name: &str, priority: i32) -> Job {
    Job {
        name: name.to_string(),
        priority,
    }
}

fn heap() -> Heap<Job> {
    Heap::new(|j: &Job| j.name.clone(), |a: &Job, b: &Job| a.priority > b.priority)
}

#[test]
fn test_pop_returns_highest_priority_first() {
    let heap = heap();
    heap.bulk_add([job("low", 1), job("high", 10), job("mid", 5)]).unwrap();

    let order: Vec<String> = (0..3).map(|_| heap.pop().unwrap().name).collect();
    assert_eq!(order, ["high", "mid", "low"]);
    assert!(heap.is_empty());
}

#[test]
fn test_update_reorders_existing_key() {
    let heap = heap();
    heap.add(job("a", 1)).unwrap();
    heap.add(job("b", 2)).unwrap();
    heap.update(job("a", 3)).unwrap();

    assert_eq!(heap.len(), 2);
    assert_eq!(heap.peek(), Some(job("a", 3)));
}

#[test]
fn test_add_if_not_present_keeps_newer_object() {
    let heap = heap();
    heap.add(job("a", 7)).unwrap();
    heap.add_if_not_present(job("a", 1)).unwrap();
    assert_eq!(heap.get_by_key("a"), Some(job("a", 7)));
}

#[test]
fn test_delete() {
    let heap = heap();
    heap.add(job("a", 1)).unwrap();

    assert_eq!(heap.delete(&job("a", 0)).unwrap(), job("a", 1));
    assert_eq!(heap.delete(&job("a", 0)), Err(HeapError::ObjectNotFound));
}

#[test]
fn test_closed_heap_refuses_adds_but_drains() {
    let heap = heap();
    heap.add(job("a", 1)).unwrap();
    heap.close();

    assert!(heap.is_closed());
    assert_eq!(heap.add(job("b", 2)), Err(HeapError::Closed));
    assert_eq!(heap.pop().unwrap(), job("a", 1));
    assert_eq!(heap.pop(), Err(HeapError::Closed));
}

#[test]
fn test_pop_timeout_on_empty_heap() {
    let heap = heap();
    assert_eq!(heap.pop_timeout(Duration::from_millis(20)), Err(HeapError::Timeout));
}

#[test]
fn test_list_keys() {
    let heap = heap();
    heap.bulk_add([job("x", 1), job("y", 2)]).unwrap();

    let mut keys = heap.list_keys();
    keys.sort();
    assert_eq!(keys, ["x", "y"]);
    assert_eq!(heap.list().len(), 2);
}
