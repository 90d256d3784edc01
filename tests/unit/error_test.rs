//! Tests for error types

use gang_scheduler_core::core::{
    FitError, HeapError, JobError, NodeError, ResourceError, SchedulerError,
};

#[test]
fn test_resource_error_messages() {
    let err = ResourceError::UnknownResource("nvidia.com/cpu".to_string());
    assert_eq!(format!("{}", err), "unknown resource nvidia.com/cpu");

    let err = ResourceError::InsufficientResource {
        available: "cpu 1.000, memory 0".to_string(),
        requested: "cpu 2.000, memory 0".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "resource is not sufficient to do operation: <cpu 1.000, memory 0> sub <cpu 2.000, memory 0>"
    );
}

#[test]
fn test_heap_error_messages() {
    assert_eq!(format!("{}", HeapError::Closed), "heap is closed");
    assert_eq!(format!("{}", HeapError::ObjectNotFound), "object not found");
    assert_eq!(
        format!("{}", HeapError::ObjectAlreadyRemoved),
        "object was removed from heap data"
    );
}

#[test]
fn test_job_error_message() {
    let err = JobError::FailedToFindTask {
        task_namespace: "c1".to_string(),
        task_name: "p1".to_string(),
        job_namespace: "c1".to_string(),
        job_name: "pg1".to_string(),
    };
    assert_eq!(format!("{}", err), "failed to find task <c1/p1> in job <c1/pg1>");
}

#[test]
fn test_node_error_message() {
    let err = NodeError::NodeNotReady("n1".to_string());
    assert_eq!(format!("{}", err), "selected node <n1> NotReady");
}

#[test]
fn test_fit_error_is_its_message() {
    let err = FitError {
        message: "pod group is not ready, minAvailable 1".to_string(),
    };
    assert_eq!(format!("{}", err), "pod group is not ready, minAvailable 1");
}

#[test]
fn test_scheduler_error_is_transparent() {
    let err: SchedulerError = HeapError::Closed.into();
    assert_eq!(format!("{}", err), "heap is closed");

    let err: SchedulerError = NodeError::AddTaskFailed("dup".to_string()).into();
    assert_eq!(format!("{}", err), "add task failed: dup");

    let err = SchedulerError::InvalidConfig("bad".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: bad");
}
