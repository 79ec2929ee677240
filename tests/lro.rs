use std::time::Duration;

use webapp_traffic::arm::lro::{OperationStatus, PollTarget, poll_target, retry_after};

#[test]
fn async_operation_header_wins() {
    let target = poll_target(201, Some("https://op/1"), Some("https://loc/1"));
    assert_eq!(target, Some(PollTarget::AsyncOperation("https://op/1".into())));
}

#[test]
fn location_used_when_no_async_header() {
    let target = poll_target(202, None, Some("https://loc/1"));
    assert_eq!(target, Some(PollTarget::Location("https://loc/1".into())));
    assert_eq!(target.unwrap().url(), "https://loc/1");
}

#[test]
fn blank_headers_are_ignored() {
    assert_eq!(
        poll_target(202, Some("  "), Some("https://loc/1")),
        Some(PollTarget::Location("https://loc/1".into()))
    );
    assert_eq!(poll_target(202, Some(""), None), None);
}

#[test]
fn completed_responses_need_no_polling() {
    assert_eq!(poll_target(200, Some("https://op/1"), None), None);
    assert_eq!(poll_target(204, None, Some("https://loc/1")), None);
}

#[test]
fn parse_terminal_statuses() {
    assert_eq!(OperationStatus::parse("Succeeded"), OperationStatus::Succeeded);
    assert_eq!(OperationStatus::parse("failed"), OperationStatus::Failed);
    assert_eq!(OperationStatus::parse("Canceled"), OperationStatus::Canceled);
    assert_eq!(OperationStatus::parse("Cancelled"), OperationStatus::Canceled);
    assert!(OperationStatus::parse("SUCCEEDED").is_terminal());
}

#[test]
fn parse_running_statuses() {
    for s in ["InProgress", "Running", "Accepted", "Creating", "Deleting"] {
        let status = OperationStatus::parse(s);
        assert_eq!(status, OperationStatus::InProgress, "{s}");
        assert!(!status.is_terminal());
    }
}

#[test]
fn unknown_status_is_not_terminal() {
    let status = OperationStatus::parse("Provisioning");
    assert_eq!(status, OperationStatus::Other("Provisioning".into()));
    assert!(!status.is_terminal());
    assert_eq!(status.as_str(), "Provisioning");
}

#[test]
fn retry_after_seconds() {
    let default = Duration::from_secs(5);
    assert_eq!(retry_after(Some("10"), default), Duration::from_secs(10));
    assert_eq!(retry_after(Some(" 0 "), default), Duration::ZERO);
}

#[test]
fn retry_after_falls_back_to_default() {
    let default = Duration::from_secs(5);
    assert_eq!(retry_after(None, default), default);
    assert_eq!(retry_after(Some("soon"), default), default);
    assert_eq!(
        retry_after(Some("Wed, 21 Oct 2015 07:28:00 GMT"), default),
        default
    );
}
