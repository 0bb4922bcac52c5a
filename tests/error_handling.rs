//! Error handling and edge case tests.

use feedwindow::api::{self, Method, Status};
use feedwindow::{query, Feed, FeedConfig, FeedError, Snapshot};
use std::time::Duration;

// --- Search Errors ---

#[test]
fn test_invalid_pattern_leaves_feed_unchanged() {
    let feed = Feed::default();
    feed.put("a");
    feed.put("b");
    let before = feed.get();

    let result = feed.search("(");
    assert!(matches!(result, Err(FeedError::InvalidPattern(_))));
    assert_eq!(feed.get(), before);
}

#[test]
fn test_query_rejects_bad_pattern_on_empty_snapshot() {
    let result = query("[unclosed", &Snapshot::empty());
    assert!(matches!(result, Err(FeedError::InvalidPattern(_))));
}

#[test]
fn test_errors_are_client_errors() {
    assert!(FeedError::InvalidPattern("x".into()).is_client_error());
    assert!(FeedError::Timeout(Duration::from_secs(1)).is_client_error());
    assert!(FeedError::MissingParameter("q").is_client_error());
    assert!(FeedError::MethodNotAllowed("POST".into()).is_client_error());
    assert!(!FeedError::Serialization("x".into()).is_client_error());
}

// --- Handler Errors ---

#[test]
fn test_wrong_methods() {
    let feed = Feed::default();

    assert_eq!(api::put(&feed, Method::Post, b"x").status, Status::MethodNotAllowed);
    assert_eq!(api::get(&feed, Method::Put).status, Status::MethodNotAllowed);
    assert_eq!(
        api::search(&feed, Method::Delete, Some("x")).status,
        Status::MethodNotAllowed
    );
    assert_eq!(
        api::long_poll(&feed, Method::Other("PATCH".into()), None).status,
        Status::MethodNotAllowed
    );
    assert!(feed.is_empty());
    assert_eq!(feed.subscriber_count(), 0);
}

#[test]
fn test_method_checked_before_parameter() {
    let feed = Feed::default();
    let reply = api::search(&feed, Method::Put, None);
    assert_eq!(reply.status, Status::MethodNotAllowed);
}

#[test]
fn test_missing_query_message() {
    let feed = Feed::default();
    let reply = api::search(&feed, Method::Get, None);
    assert_eq!(reply.status.code(), 400);
    assert_eq!(reply.body, "Missing parameter: q");
}

#[test]
fn test_timeout_reply() {
    let feed = Feed::new(FeedConfig::default().with_long_poll_timeout(Duration::from_millis(10)));
    let reply = api::long_poll(&feed, Method::Get, None);

    assert_eq!(reply.status, Status::RequestTimeout);
    assert!(reply.body.starts_with("Long-poll timed out"));
    assert_eq!(feed.subscriber_count(), 0);
}

// --- Edge Cases ---

#[test]
fn test_empty_value_is_stored() {
    let feed = Feed::default();
    api::put(&feed, Method::Put, b"");
    assert_eq!(feed.get().values(), vec![""]);
}

#[test]
fn test_zero_capacity_keeps_one() {
    let feed = Feed::new(FeedConfig::default().with_capacity(0));
    feed.put("a");
    feed.put("b");
    assert_eq!(feed.get().values(), vec!["b"]);
}
