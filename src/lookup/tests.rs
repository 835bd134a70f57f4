use super::*;
use crate::slack::testing::{self as fixtures, MockSlack};

fn channels() -> Vec<Channel> {
    let mut archived = fixtures::channel("C3", "old-stuff");
    archived.is_archived = true;
    vec![
        fixtures::channel("C1", "general"),
        fixtures::channel("C2", "random"),
        archived,
        fixtures::channel("C4", "eng"),
        fixtures::channel("C5", "ops"),
    ]
}

fn users() -> Vec<User> {
    let mut gone = fixtures::user("U3", "carol", "carol@example.com");
    gone.deleted = true;
    vec![
        fixtures::user("U1", "alice", "alice@example.com"),
        fixtures::user("U2", "bob", "bob@example.com"),
        gone,
    ]
}

#[tokio::test]
async fn test_channel_by_name_stops_at_matching_page() {
    let api = MockSlack::new(2).with_channels(channels());
    let cancel = CancellationToken::new();

    let found = channel_by_name(&api, &cancel, "random", true).await.unwrap();
    assert_eq!(found.id, "C2");
    assert_eq!(api.call_count("conversations.list"), 1);

    let found = channel_by_name(&api, &cancel, "ops", true).await.unwrap();
    assert_eq!(found.id, "C5");
    assert_eq!(api.call_count("conversations.list"), 1 + 2);
}

#[tokio::test]
async fn test_archived_channel_hidden_unless_requested() {
    let api = MockSlack::new(2).with_channels(channels());
    let cancel = CancellationToken::new();

    let err = channel(
        &api,
        &cancel,
        &LookupRequest::new(LookupKey::Name("old-stuff".into())),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "channel not found: name \"old-stuff\"");

    let found = channel(
        &api,
        &cancel,
        &LookupRequest::new(LookupKey::Name("old-stuff".into())).include_inactive(true),
    )
    .await
    .unwrap();
    assert_eq!(found.id, "C3");
}

#[tokio::test]
async fn test_channel_by_id_skips_listing() {
    let api = MockSlack::new(2).with_channels(channels());
    let cancel = CancellationToken::new();

    let found = channel(&api, &cancel, &LookupRequest::new(LookupKey::Id("C4".into())))
        .await
        .unwrap();
    assert_eq!(found.name, "eng");
    assert_eq!(api.calls(), vec!["conversations.info".to_string()]);
}

#[tokio::test]
async fn test_channel_by_id_retries_after_rate_limit() {
    let api = MockSlack::new(2)
        .with_channels(channels())
        .rate_limit_once("conversations.info");
    let cancel = CancellationToken::new();

    let found = channel_by_id(&api, &cancel, "C1").await.unwrap();
    assert_eq!(found.name, "general");
    assert_eq!(api.call_count("conversations.info"), 2);
}

#[tokio::test]
async fn test_channel_by_id_missing_is_verbatim_slack_error() {
    let api = MockSlack::new(2).with_channels(channels());
    let cancel = CancellationToken::new();

    let err = channel_by_id(&api, &cancel, "C404").await.unwrap_err();
    assert!(err.is_slack_code("channel_not_found"));
}

#[tokio::test]
async fn test_channel_listing_failure_propagates() {
    let api = MockSlack::new(2)
        .with_channels(channels())
        .fail("conversations.list", "invalid_auth");
    let cancel = CancellationToken::new();

    let err = channel_by_name(&api, &cancel, "general", true)
        .await
        .unwrap_err();
    assert!(err.is_slack_code("invalid_auth"));
}

#[tokio::test]
async fn test_channel_members_collects_every_page() {
    let api = MockSlack::new(2)
        .with_members("C1", &["U1", "U2", "U3", "U4", "U5"])
        .rate_limit_once("conversations.members");
    let cancel = CancellationToken::new();

    let members = channel_members(&api, &cancel, "C1").await.unwrap();
    assert_eq!(members, vec!["U1", "U2", "U3", "U4", "U5"]);
    assert_eq!(api.call_count("conversations.members"), 1 + 3);
}

#[tokio::test]
async fn test_user_by_name_scans_pages() {
    let api = MockSlack::new(1).with_users(users());
    let cancel = CancellationToken::new();

    let found = user(&api, &cancel, &LookupRequest::new(LookupKey::Name("bob".into())))
        .await
        .unwrap();
    assert_eq!(found.id, "U2");
    assert_eq!(api.call_count("users.list"), 2);
}

#[tokio::test]
async fn test_user_by_name_missing_is_not_found_after_last_page() {
    let api = MockSlack::new(1).with_users(users());
    let cancel = CancellationToken::new();

    let err = user_by_name(&api, &cancel, "mallory").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(api.call_count("users.list"), 3);
}

#[tokio::test]
async fn test_user_by_email_active_uses_lookup_endpoint() {
    let api = MockSlack::new(2).with_users(users());
    let cancel = CancellationToken::new();

    let found = user_by_email(&api, &cancel, "alice@example.com", false)
        .await
        .unwrap();
    assert_eq!(found.id, "U1");
    assert_eq!(api.call_count("users.list"), 0);
}

#[tokio::test]
async fn test_user_by_email_deactivated_requires_opt_in() {
    let api = MockSlack::new(2).with_users(users());
    let cancel = CancellationToken::new();

    let err = user_by_email(&api, &cancel, "carol@example.com", false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(api.call_count("users.list"), 0);

    let found = user_by_email(&api, &cancel, "carol@example.com", true)
        .await
        .unwrap();
    assert_eq!(found.id, "U3");
    assert!(found.deleted);
}

#[tokio::test]
async fn test_user_by_email_deactivated_fallback_miss_is_not_found() {
    let api = MockSlack::new(1).with_users(users());
    let cancel = CancellationToken::new();

    let err = user_by_email(&api, &cancel, "mallory@example.com", true)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "user not found: email \"mallory@example.com\"");
    assert_eq!(api.call_count("users.lookupByEmail"), 1);
    assert_eq!(api.call_count("users.list"), 3);
}

#[tokio::test]
async fn test_user_by_email_other_errors_are_not_swallowed() {
    let api = MockSlack::new(2)
        .with_users(users())
        .fail("users.lookupByEmail", "missing_scope");
    let cancel = CancellationToken::new();

    let err = user_by_email(&api, &cancel, "carol@example.com", true)
        .await
        .unwrap_err();
    assert!(err.is_slack_code("missing_scope"));
    assert_eq!(api.call_count("users.list"), 0);
}

#[tokio::test]
async fn test_usergroup_by_id_and_handle() {
    let api = MockSlack::new(2).with_usergroups(vec![
        fixtures::usergroup("S1", "admins", "Team Admins"),
        fixtures::usergroup("S2", "oncall", "On Call"),
    ]);
    let cancel = CancellationToken::new();

    let by_id = usergroup(&api, &cancel, &LookupKey::Id("S2".into()))
        .await
        .unwrap();
    assert_eq!(by_id.handle, "oncall");

    let by_handle = usergroup(&api, &cancel, &LookupKey::Handle("admins".into()))
        .await
        .unwrap();
    assert_eq!(by_handle.id, "S1");

    let err = usergroup(&api, &cancel, &LookupKey::Handle("nobody".into()))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "usergroup not found: handle \"nobody\"");
}

#[tokio::test]
async fn test_unsupported_key_kind_is_not_found() {
    let api = MockSlack::new(2).with_channels(channels());
    let cancel = CancellationToken::new();

    let err = channel(
        &api,
        &cancel,
        &LookupRequest::new(LookupKey::Email("x@example.com".into())),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
    assert!(api.calls().is_empty());
}
