use reddit_engine::{
    types::{constants, ApiReply, EngineRequest},
    utils::logging,
    Engine, EngineNode, ErrorKind,
};
use std::time::Duration;

/// Tests the documented account and membership scenarios through the public handle
#[tokio::test]
async fn test_accounts_and_membership() {
    logging::init_logging();
    let (engine, _join) = EngineNode::spawn();
    let engine = engine.with_timeout(constants::SETUP_TIMEOUT);

    engine.register_account("alice").await.expect("Failed to register alice");
    let err = engine.register_account("alice").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(engine.get_all_usernames().await.unwrap(), vec!["alice".to_string()]);

    let err = engine.create_subreddit("ghost", "rust").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(engine.get_state().await.unwrap().subreddits.is_empty());

    engine.register_account(constants::ADMIN_USERNAME).await.unwrap();
    engine.create_subreddit(constants::ADMIN_USERNAME, "rust").await.unwrap();
    let before = engine.get_state().await.unwrap();
    engine.join_subreddit("alice", "rust").await.unwrap();
    engine.leave_subreddit("alice", "rust").await.unwrap();
    let after = engine.get_state().await.unwrap();
    assert_eq!(before.subreddits["rust"], after.subreddits["rust"]);
    assert_eq!(before.accounts["alice"], after.accounts["alice"]);
}

/// Tests that votes from any user move the author's karma
#[tokio::test]
async fn test_votes_from_other_users() {
    let (engine, _join) = EngineNode::spawn();
    let engine = engine.with_timeout(Duration::from_secs(1));
    for user in ["alice", "bob"] {
        engine.register_account(user).await.unwrap();
    }
    engine.create_subreddit("alice", "rust").await.unwrap();
    engine.create_post("alice", "rust", "hello", false, None).await.unwrap();
    let post_id = engine.get_all_post_ids().await.unwrap().remove(0);

    engine.upvote("bob", Some(post_id.clone()), None).await.unwrap();
    engine.upvote("alice", Some(post_id.clone()), None).await.unwrap();
    engine.downvote("bob", Some(post_id.clone()), None).await.unwrap();

    let state = engine.get_state().await.unwrap();
    assert_eq!(state.posts[&post_id].upvotes, 2);
    assert_eq!(state.posts[&post_id].downvotes, 1);
    assert_eq!(state.accounts["alice"].karma, 1);
    assert_eq!(state.accounts["bob"].karma, 0);
}

/// Tests that engine replies map onto the wire contract
#[tokio::test]
async fn test_replies_map_to_wire_contract() {
    let (engine, _join) = EngineNode::spawn();
    let engine = engine.with_timeout(constants::API_TIMEOUT);

    let body = r#"{"type":"RegisterAccount","username":"alice"}"#;
    let request: EngineRequest = serde_json::from_str(body).unwrap();
    let first = ApiReply::from_reply(&engine.request(request.clone()).await);
    assert_eq!(first.status, 200);
    assert_eq!(first.body["status"], "success");

    let second = ApiReply::from_reply(&engine.request(request).await);
    assert_eq!(second.status, 400);
    assert_eq!(second.body["message"], "Username already exists");

    let vote = EngineRequest::Upvote {
        username: "alice".into(),
        post_id: None,
        comment_id: None,
    };
    let reply = ApiReply::from_reply(&engine.request(vote).await);
    assert_eq!(reply.status, 400);
    assert_eq!(reply.body["message"], "Must specify post_id or comment_id");
}
