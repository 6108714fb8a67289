use super::accounts::state_with_accounts;
use crate::engine::{EngineError, ErrorKind};
use crate::types::{CommentId, EngineRequest, EngineResponse, EngineState, PostId, VoteDirection};

/// Helper function: alice and bob are members of "rust", carol is registered only
fn community() -> EngineState {
    let mut state = state_with_accounts(&["alice", "bob", "carol"]);
    state.create_subreddit("alice", "rust".into()).unwrap();
    state.join_subreddit("bob", "rust").unwrap();
    state
}

/// Tests that posts get sequential ids and logical timestamps
#[test]
fn test_create_post_allocates_ids() {
    let mut state = community();

    let first = state
        .create_post("alice".into(), "rust".into(), "first".into(), false, None)
        .unwrap();
    let second = state
        .create_post("bob".into(), "rust".into(), "second".into(), true, Some(first.clone()))
        .unwrap();

    assert_eq!(first, PostId("post_0".into()));
    assert_eq!(second, PostId("post_1".into()));
    assert_eq!(state.post_counter, 2);
    assert_eq!(state.posts[&first].created_at, 0);
    assert_eq!(state.posts[&second].created_at, 1);
    assert!(state.posts[&second].is_repost);
    assert_eq!(state.posts[&second].original_post_id, Some(first));
}

/// Tests that reposts may reference posts that do not exist
#[test]
fn test_repost_original_is_not_validated() {
    let mut state = community();
    let id = state
        .create_post(
            "alice".into(),
            "rust".into(),
            "again".into(),
            true,
            Some(PostId("post_99".into())),
        )
        .unwrap();
    assert_eq!(state.posts[&id].original_post_id, Some(PostId("post_99".into())));
}

/// Tests that posting requires an existing subreddit and membership
#[test]
fn test_create_post_failures_leave_counter_untouched() {
    let mut state = community();

    let err = state
        .create_post("alice".into(), "golang".into(), "x".into(), false, None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = state
        .create_post("carol".into(), "rust".into(), "x".into(), false, None)
        .unwrap_err();
    assert!(matches!(err, EngineError::NotAMember { .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(state.post_counter, 0);
    assert!(state.posts.is_empty());
}

/// Tests comment creation, nesting and its failure modes
#[test]
fn test_create_comment() {
    let mut state = community();
    let post = state
        .create_post("alice".into(), "rust".into(), "post".into(), false, None)
        .unwrap();

    let top = state
        .create_comment("carol".into(), post.clone(), None, "top".into())
        .expect("Any registered user may comment");
    let nested = state
        .create_comment("bob".into(), post.clone(), Some(top.clone()), "nested".into())
        .unwrap();
    assert_eq!(top, CommentId("comment_0".into()));
    assert_eq!(nested, CommentId("comment_1".into()));
    assert_eq!(state.comments[&nested].parent_comment_id, Some(top));

    let err = state
        .create_comment("bob".into(), PostId("post_7".into()), None, "x".into())
        .unwrap_err();
    assert_eq!(err, EngineError::PostNotFound(PostId("post_7".into())));

    let err = state
        .create_comment("bob".into(), post, Some(CommentId("comment_9".into())), "x".into())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(state.comment_counter, 2, "Failed comments do not consume ids");
}

/// Tests that upvotes and downvotes move counters and the author's karma by one
#[test]
fn test_votes_update_counters_and_karma() {
    let mut state = community();
    let post = state
        .create_post("alice".into(), "rust".into(), "post".into(), false, None)
        .unwrap();
    let comment = state
        .create_comment("bob".into(), post.clone(), None, "comment".into())
        .unwrap();

    state.vote(Some(post.clone()), None, VoteDirection::Up).unwrap();
    assert_eq!(state.posts[&post].upvotes, 1);
    assert_eq!(state.accounts["alice"].karma, 1);

    state.vote(Some(post.clone()), None, VoteDirection::Down).unwrap();
    assert_eq!(state.posts[&post].downvotes, 1);
    assert_eq!(state.accounts["alice"].karma, 0);

    state.vote(None, Some(comment.clone()), VoteDirection::Down).unwrap();
    assert_eq!(state.comments[&comment].downvotes, 1);
    assert_eq!(state.accounts["bob"].karma, -1);
    assert_eq!(state.accounts["alice"].karma, 0, "Only the comment author is affected");
}

/// Tests that self-votes and repeat votes all count
#[test]
fn test_self_and_repeat_votes_count() {
    let mut state = community();
    let post = state
        .create_post("alice".into(), "rust".into(), "post".into(), false, None)
        .unwrap();

    for _ in 0..3 {
        let reply = state.apply(EngineRequest::Upvote {
            username: "alice".into(),
            post_id: Some(post.clone()),
            comment_id: None,
        });
        assert!(matches!(reply, Ok(EngineResponse::Success(_))));
    }
    assert_eq!(state.posts[&post].upvotes, 3);
    assert_eq!(state.accounts["alice"].karma, 3);
}

/// Tests vote target validation
#[test]
fn test_vote_target_validation() {
    let mut state = community();
    let post = state
        .create_post("alice".into(), "rust".into(), "post".into(), false, None)
        .unwrap();

    let err = state.vote(None, None, VoteDirection::Up).unwrap_err();
    assert_eq!(err.to_string(), "Must specify post_id or comment_id");
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = state
        .vote(Some(post.clone()), Some(CommentId("comment_0".into())), VoteDirection::Up)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = state.vote(Some(PostId("post_5".into())), None, VoteDirection::Up).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = state
        .vote(None, Some(CommentId("comment_5".into())), VoteDirection::Down)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(state.posts[&post].upvotes, 0);
    assert_eq!(state.accounts["alice"].karma, 0);
}
