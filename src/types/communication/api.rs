use super::{EngineReply, EngineResponse};
use crate::engine::ErrorKind;
use serde_json::{json, Value};

/// Status code and JSON body a request/response layer returns for an engine reply
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

impl ApiReply {
    /// Maps an engine reply onto the wire contract.
    ///
    /// Successful outcomes are 200 with `status: "success"`. A reply timeout is
    /// 504, a stopped engine is 503 and every other engine error is 400, all
    /// with `status: "error"`.
    pub fn from_reply(reply: &EngineReply) -> Self {
        match reply {
            Ok(response) => Self {
                status: 200,
                body: success_body(response),
            },
            Err(e) => {
                let status = match e.kind() {
                    ErrorKind::Timeout => 504,
                    ErrorKind::Unavailable => 503,
                    _ => 400,
                };
                Self {
                    status,
                    body: json!({ "status": "error", "message": e.to_string() }),
                }
            }
        }
    }
}

fn success_body(response: &EngineResponse) -> Value {
    match response {
        EngineResponse::Success(message) => json!({ "status": "success", "message": message }),
        EngineResponse::FeedResult(posts) => json!({ "status": "success", "posts": posts }),
        EngineResponse::MessagesResult(messages) => {
            json!({ "status": "success", "messages": messages })
        }
        EngineResponse::StateResult(state) => json!({ "status": "success", "state": state }),
        EngineResponse::PostIds(ids) => json!({ "status": "success", "ids": ids }),
        EngineResponse::CommentIds(ids) => json!({ "status": "success", "ids": ids }),
        EngineResponse::Usernames(names) => json!({ "status": "success", "usernames": names }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;
    use crate::types::{EngineRequest, Post, PostId};

    #[test]
    fn test_success_maps_to_200_with_message() {
        let reply: EngineReply = Ok(EngineResponse::Success("Account registered: alice".into()));
        let api = ApiReply::from_reply(&reply);
        assert_eq!(api.status, 200);
        assert_eq!(api.body["status"], "success");
        assert_eq!(api.body["message"], "Account registered: alice");
    }

    #[test]
    fn test_feed_carries_posts() {
        let post = Post {
            id: PostId::from_seq(0),
            author: "alice".into(),
            subreddit: "rust".into(),
            content: "hello".into(),
            created_at: 0,
            upvotes: 2,
            downvotes: 1,
            is_repost: false,
            original_post_id: None,
        };
        let api = ApiReply::from_reply(&Ok(EngineResponse::FeedResult(vec![post])));
        assert_eq!(api.status, 200);
        assert_eq!(api.body["posts"][0]["id"], "post_0");
        assert_eq!(api.body["posts"][0]["upvotes"], 2);
    }

    #[test]
    fn test_conflict_maps_to_400() {
        let api = ApiReply::from_reply(&Err(EngineError::UsernameTaken("alice".into())));
        assert_eq!(api.status, 400);
        assert_eq!(api.body["status"], "error");
        assert_eq!(api.body["message"], "Username already exists");
    }

    #[test]
    fn test_timeout_maps_to_504() {
        let api = ApiReply::from_reply(&Err(EngineError::Timeout("GetFeed")));
        assert_eq!(api.status, 504);
        assert_eq!(api.body["status"], "error");
    }

    #[test]
    fn test_stopped_engine_maps_to_503() {
        let api = ApiReply::from_reply(&Err(EngineError::EngineUnavailable));
        assert_eq!(api.status, 503);
        assert_eq!(api.body["status"], "error");
    }

    #[test]
    fn test_request_body_deserializes() {
        let body = r#"{"type":"Upvote","username":"bob","post_id":"post_3"}"#;
        let request: EngineRequest = serde_json::from_str(body).unwrap();
        assert_eq!(
            request,
            EngineRequest::Upvote {
                username: "bob".into(),
                post_id: Some(PostId("post_3".into())),
                comment_id: None,
            }
        );

        let body = r#"{"type":"CreatePost","username":"bob","subreddit":"rust","content":"hi"}"#;
        let request: EngineRequest = serde_json::from_str(body).unwrap();
        assert!(matches!(
            request,
            EngineRequest::CreatePost { is_repost: false, original_post_id: None, .. }
        ));
    }
}
