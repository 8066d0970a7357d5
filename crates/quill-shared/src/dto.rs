//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::Post;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Body of `POST /api/posts`.
///
/// `tags` is one whitespace-separated string; the server splits it. Every
/// field is optional at the wire level - the store decides what a missing
/// required field means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

/// Body of `PATCH /api/posts/{postId}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

/// Wire representation of a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub active: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostData {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            active: post.active,
            tags: post.tags,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Success envelope of the single-post routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub post: PostData,
}

impl From<Post> for PostEnvelope {
    fn from(post: Post) -> Self {
        Self { post: post.into() }
    }
}

/// Success envelope of `GET /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsEnvelope {
    pub posts: Vec<PostData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_data_serializes_camel_case() {
        let post = Post::new(
            Uuid::new_v4(),
            "Hi".to_string(),
            "World".to_string(),
            vec!["x".to_string(), "y".to_string()],
        );
        let json = serde_json::to_value(PostEnvelope::from(post)).unwrap();

        assert_eq!(json["post"]["title"], "Hi");
        assert_eq!(json["post"]["active"], true);
        assert!(json["post"].get("authorId").is_some());
        assert!(json["post"].get("author_id").is_none());
    }

    #[test]
    fn absent_body_fields_deserialize_to_none() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"title":"only"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("only"));
        assert!(req.content.is_none());
        assert!(req.tags.is_none());
    }
}
