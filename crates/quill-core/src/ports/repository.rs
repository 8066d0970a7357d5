use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;

/// Payload for creating a post.
///
/// `title`/`content` are `Option` because the handler only forwards fields the
/// caller actually supplied; the store decides what a missing required field
/// means (for SQL, a not-null violation). `tags: None` means "no tags field at
/// all", which is distinct from `Some(vec![])`.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial update of a post. A `None` field is left untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub active: Option<bool>,
}

impl PostChanges {
    /// A change set that only deactivates the post (soft delete).
    pub fn deactivate() -> Self {
        Self {
            active: Some(false),
            ..Self::default()
        }
    }
}

/// Post store - all reads and writes of posts and their tag associations.
///
/// Tag identity is the store's problem: given a list of names it creates
/// missing tags and links them idempotently.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Create a post. `Ok(None)` means the store completed without producing
    /// a post; callers report that as a creation failure.
    async fn create_post(&self, new_post: NewPost) -> Result<Option<Post>, RepoError>;

    /// Apply the supplied fields to an existing post. When `changes.tags` is
    /// present the post's tag set is replaced wholesale.
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post, RepoError>;

    /// Fetch a post by id, active or not.
    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Fetch every post, active or not. Visibility filtering is the caller's.
    async fn get_all_posts(&self) -> Result<Vec<Post>, RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn save(&self, user: User) -> Result<User, RepoError>;
}
