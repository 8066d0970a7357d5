use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post owned by exactly one author.
///
/// `active` is the soft-delete flag: inactive posts are hidden from public
/// listings but stay retrievable by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub active: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new, active post.
    pub fn new(author_id: Uuid, title: String, content: String, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            active: true,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `viewer` may see this post in a listing.
    ///
    /// Everyone sees active posts; an authenticated viewer additionally sees
    /// their own inactive posts.
    pub fn visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.active || viewer == Some(self.author_id)
    }

    /// Whether `user_id` owns this post.
    pub fn owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}
