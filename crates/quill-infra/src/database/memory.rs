//! In-memory repository implementations.
//!
//! Used when `DATABASE_URL` is not configured, and as the backing store for
//! handler tests. Semantics mirror the PostgreSQL adapter: required fields,
//! tag deduplication, wholesale tag replacement.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{NewPost, PostChanges, PostStore, UserRepository};

use super::dedup_names;

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create_post(&self, new_post: NewPost) -> Result<Option<Post>, RepoError> {
        let (Some(title), Some(content)) = (new_post.title, new_post.content) else {
            return Err(RepoError::Constraint(
                "posts require a title and content".to_string(),
            ));
        };
        let tags = dedup_names(&new_post.tags.unwrap_or_default());

        let post = Post::new(new_post.author_id, title, content, tags);
        self.posts.write().await.insert(post.id, post.clone());
        Ok(Some(post))
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(tags) = changes.tags {
            post.tags = dedup_names(&tags);
        }
        if let Some(flag) = changes.active {
            post.active = flag;
        }
        post.updated_at = chrono::Utc::now();

        Ok(post.clone())
    }

    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>, RepoError> {
        let mut all: Vec<Post> = self.posts.read().await.values().cloned().collect();
        all.sort_by_key(|p| p.created_at);
        Ok(all)
    }
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username && u.id != user.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}
