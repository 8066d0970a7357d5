//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{NewPost, PostChanges, PostStore, UserRepository};

use super::dedup_names;
use super::entity::{post, post_tag, tag, user};

fn map_db_err(err: DbErr) -> RepoError {
    let msg = err.to_string();
    if msg.contains("duplicate") || msg.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(msg)
    }
}

/// Find-or-create a tag by name.
async fn ensure_tag<C: ConnectionTrait>(conn: &C, name: &str) -> Result<tag::Model, RepoError> {
    let existing = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(map_db_err)?;

    if let Some(found) = existing {
        return Ok(found);
    }

    tag::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)
}

/// Link `names` to the post, creating missing tags. Callers clear old links
/// first when replacing; `names` is expected to be deduplicated.
async fn link_tags<C: ConnectionTrait>(
    conn: &C,
    post_id: Uuid,
    names: &[String],
) -> Result<Vec<String>, RepoError> {
    let mut linked = Vec::with_capacity(names.len());
    for name in names {
        let tag = ensure_tag(conn, name).await?;
        post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag.id),
        }
        .insert(conn)
        .await
        .map_err(map_db_err)?;
        linked.push(tag.name);
    }
    Ok(linked)
}

/// PostgreSQL post store.
pub struct PostgresPostStore {
    db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn create_post(&self, new_post: NewPost) -> Result<Option<Post>, RepoError> {
        let (Some(title), Some(content)) = (new_post.title, new_post.content) else {
            return Err(RepoError::Constraint(
                "posts require a title and content".to_string(),
            ));
        };
        let names = dedup_names(&new_post.tags.unwrap_or_default());
        let now = chrono::Utc::now();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = post::ActiveModel {
            id: Set(Uuid::new_v4()),
            author_id: Set(new_post.author_id),
            title: Set(title),
            content: Set(content),
            active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let tags = link_tags(&txn, model.id, &names).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = %model.id, tag_count = tags.len(), "Created post");
        Ok(Some(model.into_post(tags)))
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = post::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut pending = model.into_active_model();
        if let Some(title) = changes.title {
            pending.title = Set(title);
        }
        if let Some(content) = changes.content {
            pending.content = Set(content);
        }
        if let Some(flag) = changes.active {
            pending.active = Set(flag);
        }
        pending.updated_at = Set(chrono::Utc::now().into());

        let model = pending.update(&txn).await.map_err(map_db_err)?;

        // `tags: None` leaves links untouched; `Some` replaces them wholesale.
        let tags = match changes.tags {
            Some(names) => {
                post_tag::Entity::delete_many()
                    .filter(post_tag::Column::PostId.eq(model.id))
                    .exec(&txn)
                    .await
                    .map_err(map_db_err)?;
                link_tags(&txn, model.id, &dedup_names(&names)).await?
            }
            None => model
                .find_related(tag::Entity)
                .all(&txn)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|t| t.name)
                .collect(),
        };

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = %model.id, "Updated post");
        Ok(model.into_post(tags))
    }

    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(model) = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let tags = model
            .find_related(tag::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|t| t.name)
            .collect();

        Ok(Some(model.into_post(tags)))
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>, RepoError> {
        let rows = post::Entity::find()
            .order_by_asc(post::Column::CreatedAt)
            .find_with_related(tag::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|(model, tags)| {
                let names = tags.into_iter().map(|t| t.name).collect();
                model.into_post(names)
            })
            .collect())
    }
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }
}
