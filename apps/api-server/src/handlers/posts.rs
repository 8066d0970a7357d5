//! Post CRUD handlers.
//!
//! All four routes share two conventions: ownership (only the author may
//! mutate or delete a post) and tag parsing (tags arrive as one
//! whitespace-separated string and are forwarded as a list, or omitted).

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::PostError;
use quill_core::domain::parse_tag_names;
use quill_core::ports::{NewPost, PostChanges};
use quill_shared::dto::{CreatePostRequest, PostEnvelope, PostsEnvelope, UpdatePostRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::ApiResult;
use crate::state::AppState;

/// Treat empty strings as absent, so the store payload only ever carries
/// fields the caller meaningfully supplied.
fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a raw tags string into a list, or `None` when the tags field should
/// be omitted from the store payload entirely (empty ≠ omitted).
fn supplied_tags(raw: Option<&str>) -> Option<Vec<String>> {
    let names = parse_tag_names(raw?);
    (!names.is_empty()).then_some(names)
}

/// POST /api/posts
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();

    let new_post = NewPost {
        author_id: identity.user_id,
        title: supplied(req.title),
        content: supplied(req.content),
        tags: supplied_tags(req.tags.as_deref()),
    };

    // A store that completes without producing a post is a failure, not a 2xx.
    let post = state
        .posts
        .create_post(new_post)
        .await?
        .ok_or(PostError::CreationFailed)?;

    Ok(HttpResponse::Ok().json(PostEnvelope::from(post)))
}

/// PATCH /api/posts/{postId}
pub async fn update_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> ApiResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    let existing = state
        .posts
        .get_post_by_id(post_id)
        .await?
        .ok_or(PostError::NotFound)?;

    if !existing.owned_by(identity.user_id) {
        return Err(PostError::UnauthorizedUpdate.into());
    }

    let changes = PostChanges {
        title: supplied(req.title),
        content: supplied(req.content),
        tags: supplied_tags(req.tags.as_deref()),
        active: None,
    };

    let updated = state.posts.update_post(post_id, changes).await?;
    Ok(HttpResponse::Ok().json(PostEnvelope::from(updated)))
}

/// DELETE /api/posts/{postId}
///
/// Soft delete: the post is deactivated, never removed.
pub async fn delete_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let post_id = path.into_inner();

    match state.posts.get_post_by_id(post_id).await? {
        Some(post) if post.owned_by(identity.user_id) => {
            let updated = state
                .posts
                .update_post(post.id, PostChanges::deactivate())
                .await?;
            Ok(HttpResponse::Ok().json(PostEnvelope::from(updated)))
        }
        Some(_) => Err(PostError::UnauthorizedDelete.into()),
        None => Err(PostError::NotFound.into()),
    }
}

/// GET /api/posts
///
/// Everyone sees active posts; an authenticated viewer additionally sees
/// their own inactive posts.
pub async fn list_posts(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
) -> ApiResult<HttpResponse> {
    let viewer = identity.0.map(|i| i.user_id);

    let posts = state
        .posts
        .get_all_posts()
        .await?
        .into_iter()
        .filter(|post| post.visible_to(viewer))
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(PostsEnvelope { posts }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use std::sync::Arc;

    use quill_core::ports::TokenService;
    use quill_infra::{JwtConfig, JwtTokenService};
    use quill_shared::ErrorBody;

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }))
    }

    fn bearer(tokens: &Arc<dyn TokenService>, user_id: Uuid, username: &str) -> (&'static str, String) {
        let token = tokens.generate_token(user_id, username).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    macro_rules! test_app {
        ($state:expr, $tokens:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(web::Data::new($tokens))
                    .configure(crate::handlers::configure_routes),
            )
            .await
        };
    }

    async fn seed_post(
        state: &AppState,
        author_id: Uuid,
        title: &str,
        tags: Option<&str>,
    ) -> quill_core::domain::Post {
        state
            .posts
            .create_post(NewPost {
                author_id,
                title: Some(title.to_string()),
                content: Some("Content".to_string()),
                tags: supplied_tags(tags),
            })
            .await
            .unwrap()
            .unwrap()
    }

    // `use actix_web::test` above shadows the built-in `#[test]` attribute,
    // so name it explicitly: this is a plain sync test, no runtime needed.
    #[core::prelude::v1::test]
    fn empty_tags_are_omitted_not_sent_empty() {
        assert_eq!(supplied_tags(None), None);
        assert_eq!(supplied_tags(Some("")), None);
        assert_eq!(supplied_tags(Some("   ")), None);
        assert_eq!(
            supplied_tags(Some("a b")),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[actix_web::test]
    async fn create_post_wraps_the_created_post() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let user_id = Uuid::new_v4();
        let app = test_app!(state.clone(), tokens.clone());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&tokens, user_id, "sam"))
            .set_json(serde_json::json!({
                "title": "Hi",
                "content": "World",
                "tags": "x y"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["post"]["title"], "Hi");
        assert_eq!(body["post"]["content"], "World");
        assert_eq!(body["post"]["tags"], serde_json::json!(["x", "y"]));
        assert_eq!(body["post"]["authorId"], user_id.to_string());
        assert_eq!(body["post"]["active"], true);
    }

    #[actix_web::test]
    async fn create_post_requires_authentication() {
        let state = AppState::in_memory();
        let app = test_app!(state, token_service());

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(serde_json::json!({"title": "Hi", "content": "World"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.name, "MissingAuthError");
    }

    #[actix_web::test]
    async fn partial_update_only_touches_supplied_fields() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let owner = Uuid::new_v4();
        let app = test_app!(state.clone(), tokens.clone());
        let post = seed_post(&state, owner, "Original", Some("x y")).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(bearer(&tokens, owner, "sam"))
            .set_json(serde_json::json!({"title": "Renamed"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["post"]["title"], "Renamed");
        assert_eq!(body["post"]["content"], "Content");
        assert_eq!(body["post"]["tags"], serde_json::json!(["x", "y"]));
    }

    #[actix_web::test]
    async fn update_by_non_owner_is_rejected_without_mutation() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let app = test_app!(state.clone(), tokens.clone());
        let post = seed_post(&state, owner, "Original", None).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(bearer(&tokens, intruder, "mallory"))
            .set_json(serde_json::json!({"title": "Hijacked"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.name, "UnauthorizedUserError");
        assert_eq!(body.message, "You cannot update a post that is not yours");

        let unchanged = state.posts.get_post_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "Original");
    }

    #[actix_web::test]
    async fn update_of_missing_post_is_not_found() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let app = test_app!(state, tokens.clone());

        let req = test::TestRequest::patch()
            .uri(&format!("/api/posts/{}", Uuid::new_v4()))
            .insert_header(bearer(&tokens, Uuid::new_v4(), "sam"))
            .set_json(serde_json::json!({"title": "Renamed"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.name, "PostNotFoundError");
        assert_eq!(body.message, "That post does not exist");
    }

    #[actix_web::test]
    async fn delete_by_owner_deactivates_the_post() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let owner = Uuid::new_v4();
        let app = test_app!(state.clone(), tokens.clone());
        let post = seed_post(&state, owner, "Mine", None).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(bearer(&tokens, owner, "sam"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["post"]["active"], false);

        // Soft delete: still retrievable by id.
        assert!(state.posts.get_post_by_id(post.id).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn delete_by_non_owner_is_rejected() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let app = test_app!(state.clone(), tokens.clone());
        let post = seed_post(&state, owner, "Mine", None).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", post.id))
            .insert_header(bearer(&tokens, intruder, "mallory"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.name, "UnauthorizedUserError");
        assert_eq!(body.message, "You cannot delete a post which is not yours");

        let unchanged = state.posts.get_post_by_id(post.id).await.unwrap().unwrap();
        assert!(unchanged.active);
    }

    #[actix_web::test]
    async fn delete_of_missing_post_is_not_found() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let app = test_app!(state, tokens.clone());

        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/{}", Uuid::new_v4()))
            .insert_header(bearer(&tokens, Uuid::new_v4(), "sam"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.name, "PostNotFoundError");
        assert_eq!(body.message, "That post does not exist");
    }

    #[actix_web::test]
    async fn listing_filters_inactive_posts_by_viewer() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let app = test_app!(state.clone(), tokens.clone());

        seed_post(&state, alice, "Alice active", None).await;
        let hidden = seed_post(&state, alice, "Alice hidden", None).await;
        let bobs_hidden = seed_post(&state, bob, "Bob hidden", None).await;
        for id in [hidden.id, bobs_hidden.id] {
            state
                .posts
                .update_post(id, PostChanges::deactivate())
                .await
                .unwrap();
        }

        // Anonymous viewers see exactly the active subset.
        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        let titles: Vec<&str> = body["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Alice active"]);

        // Alice additionally sees her own inactive post, never Bob's. Order
        // is compared sorted since equal creation times are unordered.
        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(bearer(&tokens, alice, "alice"))
            .to_request();
        let body: serde_json::Value =
            test::read_body_json(test::call_service(&app, req).await).await;
        let mut titles: Vec<&str> = body["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["Alice active", "Alice hidden"]);
    }
}
