//! User registration and login handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::{AuthError, PasswordService, TokenService};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/users/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.username.is_empty() {
        return Err(ApiError::Validation("Username is required".to_string()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // Check if user already exists
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(ApiError::UserExists);
    }

    // Hash password
    let password_hash = password_service.hash(&req.password)?;

    // Create user. A concurrent register can still lose the race to the
    // unique constraint; report that as the same conflict.
    let user = User::new(req.username, password_hash);
    let saved_user = state.users.save(user).await.map_err(|e| match e {
        RepoError::Constraint(_) => ApiError::UserExists,
        other => ApiError::Store(other),
    })?;

    let token = token_service.generate_token(saved_user.id, &saved_user.username)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// POST /api/users/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let valid = password_service.verify(&req.password, &user.password_hash)?;
    if !valid {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = token_service.generate_token(user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// GET /api/users/me - Protected route
pub async fn me(identity: Identity) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse {
        id: identity.user_id.to_string(),
        username: identity.username,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use std::sync::Arc;

    use quill_core::ports::{PasswordService, TokenService};
    use quill_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};
    use quill_shared::ErrorBody;
    use quill_shared::dto::AuthResponse;

    use crate::state::AppState;

    fn services() -> (Arc<dyn TokenService>, Arc<dyn PasswordService>) {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        (tokens, passwords)
    }

    macro_rules! test_app {
        ($state:expr) => {{
            let (tokens, passwords) = services();
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(web::Data::new(tokens))
                    .app_data(web::Data::new(passwords))
                    .configure(crate::handlers::configure_routes),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn register_login_me_roundtrip() {
        let app = test_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(serde_json::json!({"username": "sam", "password": "secure-pass"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let auth: AuthResponse = test::read_body_json(resp).await;
        assert_eq!(auth.token_type, "Bearer");

        let req = test::TestRequest::get()
            .uri("/api/users/me")
            .insert_header(("Authorization", format!("Bearer {}", auth.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["username"], "sam");
    }

    #[actix_web::test]
    async fn duplicate_username_is_a_conflict() {
        let app = test_app!(AppState::in_memory());

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let req = test::TestRequest::post()
                .uri("/api/users/register")
                .set_json(serde_json::json!({"username": "sam", "password": "secure-pass"}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);

            if expected == StatusCode::CONFLICT {
                let body: ErrorBody = test::read_body_json(resp).await;
                assert_eq!(body.name, "UserExistsError");
            }
        }
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let app = test_app!(AppState::in_memory());

        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(serde_json::json!({"username": "sam", "password": "secure-pass"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(serde_json::json!({"username": "sam", "password": "wrong-pass"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
