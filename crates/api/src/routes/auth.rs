//! Authentication routes for register, login and logout.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{error, info};

use crate::{AppState, ApiError, ApiResult, middleware::BEARER_COOKIE};
use goldbook_core::auth::{
    PasswordError, hash_password, normalize_email, validate_new_password, verify_password,
};
use goldbook_db::AdminRepository;
use goldbook_shared::AppError;
use goldbook_shared::auth::{AdminInfo, LoginRequest, LoginResponse, RegisterRequest};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid email or password")
}

fn password_error(err: PasswordError) -> ApiError {
    match err {
        PasswordError::TooShort(_) => ApiError::validation(err.to_string()),
        other => {
            error!(error = %other, "Password hashing error");
            ApiError::internal(other.to_string())
        }
    }
}

fn validate_registration(payload: &RegisterRequest) -> ApiResult<String> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name must not be empty"));
    }
    let email = normalize_email(&payload.email);
    if !email.contains('@') {
        return Err(ApiError::validation("email is not valid"));
    }
    validate_new_password(&payload.password).map_err(password_error)?;
    Ok(email)
}

/// POST /auth/register - Register a new admin.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AdminInfo>)> {
    let email = validate_registration(&payload)?;
    let repo = AdminRepository::new((*state.db).clone());

    if repo.email_exists(&email).await? {
        return Err(AppError::Conflict("email is already registered".to_string()).into());
    }

    let password_hash = hash_password(&payload.password).map_err(password_error)?;
    let admin = repo
        .create(payload.name.trim(), &email, &password_hash)
        .await?;

    info!(admin_id = %admin.id, "Admin registered");

    Ok((
        StatusCode::CREATED,
        Json(AdminInfo {
            id: admin.id,
            name: admin.name,
            email: admin.email,
        }),
    ))
}

/// POST /auth/login - Authenticate and issue an access token.
///
/// The token is returned in the body and set as an HttpOnly cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let email = normalize_email(&payload.email);
    let repo = AdminRepository::new((*state.db).clone());

    let Some(credentials) = repo.find_credentials(&email).await? else {
        info!("Login attempt for unknown email");
        return Err(invalid_credentials());
    };

    if !verify_password(&payload.password, &credentials.password_hash).map_err(password_error)? {
        info!(admin_id = %credentials.admin.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    let admin = credentials.admin;
    let access_token = state
        .jwt_service
        .generate_access_token(admin.id)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            ApiError::internal(e.to_string())
        })?;

    info!(admin_id = %admin.id, "Admin logged in");

    let cookie = Cookie::build((BEARER_COOKIE, access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            admin: AdminInfo {
                id: admin.id,
                name: admin.name,
                email: admin.email,
            },
            access_token,
            expires_in: state.jwt_service.access_token_expires_in(),
        }),
    ))
}

/// POST /auth/logout - Clear the token cookie.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::build((BEARER_COOKIE, ""))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    (jar.add(cookie), StatusCode::NO_CONTENT)
}
