use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        repo::User,
        services::{
            hash_password, is_valid_email, is_valid_username, verify_password, AuthUser, JwtKeys,
            MIN_PASSWORD_LEN,
        },
    },
    db::is_unique_violation,
    state::AppState,
};

type ApiError = (StatusCode, String);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn internal(context: &str, e: impl std::fmt::Display) -> ApiError {
    error!(error = %e, "{context}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
}

fn already_registered() -> ApiError {
    (
        StatusCode::CONFLICT,
        "Username or email already registered".into(),
    )
}

/// A concurrent registration can pass `is_taken` and still lose on the
/// unique index; that loser gets the same 409.
fn create_failure(e: anyhow::Error) -> ApiError {
    if is_unique_violation(&e) {
        warn!("username or email registered concurrently");
        already_registered()
    } else {
        internal("create user failed", e)
    }
}

fn issue_tokens(state: &AppState, user: User) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let (access_token, refresh_token) = keys
        .sign_pair(user.id)
        .map_err(|e| internal("jwt sign failed", e))?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer",
        expires_in: keys.access_ttl.as_secs(),
        user: user.into(),
    }))
}

/// Normalizes and checks a registration payload.
pub(crate) fn validate_registration(payload: &mut RegisterRequest) -> Result<(), ApiError> {
    payload.username = payload.username.trim().to_lowercase();
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_username(&payload.username) {
        return Err((StatusCode::BAD_REQUEST, "Invalid username".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if let Err(rejection) = validate_registration(&mut payload) {
        warn!(username = %payload.username, reason = %rejection.1, "registration rejected");
        return Err(rejection);
    }

    let taken = User::is_taken(&state.db, &payload.username, &payload.email)
        .await
        .map_err(|e| internal("is_taken failed", e))?;
    if taken {
        warn!(username = %payload.username, "username or email already registered");
        return Err(already_registered());
    }

    let hash = hash_password(&payload.password).map_err(|e| internal("hash_password failed", e))?;
    let user = User::create(&state.db, &payload.username, &payload.email, &hash)
        .await
        .map_err(create_failure)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    issue_tokens(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let login = payload.login.trim().to_lowercase();
    let invalid = || (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string());

    let user = match User::find_by_login(&state.db, &login).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(login = %login, "login unknown user");
            return Err(invalid());
        }
        Err(e) => return Err(internal("find_by_login failed", e)),
    };

    let ok = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| internal("verify_password failed", e))?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "user logged in");
    issue_tokens(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let claims = JwtKeys::from_ref(&state)
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user = load_user(&state, claims.sub).await?;
    issue_tokens(&state, user)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(user.into()))
}

async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    match User::find_by_id(&state.db, user_id).await {
        Ok(Some(u)) => Ok(u),
        Ok(None) => {
            warn!(%user_id, "token for unknown user");
            Err((StatusCode::UNAUTHORIZED, "User not found".into()))
        }
        Err(e) => Err(internal("find_by_id failed", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn registration_is_normalized() {
        let mut p = payload("  FridgeOwner ", " Cook@Example.COM ", "long-enough");
        validate_registration(&mut p).expect("valid payload");
        assert_eq!(p.username, "fridgeowner");
        assert_eq!(p.email, "cook@example.com");
    }

    #[test]
    fn registration_rejects_bad_fields() {
        for mut p in [
            payload("x", "cook@example.com", "long-enough"),
            payload("cook", "nope", "long-enough"),
            payload("cook", "cook@example.com", "short"),
        ] {
            let (status, _) = validate_registration(&mut p).unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn token_response_reports_access_lifetime() {
        let state = AppState::fake();
        let user = User {
            id: Uuid::new_v4(),
            username: "cook".into(),
            email: "cook@example.com".into(),
            password_hash: String::new(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let Json(res) = issue_tokens(&state, user).expect("tokens issued");
        assert_eq!(res.token_type, "Bearer");
        assert_eq!(res.expires_in, state.config.jwt.ttl_minutes as u64 * 60);
        assert_ne!(res.access_token, res.refresh_token);
    }

    #[test]
    fn losing_a_registration_race_is_a_conflict() {
        let (status, _) = create_failure(crate::db::unique_violation("insert user"));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = create_failure(anyhow::anyhow!("connection reset"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn public_user_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "cook".into(),
            email: "cook@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));

        let public: PublicUser = user.into();
        let json = serde_json::to_string(&public).unwrap();
        assert!(json.contains("cook@example.com"));
        assert!(json.contains("\"username\":\"cook\""));
    }
}
