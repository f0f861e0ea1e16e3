//! Account handlers: sign-up, sign-in, profile, password, preferences

use crate::session::{bearer_token, AuthSession};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use lectern_core::error::AuthError;
use lectern_core::prefs::Preferences;
use lectern_core::types::Profile;
use serde::{Deserialize, Serialize};

/// Map auth failures to the transient-notification style the clients show:
/// a status plus the provider's message
fn auth_error(e: AuthError) -> (StatusCode, String) {
    let status = match &e {
        AuthError::InvalidCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
        AuthError::EmailInUse(_) => StatusCode::CONFLICT,
        AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
        AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub uid: String,
    pub email: String,
}

/// Register an account and sign it in
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), (StatusCode, String)> {
    let session = state
        .auth
        .sign_up(&request.email, &request.password)
        .await
        .map_err(auth_error)?;

    let profile = Profile::new(
        &session.user.uid,
        &session.user.email,
        &request.full_name,
    );
    if let Err(e) = state.profiles.put(&profile).await {
        // The account exists; a missing profile document reads back as
        // empty, the same degraded state the original app tolerated
        tracing::error!(uid = %session.user.uid, "Failed to write profile: {}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token: session.token,
            uid: session.user.uid,
            email: session.user.email,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign in with email and password
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let session = state
        .auth
        .sign_in(&request.email, &request.password)
        .await
        .map_err(auth_error)?;

    Ok(Json(SessionResponse {
        token: session.token,
        uid: session.user.uid,
        email: session.user.email,
    }))
}

#[derive(Debug, Deserialize)]
pub struct FederatedSignInRequest {
    /// Identity provider name, e.g. "google"
    pub provider: String,
    /// The provider's stable subject id
    pub subject: String,
    pub email: String,
}

/// Sign in via a federated identity, creating the account on first contact
pub async fn sign_in_federated(
    State(state): State<AppState>,
    Json(request): Json<FederatedSignInRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let session = state
        .auth
        .sign_in_federated(&request.provider, &request.subject, &request.email)
        .await
        .map_err(auth_error)?;

    Ok(Json(SessionResponse {
        token: session.token,
        uid: session.user.uid,
        email: session.user.email,
    }))
}

/// End the calling session
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, String)> {
    let token = bearer_token(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "Missing bearer token".to_string()))?;
    state.auth.sign_out(token).await.map_err(auth_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Change the calling account's password
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let token = bearer_token(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "Missing bearer token".to_string()))?;
    state
        .auth
        .change_password(token, &request.current_password, &request.new_password)
        .await
        .map_err(auth_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub uid: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The calling user's account and profile
pub async fn get_account(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
) -> Result<Json<AccountResponse>, (StatusCode, String)> {
    // A missing profile document is not an error; the account fields stand
    // on their own
    let profile = state.profiles.get(&user.uid).await.unwrap_or_else(|e| {
        tracing::warn!(uid = %user.uid, "Profile fetch failed: {}", e);
        None
    });

    Ok(Json(AccountResponse {
        uid: user.uid,
        email: user.email,
        full_name: profile.as_ref().map(|p| p.full_name.clone()),
        created_at: profile.map(|p| p.created_at),
    }))
}

/// The calling user's profile document
pub async fn get_profile(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
) -> Result<Json<Profile>, (StatusCode, String)> {
    let profile = state
        .profiles
        .get(&user.uid)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "No profile saved".to_string()))?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
}

/// Update the calling user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut profile = state
        .profiles
        .get(&user.uid)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .unwrap_or_else(|| Profile::new(&user.uid, &user.email, ""));

    profile.full_name = request.full_name;
    state
        .profiles
        .put(&profile)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete the calling account and every document the user owns
pub async fn delete_account(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, String)> {
    let token = bearer_token(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "Missing bearer token".to_string()))?;
    let uid = state.auth.delete_account(token).await.map_err(auth_error)?;

    state
        .profiles
        .delete_user_data(&uid)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// The calling user's preferences (defaults when none are saved)
pub async fn get_preferences(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
) -> Result<Json<Preferences>, (StatusCode, String)> {
    let prefs = state
        .preferences
        .get(&user.uid)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(prefs))
}

/// Replace the calling user's preferences
pub async fn put_preferences(
    State(state): State<AppState>,
    AuthSession(user): AuthSession,
    Json(prefs): Json<Preferences>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .preferences
        .put(&user.uid, &prefs)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}
