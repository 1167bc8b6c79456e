use axum::{
    extract::{Query, State},
    Form, Json,
};

use crate::error::{AppError, Result};
use crate::models::{TokenRequest, TokenResponse};
use crate::services::AuthService;
use crate::AppState;

/// Issue an access token
/// POST /token  (form body or query string: username, password)
/// The token fields are the top-level response body, not wrapped in `ApiResponse`.
pub async fn token(
    State(state): State<AppState>,
    Query(query): Query<TokenRequest>,
    form: Option<Form<TokenRequest>>,
) -> Result<Json<TokenResponse>> {
    let form = form.map(|Form(f)| f);
    let (form_username, form_password) = match form {
        Some(f) => (f.username, f.password),
        None => (None, None),
    };

    // Registration stores usernames trimmed
    let username = form_username.or(query.username).map(|u| u.trim().to_string());
    let password = form_password.or(query.password);

    let (username, password) = match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return Err(AppError::BadRequest(
                "Invalid username or password".to_string(),
            ))
        }
    };

    let response = AuthService::issue_token(&state.db, &state.config, &username, &password).await?;
    Ok(Json(response))
}
