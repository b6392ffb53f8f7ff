//! Verifica dei token JWT emessi dall'identity provider esterno

use crate::core::{AppError, AppState, SessionContext};
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use jsonwebtoken::{DecodingKey, TokenData, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i32,
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(
    jwt_token: &str,
    secret: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    debug!("Decoding JWT token");
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| {
        debug!("JWT token decoded successfully for user: {}", data.claims.id);
        data
    })
    .map_err(|e| {
        error!("Failed to decode JWT token: {:?}", e);
        e
    })
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let auth_header = match req.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::forbidden("Empty header is not allowed")
        })?,
        None => {
            warn!("Missing authorization header");
            return Err(AppError::forbidden("Please add the JWT token to the header"));
        }
    };

    let mut header = auth_header.split_whitespace();
    let token = match (header.next(), header.next()) {
        (Some(bearer), Some(token)) if bearer.eq_ignore_ascii_case("bearer") => token,
        _ => {
            warn!("Malformed authorization header");
            return Err(AppError::unauthorized("Expected a Bearer token"));
        }
    };

    let token_data = decode_jwt(token, &state.jwt_secret).map_err(|_| {
        warn!("Failed to decode JWT token");
        AppError::unauthorized("Unable to decode token")
    })?;

    // Fetch the user details from the backend
    let current_user = match state.backend.users.read(&token_data.claims.id).await? {
        Some(user) => {
            info!("User authenticated: {}", user.user_id);
            user
        }
        None => {
            warn!("User not found in backend: {}", token_data.claims.id);
            return Err(AppError::unauthorized("You are not an authorized user"));
        }
    };

    req.extensions_mut()
        .insert(SessionContext::from(&current_user));
    Ok(next.run(req).await)
}
