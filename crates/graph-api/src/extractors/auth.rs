//! Authentication extractor
//!
//! Verifies the bearer token from the Authorization header and yields the
//! caller's actor id.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use graph_core::ActorId;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Actor id from the token's subject
    pub actor_id: ActorId,
}

impl AuthUser {
    /// Create a new AuthUser
    pub fn new(actor_id: ActorId) -> Self {
        Self { actor_id }
    }
}

fn verify(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let actor_id = state.identity().verify(token).map_err(|e| {
        tracing::warn!(error = %e, "Rejected access token");
        ApiError::App(e)
    })?;

    Ok(AuthUser::new(actor_id))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        verify(&AppState::from_ref(state), bearer.token())
    }
}

/// Optional authenticated caller
///
/// `None` if no authorization header is present; a present but invalid
/// token is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    /// The caller's actor id, if authenticated
    pub fn actor_id(&self) -> Option<ActorId> {
        self.0.as_ref().map(|user| user.actor_id.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let user = verify(&AppState::from_ref(state), bearer.token())?;
                Ok(OptionalAuthUser(Some(user)))
            }
            Err(_) => Ok(OptionalAuthUser(None)),
        }
    }
}
