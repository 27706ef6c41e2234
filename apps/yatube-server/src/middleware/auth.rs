//! Authentication extractors.
//!
//! A request is anonymous unless it carries a valid `Authorization: Bearer`
//! token. Rejecting anonymous callers is left to the services, which answer
//! with `DomainError::AuthRequired`.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};

use yatube_core::domain::UserId;
use yatube_core::ports::{AuthError, TokenClaims};

use crate::state::AppState;

/// The user a valid token identifies.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Optional identity extractor - never fails, an unusable token is anonymous.
///
/// ```ignore
/// async fn follow_index(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
///     state.feeds.follow_feed(viewer.actor(), None).await?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    /// The acting user id, as the services expect it.
    pub fn actor(&self) -> Option<UserId> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<Option<&str>, AuthError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn identify(req: &HttpRequest) -> Result<Option<Identity>, AuthError> {
    let Some(token) = bearer_token(req)? else {
        return Ok(None);
    };

    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken("Server configuration error".to_string()));
    };

    state.tokens().validate_token(token).map(|claims| Some(claims.into()))
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match identify(req) {
            Ok(identity) => ready(Ok(OptionalIdentity(identity))),
            Err(e) => {
                tracing::debug!(error = %e, path = %req.path(), "Treating request as anonymous");
                ready(Ok(OptionalIdentity(None)))
            }
        }
    }
}
