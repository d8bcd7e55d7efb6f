use async_trait::async_trait;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use std::str::FromStr;
use uuid::Uuid;

pub mod error;
pub mod generate;
pub mod sessions;

const X_USER_ID: &str = "X-User-ID";

/// All JSON endpoints. The caller attaches the service provider.
pub fn router() -> Router {
    Router::new()
        .nest("/sessions", sessions::router())
        .nest("/generate", generate::router())
}

/// The calling user, taken from the `X-User-ID` header.
///
/// No header means an anonymous caller (`None`); a header that isn't a UUID is rejected.
#[derive(Debug)]
pub struct ExtractUser(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for ExtractUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, (StatusCode, &'static str)> {
        if let Some(user_id) = parts.headers.get(X_USER_ID) {
            let user_id = user_id
                .to_str()
                .map_err(|_| (StatusCode::BAD_REQUEST, "invalid user id"))?;
            let user_id = Uuid::from_str(user_id.trim())
                .map_err(|_| (StatusCode::BAD_REQUEST, "invalid user id"))?;
            Ok(ExtractUser(Some(user_id)))
        } else {
            Ok(ExtractUser(None))
        }
    }
}
