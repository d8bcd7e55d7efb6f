//! Raw passthrough to the completion provider

use crate::core::error::ChatError;
use crate::core::traits::ChatService;
use axum::routing::post;
use axum::{Json, Router};
use di_axum::Inject;
use serde::Deserialize;
use serde_json::Value;

pub fn router() -> Router {
    Router::new().route("/", post(generate))
}

#[derive(Deserialize, Debug)]
pub struct GenerateRequest {
    pub text: String,
}

/// Returns the provider's JSON body unchanged. Nothing is stored.
async fn generate(
    Inject(chat_service): Inject<dyn ChatService>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Value>, ChatError> {
    Ok(Json(chat_service.generate(&request.text).await?))
}
