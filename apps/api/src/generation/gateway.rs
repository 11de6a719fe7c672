//! Generation Gateway: the single call-and-parse boundary to the model.
//!
//! `AppState` holds an `Arc<dyn RecipeGateway>`: `LlmClient` in production,
//! a scripted double in tests.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::generation::compiler::GenerationRequest;
use crate::generation::prompts::image_prompt;
use crate::llm_client::{GeneratedImage, LlmClient, LlmError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    /// The provider rejected the credential. The user should reconfigure it.
    #[error("generation rejected by provider configuration: {0}")]
    Configuration(String),

    /// Network, provider, empty or unparsable answer. The user may try again.
    #[error("generation failed: {0}")]
    Failure(String),
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        if e.is_credential_error() {
            GenerationError::Configuration(e.to_string())
        } else {
            GenerationError::Failure(e.to_string())
        }
    }
}

#[async_trait]
pub trait RecipeGateway: Send + Sync {
    /// One attempt, no retries. Returns the raw, untrusted payload.
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError>;

    /// Best-effort dish photo. Every failure resolves to `None`.
    async fn generate_image(&self, title: &str, ingredients: &[String]) -> Option<GeneratedImage>;
}

#[async_trait]
impl RecipeGateway for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError> {
        self.call_json(
            &request.prompt,
            &request.system_instruction,
            &request.response_schema,
        )
        .await
        .map_err(|e| {
            error!("Recipe generation call failed: {e}");
            GenerationError::from(e)
        })
    }

    async fn generate_image(&self, title: &str, ingredients: &[String]) -> Option<GeneratedImage> {
        match self.call_image(&image_prompt(title, ingredients)).await {
            Ok(Some(image)) => Some(image),
            Ok(None) => {
                warn!("Image model returned no image for '{title}'");
                None
            }
            Err(e) => {
                warn!("Image generation failed for '{title}': {e}");
                None
            }
        }
    }
}
