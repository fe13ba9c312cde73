//! Demo business service used by the merchant binary.
//!
//! Plays the role of a paid image generator without calling a real
//! model: the result is a small JSON document acknowledging the prompt.
//! Pricing tiers scale with prompt length.

use crate::business::{BusinessError, BusinessService, ServiceRequirements};
use a2a_x402::scheme::SCHEME_EXACT;

/// Prompt length above which the mid price tier applies.
const MID_TIER_PROMPT_LEN: usize = 100;

/// Prompt length above which the top price tier applies.
const TOP_TIER_PROMPT_LEN: usize = 500;

/// A stand-in image generation service.
#[derive(Debug, Default)]
pub struct ImageService;

impl ImageService {
    /// Creates the demo service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl BusinessService for ImageService {
    async fn execute(&self, prompt: &str) -> Result<String, BusinessError> {
        if prompt.is_empty() {
            return Err("prompt cannot be empty".into());
        }
        let response = serde_json::json!({
            "status": "success",
            "message": "Image generated successfully",
            "prompt": prompt,
        });
        Ok(response.to_string())
    }

    fn service_requirements(&self, prompt: &str) -> ServiceRequirements {
        let price = if prompt.len() > TOP_TIER_PROMPT_LEN {
            "2.0"
        } else if prompt.len() > MID_TIER_PROMPT_LEN {
            "1.5"
        } else {
            "1.0"
        };

        let description = if prompt.chars().count() > 50 {
            let prefix: String = prompt.chars().take(50).collect();
            format!("Generate an AI image: {prefix}...")
        } else {
            "Generate an AI image".to_owned()
        };

        ServiceRequirements {
            price: price.to_owned(),
            resource: "/generate-image".to_owned(),
            description,
            mime_type: "application/json".to_owned(),
            scheme: SCHEME_EXACT.to_owned(),
            max_timeout_seconds: 600,
        }
    }
}
