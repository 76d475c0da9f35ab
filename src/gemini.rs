mod generate;

use crate::analysis::GenerativeModel;
use crate::config;
use crate::errors::ProviderError;
use crate::logging::{DEFAULT, info, o, warn};
use crate::payload::ImagePayload;
use std::future::Future;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub fn get_base_url() -> String {
    config::get("GEMINI_BASE_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string())
}

pub struct Client {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl Client {
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Self {
        let client = reqwest::Client::new();
        Self {
            api_key,
            model,
            base_url,
            client,
        }
    }

    pub fn new_default() -> Self {
        let log = DEFAULT.new(o!("function" => "gemini::Client::new_default"));
        let api_key = match config::get("GEMINI_API_KEY") {
            Ok(key) => Some(key),
            Err(err) => {
                warn!(log, "GEMINI_API_KEY not set, every analysis will fail"; "error" => %err);
                None
            }
        };
        let model = config::get("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = get_base_url();
        info!(log, "client configured"; "model" => &model, "base_url" => &base_url);
        Self::new(api_key, model, base_url)
    }

    #[cfg(test)]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    pub async fn generate(&self, prompt: &str, image: &ImagePayload) -> Result<String, ProviderError> {
        let log = DEFAULT.new(o!(
            "function" => "gemini::Client::generate",
            "model" => self.model.clone(),
        ));
        let Some(api_key) = self.api_key.as_deref() else {
            info!(log, "no credential");
            return Err(ProviderError::MissingCredential);
        };
        let request = generate::Request {
            contents: vec![generate::Content {
                parts: vec![
                    generate::Part::Text {
                        text: prompt.to_string(),
                    },
                    generate::Part::InlineData {
                        inline_data: generate::InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: image.data().to_string(),
                        },
                    },
                ],
            }],
        };
        let response = generate::generate(&self.client, &self.url(), api_key, &request).await?;
        response.into_text()
    }
}

impl GenerativeModel for Client {
    fn generate_content(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send {
        self.generate(prompt, image)
    }
}

#[cfg(test)]
mod tests;
