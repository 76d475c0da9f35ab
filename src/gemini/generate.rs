use crate::errors::ProviderError;
use crate::logging::{DEFAULT, info, o};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl Response {
    /// Concatenated text parts of the first candidate.
    pub fn into_text(self) -> Result<String, ProviderError> {
        let block_reason = self
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(ProviderError::EmptyReply(
                block_reason.unwrap_or_else(|| "no candidates".to_string()),
            ));
        };
        let Some(content) = candidate.content else {
            return Err(ProviderError::EmptyReply(
                candidate
                    .finish_reason
                    .unwrap_or_else(|| "empty candidate".to_string()),
            ));
        };
        // an empty text is still a finished reply
        Ok(content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect())
    }
}

pub async fn generate(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    request: &Request,
) -> Result<Response, ProviderError> {
    let log = DEFAULT.new(o!("function" => "gemini::generate"));
    info!(log, "Generating");
    let response = client
        .post(url)
        .header("x-goog-api-key", api_key)
        .json(request)
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        info!(log, "error status"; "status" => %status);
        return Err(ProviderError::Status { status, body });
    }
    let response: Response = response.json().await?;
    Ok(response)
}
