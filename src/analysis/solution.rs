use super::extract::Section;
use super::format;
use serde::Serialize;

const OVERLOADED_HTML: &str =
    "<div class='text-red-600'>서버과부하로 잠시후 다시 시도해주시기 바랍니다.</div>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

impl Solution {
    pub fn from_reply(reply: &str) -> Self {
        Self {
            html: format::to_html(reply),
            problem_type: Section::ProblemType.extract(reply),
            problem_text: Section::ProblemText.extract(reply),
            answer: Section::Answer.extract(reply),
            confidence: Section::Confidence.extract(reply),
        }
    }

    /// What the caller sees whenever the model could not be used.
    pub fn overloaded() -> Self {
        Self {
            html: OVERLOADED_HTML.to_string(),
            problem_type: None,
            problem_text: None,
            answer: None,
            confidence: None,
        }
    }

    pub fn is_overloaded(&self) -> bool {
        self.html == OVERLOADED_HTML
    }
}
