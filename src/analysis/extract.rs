use once_cell::sync::Lazy;
use regex::Regex;

/// Labelled sections the prompt asks the model to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    ProblemType,
    ProblemText,
    Answer,
    Confidence,
}

fn heading_regex(heading: &str) -> Regex {
    Regex::new(&format!(r"## {}\s*\n", regex::escape(heading))).expect("valid heading pattern")
}

static PROBLEM_TYPE: Lazy<Regex> = Lazy::new(|| heading_regex(Section::ProblemType.heading()));
static PROBLEM_TEXT: Lazy<Regex> = Lazy::new(|| heading_regex(Section::ProblemText.heading()));
static ANSWER: Lazy<Regex> = Lazy::new(|| heading_regex(Section::Answer.heading()));
static CONFIDENCE: Lazy<Regex> = Lazy::new(|| heading_regex(Section::Confidence.heading()));

impl Section {
    pub const ALL: [Section; 4] = [
        Section::ProblemType,
        Section::ProblemText,
        Section::Answer,
        Section::Confidence,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            Section::ProblemType => "문제 유형",
            Section::ProblemText => "문제 내용",
            Section::Answer => "정답",
            Section::Confidence => "신뢰도",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            Section::ProblemType => &PROBLEM_TYPE,
            Section::ProblemText => &PROBLEM_TEXT,
            Section::Answer => &ANSWER,
            Section::Confidence => &CONFIDENCE,
        }
    }

    /// Text between this section's heading and the next `\n##` (or the end
    /// of the reply), trimmed. `None` when the heading is not present.
    pub fn extract(&self, reply: &str) -> Option<String> {
        let found = self.regex().find(reply)?;
        let rest = &reply[found.end()..];
        let end = rest.find("\n##").unwrap_or(rest.len());
        Some(rest[..end].trim().to_string())
    }
}
