//! Rewrites the markdown-like markup of a model reply into an HTML fragment.
//!
//! The rewrite is an ordered list of [`Rule`]s applied one after another to
//! the whole text. Order matters: numbered items must see their `**bold**`
//! span before the generic bold rule consumes it.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

enum Replacement {
    Template(&'static str),
    With(fn(&Captures) -> String),
}

pub struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    fn template(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid format rule"),
            replacement: Replacement::Template(template),
        }
    }

    fn with(name: &'static str, pattern: &str, replace: fn(&Captures) -> String) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid format rule"),
            replacement: Replacement::With(replace),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match &self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(text, *template),
            Replacement::With(replace) => self.pattern.replace_all(text, *replace),
        }
    }
}

fn numbered_item(caps: &Captures) -> String {
    let emphasized = caps[2].replace("**", "");
    format!(
        "<div class=\"my-2\">\n  <span class=\"font-medium\">{}</span>\n  <span class=\"font-bold text-blue-600\">{}</span>\n  <span>{}</span>\n</div>",
        &caps[1], emphasized, &caps[3]
    )
}

pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::template(
            "heading",
            r"(?mR)^#{2,3}\s+(.*?)$",
            r#"<h3 class="font-bold text-lg mt-4 mb-2">${1}</h3>"#,
        ),
        Rule::with(
            "numbered_item",
            r"(?mR)^[0-9]+\.\s+(.+?)(\*\*.*?\*\*)(.+?)$",
            numbered_item,
        ),
        Rule::template("bold", r"\*\*(.*?)\*\*", r#"<span class="font-bold">${1}</span>"#),
        Rule::template("divider", r"(?mR)^-{3,}$", r#"<hr class="my-4 border-gray-300" />"#),
        Rule::template(
            "callout",
            r"(?mR)^\[(.*?)\]$",
            r#"<div class="bg-gray-100 p-2 rounded my-2 italic">${1}</div>"#,
        ),
    ]
});

pub fn rule(name: &str) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.name() == name)
}

pub fn to_html(reply: &str) -> String {
    RULES
        .iter()
        .fold(reply.to_string(), |text, rule| rule.apply(&text).into_owned())
}
