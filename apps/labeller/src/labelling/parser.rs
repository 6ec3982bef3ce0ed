//! Response parser — pulls a label and a rationale out of free-text model output.
//!
//! Parsing never fails. A response without the expected marker degrades to the
//! rule's miss label, which differs per variant and is kept that way on purpose.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label written when a call fails or a response cannot be parsed.
pub const ERROR_LABEL: &str = "error";

static BINARY_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Label:\s*([01])").expect("valid binary label regex"));
static RATIONALE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Rationale:\s*(.*)").expect("valid rationale regex"));
static SENTIMENT_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Sentiment Label:\s*(Neutral|Negative|Positive)")
        .expect("valid sentiment label regex")
});

/// How a variant reads its model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseRule {
    /// `Label: 0|1`; miss → `error`; rationale is every non-label line.
    Binary,
    /// `Label: 0|1`; miss → `0`; rationale is everything after `Rationale:`.
    TechBinary,
    /// `Sentiment Label: Neutral|Negative|Positive`; miss → `error`.
    Sentiment,
}

/// Label and rationale extracted from one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: String,
    pub rationale: String,
}

impl Classification {
    pub fn new(label: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            rationale: rationale.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.label == ERROR_LABEL
    }
}

impl ParseRule {
    /// Label used when the response carries no recognisable marker.
    pub fn miss_label(self) -> &'static str {
        match self {
            ParseRule::Binary | ParseRule::Sentiment => ERROR_LABEL,
            ParseRule::TechBinary => "0",
        }
    }

    pub fn parse(self, output: &str) -> Classification {
        let output = output.trim();
        match self {
            ParseRule::Binary => Classification {
                label: capture(&BINARY_LABEL_RE, output)
                    .unwrap_or_else(|| self.miss_label().to_string()),
                rationale: strip_lines(output, |line| {
                    line.trim().to_lowercase().starts_with("label:")
                }),
            },
            ParseRule::TechBinary => Classification {
                label: capture(&BINARY_LABEL_RE, output)
                    .unwrap_or_else(|| self.miss_label().to_string()),
                rationale: capture(&RATIONALE_RE, output)
                    .map(|r| r.trim().to_string())
                    .unwrap_or_default(),
            },
            ParseRule::Sentiment => Classification {
                label: capture(&SENTIMENT_LABEL_RE, output)
                    .map(|s| capitalize(&s))
                    .unwrap_or_else(|| self.miss_label().to_string()),
                rationale: strip_lines(output, |line| {
                    line.to_lowercase().starts_with("sentiment label")
                })
                .replace("Rationale:", "")
                .trim()
                .to_string(),
            },
        }
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Drops every line matching `is_marker`, rejoins the rest and trims.
fn strip_lines(text: &str, is_marker: impl Fn(&str) -> bool) -> String {
    text.lines()
        .filter(|line| !is_marker(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// `nEGATIVE` → `Negative`.
fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
