//! Labelling variants — one per taxonomy/data source.
//!
//! A variant bundles everything that differs between runs: the prompt, how the
//! reply is parsed, which columns receive the results and the default policies.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::labelling::parser::ParseRule;
use crate::labelling::prompts::{
    POLITICAL_RELEVANCE_PROMPT, SENTIMENT_PROMPT, TECH_RELEVANCE_PROMPT,
};

const PASSAGE_PLACEHOLDER: &str = "{passage}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Binary politicization label for politics-subreddit posts.
    PoliticalRelevance,
    /// Binary politicization label for tech-subreddit posts.
    TechRelevance,
    /// Neutral / Negative / Positive sentiment for relevant posts.
    Sentiment,
}

/// What to do when a single row's call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the error sentinel for the row and keep going.
    #[value(name = "soft")]
    FailSoft,
    /// Stop the run, persist partial results and exit non-zero.
    #[value(name = "fast")]
    FailFast,
}

/// How result columns are merged into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Discard any prior results and label every row.
    Overwrite,
    /// Keep rows whose label cell is already filled and label the rest.
    Resume,
}

/// Static per-variant settings.
#[derive(Debug, Clone, Copy)]
pub struct VariantProfile {
    pub template: &'static str,
    pub parse_rule: ParseRule,
    pub label_column: &'static str,
    pub rationale_column: &'static str,
    pub default_policy: FailurePolicy,
    pub default_mode: WriteMode,
    /// Column index for the label column in overwrite mode; rationale goes right after.
    /// `None` keeps an existing column in place or appends a new one.
    pub default_insert_at: Option<usize>,
}

impl Variant {
    pub fn profile(self) -> VariantProfile {
        match self {
            Variant::PoliticalRelevance => VariantProfile {
                template: POLITICAL_RELEVANCE_PROMPT,
                parse_rule: ParseRule::Binary,
                label_column: "llm_label",
                rationale_column: "rationale",
                default_policy: FailurePolicy::FailSoft,
                default_mode: WriteMode::Overwrite,
                default_insert_at: Some(11),
            },
            Variant::TechRelevance => VariantProfile {
                template: TECH_RELEVANCE_PROMPT,
                parse_rule: ParseRule::TechBinary,
                label_column: "llm_label",
                rationale_column: "rationales",
                default_policy: FailurePolicy::FailFast,
                default_mode: WriteMode::Resume,
                default_insert_at: None,
            },
            Variant::Sentiment => VariantProfile {
                template: SENTIMENT_PROMPT,
                parse_rule: ParseRule::Sentiment,
                label_column: "llm_sentiment",
                rationale_column: "llm_sentiment_rationale",
                default_policy: FailurePolicy::FailSoft,
                default_mode: WriteMode::Overwrite,
                default_insert_at: None,
            },
        }
    }
}

/// Joins a post's title and selftext into the passage the prompt embeds.
/// Null fields become empty text.
pub fn build_passage(title: Option<&str>, selftext: Option<&str>) -> String {
    format!("{} {}", title.unwrap_or(""), selftext.unwrap_or(""))
}

/// Substitutes `passage` into the template's single placeholder.
pub fn build_prompt(template: &str, passage: &str) -> String {
    template.replacen(PASSAGE_PLACEHOLDER, passage, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Variant; 3] = [
        Variant::PoliticalRelevance,
        Variant::TechRelevance,
        Variant::Sentiment,
    ];

    #[test]
    fn test_every_template_has_exactly_one_placeholder() {
        for variant in ALL {
            assert_eq!(
                variant.profile().template.matches(PASSAGE_PLACEHOLDER).count(),
                1,
                "{variant:?}"
            );
        }
    }

    #[test]
    fn test_build_prompt_embeds_passage_verbatim() {
        let passage = "Elon Musk {braces} and\nnewlines";
        for variant in ALL {
            let prompt = build_prompt(variant.profile().template, passage);
            assert!(prompt.contains(&format!("Passage: {passage}")), "{variant:?}");
            assert!(!prompt.contains(PASSAGE_PLACEHOLDER));
        }
    }

    #[test]
    fn test_passage_placeholder_inside_passage_is_not_expanded_again() {
        let prompt = build_prompt("A {passage} B", "{passage}");
        assert_eq!(prompt, "A {passage} B");
    }

    #[test]
    fn test_build_passage_coerces_nulls() {
        assert_eq!(build_passage(Some("Title"), Some("Body")), "Title Body");
        assert_eq!(build_passage(Some("Title"), None), "Title ");
        assert_eq!(build_passage(None, None), " ");
    }

    #[test]
    fn test_profiles_keep_variant_specific_defaults() {
        let political = Variant::PoliticalRelevance.profile();
        assert_eq!(political.parse_rule, ParseRule::Binary);
        assert_eq!(political.default_policy, FailurePolicy::FailSoft);
        assert_eq!(political.default_insert_at, Some(11));

        let tech = Variant::TechRelevance.profile();
        assert_eq!(tech.parse_rule.miss_label(), "0");
        assert_eq!(tech.default_policy, FailurePolicy::FailFast);
        assert_eq!(tech.default_mode, WriteMode::Resume);
        assert_eq!(tech.rationale_column, "rationales");

        let sentiment = Variant::Sentiment.profile();
        assert_eq!(sentiment.label_column, "llm_sentiment");
        assert_eq!(sentiment.rationale_column, "llm_sentiment_rationale");
    }

    #[test]
    fn test_prompts_mention_their_domain() {
        assert!(POLITICAL_RELEVANCE_PROMPT.contains("politics-oriented subreddits"));
        assert!(TECH_RELEVANCE_PROMPT.contains("tech-oriented subreddits"));
        assert!(SENTIMENT_PROMPT.contains("Sentiment Label: [Neutral / Negative / Positive]"));
    }
}
