//! Keyword-based sentiment classification.
//!
//! A [`SentimentClassifier`] owns an ordered list of [`SentimentRule`]s. The
//! first rule whose pattern matches anywhere in the text decides the label;
//! text that matches no rule is [`Sentiment::Neutral`]. Rule order is the
//! tie-break, so a text carrying both positive and negative keywords gets the
//! label of whichever rule comes first.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Sentiment label attached to every stored review.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Reference keyword stems, checked top to bottom.
const REFERENCE_RULES: &[(Sentiment, &str)] = &[
    (Sentiment::Positive, r"хорош|люблю"),
    (Sentiment::Negative, r"плохо|ненавиж"),
];

/// One `(label, pattern)` pair. Patterns are compiled case-insensitively.
#[derive(Debug, Clone)]
pub struct SentimentRule {
    label: Sentiment,
    pattern: Regex,
}

impl SentimentRule {
    pub fn new(label: Sentiment, pattern: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { label, pattern })
    }

    pub fn label(&self) -> Sentiment {
        self.label
    }

    fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Ordered rule table. Cheap to share behind an `Arc`; holds no mutable state.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    rules: Vec<SentimentRule>,
}

impl SentimentClassifier {
    pub fn new(rules: Vec<SentimentRule>) -> Self {
        Self { rules }
    }

    /// The stock rule set: positive stems first, then negative ones.
    pub fn reference() -> Self {
        let rules = REFERENCE_RULES
            .iter()
            .map(|(label, pattern)| {
                SentimentRule::new(*label, pattern).expect("reference sentiment pattern")
            })
            .collect();
        Self::new(rules)
    }

    pub fn rules(&self) -> &[SentimentRule] {
        &self.rules
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(SentimentRule::label)
            .unwrap_or(Sentiment::Neutral)
    }
}
