//! Sentiment label set and its display metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gray used for neutral and unrecognized labels
pub const FALLBACK_COLOR: &str = "#6B7280";

/// Fixed set of labels the classifier produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Chart color for this label
    pub fn color(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "#10B981",
            SentimentLabel::Negative => "#EF4444",
            SentimentLabel::Neutral => FALLBACK_COLOR,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!("Unknown sentiment label: {}", other)),
        }
    }
}

/// Chart color for a stored label, gray when the label is not recognized
pub fn color_for(label: &str) -> &'static str {
    label
        .parse::<SentimentLabel>()
        .map(|l| l.color())
        .unwrap_or(FALLBACK_COLOR)
}

/// Uppercase the first character, leave the rest unchanged
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_label_colors() {
        assert_eq!(color_for("positive"), "#10B981");
        assert_eq!(color_for("negative"), "#EF4444");
        assert_eq!(color_for("neutral"), "#6B7280");
    }

    #[test]
    fn test_unknown_label_is_gray() {
        assert_eq!(color_for("mixed"), FALLBACK_COLOR);
        assert_eq!(color_for("Positive"), FALLBACK_COLOR);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("positive"), "Positive");
        assert_eq!(capitalize("nEUTRAL"), "NEUTRAL");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("é"), "É");
    }

    #[test]
    fn test_label_round_trip_through_str() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
        ] {
            assert_eq!(label.as_str().parse::<SentimentLabel>(), Ok(label));
        }
        assert!("angry".parse::<SentimentLabel>().is_err());
    }
}
