use serde::{Deserialize, Serialize};

/// Behavioral metadata attached to a review submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewMetadata {
    /// Whether the reviewer's purchase was verified.
    #[serde(default)]
    pub verified: bool,
    /// Age of the reviewer's account, in days.
    #[serde(default)]
    pub account_age_days: u32,
}

/// Predicted review class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Genuine,
    Fake,
}

impl Label {
    /// Returns `true` for [`Label::Fake`].
    pub fn is_fake(&self) -> bool {
        matches!(self, Label::Fake)
    }

    /// Lowercase wire name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Genuine => "genuine",
            Label::Fake => "fake",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier verdict.
///
/// `label` is `fake` iff `p_fake >= 0.5`. `trust_score` follows the
/// historical scoring rule: `1 - p_fake` when the label is `fake`, `p_fake`
/// otherwise. Under that rule the score never exceeds 0.5; it is kept as a
/// compatibility contract (see DESIGN.md) rather than re-derived as
/// confidence in the returned label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    pub trust_score: f32,
    pub p_fake: f32,
}
