//! Quota-gated features.

use serde::{Deserialize, Serialize};

/// A named, rate- or count-limited capability.
///
/// Closed set: the checker refuses unknown feature strings at the boundary
/// rather than guessing a policy for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Simultaneously active wizards per community (count-based,
    /// `time_window = 0`).
    ActiveWizard,
    /// AI chat messages (rate-based).
    AiChatMessage,
    /// Image generations (rate-based).
    ImageGeneration,
}

impl Feature {
    /// Parses a feature identifier. Unknown identifiers return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "active_wizard" => Some(Feature::ActiveWizard),
            "ai_chat_message" => Some(Feature::AiChatMessage),
            "image_generation" => Some(Feature::ImageGeneration),
            _ => None,
        }
    }

    /// Returns the canonical identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::ActiveWizard => "active_wizard",
            Feature::AiChatMessage => "ai_chat_message",
            Feature::ImageGeneration => "image_generation",
        }
    }

    /// All known features, for configuration validation.
    pub fn all() -> [Feature; 3] {
        [
            Feature::ActiveWizard,
            Feature::AiChatMessage,
            Feature::ImageGeneration,
        ]
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
