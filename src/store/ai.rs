//! Active AI model preference.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{OpsdeckError, Result};

pub const AI_SETTINGS_FILE: &str = "ai-settings.json";

/// Models offered by the assistant affordances. Purely a preference; no
/// inference happens anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AiModel {
    #[default]
    #[serde(rename = "OpenAI GPT-4o")]
    Gpt4o,
    #[serde(rename = "Anthropic Claude 3")]
    Claude3,
    #[serde(rename = "Google Gemini Pro")]
    GeminiPro,
    #[serde(rename = "Mistral Large")]
    MistralLarge,
}

pub const ALL_MODELS: &[AiModel] = &[
    AiModel::Gpt4o,
    AiModel::Claude3,
    AiModel::GeminiPro,
    AiModel::MistralLarge,
];

impl AiModel {
    pub fn next(&self) -> Self {
        let index = ALL_MODELS.iter().position(|m| m == self).unwrap_or(0);
        ALL_MODELS[(index + 1) % ALL_MODELS.len()]
    }
}

impl fmt::Display for AiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiModel::Gpt4o => write!(f, "OpenAI GPT-4o"),
            AiModel::Claude3 => write!(f, "Anthropic Claude 3"),
            AiModel::GeminiPro => write!(f, "Google Gemini Pro"),
            AiModel::MistralLarge => write!(f, "Mistral Large"),
        }
    }
}

impl FromStr for AiModel {
    type Err = OpsdeckError;

    fn from_str(s: &str) -> Result<Self> {
        ALL_MODELS
            .iter()
            .copied()
            .find(|m| m.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| OpsdeckError::Config(format!("unknown model '{}'", s)))
    }
}

/// Contents of `ai-settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub active_model: AiModel,
}

static AI_SETTINGS: Lazy<RwLock<AiSettings>> =
    Lazy::new(|| RwLock::new(super::load_bucket(AI_SETTINGS_FILE)));

/// Current active model.
pub fn active_model() -> AiModel {
    AI_SETTINGS.read().active_model
}

/// Set and persist the active model.
pub fn set_active_model(model: AiModel) -> Result<()> {
    let mut settings = AI_SETTINGS.write();
    settings.active_model = model;
    super::save_bucket(AI_SETTINGS_FILE, &*settings)
}

/// Advance to the next model in the list and persist the choice.
pub fn cycle_active_model() -> Result<AiModel> {
    let mut settings = AI_SETTINGS.write();
    settings.active_model = settings.active_model.next();
    super::save_bucket(AI_SETTINGS_FILE, &*settings)?;
    Ok(settings.active_model)
}
