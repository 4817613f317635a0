//! Persona and language-selection types.
//!
//! A persona is a fixed bundle of model id + system instruction + output
//! bound. The built-in catalog lives in `haven-core::persona`; nothing in
//! the system mutates a persona after startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named model/system-prompt configuration the user selects in the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Display name, also the `bot_name` stored on interaction records.
    pub name: String,
    /// Default Bedrock model identifier.
    pub model: String,
    /// System instruction sent with every turn.
    pub system_prompt: String,
    /// Default maximum output tokens.
    pub max_tokens: u32,
    /// Nominal context window, shown in the UI only.
    pub context_window: u32,
}

/// UI language selection.
///
/// Selecting Persian appends a per-turn directive to the persona's system
/// instruction; it never rewrites stored history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
}

impl Language {
    /// Extra system-instruction text for non-default languages.
    pub fn directive(&self) -> Option<&'static str> {
        match self {
            Language::En => None,
            Language::Fa => Some(" Respond in Persian/Farsi language."),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Fa => write!(f, "fa"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fa" => Ok(Language::Fa),
            other => Err(format!("invalid language: '{other}'")),
        }
    }
}

/// A canned conversation starter offered by the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub title: String,
    pub text: String,
}
