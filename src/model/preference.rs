use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERACTION_TYPES: &[&str] =
    &["met", "call", "email", "message", "introduction", "other"];
pub const DEFAULT_EVENT_TYPES: &[&str] = &["conference", "meetup", "dinner", "workshop", "other"];
pub const DEFAULT_SENTIMENTS: &[&str] = &["positive", "neutral", "negative"];

/// Preference keys the application itself reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    InteractionTypes,
    EventTypes,
    Sentiments,
}

impl PreferenceKey {
    pub const ALL: &'static [PreferenceKey] = &[
        PreferenceKey::InteractionTypes,
        PreferenceKey::EventTypes,
        PreferenceKey::Sentiments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::InteractionTypes => "interaction_types",
            PreferenceKey::EventTypes => "event_types",
            PreferenceKey::Sentiments => "sentiments",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "interaction_types" => Some(PreferenceKey::InteractionTypes),
            "event_types" => Some(PreferenceKey::EventTypes),
            "sentiments" => Some(PreferenceKey::Sentiments),
            _ => None,
        }
    }

    pub fn defaults(&self) -> Vec<String> {
        let values = match self {
            PreferenceKey::InteractionTypes => DEFAULT_INTERACTION_TYPES,
            PreferenceKey::EventTypes => DEFAULT_EVENT_TYPES,
            PreferenceKey::Sentiments => DEFAULT_SENTIMENTS,
        };
        values.iter().map(|v| v.to_string()).collect()
    }
}

/// A stored `(key, list)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub key: String,
    pub value: Vec<String>,
}

/// Lists the UI offers, with defaults filled in for anything never saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub interaction_types: Vec<String>,
    pub event_types: Vec<String>,
    pub sentiments: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            interaction_types: PreferenceKey::InteractionTypes.defaults(),
            event_types: PreferenceKey::EventTypes.defaults(),
            sentiments: PreferenceKey::Sentiments.defaults(),
        }
    }
}

impl Preferences {
    pub fn get(&self, key: PreferenceKey) -> &[String] {
        match key {
            PreferenceKey::InteractionTypes => &self.interaction_types,
            PreferenceKey::EventTypes => &self.event_types,
            PreferenceKey::Sentiments => &self.sentiments,
        }
    }

    pub fn set(&mut self, key: PreferenceKey, value: Vec<String>) {
        match key {
            PreferenceKey::InteractionTypes => self.interaction_types = value,
            PreferenceKey::EventTypes => self.event_types = value,
            PreferenceKey::Sentiments => self.sentiments = value,
        }
    }
}
