use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Channel-specific sender identifier, e.g. `whatsapp:+8801711000000`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(pub String);

impl ContactId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Salutation {
    FormalMasculine,
    FormalFeminine,
}

impl Salutation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormalMasculine => "formal_masculine",
            Self::FormalFeminine => "formal_feminine",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "formal_masculine" => Some(Self::FormalMasculine),
            "formal_feminine" => Some(Self::FormalFeminine),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub salutation: Option<Salutation>,
    pub updated_at: DateTime<Utc>,
}
