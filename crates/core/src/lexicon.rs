//! Keyword lexicons that drive salutation inference, intent routing and
//! delivery-zone classification.
//!
//! Every list here is data: the compiled-in defaults cover a Bengali/English
//! storefront, and a TOML file can replace any subset of them without touching
//! the routing order.
//!
//! Matching rules:
//! - text and keywords are compared in lower case;
//! - an edge of a keyword that is an ASCII letter or digit must sit on a word
//!   boundary (`hi` does not match inside `shirt`);
//! - any other edge matches as a plain substring, which suits Bengali words
//!   that take attached suffixes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::contact::Salutation;

/// Lower-cased message text, computed once per inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains_keyword(&self, keyword: &str) -> bool {
        contains_keyword(&self.0, keyword)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Lexicon {
    keywords: Vec<String>,
}

impl Lexicon {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, text: &NormalizedText) -> bool {
        self.first_match(text).is_some()
    }

    pub fn first_match(&self, text: &NormalizedText) -> Option<&str> {
        self.keywords
            .iter()
            .find(|keyword| text.contains_keyword(keyword))
            .map(String::as_str)
    }

    /// Matches an arbitrary fragment, e.g. a single extracted field.
    pub fn matches_raw(&self, fragment: &str) -> bool {
        self.matches(&NormalizedText::new(fragment))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl From<Vec<String>> for Lexicon {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<Lexicon> for Vec<String> {
    fn from(value: Lexicon) -> Self {
        value.keywords
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalutationLabels {
    pub masculine: String,
    pub feminine: String,
}

impl SalutationLabels {
    pub fn label(&self, salutation: Salutation) -> &str {
        match salutation {
            Salutation::FormalMasculine => &self.masculine,
            Salutation::FormalFeminine => &self.feminine,
        }
    }
}

impl Default for SalutationLabels {
    fn default() -> Self {
        Self { masculine: "স্যার".to_string(), feminine: "ম্যাম".to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexicons {
    /// Words that let the resolver guess a feminine honorific.
    pub feminine_inference: Lexicon,
    pub masculine_inference: Lexicon,
    /// Words a customer uses to state the honorific they want.
    pub feminine_declaration: Lexicon,
    pub masculine_declaration: Lexicon,
    pub showroom: Lexicon,
    pub order_start: Lexicon,
    pub tracking: Lexicon,
    pub greeting: Lexicon,
    pub profanity: Lexicon,
    pub gratitude: Lexicon,
    /// Localities served at the inside-zone delivery fee.
    pub inside_zone: Lexicon,
    pub product_code_prefixes: Vec<String>,
    pub labels: SalutationLabels,
}

impl Default for Lexicons {
    fn default() -> Self {
        Self {
            feminine_inference: Lexicon::new([
                "apu", "apa", "আপু", "আপা", "ম্যাম", "ma'am", "madam", "ম্যাডাম",
            ]),
            masculine_inference: Lexicon::new(["vai", "bhai", "ভাই", "স্যার", "sir", "দাদা"]),
            // Casual forms of address (ভাই, আপু) only feed inference.
            feminine_declaration: Lexicon::new(["ম্যাম", "ম্যাডাম", "madam", "ma'am"]),
            masculine_declaration: Lexicon::new(["স্যার", "sir"]),
            showroom: Lexicon::new([
                "শোরুম", "showroom", "দোকান", "শপ", "ঠিকানা", "এড্রেস", "address", "location",
                "লোকেশন",
            ]),
            order_start: Lexicon::new(["অর্ডার", "order", "কিনতে চাই", "অর্ডার করতে চাই"]),
            tracking: Lexicon::new([
                "track",
                "tracking",
                "status",
                "parcel",
                "ট্র্যাক",
                "স্ট্যাটাস",
                "পার্সেল",
                "কবে পাব",
                "কোথায় আছে",
            ]),
            greeting: Lexicon::new([
                "hi",
                "hello",
                "hey",
                "salam",
                "assalamu",
                "assalamualaikum",
                "সালাম",
                "হ্যালো",
                "হাই",
            ]),
            profanity: Lexicon::new(["bokachoda", "চোদা", "ফাক", "bc", "mc", "মাদার", "গালি"]),
            gratitude: Lexicon::new(["ধন্যবাদ", "thanks", "thank you", "thx"]),
            inside_zone: Lexicon::new([
                "dhaka", "ঢাকা", "mirpur", "uttara", "banani", "dhanmondi", "gulshan", "মিরপুর",
                "উত্তরা", "ধানমন্ডি", "বনানী", "গুলশান",
            ]),
            product_code_prefixes: vec!["DR".to_string()],
            labels: SalutationLabels::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("could not read lexicon file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse lexicon file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("lexicon validation failed: {0}")]
    Validation(String),
}

impl Lexicons {
    /// Loads the defaults and overlays the lists present in `path`.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| LexiconError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
            .map_err(|error| match error {
                LexiconError::ParseFile { source, .. } => {
                    LexiconError::ParseFile { path: path.to_path_buf(), source }
                }
                other => other,
            })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, LexiconError> {
        let patch = toml::from_str::<LexiconPatch>(raw)
            .map_err(|source| LexiconError::ParseFile { path: PathBuf::from("<inline>"), source })?;
        let mut lexicons = Self::default();
        lexicons.apply_patch(patch);
        lexicons.validate()?;
        Ok(lexicons)
    }

    fn apply_patch(&mut self, patch: LexiconPatch) {
        let slots: [(&mut Lexicon, Option<Lexicon>); 11] = [
            (&mut self.feminine_inference, patch.feminine_inference),
            (&mut self.masculine_inference, patch.masculine_inference),
            (&mut self.feminine_declaration, patch.feminine_declaration),
            (&mut self.masculine_declaration, patch.masculine_declaration),
            (&mut self.showroom, patch.showroom),
            (&mut self.order_start, patch.order_start),
            (&mut self.tracking, patch.tracking),
            (&mut self.greeting, patch.greeting),
            (&mut self.profanity, patch.profanity),
            (&mut self.gratitude, patch.gratitude),
            (&mut self.inside_zone, patch.inside_zone),
        ];
        for (slot, replacement) in slots {
            if let Some(replacement) = replacement {
                *slot = replacement;
            }
        }

        if let Some(prefixes) = patch.product_code_prefixes {
            self.product_code_prefixes = prefixes
                .into_iter()
                .map(|prefix| prefix.trim().to_uppercase())
                .filter(|prefix| !prefix.is_empty())
                .collect();
        }
        if let Some(labels) = patch.labels {
            if let Some(masculine) = labels.masculine {
                self.labels.masculine = masculine;
            }
            if let Some(feminine) = labels.feminine {
                self.labels.feminine = feminine;
            }
        }
    }

    pub fn validate(&self) -> Result<(), LexiconError> {
        if self.feminine_declaration.is_empty() || self.masculine_declaration.is_empty() {
            return Err(LexiconError::Validation(
                "feminine_declaration and masculine_declaration must each list at least one keyword"
                    .to_string(),
            ));
        }
        if self.labels.masculine.trim().is_empty() || self.labels.feminine.trim().is_empty() {
            return Err(LexiconError::Validation(
                "labels.masculine and labels.feminine must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The honorific a customer explicitly asked for. Feminine wins when both
    /// kinds of declaration appear.
    pub fn declared_salutation(&self, text: &NormalizedText) -> Option<Salutation> {
        if self.feminine_declaration.matches(text) {
            Some(Salutation::FormalFeminine)
        } else if self.masculine_declaration.matches(text) {
            Some(Salutation::FormalMasculine)
        } else {
            None
        }
    }

    /// Honorific guessed from how the customer addresses the shop.
    pub fn inferred_salutation(&self, text: &NormalizedText) -> Option<Salutation> {
        if self.feminine_inference.matches(text) {
            Some(Salutation::FormalFeminine)
        } else if self.masculine_inference.matches(text) {
            Some(Salutation::FormalMasculine)
        } else {
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconPatch {
    feminine_inference: Option<Lexicon>,
    masculine_inference: Option<Lexicon>,
    feminine_declaration: Option<Lexicon>,
    masculine_declaration: Option<Lexicon>,
    showroom: Option<Lexicon>,
    order_start: Option<Lexicon>,
    tracking: Option<Lexicon>,
    greeting: Option<Lexicon>,
    profanity: Option<Lexicon>,
    gratitude: Option<Lexicon>,
    inside_zone: Option<Lexicon>,
    product_code_prefixes: Option<Vec<String>>,
    labels: Option<LabelsPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelsPatch {
    masculine: Option<String>,
    feminine: Option<String>,
}

fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    let bounded_start = keyword.chars().next().is_some_and(|ch| ch.is_ascii_alphanumeric());
    let bounded_end = keyword.chars().next_back().is_some_and(|ch| ch.is_ascii_alphanumeric());

    haystack.match_indices(keyword).any(|(start, matched)| {
        let end = start + matched.len();
        let start_ok = !bounded_start
            || !haystack[..start].chars().next_back().is_some_and(char::is_alphanumeric);
        let end_ok =
            !bounded_end || !haystack[end..].chars().next().is_some_and(char::is_alphanumeric);
        start_ok && end_ok
    })
}
