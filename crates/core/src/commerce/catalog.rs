use crate::domain::product::ProductCode;

/// Longest letter prefix accepted in a hyphenated code such as `DR-1050`.
const MAX_PREFIX_LETTERS: usize = 4;

/// Recognizes catalog codes inside free text: a short letter prefix, a hyphen
/// and digits such as `DR-1050`, or a configured prefix followed directly by
/// digits such as `DR1050`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductCodePattern {
    prefixes: Vec<String>,
}

impl ProductCodePattern {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|prefix| prefix.as_ref().trim().to_uppercase())
                .filter(|prefix| !prefix.is_empty())
                .collect(),
        }
    }

    /// First token of `text` that looks like a product code.
    pub fn find_code(&self, text: &str) -> Option<ProductCode> {
        text.split(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '-'))
            .map(|token| token.trim_matches('-'))
            .find(|token| self.is_code(token))
            .map(ProductCode::new)
    }

    pub fn is_code(&self, token: &str) -> bool {
        let upper = token.to_ascii_uppercase();
        if let Some((letters, digits)) = upper.split_once('-') {
            return (1..=MAX_PREFIX_LETTERS).contains(&letters.len())
                && letters.chars().all(|ch| ch.is_ascii_alphabetic())
                && is_digits(digits);
        }
        self.prefixes
            .iter()
            .any(|prefix| upper.strip_prefix(prefix.as_str()).is_some_and(is_digits))
    }
}

fn is_digits(rest: &str) -> bool {
    !rest.is_empty() && rest.chars().all(|ch| ch.is_ascii_digit())
}
