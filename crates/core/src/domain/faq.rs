use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub keywords: Vec<String>,
    pub answer: String,
}

impl FaqEntry {
    /// Builds an entry from the comma-separated keyword form used by operators.
    pub fn from_keyword_list(question: &str, keywords: &str, answer: &str) -> Self {
        Self {
            question: question.trim().to_string(),
            keywords: keywords
                .split(',')
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
            answer: answer.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.keywords.iter().all(|keyword| keyword.trim().is_empty()) {
            return Err(DomainError::InvalidFaqEntry(format!(
                "faq entry `{}` needs at least one keyword",
                self.question
            )));
        }
        if self.answer.trim().is_empty() {
            return Err(DomainError::InvalidFaqEntry(format!(
                "faq entry `{}` needs an answer",
                self.question
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FaqEntry;

    #[test]
    fn keyword_list_is_split_lowercased_and_compacted() {
        let entry = FaqEntry::from_keyword_list(
            "Delivery charge?",
            " Delivery, ডেলিভারি ,, Charge ",
            "Inside Dhaka 70, outside 150.",
        );

        assert_eq!(entry.keywords, vec!["delivery", "ডেলিভারি", "charge"]);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn entries_without_keywords_or_answer_are_rejected() {
        assert!(FaqEntry::from_keyword_list("q", " , ", "a").validate().is_err());
        assert!(FaqEntry::from_keyword_list("q", "k", "  ").validate().is_err());
    }
}
