use crate::domain::faq::FaqEntry;
use crate::lexicon::NormalizedText;

/// Ordered FAQ entries. The first entry with any matching keyword answers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaqBook {
    entries: Vec<FaqEntry>,
}

impl FaqBook {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn match_text(&self, text: &NormalizedText) -> Option<&FaqEntry> {
        self.entries.iter().filter(|entry| !entry.answer.trim().is_empty()).find(|entry| {
            entry.keywords.iter().any(|keyword| text.contains_keyword(&keyword.trim().to_lowercase()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::FaqBook;
    use crate::domain::faq::FaqEntry;
    use crate::lexicon::NormalizedText;

    fn book() -> FaqBook {
        FaqBook::new(vec![
            FaqEntry::from_keyword_list(
                "Delivery charge",
                "delivery, ডেলিভারি, charge",
                "Inside Dhaka 70 taka, outside 150 taka.",
            ),
            FaqEntry::from_keyword_list(
                "Delivery time",
                "delivery, কতদিন",
                "Delivery takes 2-3 days.",
            ),
            FaqEntry::from_keyword_list("Returns", "return, ফেরত", "Returns within 3 days."),
        ])
    }

    #[test]
    fn first_matching_entry_wins() {
        let book = book();
        let entry = book.match_text(&NormalizedText::new("dhaka te delivery koto?"));
        assert_eq!(entry.map(|entry| entry.question.as_str()), Some("Delivery charge"));
    }

    #[test]
    fn later_entries_match_when_earlier_ones_do_not() {
        let book = book();
        let entry = book.match_text(&NormalizedText::new("Return policy ki?"));
        assert_eq!(entry.map(|entry| entry.answer.as_str()), Some("Returns within 3 days."));
    }

    #[test]
    fn blank_answers_are_skipped_and_misses_return_none() {
        let book = FaqBook::new(vec![
            FaqEntry { question: "empty".into(), keywords: vec!["size".into()], answer: " ".into() },
            FaqEntry::from_keyword_list("Sizes", "size", "M, L and XL are available."),
        ]);
        let entry = book.match_text(&NormalizedText::new("size chart?"));
        assert_eq!(entry.map(|entry| entry.question.as_str()), Some("Sizes"));
        assert!(book.match_text(&NormalizedText::new("hello")).is_none());
    }
}
