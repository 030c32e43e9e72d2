//! Labeled-field extraction for free-form order messages such as
//! `নাম: রফিক, ফোন: 017..., ঠিকানা: মিরপুর, কোড: DR-1050, সাইজ: L, Qty: 1`.
//!
//! Fields are described by a declarative table (labels, separator rule,
//! capture rule). A single scan finds every label occurrence; each value runs
//! from its separator to the end of the line or the next label, so several
//! labels may share one line.

use crate::commerce::pricing::DeliveryZones;
use crate::domain::order::OrderDraft;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderField {
    Name,
    Phone,
    Address,
    Code,
    Size,
    Quantity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Capture {
    /// Everything up to the end of the segment.
    Segment,
    /// Up to the first whitespace or comma.
    Token,
    /// Leading digits only.
    Digits,
}

struct LabelRule {
    field: OrderField,
    labels: &'static [&'static str],
    separator_required: bool,
    capture: Capture,
}

const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        field: OrderField::Name,
        labels: &["নাম", "name"],
        separator_required: true,
        capture: Capture::Segment,
    },
    LabelRule {
        field: OrderField::Phone,
        labels: &["মোবাইল", "ফোন", "phone", "mobile"],
        separator_required: true,
        capture: Capture::Token,
    },
    LabelRule {
        field: OrderField::Address,
        labels: &["ঠিকানা", "address"],
        separator_required: true,
        capture: Capture::Segment,
    },
    LabelRule {
        field: OrderField::Code,
        labels: &["কোড", "code"],
        separator_required: true,
        capture: Capture::Token,
    },
    LabelRule {
        field: OrderField::Size,
        labels: &["সাইজ", "size"],
        separator_required: true,
        capture: Capture::Token,
    },
    LabelRule {
        field: OrderField::Quantity,
        labels: &["qty", "পরিমাণ", "পিস"],
        separator_required: false,
        capture: Capture::Digits,
    },
];

const SEPARATORS: &[char] = &[':', '：'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LabelHit {
    field: OrderField,
    label_start: usize,
    value_start: usize,
}

/// Result of scanning a message for order-field labels.
#[derive(Clone, Debug)]
pub struct LabeledFields<'a> {
    text: &'a str,
    hits: Vec<LabelHit>,
}

impl<'a> LabeledFields<'a> {
    pub fn scan(text: &'a str) -> Self {
        // ASCII folding keeps byte offsets aligned with `text`.
        let folded = text.to_ascii_lowercase();
        let mut hits = Vec::new();

        for rule in LABEL_RULES {
            for label in rule.labels {
                for (label_start, _) in folded.match_indices(label) {
                    let preceded_by_word =
                        folded[..label_start].chars().next_back().is_some_and(char::is_alphanumeric);
                    if preceded_by_word {
                        continue;
                    }
                    let label_end = label_start + label.len();
                    if let Some(value_start) = value_start(&folded, label_end, rule) {
                        hits.push(LabelHit { field: rule.field, label_start, value_start });
                    }
                }
            }
        }

        hits.sort_by_key(|hit| (hit.label_start, std::cmp::Reverse(hit.value_start)));
        let mut accepted: Vec<LabelHit> = Vec::with_capacity(hits.len());
        for hit in hits {
            let overlaps = accepted.last().is_some_and(|last| hit.label_start < last.value_start);
            if !overlaps {
                accepted.push(hit);
            }
        }

        Self { text, hits: accepted }
    }

    pub fn has(&self, field: OrderField) -> bool {
        self.hits.iter().any(|hit| hit.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// The message with every label and its separator blanked out, leaving
    /// free text and captured values. Lets keyword checks ignore words that
    /// only appear as a label (`ঠিকানা:` is also a showroom keyword).
    pub fn unlabeled_text(&self) -> String {
        let mut unlabeled = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for hit in &self.hits {
            unlabeled.push_str(&self.text[cursor..hit.label_start]);
            unlabeled.push(' ');
            cursor = hit.value_start;
        }
        unlabeled.push_str(&self.text[cursor..]);
        unlabeled
    }

    /// Captured value of the first occurrence of `field`, already reduced by
    /// the field's capture rule. Empty when the label is present but blank.
    pub fn value(&self, field: OrderField) -> Option<&'a str> {
        let index = self.hits.iter().position(|hit| hit.field == field)?;
        let hit = self.hits[index];
        let next_label = self.hits.get(index + 1).map_or(self.text.len(), |next| next.label_start);
        let line_end = self.text[hit.value_start..]
            .find(['\n', '\r'])
            .map_or(self.text.len(), |offset| hit.value_start + offset);
        let segment = &self.text[hit.value_start..next_label.min(line_end)];

        let capture = LABEL_RULES
            .iter()
            .find(|rule| rule.field == field)
            .map_or(Capture::Segment, |rule| rule.capture);
        Some(apply_capture(segment, capture))
    }
}

fn value_start(folded: &str, label_end: usize, rule: &LabelRule) -> Option<usize> {
    let rest = &folded[label_end..];
    let trimmed = rest.trim_start_matches([' ', '\t']);
    let offset = label_end + (rest.len() - trimmed.len());
    let next = trimmed.chars().next()?;

    if SEPARATORS.contains(&next) {
        return Some(offset + next.len_utf8());
    }
    if !rule.separator_required && to_ascii_digit(next).is_some() {
        return Some(offset);
    }
    None
}

fn apply_capture(segment: &str, capture: Capture) -> &str {
    let trimmed = segment.trim_matches(|ch: char| ch.is_whitespace() || ch == ',' || ch == ';');
    match capture {
        Capture::Segment => trimmed,
        Capture::Token => trimmed
            .split(|ch: char| ch.is_whitespace() || ch == ',')
            .next()
            .unwrap_or_default(),
        Capture::Digits => {
            let end = trimmed
                .char_indices()
                .find(|(_, ch)| to_ascii_digit(*ch).is_none())
                .map_or(trimmed.len(), |(index, _)| index);
            &trimmed[..end]
        }
    }
}

/// Maps ASCII and Bengali digits to their ASCII form.
fn to_ascii_digit(ch: char) -> Option<char> {
    match ch {
        '0'..='9' => Some(ch),
        '০'..='৯' => char::from_digit(u32::from(ch) - u32::from('০'), 10),
        _ => None,
    }
}

fn parse_quantity(raw: Option<&str>) -> u32 {
    raw.map(|digits| digits.chars().filter_map(to_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse::<u32>().ok())
        .filter(|quantity| *quantity >= 1)
        .unwrap_or(1)
}

#[derive(Clone, Debug, Default)]
pub struct OrderFieldExtractor {
    zones: DeliveryZones,
}

impl OrderFieldExtractor {
    pub fn new(zones: DeliveryZones) -> Self {
        Self { zones }
    }

    /// Total: any input yields a draft, with blank fields for absent labels
    /// and a quantity of at least one.
    pub fn extract(&self, text: &str) -> OrderDraft {
        self.extract_from(&LabeledFields::scan(text))
    }

    pub fn extract_from(&self, fields: &LabeledFields<'_>) -> OrderDraft {
        let text_of = |field| fields.value(field).unwrap_or_default().to_string();
        let address = text_of(OrderField::Address);

        OrderDraft {
            customer_name: text_of(OrderField::Name),
            phone: text_of(OrderField::Phone),
            city_zone: self.zones.classify(&address),
            address,
            product_code: text_of(OrderField::Code),
            size: text_of(OrderField::Size),
            quantity: parse_quantity(fields.value(OrderField::Quantity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LabeledFields, OrderField, OrderFieldExtractor};
    use crate::commerce::pricing::DeliveryZones;
    use crate::domain::order::{CityZone, OrderDraft};
    use crate::lexicon::Lexicons;

    fn extractor() -> OrderFieldExtractor {
        OrderFieldExtractor::new(DeliveryZones::new(Lexicons::default().inside_zone))
    }

    #[test]
    fn extracts_single_line_order_with_many_labels() {
        let draft = extractor().extract(
            "নাম: রফিক, ফোন: 017xxxx, ঠিকানা: মিরপুর, কোড: DR-1050, সাইজ: L, Qty: 1",
        );

        assert_eq!(
            draft,
            OrderDraft {
                customer_name: "রফিক".to_string(),
                phone: "017xxxx".to_string(),
                address: "মিরপুর".to_string(),
                product_code: "DR-1050".to_string(),
                size: "L".to_string(),
                quantity: 1,
                city_zone: CityZone::Inside,
            }
        );
    }

    #[test]
    fn extracts_multi_line_order_with_english_labels_and_full_width_colon() {
        let draft = extractor().extract(
            "Name： Nusrat Jahan\nMobile: 01711000000\nAddress: House 7, Road 3, Agrabad, Chattogram\nCode: kt-220\nSize: XL\nqty 3",
        );

        assert_eq!(draft.customer_name, "Nusrat Jahan");
        assert_eq!(draft.phone, "01711000000");
        assert_eq!(draft.address, "House 7, Road 3, Agrabad, Chattogram");
        assert_eq!(draft.product_code, "kt-220");
        assert_eq!(draft.size, "XL");
        assert_eq!(draft.quantity, 3);
        assert_eq!(draft.city_zone, CityZone::Outside);
    }

    #[test]
    fn extraction_is_total_on_empty_and_unlabeled_text() {
        for text in ["", "   ", "just browsing", ":::：", "নাম:", "qty: lots"] {
            let draft = extractor().extract(text);
            assert!(draft.quantity >= 1, "quantity must default for {text:?}");
            assert_eq!(draft.product_code, "");
        }
        assert_eq!(extractor().extract(""), OrderDraft::default());
    }

    #[test]
    fn quantity_accepts_bengali_digits_and_rejects_zero() {
        assert_eq!(extractor().extract("পরিমাণ: ২").quantity, 2);
        assert_eq!(extractor().extract("Qty: 0").quantity, 1);
        assert_eq!(extractor().extract("পিস: 12টা").quantity, 12);
    }

    #[test]
    fn labels_need_a_word_boundary_and_a_separator() {
        let fields = LabeledFields::scan("my username: rafiq, barcode: 123, name is rafiq");
        assert!(!fields.has(OrderField::Name));
        assert!(!fields.has(OrderField::Code));
        assert!(fields.is_empty());
    }

    #[test]
    fn token_fields_stop_at_whitespace() {
        let fields = LabeledFields::scan("phone: 017 1234 5678\ncode: DR-1050 please");
        assert_eq!(fields.value(OrderField::Phone), Some("017"));
        assert_eq!(fields.value(OrderField::Code), Some("DR-1050"));
    }

    #[test]
    fn unlabeled_text_drops_labels_but_keeps_values_and_free_text() {
        let fields = LabeledFields::scan("showroom kothay? Size: L\nঠিকানা: মিরপুর");
        assert_eq!(fields.unlabeled_text(), "showroom kothay?   L\n  মিরপুর");

        let plain = LabeledFields::scan("ঠিকানা কি?");
        assert!(plain.is_empty());
        assert_eq!(plain.unlabeled_text(), "ঠিকানা কি?");
    }

    #[test]
    fn first_occurrence_of_a_label_wins() {
        let fields = LabeledFields::scan("code: DR-1\ncode: DR-2");
        assert_eq!(fields.value(OrderField::Code), Some("DR-1"));
    }
}
