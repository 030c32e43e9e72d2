pub mod catalog;
pub mod extract;
pub mod faq;
pub mod pricing;

pub use catalog::ProductCodePattern;
pub use extract::{LabeledFields, OrderField, OrderFieldExtractor};
pub use faq::FaqBook;
pub use pricing::{DeliveryFees, DeliveryZones, PriceBreakdown, PricingCalculator};
