pub mod commerce;
pub mod config;
pub mod domain;
pub mod errors;
pub mod lexicon;
pub mod ports;

pub use commerce::{
    DeliveryFees, DeliveryZones, FaqBook, LabeledFields, OrderField, OrderFieldExtractor,
    PriceBreakdown, PricingCalculator, ProductCodePattern,
};
pub use domain::contact::{Contact, ContactId, Salutation};
pub use domain::faq::FaqEntry;
pub use domain::order::{CityZone, OrderDraft, OrderId, OrderRecord, OrderStatus};
pub use domain::product::{Product, ProductCode};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use lexicon::{Lexicon, Lexicons, NormalizedText, SalutationLabels};
pub use ports::{FaqLookup, OrderLog, ProductLookup, SalutationStore};
