use async_trait::async_trait;
use thiserror::Error;

use dokan_core::domain::contact::{Contact, ContactId, Salutation};
use dokan_core::domain::faq::FaqEntry;
use dokan_core::domain::order::OrderRecord;
use dokan_core::domain::product::{Product, ProductCode};
use dokan_core::errors::ApplicationError;

pub mod contact;
pub mod faq;
pub mod memory;
pub mod order;
pub mod product;

pub use contact::SqlContactRepository;
pub use faq::SqlFaqRepository;
pub use memory::{
    InMemoryContactRepository, InMemoryFaqRepository, InMemoryOrderRepository,
    InMemoryProductRepository,
};
pub use order::SqlOrderRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Persistence(value.to_string())
    }
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>, RepositoryError>;
    async fn save_salutation(
        &self,
        id: &ContactId,
        salutation: Salutation,
    ) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_code(&self, code: &ProductCode) -> Result<Option<Product>, RepositoryError>;
    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;
}

#[async_trait]
pub trait FaqRepository: Send + Sync {
    /// Entries in match order.
    async fn list(&self) -> Result<Vec<FaqEntry>, RepositoryError>;
    /// Inserts a new entry at the end, or replaces keywords and answer of the
    /// entry with the same question while keeping its position.
    async fn save(&self, entry: FaqEntry) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn append(&self, order: OrderRecord) -> Result<(), RepositoryError>;
    /// Newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<OrderRecord>, RepositoryError>;
}
