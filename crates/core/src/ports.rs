//! Contracts for the collaborators the assistant reads from and writes to.
//!
//! Implementations live outside the routing engine (see `dokan-db`). Each call
//! is a single atomic operation; concurrent upserts for one contact resolve
//! last-writer-wins, and nothing here offers compare-and-swap.

use async_trait::async_trait;

use crate::domain::contact::{ContactId, Salutation};
use crate::domain::order::OrderRecord;
use crate::domain::product::{Product, ProductCode};
use crate::errors::ApplicationError;

#[async_trait]
pub trait SalutationStore: Send + Sync {
    async fn get(&self, contact_id: &ContactId) -> Result<Option<Salutation>, ApplicationError>;

    async fn upsert(
        &self,
        contact_id: &ContactId,
        salutation: Salutation,
    ) -> Result<(), ApplicationError>;
}

#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Codes are compared case-insensitively; `ProductCode` is already
    /// normalized.
    async fn find(&self, code: &ProductCode) -> Result<Option<Product>, ApplicationError>;
}

#[async_trait]
pub trait FaqLookup: Send + Sync {
    /// Answer of the first entry, in the store's order, whose keywords match.
    async fn match_text(&self, text: &str) -> Result<Option<String>, ApplicationError>;
}

#[async_trait]
pub trait OrderLog: Send + Sync {
    async fn append(&self, order: OrderRecord) -> Result<(), ApplicationError>;
}
