use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use dokan_core::commerce::FaqBook;
use dokan_core::domain::contact::{Contact, ContactId, Salutation};
use dokan_core::domain::faq::FaqEntry;
use dokan_core::domain::order::OrderRecord;
use dokan_core::domain::product::{Product, ProductCode};
use dokan_core::errors::ApplicationError;
use dokan_core::lexicon::NormalizedText;
use dokan_core::ports::{FaqLookup, OrderLog, ProductLookup, SalutationStore};

use super::{
    ContactRepository, FaqRepository, OrderRepository, ProductRepository, RepositoryError,
};

#[derive(Default)]
pub struct InMemoryContactRepository {
    contacts: RwLock<HashMap<String, Contact>>,
}

#[async_trait::async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>, RepositoryError> {
        let contacts = self.contacts.read().await;
        Ok(contacts.get(id.as_str()).cloned())
    }

    async fn save_salutation(
        &self,
        id: &ContactId,
        salutation: Salutation,
    ) -> Result<(), RepositoryError> {
        let mut contacts = self.contacts.write().await;
        contacts.insert(
            id.as_str().to_string(),
            Contact { id: id.clone(), salutation: Some(salutation), updated_at: Utc::now() },
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl SalutationStore for InMemoryContactRepository {
    async fn get(&self, contact_id: &ContactId) -> Result<Option<Salutation>, ApplicationError> {
        let contact = self.find_by_id(contact_id).await?;
        Ok(contact.and_then(|contact| contact.salutation))
    }

    async fn upsert(
        &self,
        contact_id: &ContactId,
        salutation: Salutation,
    ) -> Result<(), ApplicationError> {
        self.save_salutation(contact_id, salutation).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<ProductCode, Product>>,
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_code(&self, code: &ProductCode) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.get(code).cloned())
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        products.insert(product.code.clone(), product);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|left, right| left.code.cmp(&right.code));
        Ok(all)
    }
}

#[async_trait::async_trait]
impl ProductLookup for InMemoryProductRepository {
    async fn find(&self, code: &ProductCode) -> Result<Option<Product>, ApplicationError> {
        Ok(self.find_by_code(code).await?)
    }
}

#[derive(Default)]
pub struct InMemoryFaqRepository {
    entries: RwLock<Vec<FaqEntry>>,
}

#[async_trait::async_trait]
impl FaqRepository for InMemoryFaqRepository {
    async fn list(&self) -> Result<Vec<FaqEntry>, RepositoryError> {
        Ok(self.entries.read().await.clone())
    }

    async fn save(&self, entry: FaqEntry) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|existing| existing.question == entry.question) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl FaqLookup for InMemoryFaqRepository {
    async fn match_text(&self, text: &str) -> Result<Option<String>, ApplicationError> {
        let entries = self.entries.read().await;
        let book = FaqBook::new(entries.clone());
        Ok(book.match_text(&NormalizedText::new(text)).map(|entry| entry.answer.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<OrderRecord>>,
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn append(&self, order: OrderRecord) -> Result<(), RepositoryError> {
        self.orders.write().await.push(order);
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<OrderRecord>, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().rev().take(limit as usize).cloned().collect())
    }
}

#[async_trait::async_trait]
impl OrderLog for InMemoryOrderRepository {
    async fn append(&self, order: OrderRecord) -> Result<(), ApplicationError> {
        OrderRepository::append(self, order).await?;
        Ok(())
    }
}
