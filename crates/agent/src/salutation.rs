use std::sync::Arc;

use tracing::debug;

use dokan_core::domain::contact::{ContactId, Salutation};
use dokan_core::errors::ApplicationError;
use dokan_core::lexicon::{Lexicons, NormalizedText};
use dokan_core::ports::SalutationStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub salutation: Option<Salutation>,
    /// No honorific is known yet and the customer should be asked for one.
    pub must_ask: bool,
}

impl Resolution {
    pub fn known(salutation: Salutation) -> Self {
        Self { salutation: Some(salutation), must_ask: false }
    }

    pub fn unknown() -> Self {
        Self { salutation: None, must_ask: true }
    }
}

pub struct SalutationResolver {
    store: Arc<dyn SalutationStore>,
    lexicons: Arc<Lexicons>,
}

impl SalutationResolver {
    pub fn new(store: Arc<dyn SalutationStore>, lexicons: Arc<Lexicons>) -> Self {
        Self { store, lexicons }
    }

    /// A stored honorific always wins over anything inferred from `text`;
    /// an inferred one is persisted before returning.
    pub async fn resolve(
        &self,
        contact_id: &ContactId,
        text: &str,
    ) -> Result<Resolution, ApplicationError> {
        if let Some(stored) = self.store.get(contact_id).await? {
            return Ok(Resolution::known(stored));
        }

        let normalized = NormalizedText::new(text);
        match self.lexicons.inferred_salutation(&normalized) {
            Some(inferred) => {
                self.store.upsert(contact_id, inferred).await?;
                debug!(
                    event_name = "agent.salutation.inferred",
                    contact_id = %contact_id,
                    salutation = inferred.as_str(),
                    "inferred salutation from message text"
                );
                Ok(Resolution::known(inferred))
            }
            None => Ok(Resolution::unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dokan_core::domain::contact::{ContactId, Salutation};
    use dokan_core::lexicon::Lexicons;
    use dokan_core::ports::SalutationStore;
    use dokan_db::InMemoryContactRepository;

    use super::{Resolution, SalutationResolver};

    fn resolver(store: Arc<InMemoryContactRepository>) -> SalutationResolver {
        SalutationResolver::new(store, Arc::new(Lexicons::default()))
    }

    #[tokio::test]
    async fn unknown_contact_without_hints_must_be_asked() {
        let store = Arc::new(InMemoryContactRepository::default());
        let resolution =
            resolver(store.clone()).resolve(&ContactId::new("c-1"), "hello").await.expect("resolve");

        assert_eq!(resolution, Resolution::unknown());
        assert_eq!(store.get(&ContactId::new("c-1")).await.expect("get"), None);
    }

    #[tokio::test]
    async fn inference_persists_and_is_idempotent() {
        let store = Arc::new(InMemoryContactRepository::default());
        let resolver = resolver(store.clone());
        let id = ContactId::new("c-2");

        let first = resolver.resolve(&id, "apu, dress ta koto?").await.expect("first resolve");
        assert_eq!(first, Resolution::known(Salutation::FormalFeminine));
        assert_eq!(store.get(&id).await.expect("get"), Some(Salutation::FormalFeminine));

        let second = resolver.resolve(&id, "bhai").await.expect("second resolve");
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn feminine_inference_is_checked_before_masculine() {
        let store = Arc::new(InMemoryContactRepository::default());
        let resolution = resolver(store)
            .resolve(&ContactId::new("c-3"), "vai na, apu bolen")
            .await
            .expect("resolve");

        assert_eq!(resolution.salutation, Some(Salutation::FormalFeminine));
    }

    #[tokio::test]
    async fn inference_ignores_keywords_inside_other_words() {
        let store = Arc::new(InMemoryContactRepository::default());
        let resolution = resolver(store)
            .resolve(&ContactId::new("c-4"), "is this available?")
            .await
            .expect("resolve");

        assert!(resolution.must_ask);
    }
}
