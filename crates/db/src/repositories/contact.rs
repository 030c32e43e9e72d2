use chrono::{DateTime, Utc};
use sqlx::Row;

use dokan_core::domain::contact::{Contact, ContactId, Salutation};
use dokan_core::errors::ApplicationError;
use dokan_core::ports::SalutationStore;

use super::{ContactRepository, RepositoryError};
use crate::DbPool;

pub struct SqlContactRepository {
    pool: DbPool,
}

impl SqlContactRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_contact(row: &sqlx::sqlite::SqliteRow) -> Result<Contact, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let salutation: Option<String> =
        row.try_get("salutation").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let updated_at_str: String =
        row.try_get("updated_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let salutation = match salutation {
        Some(raw) => Some(Salutation::parse(&raw).ok_or_else(|| {
            RepositoryError::Decode(format!("unknown salutation `{raw}` for contact `{id}`"))
        })?),
        None => None,
    };
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(Contact { id: ContactId(id), salutation, updated_at })
}

#[async_trait::async_trait]
impl ContactRepository for SqlContactRepository {
    async fn find_by_id(&self, id: &ContactId) -> Result<Option<Contact>, RepositoryError> {
        let row = sqlx::query("SELECT id, salutation, updated_at FROM contact WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_contact).transpose()
    }

    async fn save_salutation(
        &self,
        id: &ContactId,
        salutation: Salutation,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO contact (id, salutation, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 salutation = excluded.salutation,
                 updated_at = excluded.updated_at",
        )
        .bind(id.as_str())
        .bind(salutation.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SalutationStore for SqlContactRepository {
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
