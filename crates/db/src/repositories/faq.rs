use chrono::Utc;
use sqlx::Row;

use dokan_core::commerce::FaqBook;
use dokan_core::domain::faq::FaqEntry;
use dokan_core::errors::ApplicationError;
use dokan_core::lexicon::NormalizedText;
use dokan_core::ports::FaqLookup;

use super::{FaqRepository, RepositoryError};
use crate::DbPool;

pub struct SqlFaqRepository {
    pool: DbPool,
}

impl SqlFaqRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<FaqEntry, RepositoryError> {
    let question: String =
        row.try_get("question").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let keywords_json: String =
        row.try_get("keywords_json").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let answer: String = row.try_get("answer").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let keywords: Vec<String> = serde_json::from_str(&keywords_json)
        .map_err(|e| RepositoryError::Decode(format!("keywords for `{question}`: {e}")))?;

    Ok(FaqEntry { question, keywords, answer })
}

#[async_trait::async_trait]
impl FaqRepository for SqlFaqRepository {
    async fn list(&self) -> Result<Vec<FaqEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT question, keywords_json, answer FROM faq_entry ORDER BY position ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn save(&self, entry: FaqEntry) -> Result<(), RepositoryError> {
        let keywords_json = serde_json::to_string(&entry.keywords)
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;

        sqlx::query(
            "INSERT INTO faq_entry (position, question, keywords_json, answer, created_at)
             VALUES ((SELECT COALESCE(MAX(position), 0) + 1 FROM faq_entry), ?, ?, ?, ?)
             ON CONFLICT(question) DO UPDATE SET
                 keywords_json = excluded.keywords_json,
                 answer = excluded.answer",
        )
        .bind(&entry.question)
        .bind(&keywords_json)
        .bind(&entry.answer)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl FaqLookup for SqlFaqRepository {
    async fn match_text(&self, text: &str) -> Result<Option<String>, ApplicationError> {
        let book = FaqBook::new(self.list().await?);
        Ok(book.match_text(&NormalizedText::new(text)).map(|entry| entry.answer.clone()))
    }
}

#[cfg(test)]
mod tests {
    use dokan_core::domain::faq::FaqEntry;
    use dokan_core::ports::FaqLookup;

    use super::SqlFaqRepository;
    use crate::repositories::FaqRepository;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> SqlFaqRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlFaqRepository::new(pool)
    }

    #[tokio::test]
    async fn first_entry_in_stored_order_answers() {
        let repo = setup().await;
        repo.save(FaqEntry::from_keyword_list(
            "Delivery charge",
            "delivery, ডেলিভারি",
            "Dhaka 70, outside 150.",
        ))
        .await
        .expect("save first");
        repo.save(FaqEntry::from_keyword_list("Delivery time", "delivery", "2-3 days."))
            .await
            .expect("save second");

        let answer = repo.match_text("Dhaka te DELIVERY koto?").await.expect("match");
        assert_eq!(answer.as_deref(), Some("Dhaka 70, outside 150."));
        assert_eq!(repo.match_text("kemon achen").await.expect("no match"), None);
    }

    #[tokio::test]
    async fn resaving_a_question_keeps_its_position() {
        let repo = setup().await;
        repo.save(FaqEntry::from_keyword_list("Returns", "return", "7 days.")).await.expect("a");
        repo.save(FaqEntry::from_keyword_list("Payment", "bkash, cod", "COD only.")).await.expect("b");
        repo.save(FaqEntry::from_keyword_list("Returns", "return, ফেরত", "3 days.")).await.expect("c");

        let entries = repo.list().await.expect("list");
        let questions: Vec<&str> = entries.iter().map(|entry| entry.question.as_str()).collect();
        assert_eq!(questions, vec!["Returns", "Payment"]);
        assert_eq!(entries[0].answer, "3 days.");
        assert_eq!(entries[0].keywords, vec!["return", "ফেরত"]);
    }
}
