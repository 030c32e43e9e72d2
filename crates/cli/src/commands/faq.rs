use dokan_core::domain::faq::FaqEntry;
use dokan_db::repositories::FaqRepository;
use dokan_db::{RepositoryError, SqlFaqRepository};

use crate::commands::{build_runtime, load_config, open_pool, CommandResult, Failure};

/// Appends an entry to the end of the match order, or replaces the keywords
/// and answer of an existing question in place.
pub fn run(question: &str, keywords: &str, answer: &str) -> CommandResult {
    let entry = FaqEntry::from_keyword_list(question, keywords, answer);
    if entry.question.is_empty() {
        return CommandResult::failure("faq-add", "invalid_input", "question must not be empty", 7);
    }
    if let Err(error) = entry.validate() {
        return CommandResult::failure("faq-add", "invalid_input", error.to_string(), 7);
    }

    let config = match load_config("faq-add") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("faq-add") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let keyword_count = entry.keywords.len();
    let question = entry.question.clone();
    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let repository = SqlFaqRepository::new(pool.clone());
        let saved: Result<usize, Failure> = async {
            repository.save(entry).await?;
            Ok::<usize, RepositoryError>(repository.list().await?.len())
        }
        .await
        .map_err(|error| ("faq_write", error.to_string(), 5u8));
        pool.close().await;
        saved
    });

    match result {
        Ok(total) => CommandResult::success(
            "faq-add",
            format!("saved faq `{question}` with {keyword_count} keywords ({total} entries total)"),
        ),
        Err(failure) => CommandResult::from_failure("faq-add", failure),
    }
}
