use dokan_core::domain::product::{Product, ProductCode};
use dokan_db::repositories::ProductRepository;
use dokan_db::SqlProductRepository;

use crate::commands::{build_runtime, load_config, open_pool, split_list, CommandResult, Failure};

/// Operator input for one catalog row.
#[derive(Clone, Debug, Default)]
pub struct CatalogEntry {
    pub code: String,
    pub name: String,
    pub price: u64,
    /// Comma-separated, e.g. `M,L,XL`.
    pub sizes: String,
    pub color: String,
    pub stock_label: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

impl CatalogEntry {
    fn into_product(self) -> Product {
        Product {
            code: ProductCode::new(&self.code),
            name: self.name.trim().to_string(),
            price: self.price,
            sizes: split_list(&self.sizes).into_iter().collect(),
            color: self.color.trim().to_string(),
            stock_label: self.stock_label.trim().to_string(),
            image_url: non_blank(self.image_url),
            video_url: non_blank(self.video_url),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub fn run(entry: CatalogEntry) -> CommandResult {
    let product = entry.into_product();
    if let Err(error) = product.validate() {
        return CommandResult::failure("catalog-add", "invalid_input", error.to_string(), 7);
    }

    let config = match load_config("catalog-add") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("catalog-add") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let code = product.code.clone();
    let price = product.price;
    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let saved: Result<(), Failure> = SqlProductRepository::new(pool.clone())
            .save(product)
            .await
            .map_err(|error| ("catalog_write", error.to_string(), 5u8));
        pool.close().await;
        saved
    });

    match result {
        Ok(()) => CommandResult::success(
            "catalog-add",
            format!("saved product {code} at {price}{}", config.assistant.currency_symbol),
        ),
        Err(failure) => CommandResult::from_failure("catalog-add", failure),
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogEntry;

    #[test]
    fn entry_normalizes_code_sizes_and_blank_urls() {
        let product = CatalogEntry {
            code: " dr-3300 ".to_string(),
            name: " Linen Kurti ".to_string(),
            price: 1290,
            sizes: "L, M,,XL".to_string(),
            color: "Olive".to_string(),
            stock_label: String::new(),
            image_url: Some("  ".to_string()),
            video_url: None,
        }
        .into_product();

        assert_eq!(product.code.as_str(), "DR-3300");
        assert_eq!(product.name, "Linen Kurti");
        assert_eq!(product.sizes.iter().map(String::as_str).collect::<Vec<_>>(), ["L", "M", "XL"]);
        assert!(product.image_url.is_none());
        assert!(product.validate().is_ok());
    }

    #[test]
    fn entry_without_name_fails_validation() {
        let product = CatalogEntry { code: "DR-1".to_string(), ..CatalogEntry::default() }
            .into_product();
        assert!(product.validate().is_err());
    }
}
