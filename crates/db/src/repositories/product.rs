use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::Row;

use dokan_core::domain::product::{Product, ProductCode};
use dokan_core::errors::ApplicationError;
use dokan_core::ports::ProductLookup;

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str =
    "code, name, price, sizes_json, color, stock_label, image_url, video_url";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let code: String = row.try_get("code").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price: i64 = row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let sizes_json: String =
        row.try_get("sizes_json").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let color: String = row.try_get("color").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let stock_label: String =
        row.try_get("stock_label").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let image_url: Option<String> =
        row.try_get("image_url").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let video_url: Option<String> =
        row.try_get("video_url").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let price = u64::try_from(price)
        .map_err(|_| RepositoryError::Decode(format!("negative price for product `{code}`")))?;
    let sizes: BTreeSet<String> = serde_json::from_str(&sizes_json)
        .map_err(|e| RepositoryError::Decode(format!("sizes for product `{code}`: {e}")))?;

    Ok(Product {
        code: ProductCode::new(&code),
        name,
        price,
        sizes,
        color,
        stock_label,
        image_url,
        video_url,
    })
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn find_by_code(&self, code: &ProductCode) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE code = ?"))
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let price = i64::try_from(product.price).map_err(|_| {
            RepositoryError::Decode(format!("price of `{}` does not fit storage", product.code))
        })?;
        let sizes_json = serde_json::to_string(&product.sizes)
            .map_err(|e| RepositoryError::Decode(e.to_string()))?;

        sqlx::query(
            "INSERT INTO product (code, name, price, sizes_json, color, stock_label,
                                  image_url, video_url, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(code) DO UPDATE SET
                 name = excluded.name,
                 price = excluded.price,
                 sizes_json = excluded.sizes_json,
                 color = excluded.color,
                 stock_label = excluded.stock_label,
                 image_url = excluded.image_url,
                 video_url = excluded.video_url,
                 updated_at = excluded.updated_at",
        )
        .bind(product.code.as_str())
        .bind(&product.name)
        .bind(price)
        .bind(&sizes_json)
        .bind(&product.color)
        .bind(&product.stock_label)
        .bind(&product.image_url)
        .bind(&product.video_url)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM product ORDER BY code"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_product).collect()
    }
}

#[async_trait::async_trait]
impl ProductLookup for SqlProductRepository {
    async fn find(&self, code: &ProductCode) -> Result<Option<Product>, ApplicationError> {
        Ok(self.find_by_code(code).await?)
    }
}
