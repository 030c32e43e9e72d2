use chrono::{DateTime, Utc};
use sqlx::Row;

use dokan_core::commerce::PriceBreakdown;
use dokan_core::domain::contact::ContactId;
use dokan_core::domain::order::{CityZone, OrderDraft, OrderId, OrderRecord, OrderStatus};
use dokan_core::errors::ApplicationError;
use dokan_core::ports::OrderLog;

use super::{OrderRepository, RepositoryError};
use crate::DbPool;

pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_storage(value: u64, column: &str) -> Result<i64, RepositoryError> {
    i64::try_from(value)
        .map_err(|_| RepositoryError::Decode(format!("{column} does not fit storage")))
}

fn from_storage(value: Option<i64>, column: &str) -> Result<Option<u64>, RepositoryError> {
    value
        .map(|raw| {
            u64::try_from(raw).map_err(|_| RepositoryError::Decode(format!("negative {column}")))
        })
        .transpose()
}

fn row_to_order(row: &sqlx::sqlite::SqliteRow) -> Result<OrderRecord, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::Decode(e.to_string());

    let id: String = row.try_get("id").map_err(decode)?;
    let contact_id: String = row.try_get("contact_id").map_err(decode)?;
    let quantity: i64 = row.try_get("quantity").map_err(decode)?;
    let city_zone: String = row.try_get("city_zone").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;
    let created_at_str: String = row.try_get("created_at").map_err(decode)?;

    let draft = OrderDraft {
        customer_name: row.try_get("customer_name").map_err(decode)?,
        phone: row.try_get("phone").map_err(decode)?,
        address: row.try_get("address").map_err(decode)?,
        product_code: row.try_get("product_code").map_err(decode)?,
        size: row.try_get("size").map_err(decode)?,
        quantity: u32::try_from(quantity)
            .map_err(|_| RepositoryError::Decode(format!("invalid quantity for order `{id}`")))?,
        city_zone: if city_zone == "inside" { CityZone::Inside } else { CityZone::Outside },
    };

    let unit_price = from_storage(row.try_get("unit_price").map_err(decode)?, "unit_price")?;
    let subtotal = from_storage(row.try_get("subtotal").map_err(decode)?, "subtotal")?;
    let delivery_fee = from_storage(row.try_get("delivery_fee").map_err(decode)?, "delivery_fee")?;
    let total = from_storage(row.try_get("total").map_err(decode)?, "total")?;
    let breakdown = match (subtotal, delivery_fee, total) {
        (Some(subtotal), Some(delivery_fee), Some(total)) => {
            Some(PriceBreakdown { subtotal, delivery_fee, total })
        }
        _ => None,
    };

    let status = OrderStatus::parse(&status).ok_or_else(|| {
        RepositoryError::Decode(format!("unknown status `{status}` for order `{id}`"))
    })?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(OrderRecord {
        id: OrderId(id),
        contact_id: ContactId(contact_id),
        draft,
        unit_price,
        breakdown,
        status,
        created_at,
    })
}

#[async_trait::async_trait]
impl OrderRepository for SqlOrderRepository {
    async fn append(&self, order: OrderRecord) -> Result<(), RepositoryError> {
        let unit_price = order.unit_price.map(|value| to_storage(value, "unit_price")).transpose()?;
        let (subtotal, delivery_fee, total) = match order.breakdown {
            Some(breakdown) => (
                Some(to_storage(breakdown.subtotal, "subtotal")?),
                Some(to_storage(breakdown.delivery_fee, "delivery_fee")?),
                Some(to_storage(breakdown.total, "total")?),
            ),
            None => (None, None, None),
        };

        sqlx::query(
            "INSERT INTO customer_order (id, contact_id, customer_name, phone, address,
                                         product_code, size, quantity, city_zone, unit_price,
                                         subtotal, delivery_fee, total, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&order.id.0)
        .bind(order.contact_id.as_str())
        .bind(&order.draft.customer_name)
        .bind(&order.draft.phone)
        .bind(&order.draft.address)
        .bind(&order.draft.product_code)
        .bind(&order.draft.size)
        .bind(i64::from(order.draft.quantity))
        .bind(order.draft.city_zone.as_str())
        .bind(unit_price)
        .bind(subtotal)
        .bind(delivery_fee)
        .bind(total)
        .bind(order.status.as_str())
        .bind(order.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<OrderRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, contact_id, customer_name, phone, address, product_code, size, quantity,
                    city_zone, unit_price, subtotal, delivery_fee, total, status, created_at
             FROM customer_order
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_order).collect()
    }
}

#[async_trait::async_trait]
impl OrderLog for SqlOrderRepository {
    async fn append(&self, order: OrderRecord) -> Result<(), ApplicationError> {
        OrderRepository::append(self, order).await?;
        Ok(())
    }
}
