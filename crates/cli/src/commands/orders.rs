use dokan_core::domain::order::OrderRecord;
use dokan_db::repositories::OrderRepository;
use dokan_db::SqlOrderRepository;
use serde_json::{json, Value};

use crate::commands::{build_runtime, load_config, open_pool, CommandResult, Failure};

pub const DEFAULT_LIMIT: u32 = 20;

pub fn run(limit: u32) -> CommandResult {
    let config = match load_config("orders") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime("orders") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let recent: Result<Vec<OrderRecord>, Failure> = SqlOrderRepository::new(pool.clone())
            .list_recent(limit.max(1))
            .await
            .map_err(|error| ("order_read", error.to_string(), 5u8));
        pool.close().await;
        recent
    });

    match result {
        Ok(orders) => CommandResult::success_with_data(
            "orders",
            format!("{} recent orders", orders.len()),
            Some(Value::Array(orders.iter().map(order_summary).collect())),
        ),
        Err(failure) => CommandResult::from_failure("orders", failure),
    }
}

fn order_summary(order: &OrderRecord) -> Value {
    json!({
        "id": order.id.0,
        "contact_id": order.contact_id.as_str(),
        "customer_name": order.draft.customer_name,
        "phone": order.draft.phone,
        "product_code": order.draft.product_code,
        "size": order.draft.size,
        "quantity": order.draft.quantity,
        "city_zone": order.draft.city_zone.as_str(),
        "total": order.breakdown.map(|breakdown| breakdown.total),
        "status": order.status.as_str(),
        "created_at": order.created_at.to_rfc3339(),
    })
}
