use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commerce::pricing::PriceBreakdown;
use crate::domain::contact::ContactId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityZone {
    Inside,
    #[default]
    Outside,
}

impl CityZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Outside => "outside",
        }
    }
}

/// Fields captured from a single free-form order message. Drafts are never
/// merged across messages; absent fields stay empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub product_code: String,
    pub size: String,
    pub quantity: u32,
    pub city_zone: CityZone,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            phone: String::new(),
            address: String::new(),
            product_code: String::new(),
            size: String::new(),
            quantity: 1,
            city_zone: CityZone::Outside,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Orders enter the log as `Pending`; confirming or cancelling them happens
/// with the shop's own tooling, outside the assistant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// A submitted order as kept by the order log. The routing engine never reads
/// these back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub contact_id: ContactId,
    pub draft: OrderDraft,
    pub unit_price: Option<u64>,
    pub breakdown: Option<PriceBreakdown>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
