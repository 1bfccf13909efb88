use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Property lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Active,
    Archived,
}

impl Default for PropertyStatus {
    fn default() -> Self {
        PropertyStatus::Active
    }
}

/// A property record as persisted. `potential_profit` is intentionally absent:
/// it is derived on every read from the current field values.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: Uuid,
    pub address: String,
    pub unit: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub county: String,
    pub property_type: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<Decimal>,
    pub square_feet: Option<i64>,
    pub lot_size: Option<Decimal>,
    pub year_built: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub arv: Option<Decimal>,
    pub repair_estimate: Option<Decimal>,
    pub holding_costs: Option<Decimal>,
    pub transaction_type: String,
    pub assignment_fee: Option<Decimal>,
    pub description: String,
    pub seller_notes: Option<String>,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// arv − purchase_price − repair_estimate − holding_costs, with missing
    /// figures treated as zero. Never persisted.
    pub fn potential_profit(&self) -> Decimal {
        self.arv.unwrap_or_default()
            - self.purchase_price.unwrap_or_default()
            - self.repair_estimate.unwrap_or_default()
            - self.holding_costs.unwrap_or_default()
    }
}
