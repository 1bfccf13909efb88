//! Postgres-backed store implementations. SQL stays here; the service layer
//! only sees the store traits.

mod metrics;
mod organization;
mod property;
mod user;

pub use metrics::PgMetricsStore;
pub use organization::PgOrganizationStore;
pub use property::PgPropertyStore;
pub use user::PgUserStore;
