pub mod analysis;
pub mod metrics;
pub mod organization;
pub mod property;
pub mod user;

pub use analysis::PropertyAiAnalysis;
pub use metrics::{AiPerformanceSnapshot, BusinessMetricsSnapshot, ComplianceStatus, EntityCounts};
pub use organization::{Organization, OrganizationStatusSummary};
pub use property::{Property, PropertyStatus};
pub use user::User;
