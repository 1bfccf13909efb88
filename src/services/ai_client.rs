//! Client for the external AI-analysis collaborator. The collaborator is
//! opaque, potentially slow, and allowed to fail independently of the rest of
//! the request; failures surface as upstream errors, never retried here.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::time::Duration;

use crate::config::AiConfig;
use crate::database::models::{Property, PropertyAiAnalysis};

#[derive(Debug, thiserror::Error)]
pub enum AiClientError {
    #[error("AI collaborator timed out")]
    Timeout,
    #[error("AI collaborator is not configured")]
    NotConfigured,
    #[error("AI collaborator failure: {0}")]
    Upstream(String),
    #[error("invalid AI collaborator response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait AiAnalyzer: Send + Sync {
    async fn analyze(&self, property: &Property) -> Result<PropertyAiAnalysis, AiClientError>;
}

/// Wire shape of the collaborator's response body.
#[derive(Debug, Deserialize)]
struct AnalysisPayload {
    confidence_score: f64,
    recommended_price: Decimal,
    market_analysis: String,
    risk_assessment: String,
    #[serde(default)]
    recommendations: Vec<String>,
}

/// HTTP implementation with a bounded request timeout.
pub struct HttpAiAnalyzer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAiAnalyzer {
    pub fn new(config: &AiConfig) -> Result<Self, AiClientError> {
        if config.analysis_url.is_empty() {
            return Err(AiClientError::NotConfigured);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AiClientError::Upstream(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.analysis_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AiAnalyzer for HttpAiAnalyzer {
    async fn analyze(&self, property: &Property) -> Result<PropertyAiAnalysis, AiClientError> {
        let url = format!("{}/analyze", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(property)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiClientError::Timeout
                } else {
                    AiClientError::Upstream(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(AiClientError::Upstream(format!(
                "analysis request returned {}",
                response.status()
            )));
        }

        let payload: AnalysisPayload = response
            .json()
            .await
            .map_err(|e| AiClientError::InvalidResponse(e.to_string()))?;

        Ok(PropertyAiAnalysis {
            property_id: property.id,
            confidence_score: payload.confidence_score,
            recommended_price: payload.recommended_price,
            market_analysis: payload.market_analysis,
            risk_assessment: payload.risk_assessment,
            recommendations: payload.recommendations,
            generated_at: Utc::now(),
        })
    }
}

/// Deterministic analyzer used when no collaborator URL is configured
/// (demo mode) and by the integration tests. Derives a plausible analysis
/// from the property's own figures.
pub struct HeuristicAiAnalyzer;

#[async_trait]
impl AiAnalyzer for HeuristicAiAnalyzer {
    async fn analyze(&self, property: &Property) -> Result<PropertyAiAnalysis, AiClientError> {
        let profit = property.potential_profit();
        let priced_fields = [
            property.purchase_price,
            property.arv,
            property.repair_estimate,
            property.holding_costs,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count();

        // More financial inputs means a more confident score.
        let confidence_score = 0.5 + 0.1 * priced_fields as f64;

        let recommended_price = property
            .arv
            .or(property.purchase_price)
            .map(|p| p * dec!(0.95))
            .unwrap_or_default();

        let (risk_assessment, recommendations) = if profit > Decimal::ZERO {
            (
                "low".to_string(),
                vec![
                    "Proceed with the deal at or below the recommended price".to_string(),
                    "Verify the repair estimate with a local contractor".to_string(),
                ],
            )
        } else {
            (
                "high".to_string(),
                vec![
                    "Renegotiate the purchase price before proceeding".to_string(),
                    "Re-run comparables to confirm the after-repair value".to_string(),
                ],
            )
        };

        Ok(PropertyAiAnalysis {
            property_id: property.id,
            confidence_score,
            recommended_price,
            market_analysis: format!(
                "Comparable sales in {} {} support an estimated margin of {}",
                property.city, property.state, profit
            ),
            risk_assessment,
            recommendations,
            generated_at: Utc::now(),
        })
    }
}
