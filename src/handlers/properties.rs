use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::models::{Property, PropertyStatus};
use crate::error::ApiError;
use crate::extract::{Json, Query};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::pagination::{PageParams, PageQuery};
use crate::services::property_service::{NewProperty, PropertyPatch};
use crate::state::AppState;

/// Raw creation payload. Numeric fields arrive as JSON numbers or numeric
/// strings (the original clients send both), so they are validated here at
/// the router boundary rather than left to serde.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePropertyRequest {
    pub address: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<Value>,
    pub bathrooms: Option<Value>,
    pub square_feet: Option<Value>,
    pub lot_size: Option<Value>,
    pub year_built: Option<Value>,
    pub purchase_price: Option<Value>,
    pub arv: Option<Value>,
    pub repair_estimate: Option<Value>,
    pub holding_costs: Option<Value>,
    pub transaction_type: Option<String>,
    pub assignment_fee: Option<Value>,
    pub description: Option<String>,
    pub seller_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePropertyRequest {
    pub address: Option<String>,
    pub unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<Value>,
    pub bathrooms: Option<Value>,
    pub square_feet: Option<Value>,
    pub lot_size: Option<Value>,
    pub year_built: Option<Value>,
    pub purchase_price: Option<Value>,
    pub arv: Option<Value>,
    pub repair_estimate: Option<Value>,
    pub holding_costs: Option<Value>,
    pub transaction_type: Option<String>,
    pub assignment_fee: Option<Value>,
    pub description: Option<String>,
    pub seller_notes: Option<String>,
    pub status: Option<String>,
}

impl CreatePropertyRequest {
    pub fn validate(self) -> Result<NewProperty, ApiError> {
        let mut errors: HashMap<String, String> = HashMap::new();

        let required = |errors: &mut HashMap<String, String>, name: &str, value: Option<String>| {
            match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                Some(v) => v,
                None => {
                    errors.insert(name.to_string(), "This field is required".to_string());
                    String::new()
                }
            }
        };

        let address = required(&mut errors, "address", self.address);
        let city = required(&mut errors, "city", self.city);
        let state = required(&mut errors, "state", self.state);
        let zip = required(&mut errors, "zip", self.zip);
        let county = required(&mut errors, "county", self.county);
        let property_type = required(&mut errors, "property_type", self.property_type);
        let transaction_type = required(&mut errors, "transaction_type", self.transaction_type);
        let description = required(&mut errors, "description", self.description);

        let bedrooms = parse_i32(&mut errors, "bedrooms", self.bedrooms);
        let bathrooms = parse_decimal(&mut errors, "bathrooms", self.bathrooms);
        let square_feet = parse_i64(&mut errors, "square_feet", self.square_feet);
        let lot_size = parse_decimal(&mut errors, "lot_size", self.lot_size);
        let year_built = parse_i32(&mut errors, "year_built", self.year_built);
        let purchase_price = parse_decimal(&mut errors, "purchase_price", self.purchase_price);
        let arv = parse_decimal(&mut errors, "arv", self.arv);
        let repair_estimate = parse_decimal(&mut errors, "repair_estimate", self.repair_estimate);
        let holding_costs = parse_decimal(&mut errors, "holding_costs", self.holding_costs);
        let assignment_fee = parse_decimal(&mut errors, "assignment_fee", self.assignment_fee);

        if !errors.is_empty() {
            return Err(ApiError::validation_fields("Invalid property payload", errors));
        }

        Ok(NewProperty {
            address,
            unit: self.unit.filter(|v| !v.trim().is_empty()),
            city,
            state,
            zip,
            county,
            property_type,
            bedrooms,
            bathrooms,
            square_feet,
            lot_size,
            year_built,
            purchase_price,
            arv,
            repair_estimate,
            holding_costs,
            transaction_type,
            assignment_fee,
            description,
            seller_notes: self.seller_notes.filter(|v| !v.trim().is_empty()),
        })
    }
}

impl UpdatePropertyRequest {
    pub fn validate(self) -> Result<PropertyPatch, ApiError> {
        let mut errors: HashMap<String, String> = HashMap::new();

        let status = match self.status.as_deref() {
            None => None,
            Some("active") => Some(PropertyStatus::Active),
            Some("archived") => Some(PropertyStatus::Archived),
            Some(other) => {
                errors.insert(
                    "status".to_string(),
                    format!("Invalid status '{}' (expected active or archived)", other),
                );
                None
            }
        };

        let patch = PropertyPatch {
            address: self.address,
            unit: self.unit,
            city: self.city,
            state: self.state,
            zip: self.zip,
            county: self.county,
            property_type: self.property_type,
            bedrooms: parse_i32(&mut errors, "bedrooms", self.bedrooms),
            bathrooms: parse_decimal(&mut errors, "bathrooms", self.bathrooms),
            square_feet: parse_i64(&mut errors, "square_feet", self.square_feet),
            lot_size: parse_decimal(&mut errors, "lot_size", self.lot_size),
            year_built: parse_i32(&mut errors, "year_built", self.year_built),
            purchase_price: parse_decimal(&mut errors, "purchase_price", self.purchase_price),
            arv: parse_decimal(&mut errors, "arv", self.arv),
            repair_estimate: parse_decimal(&mut errors, "repair_estimate", self.repair_estimate),
            holding_costs: parse_decimal(&mut errors, "holding_costs", self.holding_costs),
            transaction_type: self.transaction_type,
            assignment_fee: parse_decimal(&mut errors, "assignment_fee", self.assignment_fee),
            description: self.description,
            seller_notes: self.seller_notes,
            status,
        };

        if !errors.is_empty() {
            return Err(ApiError::validation_fields("Invalid property payload", errors));
        }
        Ok(patch)
    }
}

fn parse_decimal(
    errors: &mut HashMap<String, String>,
    field: &str,
    value: Option<Value>,
) -> Option<Decimal> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match Decimal::from_str(&n.to_string()) {
            Ok(d) => Some(d),
            Err(_) => {
                errors.insert(field.to_string(), format!("Invalid numeric value: {}", n));
                None
            }
        },
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match Decimal::from_str(s.trim()) {
            Ok(d) => Some(d),
            Err(_) => {
                errors.insert(field.to_string(), format!("Invalid numeric value: {}", s));
                None
            }
        },
        Some(other) => {
            errors.insert(field.to_string(), format!("Invalid numeric value: {}", other));
            None
        }
    }
}

fn parse_i64(errors: &mut HashMap<String, String>, field: &str, value: Option<Value>) -> Option<i64> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => Some(v),
            None => {
                errors.insert(field.to_string(), format!("Invalid integer value: {}", n));
                None
            }
        },
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => {
                errors.insert(field.to_string(), format!("Invalid integer value: {}", s));
                None
            }
        },
        Some(other) => {
            errors.insert(field.to_string(), format!("Invalid integer value: {}", other));
            None
        }
    }
}

fn parse_i32(errors: &mut HashMap<String, String>, field: &str, value: Option<Value>) -> Option<i32> {
    parse_i64(errors, field, value).and_then(|v| match i32::try_from(v) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.insert(field.to_string(), format!("Value out of range: {}", v));
            None
        }
    })
}

/// Serialized property with the derived potential_profit attached. The figure
/// is recomputed from the current field values on every read.
pub fn property_body(property: &Property) -> Value {
    let mut body = serde_json::to_value(property).unwrap_or(Value::Null);
    if let Value::Object(ref mut map) = body {
        map.insert("potential_profit".to_string(), json!(property.potential_profit()));
    }
    body
}

fn parse_property_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::validation(format!("'{}' is not a valid property id", raw)))
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|e| ApiError::validation(format!("Invalid request body: {}", e)))
}

/// GET /properties - paginated listing
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Value> {
    let params = PageParams::from_query(&query, &state.config.api)?;
    let (properties, meta) = state.properties.list(params).await?;

    Ok(ApiResponse::success(
        "Properties retrieved successfully",
        json!({
            "properties": properties.iter().map(property_body).collect::<Vec<_>>(),
            "pagination": meta,
        }),
    ))
}

/// POST /properties - create
pub async fn create(State(state): State<AppState>, Json(payload): Json<Value>) -> ApiResult<Value> {
    let input = decode::<CreatePropertyRequest>(payload)?.validate()?;
    let property = state.properties.create(input).await?;

    Ok(ApiResponse::created(
        "Property created successfully",
        property_body(&property),
    ))
}

/// GET /properties/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_property_id(&id)?;
    let property = state.properties.get(id).await?;

    Ok(ApiResponse::success(
        "Property retrieved successfully",
        property_body(&property),
    ))
}

/// PUT /properties/:id - partial update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> ApiResult<Value> {
    let id = parse_property_id(&id)?;
    let patch = decode::<UpdatePropertyRequest>(payload)?.validate()?;
    let property = state.properties.update(id, patch).await?;

    Ok(ApiResponse::success(
        "Property updated successfully",
        property_body(&property),
    ))
}

/// DELETE /properties/:id - hard delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_property_id(&id)?;
    state.properties.delete(id).await?;

    Ok(ApiResponse::success("Property deleted successfully", Value::Null))
}

/// GET /properties/:id/ai-analysis
pub async fn ai_analysis(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_property_id(&id)?;
    let analysis = state.properties.ai_analysis(id).await?;

    Ok(ApiResponse::success(
        "AI analysis retrieved successfully",
        serde_json::to_value(analysis).unwrap_or(Value::Null),
    ))
}
