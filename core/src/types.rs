//! Typed payloads for the passthrough endpoints.
//!
//! # Design
//! Passthrough endpoints accept any `Serialize` value whose JSON form is an
//! object, so these structs are a convenience rather than a requirement:
//! `serde_json::json!` maps work just as well. Optional fields are skipped
//! when unset so the server applies its own defaults.

use serde::{Deserialize, Serialize};

use crate::params::Params;

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Filters for `get_customers` and `get_plans`.
///
/// The server defaults `limit` to 100 and `order_key` to `id`. `before_id`
/// and `after_id` select records with ids below or above the given one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<OrderDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<u64>,
    /// Only honored by `get_customers`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Ordering accepted by `get_subscribers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberOrder {
    Asc,
    Desc,
    Rand,
}

/// Filters for `get_subscribers`. The server defaults `limit` to 20.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SubscriberOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_before: Option<u64>,
}

/// Payload for `create_customer`.
///
/// The five named fields are required by the API; any further documented
/// customer attribute can go in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub currency: String,
    #[serde(flatten)]
    pub extra: Params,
}

/// Payload for `subscribe_customer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub customer_id: u64,
    pub plan_id: u64,
    /// Defaults to 1 on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_id: Option<u64>,
    /// UNIX timestamp ending a trial period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_end: Option<i64>,
}
