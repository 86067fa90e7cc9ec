//! The PayWhirl endpoint catalog.
//!
//! Each remote operation is one `Endpoint` constant: a verb, a path template
//! and the shape of parameters it takes. `PayWhirl` methods are thin callers
//! that pick a constant, shape their arguments and hand both to
//! `PayWhirl::call`.
//!
//! Templates are stored without a leading separator and contain at most one
//! `{id}` placeholder.

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::Params;

const ID_PLACEHOLDER: &str = "{id}";

/// How an endpoint's parameters are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    /// No parameters are sent.
    None,
    /// The caller's mapping is forwarded without reshaping.
    Passthrough,
    /// The client method builds a mapping with exactly these keys
    /// (optional keys are left out when unset).
    Fields(&'static [&'static str]),
}

/// One remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub shape: ParamShape,
}

impl Endpoint {
    const fn get(name: &'static str, path: &'static str, shape: ParamShape) -> Self {
        Self {
            name,
            method: HttpMethod::Get,
            path,
            shape,
        }
    }

    const fn post(name: &'static str, path: &'static str, shape: ParamShape) -> Self {
        Self {
            name,
            method: HttpMethod::Post,
            path,
            shape,
        }
    }

    /// Whether the template takes an `{id}` segment.
    pub fn takes_id(&self) -> bool {
        self.path.contains(ID_PLACEHOLDER)
    }

    /// Whether `params` fits this endpoint's declared shape.
    pub fn accepts(&self, params: &Params) -> bool {
        match self.shape {
            ParamShape::None => params.is_empty(),
            ParamShape::Passthrough => true,
            ParamShape::Fields(keys) => params.keys().all(|k| keys.contains(&k.as_str())),
        }
    }

    /// Substitute `id` into the template.
    ///
    /// Supplying an id to a template without a placeholder, or omitting one
    /// the template needs, is rejected rather than silently producing a
    /// different path.
    pub fn render_path(&self, id: Option<&str>) -> Result<String, ApiError> {
        match (self.takes_id(), id) {
            (true, Some(id)) if !id.is_empty() => Ok(self.path.replace(ID_PLACEHOLDER, id)),
            (true, _) => Err(ApiError::InvalidParams(format!(
                "{} requires an id",
                self.name
            ))),
            (false, None) => Ok(self.path.to_string()),
            (false, Some(_)) => Err(ApiError::InvalidParams(format!(
                "{} does not take an id",
                self.name
            ))),
        }
    }
}

use ParamShape::{Fields, None as NoParams, Passthrough};

// Customers
pub const GET_CUSTOMERS: Endpoint = Endpoint::get("get_customers", "customers", Passthrough);
pub const GET_CUSTOMER: Endpoint = Endpoint::get("get_customer", "customer/{id}", NoParams);
pub const CREATE_CUSTOMER: Endpoint =
    Endpoint::post("create_customer", "create/customer", Passthrough);
pub const UPDATE_CUSTOMER: Endpoint =
    Endpoint::post("update_customer", "update/customer", Passthrough);

// Questions and answers
pub const GET_QUESTIONS: Endpoint = Endpoint::get("get_questions", "questions", Fields(&["limit"]));
pub const UPDATE_ANSWER: Endpoint = Endpoint::post("update_answer", "update/answer", Passthrough);
pub const GET_ANSWERS: Endpoint =
    Endpoint::get("get_answers", "answers", Fields(&["customer_id"]));

// Plans
pub const GET_PLANS: Endpoint = Endpoint::get("get_plans", "plans", Passthrough);
pub const GET_PLAN: Endpoint = Endpoint::get("get_plan", "plan/{id}", NoParams);
pub const CREATE_PLAN: Endpoint = Endpoint::post("create_plan", "create/plan", Passthrough);
pub const UPDATE_PLAN: Endpoint = Endpoint::post("update_plan", "update/plan", Passthrough);

// Subscriptions
pub const GET_SUBSCRIPTIONS: Endpoint =
    Endpoint::get("get_subscriptions", "subscriptions/{id}", NoParams);
pub const GET_SUBSCRIPTION: Endpoint =
    Endpoint::get("get_subscription", "subscription/{id}", NoParams);
pub const SUBSCRIBE_CUSTOMER: Endpoint =
    Endpoint::post("subscribe_customer", "subscribe/customer", Passthrough);
pub const UPDATE_SUBSCRIPTION: Endpoint = Endpoint::post(
    "update_subscription",
    "update/subscription",
    Fields(&["subscription_id", "plan_id", "quantity"]),
);
pub const UNSUBSCRIBE_CUSTOMER: Endpoint = Endpoint::post(
    "unsubscribe_customer",
    "unsubscribe/customer",
    Fields(&["subscription_id"]),
);
pub const GET_SUBSCRIBERS: Endpoint = Endpoint::get("get_subscribers", "subscribers", Passthrough);

// Invoices
pub const GET_INVOICE: Endpoint = Endpoint::get("get_invoice", "invoice/{id}", NoParams);
pub const GET_INVOICES: Endpoint = Endpoint::get("get_invoices", "invoices/{id}", NoParams);

// Gateways and charges
pub const GET_GATEWAYS: Endpoint = Endpoint::get("get_gateways", "gateways", NoParams);
pub const GET_GATEWAY: Endpoint = Endpoint::get("get_gateway", "gateway/{id}", NoParams);
pub const CREATE_CHARGE: Endpoint = Endpoint::post("create_charge", "create/charge", Passthrough);
pub const GET_CHARGE: Endpoint = Endpoint::get("get_charge", "charge/{id}", NoParams);

// Cards
pub const GET_CARDS: Endpoint = Endpoint::get("get_cards", "cards/{id}", NoParams);
pub const GET_CARD: Endpoint = Endpoint::get("get_card", "card/{id}", NoParams);
pub const CREATE_CARD: Endpoint = Endpoint::post("create_card", "create/card", Passthrough);
pub const DELETE_CARD: Endpoint = Endpoint::post("delete_card", "delete/card", Fields(&["id"]));

// Promos
pub const GET_PROMOS: Endpoint = Endpoint::get("get_promos", "promo", NoParams);
pub const GET_PROMO: Endpoint = Endpoint::get("get_promo", "promo/{id}", NoParams);
pub const CREATE_PROMO: Endpoint = Endpoint::post("create_promo", "create/promo", Passthrough);
pub const DELETE_PROMO: Endpoint = Endpoint::post("delete_promo", "delete/promo", Fields(&["id"]));

// Email
pub const GET_EMAIL_TEMPLATE: Endpoint =
    Endpoint::get("get_email_template", "email/{id}", NoParams);
pub const SEND_EMAIL: Endpoint = Endpoint::post("send_email", "send-email", Passthrough);

// Account
pub const GET_ACCOUNT: Endpoint = Endpoint::get("get_account", "account", NoParams);
pub const GET_STATS: Endpoint = Endpoint::get("get_stats", "stats", NoParams);

// Shipping and tax
pub const GET_SHIPPING_RULES: Endpoint =
    Endpoint::get("get_shipping_rules", "shipping/", NoParams);
pub const GET_SHIPPING_RULE: Endpoint =
    Endpoint::get("get_shipping_rule", "shipping/{id}", NoParams);
pub const GET_TAX_RULES: Endpoint = Endpoint::get("get_tax_rules", "tax", NoParams);
pub const GET_TAX_RULE: Endpoint = Endpoint::get("get_tax_rule", "tax/{id}", NoParams);

// MultiAuth
pub const GET_MULTI_AUTH_TOKEN: Endpoint =
    Endpoint::post("get_multi_auth_token", "multiauth", Passthrough);

/// Every endpoint the client exposes, in catalog order.
pub const ENDPOINTS: &[Endpoint] = &[
    GET_CUSTOMERS,
    GET_CUSTOMER,
    CREATE_CUSTOMER,
    UPDATE_CUSTOMER,
    GET_QUESTIONS,
    UPDATE_ANSWER,
    GET_ANSWERS,
    GET_PLANS,
    GET_PLAN,
    CREATE_PLAN,
    UPDATE_PLAN,
    GET_SUBSCRIPTIONS,
    GET_SUBSCRIPTION,
    SUBSCRIBE_CUSTOMER,
    UPDATE_SUBSCRIPTION,
    UNSUBSCRIBE_CUSTOMER,
    GET_SUBSCRIBERS,
    GET_INVOICE,
    GET_INVOICES,
    GET_GATEWAYS,
    GET_GATEWAY,
    CREATE_CHARGE,
    GET_CHARGE,
    GET_CARDS,
    GET_CARD,
    CREATE_CARD,
    DELETE_CARD,
    GET_PROMOS,
    GET_PROMO,
    CREATE_PROMO,
    DELETE_PROMO,
    GET_EMAIL_TEMPLATE,
    SEND_EMAIL,
    GET_ACCOUNT,
    GET_STATS,
    GET_SHIPPING_RULES,
    GET_SHIPPING_RULE,
    GET_TAX_RULES,
    GET_TAX_RULE,
    GET_MULTI_AUTH_TOKEN,
];

/// Look up an endpoint by its method name.
pub fn by_name(name: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().find(|e| e.name == name)
}
