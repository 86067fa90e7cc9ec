//! Authenticated request dispatch and response normalization for PayWhirl.
//!
//! # Design
//! `PayWhirl` holds immutable credentials, a base URL, a per-request timeout
//! and a shared `Transport`. Dispatch is split into a pure `build_request`,
//! a single `Transport::execute` round-trip and a pure `parse_response`, so
//! everything except the network hop is deterministic.
//!
//! Every endpoint method funnels into `call`, which renders the endpoint's
//! path and hands it to `dispatch_get` or `dispatch_post`. A 200 response is
//! decoded as JSON into `Reply::Data`; any other status comes back as
//! `Reply::Status` with the raw body untouched.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::endpoint::{self, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{encode_query, field, to_params, Params};
use crate::transport::{Transport, UreqTransport};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.paywhirl.com";

/// Timeout applied to each request unless the builder overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size `get_questions` used when callers had no preference.
pub const DEFAULT_QUESTION_LIMIT: u32 = 100;

const API_KEY_HEADER: &str = "api_key";
const API_SECRET_HEADER: &str = "api_secret";

/// Account key and secret, sent verbatim on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Outcome of a dispatch that received an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// HTTP 200 with its body decoded as JSON.
    Data(Value),
    /// Any other status. `body` is the raw response text, never parsed.
    Status { code: u16, body: String },
}

impl Reply {
    pub fn data(&self) -> Option<&Value> {
        match self {
            Reply::Data(value) => Some(value),
            Reply::Status { .. } => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Reply::Data(_) => None,
            Reply::Status { code, .. } => Some(*code),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Data(_))
    }

    /// Strict view: the payload, or the status as an `ApiError`.
    pub fn into_result(self) -> Result<Value, ApiError> {
        match self {
            Reply::Data(value) => Ok(value),
            Reply::Status { code: 404, .. } => Err(ApiError::NotFound),
            Reply::Status { code, body } => Err(ApiError::Http { status: code, body }),
        }
    }
}

/// Builder for `PayWhirl`.
pub struct PayWhirlBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl PayWhirlBuilder {
    /// API root; a trailing `/` is ignored.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-request timeout. `None` lets a request block until the remote
    /// end responds or the connection drops.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> PayWhirl {
        PayWhirl {
            credentials: self.credentials,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(UreqTransport::new())),
        }
    }
}

/// Blocking client for the PayWhirl REST API.
///
/// Cheap to clone; clones share the transport. Safe to use from several
/// threads at once since nothing is mutated after construction.
#[derive(Clone)]
pub struct PayWhirl {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for PayWhirl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayWhirl")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PayWhirl {
    /// Client for the production API with the default timeout and transport.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::builder(key, secret).build()
    }

    pub fn builder(key: impl Into<String>, secret: impl Into<String>) -> PayWhirlBuilder {
        PayWhirlBuilder {
            credentials: Credentials::new(key, secret),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            transport: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Describe the request for `path` without sending it.
    ///
    /// Base URL and path are joined with exactly one `/`. Parameters go on
    /// the query string for POST as well as GET; no body is ever attached.
    pub fn build_request(&self, method: HttpMethod, path: &str, params: &Params) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            headers: vec![
                (API_KEY_HEADER.to_string(), self.credentials.key.clone()),
                (API_SECRET_HEADER.to_string(), self.credentials.secret.clone()),
            ],
            query: encode_query(params),
            timeout: self.timeout,
        }
    }

    /// Normalize a response: 200 decodes to `Reply::Data`, anything else is
    /// `Reply::Status`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Reply, ApiError> {
        if response.status != 200 {
            return Ok(Reply::Status {
                code: response.status,
                body: response.body,
            });
        }
        trace!(len = response.body.len(), "decoding response body");
        serde_json::from_str(&response.body)
            .map(Reply::Data)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn dispatch_get(&self, path: &str, params: &Params) -> Result<Reply, ApiError> {
        self.dispatch(HttpMethod::Get, path, params)
    }

    pub fn dispatch_post(&self, path: &str, params: &Params) -> Result<Reply, ApiError> {
        self.dispatch(HttpMethod::Post, path, params)
    }

    fn dispatch(&self, method: HttpMethod, path: &str, params: &Params) -> Result<Reply, ApiError> {
        let request = self.build_request(method, path, params);
        debug!(
            method = method.as_str(),
            url = %request.url,
            params = params.len(),
            "dispatching request"
        );
        let response = self.transport.execute(request)?;
        debug!(status = response.status, "received response");
        self.parse_response(response)
    }

    /// Send `params` to `endpoint`, substituting `id` into its path.
    pub fn call(
        &self,
        endpoint: &Endpoint,
        id: Option<&str>,
        params: &Params,
    ) -> Result<Reply, ApiError> {
        let path = endpoint.render_path(id)?;
        debug_assert!(
            endpoint.accepts(params),
            "{} sent keys outside its declared shape",
            endpoint.name
        );
        match endpoint.method {
            HttpMethod::Get => self.dispatch_get(&path, params),
            HttpMethod::Post => self.dispatch_post(&path, params),
        }
    }

    fn call_plain(&self, endpoint: &Endpoint) -> Result<Reply, ApiError> {
        self.call(endpoint, None, &Params::new())
    }

    fn call_id(&self, endpoint: &Endpoint, id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call(endpoint, Some(&id.to_string()), &Params::new())
    }

    fn call_with<T: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        payload: &T,
    ) -> Result<Reply, ApiError> {
        self.call(endpoint, None, &to_params(payload)?)
    }

    // Customers

    /// List customers. Accepts `ListQuery` or any mapping with `limit`,
    /// `order_key`, `order_direction`, `before_id`, `after_id`, `keyword`.
    pub fn get_customers<T: Serialize + ?Sized>(&self, query: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::GET_CUSTOMERS, query)
    }

    pub fn get_customer(&self, customer_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_CUSTOMER, customer_id)
    }

    pub fn create_customer<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::CREATE_CUSTOMER, data)
    }

    /// Update a customer; `data` must include the customer's `id`.
    pub fn update_customer<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::UPDATE_CUSTOMER, data)
    }

    // Questions and answers

    pub fn get_questions(&self, limit: u32) -> Result<Reply, ApiError> {
        self.call(&endpoint::GET_QUESTIONS, None, &field("limit", limit)?)
    }

    pub fn update_answer<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::UPDATE_ANSWER, data)
    }

    pub fn get_answers(&self, customer_id: impl Serialize) -> Result<Reply, ApiError> {
        self.call(&endpoint::GET_ANSWERS, None, &field("customer_id", customer_id)?)
    }

    // Plans

    pub fn get_plans<T: Serialize + ?Sized>(&self, query: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::GET_PLANS, query)
    }

    pub fn get_plan(&self, plan_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_PLAN, plan_id)
    }

    pub fn create_plan<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::CREATE_PLAN, data)
    }

    pub fn update_plan<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::UPDATE_PLAN, data)
    }

    // Subscriptions

    /// Subscriptions belonging to one customer.
    pub fn get_subscriptions(&self, customer_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_SUBSCRIPTIONS, customer_id)
    }

    pub fn get_subscription(&self, subscription_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_SUBSCRIPTION, subscription_id)
    }

    pub fn subscribe_customer<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::SUBSCRIBE_CUSTOMER, data)
    }

    /// Move a subscription to another plan. `quantity` is only sent when set.
    pub fn update_subscription(
        &self,
        subscription_id: impl Serialize,
        plan_id: impl Serialize,
        quantity: Option<u32>,
    ) -> Result<Reply, ApiError> {
        let mut params = field("subscription_id", subscription_id)?;
        params.extend(field("plan_id", plan_id)?);
        if let Some(quantity) = quantity {
            params.insert("quantity".to_string(), quantity.into());
        }
        self.call(&endpoint::UPDATE_SUBSCRIPTION, None, &params)
    }

    pub fn unsubscribe_customer(&self, subscription_id: impl Serialize) -> Result<Reply, ApiError> {
        let params = field("subscription_id", subscription_id)?;
        self.call(&endpoint::UNSUBSCRIBE_CUSTOMER, None, &params)
    }

    pub fn get_subscribers<T: Serialize + ?Sized>(&self, query: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::GET_SUBSCRIBERS, query)
    }

    // Invoices

    pub fn get_invoice(&self, invoice_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_INVOICE, invoice_id)
    }

    /// Invoices belonging to one customer.
    pub fn get_invoices(&self, customer_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_INVOICES, customer_id)
    }

    // Gateways and charges

    pub fn get_gateways(&self) -> Result<Reply, ApiError> {
        self.call_plain(&endpoint::GET_GATEWAYS)
    }

    pub fn get_gateway(&self, gateway_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_GATEWAY, gateway_id)
    }

    pub fn create_charge<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::CREATE_CHARGE, data)
    }

    pub fn get_charge(&self, charge_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_CHARGE, charge_id)
    }

    // Cards

    /// Cards belonging to one customer.
    pub fn get_cards(&self, customer_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_CARDS, customer_id)
    }

    pub fn get_card(&self, card_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_CARD, card_id)
    }

    pub fn create_card<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::CREATE_CARD, data)
    }

    pub fn delete_card(&self, card_id: impl Serialize) -> Result<Reply, ApiError> {
        self.call(&endpoint::DELETE_CARD, None, &field("id", card_id)?)
    }

    // Promos

    pub fn get_promos(&self) -> Result<Reply, ApiError> {
        self.call_plain(&endpoint::GET_PROMOS)
    }

    pub fn get_promo(&self, promo_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_PROMO, promo_id)
    }

    pub fn create_promo<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::CREATE_PROMO, data)
    }

    pub fn delete_promo(&self, promo_id: impl Serialize) -> Result<Reply, ApiError> {
        self.call(&endpoint::DELETE_PROMO, None, &field("id", promo_id)?)
    }

    // Email

    pub fn get_email_template(&self, template_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_EMAIL_TEMPLATE, template_id)
    }

    /// Send a system email from one of the account's templates. The accepted
    /// keys depend on the template.
    pub fn send_email<T: Serialize + ?Sized>(&self, data: &T) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::SEND_EMAIL, data)
    }

    // Account

    pub fn get_account(&self) -> Result<Reply, ApiError> {
        self.call_plain(&endpoint::GET_ACCOUNT)
    }

    /// Invoice and revenue statistics.
    pub fn get_stats(&self) -> Result<Reply, ApiError> {
        self.call_plain(&endpoint::GET_STATS)
    }

    // Shipping and tax

    pub fn get_shipping_rules(&self) -> Result<Reply, ApiError> {
        self.call_plain(&endpoint::GET_SHIPPING_RULES)
    }

    pub fn get_shipping_rule(&self, rule_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_SHIPPING_RULE, rule_id)
    }

    pub fn get_tax_rules(&self) -> Result<Reply, ApiError> {
        self.call_plain(&endpoint::GET_TAX_RULES)
    }

    pub fn get_tax_rule(&self, rule_id: impl fmt::Display) -> Result<Reply, ApiError> {
        self.call_id(&endpoint::GET_TAX_RULE, rule_id)
    }

    // MultiAuth

    /// Token that logs a customer into a widget without a password prompt.
    pub fn get_multi_auth_token<T: Serialize + ?Sized>(
        &self,
        data: &T,
    ) -> Result<Reply, ApiError> {
        self.call_with(&endpoint::GET_MULTI_AUTH_TOKEN, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    /// Records every request and answers with a fixed response.
    struct Canned {
        response: Result<HttpResponse, fn() -> ApiError>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn ok(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(HttpResponse::new(status, body)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: fn() -> ApiError) -> Arc<Self> {
            Arc::new(Self {
                response: Err(err),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> HttpRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn client(transport: Arc<Canned>) -> PayWhirl {
        PayWhirl::builder("k", "s").transport(transport).build()
    }

    fn pairs(v: &[(&str, &str)]) -> Vec<(String, String)> {
        v.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults() {
        let client = PayWhirl::new("k", "s");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), Some(DEFAULT_TIMEOUT));
        assert_eq!(client.credentials().key(), "k");
        assert_eq!(client.credentials().secret(), "s");
    }

    #[test]
    fn url_has_exactly_one_separator() {
        let client = PayWhirl::new("k", "s");
        let params = Params::new();
        for path in ["customers", "/customers"] {
            let req = client.build_request(HttpMethod::Get, path, &params);
            assert_eq!(req.url, "https://api.paywhirl.com/customers");
        }
        let client = PayWhirl::builder("k", "s")
            .base_url("http://localhost:3000/")
            .build();
        let req = client.build_request(HttpMethod::Get, "customers", &params);
        assert_eq!(req.url, "http://localhost:3000/customers");
    }

    #[test]
    fn credentials_travel_verbatim_on_get_and_post() {
        let client = PayWhirl::new(" key with spaces ", "s3cr=t/+");
        for method in [HttpMethod::Get, HttpMethod::Post] {
            let req = client.build_request(method, "account", &Params::new());
            assert_eq!(
                req.headers,
                pairs(&[("api_key", " key with spaces "), ("api_secret", "s3cr=t/+")])
            );
        }
    }

    #[test]
    fn post_parameters_go_on_the_query_string() {
        let client = PayWhirl::new("k", "s");
        let params = to_params(&json!({"id": 5, "email": "a@b.c"})).unwrap();
        let req = client.build_request(HttpMethod::Post, "update/customer", &params);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.query, pairs(&[("id", "5"), ("email", "a@b.c")]));
    }

    #[test]
    fn timeout_is_carried_on_each_request() {
        let client = PayWhirl::builder("k", "s")
            .timeout(Some(Duration::from_millis(250)))
            .build();
        let req = client.build_request(HttpMethod::Get, "stats", &Params::new());
        assert_eq!(req.timeout, Some(Duration::from_millis(250)));

        let client = PayWhirl::builder("k", "s").timeout(None).build();
        let req = client.build_request(HttpMethod::Get, "stats", &Params::new());
        assert_eq!(req.timeout, None);
    }

    #[test]
    fn parse_200_decodes_json() {
        let client = PayWhirl::new("k", "s");
        let reply = client
            .parse_response(HttpResponse::new(200, r#"[{"id":1}]"#))
            .unwrap();
        assert_eq!(reply, Reply::Data(json!([{"id": 1}])));
    }

    #[test]
    fn parse_non_200_keeps_status_and_raw_body() {
        let client = PayWhirl::new("k", "s");
        for code in [201, 204, 400, 401, 404, 500, 503] {
            let reply = client
                .parse_response(HttpResponse::new(code, "{not json"))
                .unwrap();
            assert_eq!(
                reply,
                Reply::Status {
                    code,
                    body: "{not json".to_string()
                }
            );
        }
    }

    #[test]
    fn parse_200_with_bad_json_is_an_error() {
        let client = PayWhirl::new("k", "s");
        let err = client
            .parse_response(HttpResponse::new(200, "<html>"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn reply_into_result() {
        assert_eq!(
            Reply::Data(json!({"a": 1})).into_result().unwrap(),
            json!({"a": 1})
        );
        let not_found = Reply::Status {
            code: 404,
            body: String::new(),
        };
        assert!(matches!(not_found.into_result(), Err(ApiError::NotFound)));
        let server = Reply::Status {
            code: 500,
            body: "down".to_string(),
        };
        assert!(matches!(
            server.into_result(),
            Err(ApiError::Http { status: 500, ref body }) if body == "down"
        ));
    }

    #[test]
    fn reply_accessors() {
        let data = Reply::Data(json!({"a": 1}));
        assert!(data.is_success());
        assert_eq!(data.data(), Some(&json!({"a": 1})));
        assert_eq!(data.status(), None);

        let status = Reply::Status {
            code: 401,
            body: String::new(),
        };
        assert!(!status.is_success());
        assert_eq!(status.status(), Some(401));
        assert_eq!(status.data(), None);
    }

    #[test]
    fn get_customer_end_to_end() {
        let transport = Canned::ok(200, r#"{"id":42}"#);
        let reply = client(transport.clone()).get_customer(42).unwrap();
        assert_eq!(reply, Reply::Data(json!({"id": 42})));

        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.paywhirl.com/customer/42");
        assert_eq!(req.header("api_key"), Some("k"));
        assert_eq!(req.header("api_secret"), Some("s"));
        assert!(req.query.is_empty());
    }

    #[test]
    fn update_subscription_omits_unset_quantity() {
        let transport = Canned::ok(200, "{}");
        let client = client(transport.clone());

        client.update_subscription(5, 9, None).unwrap();
        assert_eq!(
            transport.last().query,
            pairs(&[("subscription_id", "5"), ("plan_id", "9")])
        );

        client.update_subscription(5, 9, Some(3)).unwrap();
        assert_eq!(
            transport.last().query,
            pairs(&[("subscription_id", "5"), ("plan_id", "9"), ("quantity", "3")])
        );
    }

    #[test]
    fn single_id_payloads_are_wrapped() {
        let transport = Canned::ok(200, "{}");
        let client = client(transport.clone());

        client.get_answers(7).unwrap();
        assert_eq!(transport.last().query, pairs(&[("customer_id", "7")]));
        client.delete_card(8).unwrap();
        assert_eq!(transport.last().query, pairs(&[("id", "8")]));
        client.unsubscribe_customer(9).unwrap();
        assert_eq!(transport.last().query, pairs(&[("subscription_id", "9")]));
        client.get_questions(DEFAULT_QUESTION_LIMIT).unwrap();
        assert_eq!(transport.last().query, pairs(&[("limit", "100")]));
    }

    #[test]
    fn passthrough_rejects_non_mapping_payloads() {
        let transport = Canned::ok(200, "{}");
        let err = client(transport.clone())
            .create_customer(&json!(["not", "a", "map"]))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "unsubscribe_customer sent keys outside its declared shape")]
    fn undeclared_keys_trip_the_shape_check() {
        let client = client(Canned::ok(200, "{}"));
        let params = field("plan_id", 9).unwrap();
        let _ = client.call(&endpoint::UNSUBSCRIBE_CUSTOMER, None, &params);
    }

    #[test]
    fn transport_failures_are_surfaced() {
        let transport = Canned::failing(|| ApiError::Connection("refused".to_string()));
        let err = client(transport).get_account().unwrap_err();
        assert!(err.is_transport());

        let transport = Canned::failing(|| ApiError::Timeout);
        let err = client(transport).get_stats().unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let transport = Canned::ok(200, r#"{"a":1}"#);
        let client = client(transport.clone());
        let first = client.get_plans(&json!({"limit": 2})).unwrap();
        let first_req = transport.last();
        let second = client.get_plans(&json!({"limit": 2})).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_req, transport.last());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let client = PayWhirl::new("visible-key", "hidden-secret");
        let rendered = format!("{client:?}");
        assert!(rendered.contains("visible-key"));
        assert!(!rendered.contains("hidden-secret"));
    }

    #[traced_test]
    #[test]
    fn dispatch_logs_url_but_not_secret() {
        let transport = Canned::ok(404, "");
        let client = PayWhirl::builder("k", "hidden-secret")
            .transport(transport)
            .build();
        let reply = client.get_invoice(3).unwrap();
        assert_eq!(reply.status(), Some(404));
        assert!(logs_contain("https://api.paywhirl.com/invoice/3"));
        assert!(logs_contain("status=404"));
        assert!(!logs_contain("hidden-secret"));
    }
}
