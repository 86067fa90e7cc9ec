use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const MOCK_API_KEY: &str = "mock-key";
pub const MOCK_API_SECRET: &str = "mock-secret";

const REQUIRED_CUSTOMER_FIELDS: [&str; 3] = ["first_name", "last_name", "email"];

type Records = RwLock<BTreeMap<u64, Value>>;
type QueryMap = Query<HashMap<String, String>>;

#[derive(Clone)]
pub struct AppState {
    key: Arc<str>,
    secret: Arc<str>,
    customers: Arc<Records>,
    promos: Arc<Records>,
    next_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(key: &str, secret: &str) -> Self {
        Self {
            key: Arc::from(key),
            secret: Arc::from(secret),
            customers: Arc::default(),
            promos: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

/// Router accepting the `MOCK_API_KEY` / `MOCK_API_SECRET` credentials.
pub fn app() -> Router {
    app_with_credentials(MOCK_API_KEY, MOCK_API_SECRET)
}

pub fn app_with_credentials(key: &str, secret: &str) -> Router {
    let state = AppState::new(key, secret);
    Router::new()
        .route("/customers", get(list_customers))
        .route("/customer/{id}", get(get_customer))
        .route("/create/customer", post(create_customer))
        .route("/update/customer", post(update_customer))
        .route("/promo", get(list_promos))
        .route("/promo/{id}", get(get_promo))
        .route("/create/promo", post(create_promo))
        .route("/delete/promo", post(delete_promo))
        .route("/account", get(account))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_credentials,
        ))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Reject requests whose `api_key` / `api_secret` headers do not match.
async fn require_credentials(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let headers = request.headers();
    let key = headers.get("api_key").and_then(|v| v.to_str().ok());
    let secret = headers.get("api_secret").and_then(|v| v.to_str().ok());
    if key != Some(&*state.key) || secret != Some(&*state.secret) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

async fn list_customers(State(state): State<AppState>, Query(query): QueryMap) -> Json<Value> {
    let limit = query
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(100);
    let customers = state.customers.read().await;
    Json(Value::Array(
        customers.values().take(limit).cloned().collect(),
    ))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let customers = state.customers.read().await;
    customers.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_customer(
    State(state): State<AppState>,
    Query(query): QueryMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(missing) = REQUIRED_CUSTOMER_FIELDS
        .iter()
        .find(|field| !query.contains_key(**field))
    {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": format!("{missing} is required") })),
        ));
    }
    let id = state.allocate_id();
    let customer = record(id, query, &["password"]);
    state.customers.write().await.insert(id, customer.clone());
    Ok(Json(customer))
}

async fn update_customer(
    State(state): State<AppState>,
    Query(mut query): QueryMap,
) -> Result<Json<Value>, StatusCode> {
    let id = query
        .remove("id")
        .and_then(|id| id.parse::<u64>().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let mut customers = state.customers.write().await;
    let customer = customers
        .get_mut(&id)
        .and_then(Value::as_object_mut)
        .ok_or(StatusCode::NOT_FOUND)?;
    for (key, value) in query {
        if key != "password" {
            customer.insert(key, Value::String(value));
        }
    }
    Ok(Json(Value::Object(customer.clone())))
}

async fn list_promos(State(state): State<AppState>) -> Json<Value> {
    let promos = state.promos.read().await;
    Json(Value::Array(promos.values().cloned().collect()))
}

async fn get_promo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, StatusCode> {
    let promos = state.promos.read().await;
    promos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_promo(
    State(state): State<AppState>,
    Query(query): QueryMap,
) -> Result<Json<Value>, StatusCode> {
    if !query.contains_key("code") {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let id = state.allocate_id();
    let promo = record(id, query, &[]);
    state.promos.write().await.insert(id, promo.clone());
    Ok(Json(promo))
}

async fn delete_promo(
    State(state): State<AppState>,
    Query(query): QueryMap,
) -> Result<Json<Value>, StatusCode> {
    let id = query
        .get("id")
        .and_then(|id| id.parse::<u64>().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    let removed = state.promos.write().await.remove(&id);
    let status = if removed.is_some() { "success" } else { "fail" };
    Ok(Json(json!({ "status": status })))
}

async fn account() -> Json<Value> {
    Json(json!({
        "id": 1,
        "company_name": "Mock Billing Co",
        "currency": "USD",
    }))
}

/// JSON record with a numeric `id` plus every query field except `hidden`.
fn record(id: u64, fields: HashMap<String, String>, hidden: &[&str]) -> Value {
    let mut object = Map::new();
    object.insert("id".to_string(), json!(id));
    let mut sorted: Vec<_> = fields
        .into_iter()
        .filter(|(key, _)| key != "id" && !hidden.contains(&key.as_str()))
        .collect();
    sorted.sort();
    for (key, value) in sorted {
        object.insert(key, Value::String(value));
    }
    Value::Object(object)
}
