//! In-process stand-in for the catalog REST API.
//!
//! Serves a handful of fixed products with the same paths and payload shapes
//! the storefront's catalog client expects. Created products are remembered so
//! listing edits and deletes can round-trip.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Category slug that always answers 500.
pub const BROKEN_CATEGORY: &str = "broken";

/// First id handed out to created products.
pub const FIRST_CREATED_ID: i64 = 195;

struct MockState {
    products: Vec<Value>,
    known_ids: Mutex<BTreeSet<i64>>,
    next_id: AtomicI64,
    requests: AtomicUsize,
}

impl MockState {
    fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn is_known(&self, id: i64) -> bool {
        self.known_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }
}

/// A running mock catalog. The server stops when this is dropped.
pub struct MockCatalog {
    base_url: Url,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockCatalog {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let products = fixtures();
        let known_ids = products
            .iter()
            .filter_map(|p| p["id"].as_i64())
            .collect::<BTreeSet<_>>();

        let state = Arc::new(MockState {
            products,
            known_ids: Mutex::new(known_ids),
            next_id: AtomicI64::new(FIRST_CREATED_ID),
            requests: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/products", get(list))
            .route("/products/add", post(add))
            .route("/products/search", get(search))
            .route("/products/category-list", get(category_list))
            .route("/products/category/{slug}", get(by_category))
            .route(
                "/products/{id}",
                get(show).patch(update).put(update).delete(remove),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock catalog");
        let addr = listener.local_addr().expect("mock catalog address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}")).expect("mock catalog URL");
        Self {
            base_url,
            state,
            handle,
        }
    }

    /// Base URL to configure the catalog client with.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    limit: Option<usize>,
    skip: Option<usize>,
    sort_by: Option<String>,
    order: Option<String>,
}

fn page(mut products: Vec<Value>, query: &ListQuery) -> Value {
    if let Some(field) = query.sort_by.as_deref() {
        products.sort_by(|a, b| match field {
            "price" => a[field]
                .as_f64()
                .unwrap_or_default()
                .total_cmp(&b[field].as_f64().unwrap_or_default()),
            _ => a[field].as_str().cmp(&b[field].as_str()),
        });
        if query.order.as_deref() == Some("desc") {
            products.reverse();
        }
    }

    let total = products.len();
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(30);
    let products: Vec<Value> = products.into_iter().skip(skip).take(limit).collect();

    json!({ "products": products, "total": total, "skip": skip, "limit": limit })
}

fn not_found(id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Product with id '{id}' not found") })),
    )
        .into_response()
}

async fn list(State(state): State<Arc<MockState>>, Query(query): Query<ListQuery>) -> Json<Value> {
    state.hit();
    Json(page(state.products.clone(), &query))
}

async fn by_category(
    State(state): State<Arc<MockState>>,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    state.hit();
    if slug == BROKEN_CATEGORY {
        return (StatusCode::INTERNAL_SERVER_ERROR, "catalog exploded").into_response();
    }

    let products = state
        .products
        .iter()
        .filter(|p| p["category"] == slug.as_str())
        .cloned()
        .collect();
    Json(page(products, &query)).into_response()
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<Arc<MockState>>,
    Query(query): Query<SearchQuery>,
) -> Json<Value> {
    state.hit();
    let needle = query.q.to_lowercase();
    let products: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            p["title"]
                .as_str()
                .is_some_and(|t| t.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(json!({ "products": products, "total": products.len(), "skip": 0, "limit": 30 }))
}

async fn category_list(State(state): State<Arc<MockState>>) -> Json<Value> {
    state.hit();
    Json(json!(["beauty", "furniture"]))
}

async fn show(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    state.hit();
    let Some(product) = state.products.iter().find(|p| p["id"] == id) else {
        return not_found(id);
    };

    let mut detail = product.clone();
    detail["sku"] = json!(format!("SKU-{id}"));
    detail["weight"] = json!(2);
    detail["dimensions"] = json!({ "width": 10.5, "height": 4.0, "depth": 3.25 });
    detail["returnPolicy"] = json!("30 days return policy");
    detail["reviews"] = json!([{
        "rating": 5,
        "comment": "Very happy with my purchase!",
        "date": "2024-05-23T08:56:21.618Z",
        "reviewerName": "John Doe",
        "reviewerEmail": "john.doe@x.dummyjson.com"
    }]);
    Json(detail).into_response()
}

fn echo(id: i64, body: Value) -> Value {
    let mut response = json!({ "id": id });
    if let (Some(target), Value::Object(fields)) = (response.as_object_mut(), body) {
        for (key, value) in fields {
            target.entry(key).or_insert(value);
        }
    }
    response
}

async fn add(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.hit();
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    state
        .known_ids
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(id);
    (StatusCode::CREATED, Json(echo(id, body))).into_response()
}

async fn update(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    state.hit();
    if !state.is_known(id) {
        return not_found(id);
    }
    Json(echo(id, body)).into_response()
}

async fn remove(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    state.hit();
    let removed = state
        .known_ids
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&id);
    if !removed {
        return not_found(id);
    }
    Json(json!({ "id": id, "isDeleted": true, "deletedOn": "2024-06-01T00:00:00.000Z" }))
        .into_response()
}

fn product(id: i64, title: &str, category: &str, price: f64, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "category": category,
        "price": price,
        "discountPercentage": 7.17,
        "rating": 4.5,
        "stock": 5,
        "tags": [category],
        "images": [format!("https://cdn.example.com/products/{id}/1.webp")],
        "thumbnail": format!("https://cdn.example.com/products/{id}/thumbnail.webp"),
        "availabilityStatus": status
    })
}

fn fixtures() -> Vec<Value> {
    vec![
        product(1, "Essence Mascara Lash Princess", "beauty", 9.99, "In Stock"),
        product(2, "Eyeshadow Palette with Mirror", "beauty", 19.99, "Low Stock"),
        product(3, "Powder Canister", "beauty", 14.99, "Out of Stock"),
        product(4, "Annibale Colombo Bed", "furniture", 1899.99, "In Stock"),
        product(5, "Annibale Colombo Sofa", "furniture", 2499.99, "In Stock"),
    ]
}
