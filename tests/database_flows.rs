//! Flujos completos contra PostgreSQL.
//!
//! Cada test recibe una base de datos nueva con `migrations/` aplicadas
//! (`#[sqlx::test]`, requiere `DATABASE_URL`).

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use logistics_backoffice::config::EnvironmentConfig;
use logistics_backoffice::models::customer_order::{CustomerOrder, CustomerOrderStatus};
use logistics_backoffice::models::enquiry::EnquiryStatus;
use logistics_backoffice::repositories::customer_order_repository::CustomerOrderRepository;
use logistics_backoffice::repositories::enquiry_repository::EnquiryRepository;
use logistics_backoffice::utils::jwt::{generate_token, JwtConfig};
use logistics_backoffice::{create_app_router, AppState};

const TEST_SECRET: &str = "test-secret-for-database-flows";

#[derive(Clone)]
struct TestClient {
    app: Router,
    token: String,
}

impl TestClient {
    fn new(pool: PgPool) -> Self {
        let config = EnvironmentConfig::from_lookup(|name| match name {
            "JWT_SECRET" => Some(TEST_SECRET.to_string()),
            _ => None,
        })
        .expect("test config");
        let jwt = JwtConfig {
            secret: TEST_SECRET.to_string(),
        };
        let token = generate_token(Uuid::new_v4(), 3600, &jwt).expect("token");

        Self {
            app: create_app_router(AppState::new(pool, config)),
            token: format!("Bearer {}", token),
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, &self.token);
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    /// POST que debe crear el recurso; devuelve su id
    async fn create(&self, uri: &str, body: Value) -> Uuid {
        let (status, response) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {} -> {}", uri, response);
        id_of(&response["data"])
    }
}

fn id_of(value: &Value) -> Uuid {
    value["id"].as_str().and_then(|id| id.parse().ok()).expect("id")
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(text) => text.parse().expect("decimal string"),
        other => other.to_string().parse().expect("decimal number"),
    }
}

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

/// Lead + enquiry Mumbai → Pune
async fn customer_enquiry(client: &TestClient) -> Uuid {
    let lead_id = client
        .create("/api/leads", json!({ "name": "Sharma Traders", "phone": "9876543210" }))
        .await;
    client
        .create(
            "/api/enquiries",
            json!({
                "lead_id": lead_id,
                "from_location": "Mumbai",
                "to_location": "Pune",
                "cargo_type": "Steel coils",
                "cargo_weight": 12.5
            }),
        )
        .await
}

async fn quote(client: &TestClient, enquiry_id: Uuid, amount: &str, status: &str) -> Uuid {
    client
        .create(
            "/api/quotes",
            json!({
                "enquiry_id": enquiry_id,
                "pricing": { "mode": "custom", "amount": amount },
                "status": status
            }),
        )
        .await
}

async fn route(client: &TestClient, name: &str) -> Uuid {
    client
        .create(
            "/api/transport-routes",
            json!({
                "name": name,
                "locations": [
                    { "stop_type": "load", "remarks": "Bhiwandi" },
                    { "stop_type": "unload", "remarks": "Chakan" }
                ]
            }),
        )
        .await
}

async fn broker(client: &TestClient, company_name: &str) -> Uuid {
    client
        .create(
            "/api/brokers",
            json!({
                "company_name": company_name,
                "regions": [{ "region": "West", "state": "Maharashtra", "city": "Pune" }],
                "vehicle_types": ["32ft MXL"]
            }),
        )
        .await
}

async fn transport_enquiry(client: &TestClient, route_id: Uuid, cargo_type: &str) -> Uuid {
    client
        .create(
            "/api/transport-broker-rate-enquiries",
            json!({ "route_id": route_id, "cargo_type": cargo_type, "transport_date": "2025-03-10" }),
        )
        .await
}

async fn bid(client: &TestClient, transport_enquiry_id: Uuid, broker_id: Uuid, rate: &str) -> Uuid {
    client
        .create(
            "/api/transport-rate-bids",
            json!({ "transport_enquiry_id": transport_enquiry_id, "broker_id": broker_id, "rate": rate }),
        )
        .await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promotion_creates_order_and_accepts_enquiry(pool: PgPool) {
    let client = TestClient::new(pool);
    let enquiry_id = customer_enquiry(&client).await;
    let quote_id = quote(&client, enquiry_id, "11500", "accepted").await;

    let (status, body) = client
        .post(&format!("/api/enquiries/{}/promote", enquiry_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["enquiry"]["status"], "accepted");
    assert_eq!(body["data"]["customer_order"]["quote_id"], quote_id.to_string());
    assert_eq!(body["data"]["customer_order"]["status"], "active");

    // Segunda promoción: conflicto y sigue habiendo un solo pedido
    let (status, body) = client
        .post(&format!("/api/enquiries/{}/promote", enquiry_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (_, orders) = client.get("/api/customer-orders").await;
    assert_eq!(orders["data"]["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_promotion_without_accepted_quote_leaves_no_order(pool: PgPool) {
    let client = TestClient::new(pool);
    let enquiry_id = customer_enquiry(&client).await;
    quote(&client, enquiry_id, "9000", "pending").await;

    let (status, body) = client
        .post(&format!("/api/enquiries/{}/promote", enquiry_id), json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(body["code"], "CONFLICT");

    let (status, detail) = client.get(&format!("/api/enquiries/{}", enquiry_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["data"]["status"], "pending");
    assert!(detail["data"]["customer_order"].is_null());

    let (_, orders) = client.get("/api/customer-orders").await;
    assert_eq!(orders["data"]["pagination"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bidding_ranks_and_award_closes_enquiry_once(pool: PgPool) {
    let client = TestClient::new(pool);
    let enquiry_id = customer_enquiry(&client).await;
    let route_id = route(&client, "Bhiwandi - Chakan").await;
    let patel = broker(&client, "Patel Transport").await;
    let sai = broker(&client, "Sai Logistics").await;
    let verma = broker(&client, "Verma Roadways").await;
    let transport_enquiry_id = transport_enquiry(&client, route_id, "Steel coils").await;

    bid(&client, transport_enquiry_id, patel, "2000").await;
    let best = bid(&client, transport_enquiry_id, sai, "1500").await;
    bid(&client, transport_enquiry_id, verma, "1800").await;

    let (status, ranking) = client
        .get(&format!("/api/transport-broker-rate-enquiries/{}/ranking", transport_enquiry_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&ranking["data"]["l1_rate"]), dec("1500"));
    assert_eq!(decimal(&ranking["data"]["l2_rate"]), dec("1800"));
    assert_eq!(ranking["data"]["l1_broker"], "Sai Logistics");
    assert_eq!(ranking["data"]["bid_count"], 3);

    let (status, detail) = client
        .get(&format!("/api/transport-broker-rate-enquiries/{}", transport_enquiry_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["data"]["status"], "bidding");

    let award = json!({ "enquiry_id": enquiry_id, "bid_id": best });
    let (status, order) = client.post("/api/transport-orders/from-bid", award.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{}", order);
    assert_eq!(decimal(&order["data"]["amount"]), dec("1500"));
    assert_eq!(order["data"]["broker_id"], sai.to_string());

    // La misma puja no se adjudica dos veces
    let (status, body) = client.post("/api/transport-orders/from-bid", award).await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    // Ni se puja sobre una transport enquiry cerrada
    let (status, _) = client
        .post(
            "/api/transport-rate-bids",
            json!({ "transport_enquiry_id": transport_enquiry_id, "broker_id": patel, "rate": "1400" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, base) = client.get(&format!("/api/quotes/base-amount/{}", enquiry_id)).await;
    assert_eq!(decimal(&base["data"]["base_amount"]), dec("1500"));
    assert_eq!(base["data"]["transport_order_count"], 1);

    // Con la base derivada: 1500 @ 15% = 1725
    let (status, quote) = client
        .post(
            "/api/quotes",
            json!({ "enquiry_id": enquiry_id, "pricing": { "mode": "calculated", "margin_percentage": "15" } }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", quote);
    assert_eq!(decimal(&quote["data"]["quotation_amount"]), dec("1725"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_closed_status_is_only_reached_by_award(pool: PgPool) {
    let client = TestClient::new(pool);
    let route_id = route(&client, "Bhiwandi - Chakan").await;
    let transport_enquiry_id = transport_enquiry(&client, route_id, "Steel coils").await;
    let uri = format!("/api/transport-broker-rate-enquiries/{}", transport_enquiry_id);

    let (status, body) = client.put(&uri, json!({ "status": "closed" })).await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (status, body) = client.put(&uri, json!({ "status": "quoted", "remarks": "Rate shared" })).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "quoted");
    assert_eq!(body["data"]["remarks"], "Rate shared");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_links_exclude_linked_from_available(pool: PgPool) {
    let client = TestClient::new(pool);
    let enquiry_id = customer_enquiry(&client).await;
    let route_id = route(&client, "Bhiwandi - Chakan").await;
    let linked = transport_enquiry(&client, route_id, "Steel coils").await;
    let other = transport_enquiry(&client, route_id, "Cement bags").await;

    let link = json!({ "enquiry_id": enquiry_id, "transport_enquiry_id": linked, "notes": "Main leg" });
    let (status, body) = client.post("/api/enquiry-transport-links/link", link.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, _) = client.post("/api/enquiry-transport-links/link", link).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, available) = client
        .get(&format!("/api/enquiry-transport-links/available/{}", enquiry_id))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", available);
    let items = available["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(id_of(&items[0]), other);
    assert_eq!(available["data"]["pagination"]["total"], 1);

    let (status, listed) = client
        .get(&format!("/api/enquiry-transport-links/{}", enquiry_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed["data"].as_array().expect("links");
    assert_eq!(listed.len(), 1);
    assert_eq!(id_of(&listed[0]["transport_enquiry"]), linked);
    assert_eq!(listed[0]["route_name"], "Bhiwandi - Chakan");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cargo_type_filter_matches_wildcards_literally(pool: PgPool) {
    let client = TestClient::new(pool);
    let route_id = route(&client, "Bhiwandi - Chakan").await;
    let underscored = transport_enquiry(&client, route_id, "Steel_coils").await;
    transport_enquiry(&client, route_id, "Steel coils").await;

    let (status, body) = client
        .get("/api/transport-broker-rate-enquiries?cargo_type=steel_")
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let items = body["data"]["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(id_of(&items[0]), underscored);

    let (status, body) = client
        .get("/api/transport-broker-rate-enquiries/search/by-route?route=chakan")
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_broker_detail_includes_regions_and_vehicle_types(pool: PgPool) {
    let client = TestClient::new(pool);
    let broker_id = broker(&client, "Patel Transport").await;

    let (status, body) = client.get(&format!("/api/brokers/{}", broker_id)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["display_name"], "Patel Transport");
    assert_eq!(body["data"]["regions"][0]["city"], "Pune");
    assert_eq!(body["data"]["vehicle_types"][0]["vehicle_type"], "32ft MXL");

    let (status, body) = client.get(&format!("/api/brokers/{}/vehicle-types", broker_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = client.get(&format!("/api/brokers/{}/regions", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = client.get("/api/transport-orders/brokers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["company_name"], "Patel Transport");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_vehicle_type_catalogue(pool: PgPool) {
    let client = TestClient::new(pool);
    let id = client
        .create("/api/vehicle-types", json!({ "name": "32ft MXL", "description": "Multi-axle container" }))
        .await;

    let (status, _) = client.post("/api/vehicle-types", json!({ "name": "32FT mxl" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = client
        .put(&format!("/api/vehicle-types/{}", id), json!({ "description": "Closed body" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["name"], "32ft MXL");
    assert_eq!(body["data"]["description"], "Closed body");

    let (_, list) = client.get("/api/vehicle-types?search=mxl").await;
    assert_eq!(list["data"]["pagination"]["total"], 1);

    let (status, _) = client.send("DELETE", &format!("/api/vehicle-types/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = client.get(&format!("/api/vehicle-types/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_tiny_amounts_are_rejected_before_the_database(pool: PgPool) {
    let client = TestClient::new(pool);
    let enquiry_id = customer_enquiry(&client).await;

    let (status, body) = client
        .post(
            "/api/quotes",
            json!({ "enquiry_id": enquiry_id, "pricing": { "mode": "custom", "amount": "0.004" } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

/// Una edición que coincide con una promoción no devuelve la enquiry a pending
#[sqlx::test(migrations = "./migrations")]
async fn test_edit_during_promotion_keeps_accepted_status(pool: PgPool) {
    let client = TestClient::new(pool.clone());
    let enquiry_id = customer_enquiry(&client).await;
    let quote_id = quote(&client, enquiry_id, "11500", "accepted").await;

    let (status, body) = client.get(&format!("/api/enquiries/{}", enquiry_id)).await;
    assert_eq!(status, StatusCode::OK);
    let user_id: Uuid = body["data"]["user_id"].as_str().and_then(|id| id.parse().ok()).expect("user id");

    // Promoción a mano: la enquiry queda bloqueada hasta el commit
    let mut tx = pool.begin().await.expect("tx");
    EnquiryRepository::lock_by_id(&mut tx, enquiry_id, user_id)
        .await
        .expect("lock")
        .expect("enquiry");

    let editor = client.clone();
    let edit = tokio::spawn(async move {
        editor
            .put(&format!("/api/enquiries/{}", enquiry_id), json!({ "remarks": "Call before loading" }))
            .await
    });
    tokio::time::sleep(Duration::from_millis(300)).await;

    let now = Utc::now();
    let order = CustomerOrder {
        id: Uuid::new_v4(),
        user_id,
        enquiry_id,
        quote_id,
        status: CustomerOrderStatus::Active,
        notes: None,
        created_at: now,
        updated_at: now,
    };
    CustomerOrderRepository::insert(&mut tx, &order).await.expect("order");
    EnquiryRepository::set_status(&mut tx, enquiry_id, EnquiryStatus::Accepted)
        .await
        .expect("status");
    tx.commit().await.expect("commit");

    let (status, body) = edit.await.expect("edit task");
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "accepted");
    assert_eq!(body["data"]["remarks"], "Call before loading");

    let (_, detail) = client.get(&format!("/api/enquiries/{}", enquiry_id)).await;
    assert_eq!(detail["data"]["status"], "accepted");
    assert_eq!(detail["data"]["customer_order"]["id"], order.id.to_string());
}
