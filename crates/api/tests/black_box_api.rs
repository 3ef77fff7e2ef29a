use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use storefront_auth::{JwtClaims, Role};
use storefront_core::UserId;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = storefront_api::app::build_app(jwt_secret.to_string()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, name: &str, roles: Vec<Role>) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: UserId::new(),
        name: name.to_string(),
        roles,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn product_form(name: &str, category: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("name", name.to_string())
        .text("brand", "Acme")
        .text("category", category.to_string())
        .text("description", "A sturdy test product")
        .text("price", "49.99")
        .text("countInStock", "12")
        .part(
            "image",
            reqwest::multipart::Part::bytes(b"png-bytes".to_vec()).file_name("product.png"),
        )
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/products", base_url))
        .bearer_auth(token)
        .multipart(product_form(name, "electronics"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_and_catalog_reads_are_public() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 0);
    assert_eq!(body["pages"], 0);
}

#[tokio::test]
async fn mutations_require_a_token() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", srv.base_url))
        .multipart(product_form("Widget", "electronics"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!(
            "{}/products/{}/reviews",
            srv.base_url,
            UserId::new()
        ))
        .json(&json!({ "rating": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_is_admin_only() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let token = mint_jwt(jwt_secret, "Plain User", vec![Role::new("shopper")]);
    let res = client
        .post(format!("{}/products", srv.base_url))
        .bearer_auth(token)
        .multipart(product_form("Widget", "electronics"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_without_image_names_the_field() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "Admin", vec![Role::admin()]);

    let form = reqwest::multipart::Form::new()
        .text("name", "Widget")
        .text("brand", "Acme")
        .text("category", "electronics")
        .text("description", "desc")
        .text("price", "10")
        .text("countInStock", "1");

    let res = client
        .post(format!("{}/products", srv.base_url))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn clothes_need_sizes_on_the_form() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "Admin", vec![Role::admin()]);

    let res = client
        .post(format!("{}/products", srv.base_url))
        .bearer_auth(&token)
        .multipart(product_form("Hoodie", "clothes"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/products", srv.base_url))
        .bearer_auth(&token)
        .multipart(product_form("Hoodie", "clothes").text("sizes", "S, M, L"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["sizes"], json!(["S", "M", "L"]));
}

#[tokio::test]
async fn product_lifecycle_create_get_update_delete() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let token = mint_jwt(jwt_secret, "Admin", vec![Role::admin()]);

    let created = create_product(&client, &srv.base_url, &token, "Trail Shoe").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Trail Shoe");
    assert_eq!(created["countInStock"], 12);
    assert_eq!(created["numReviews"], 0);
    assert!(created["image"].as_str().unwrap().starts_with("/uploads/"));

    // Public lookup, case-insensitive keyword search.
    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/products?keyword=SHOE", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["pages"], 1);

    // Zero price is ignored by the truthy merge; the name still updates.
    let res = client
        .put(format!("{}/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "price": 0, "name": "Road Shoe" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Road Shoe");
    assert_eq!(body["price"], 49.99);

    let res = client
        .delete(format!("{}/products/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product removed");

    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_product_id_is_a_bad_request() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products/not-a-real-id", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reviews_aggregate_and_reject_duplicates() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();
    let admin = mint_jwt(jwt_secret, "Admin", vec![Role::admin()]);

    let created = create_product(&client, &srv.base_url, &admin, "Trail Shoe").await;
    let id = created["id"].as_str().unwrap().to_string();

    let dana = mint_jwt(jwt_secret, "Dana", vec![Role::new("shopper")]);
    let res = client
        .post(format!("{}/products/{}/reviews", srv.base_url, id))
        .bearer_auth(&dana)
        .json(&json!({ "rating": 5, "comment": "great" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Same caller again: rejected, aggregate untouched.
    let res = client
        .post(format!("{}/products/{}/reviews", srv.base_url, id))
        .bearer_auth(&dana)
        .json(&json!({ "rating": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let robin = mint_jwt(jwt_secret, "Robin", vec![Role::new("shopper")]);
    let res = client
        .post(format!("{}/products/{}/reviews", srv.base_url, id))
        .bearer_auth(&robin)
        .json(&json!({ "rating": 2, "comment": "meh" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["numReviews"], 2);
    assert_eq!(body["rating"], 3.5);
    assert_eq!(body["reviews"][0]["name"], "Dana");

    // Out-of-range rating never lands.
    let casey = mint_jwt(jwt_secret, "Casey", vec![Role::new("shopper")]);
    let res = client
        .post(format!("{}/products/{}/reviews", srv.base_url, id))
        .bearer_auth(&casey)
        .json(&json!({ "rating": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
