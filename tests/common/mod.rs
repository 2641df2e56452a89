//! Helpers compartilhados pelos testes de integração: sobem o router
//! completo sobre um AppState novo (stores zerados) e falam HTTP com
//! ele via tower::oneshot, sem abrir porta.

// Nem todo binário de teste usa todos os helpers.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fieldops_backend::config::AppState;

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn spawn() -> Self {
        let state = AppState::new().expect("Falha ao construir o AppState de teste");
        Self {
            router: fieldops_backend::app(state),
        }
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                builder
                    .body(Body::from(json.to_string()))
                    .expect("request inválida")
            }
            None => builder.body(Body::empty()).expect("request inválida"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("falha ao despachar a request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("falha ao ler o corpo")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, None).await
    }
}

/// Cria uma ordem de serviço mínima e devolve o JSON retornado.
pub async fn create_work_order(app: &TestApp, title: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/work-orders",
            serde_json::json!({
                "title": title,
                "client": "Acme Corporation",
                "location": "Nayriah",
                "category": "Plumbing",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "corpo: {}", body);
    body
}

/// Cria um material de catálogo com limites de estoque e devolve o JSON.
pub async fn create_material(
    app: &TestApp,
    code: &str,
    total_stock: f64,
    minimum_stock: Option<f64>,
    maximum_stock: Option<f64>,
) -> Value {
    let (status, body) = app
        .post(
            "/api/materials",
            serde_json::json!({
                "code": code,
                "description": format!("Material {}", code),
                "unit": "un",
                "materialType": "purchasable",
                "totalStock": total_stock,
                "minimumStock": minimum_stock,
                "maximumStock": maximum_stock,
                "averageCost": 2.5,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "corpo: {}", body);
    body
}
