//! End-to-end checks through the full router

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::application::NewUser;
use crate::config::AppConfig;
use crate::domain::UserRole;
use crate::infrastructure::database::connect_in_memory;
use crate::infrastructure::mail::{EmailMessage, RecordingMailer};
use crate::interfaces::http::{create_api_router, ApiContext};
use crate::server::build_api_context;

const ADMIN_EMAIL: &str = "admin@dealer.test";
const ADMIN_PASSWORD: &str = "beheer-wachtwoord";
const BOUNDARY: &str = "dealership-test-boundary";

struct TestApp {
    router: Router,
    ctx: ApiContext,
    mailer: Arc<RecordingMailer>,
}

impl TestApp {
    async fn new() -> Self {
        let db = connect_in_memory().await.unwrap();
        let mailer = Arc::new(RecordingMailer::new());

        let mut cfg = AppConfig::default();
        cfg.security.jwt_secret = "api-test-secret".into();
        cfg.mail.public_base_url = "https://dealer.test".into();
        cfg.storage.upload_dir =
            std::env::temp_dir().join(format!("dealership-api-{}", uuid::Uuid::new_v4()));

        let ctx = build_api_context(db, mailer.clone(), &cfg, None);
        ctx.user_service
            .ensure_default_admin(NewUser {
                email: ADMIN_EMAIL.into(),
                password: ADMIN_PASSWORD.into(),
                first_name: "Beheerder".into(),
                last_name: String::new(),
                phone: None,
                role: UserRole::Admin,
            })
            .await
            .unwrap();

        Self {
            router: create_api_router(ctx.clone()),
            ctx,
            mailer,
        }
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        };
        self.send(req.unwrap()).await
    }

    async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        payload: Value,
        files: &[(&str, &str, &[u8])],
    ) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(&payload, files)))
            .unwrap();
        self.send(req).await
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Register a customer and return (user id, token).
    async fn customer(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "klant-wachtwoord",
                    "first_name": "Jan",
                    "last_name": "Jansen"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let id = body["data"]["id"].as_str().unwrap().to_string();
        (id, self.login(email, "klant-wachtwoord").await)
    }

    async fn wait_for_mail(&self, subject: &str) -> Option<EmailMessage> {
        for _ in 0..100 {
            if let Some(mail) = self.mailer.sent().into_iter().find(|m| m.subject == subject) {
                return Some(mail);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(self.ctx.media.root());
    }
}

fn multipart_body(payload: &Value, files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"json\"\r\n\r\n{}\r\n",
            BOUNDARY, payload
        )
        .as_bytes(),
    );
    for (field, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new().await;
    let (status, body) = app.json(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn listing_writes_need_an_admin() {
    let app = TestApp::new().await;
    let (_, klant) = app.customer("klant@example.nl").await;
    let payload = json!({ "type": "auto", "name": "Golf", "price_cents": 1_500_000 });

    let (status, _) = app.json(Method::GET, "/api/listings", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json(Method::POST, "/api/listings", None, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .multipart(Method::POST, "/api/listings", &klant, payload, &[])
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn listing_media_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .multipart(
            Method::POST,
            "/api/listings",
            &admin,
            json!({ "type": "boot", "name": "Sloep 650", "price_cents": 2_450_000 }),
            &[
                ("images", "voorkant.jpg", &b"jpeg-bytes"[..]),
                ("images[]", "achterkant.png", &b"png-bytes"[..]),
                ("videos", "vaartocht.mp4", &b"mp4-bytes"[..]),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let listing = &body["data"];
    let id = listing["id"].as_str().unwrap().to_string();
    assert_eq!(listing["listing_type"], "Boot");
    assert_eq!(listing["images"].as_array().unwrap().len(), 2);
    assert_eq!(listing["videos"].as_array().unwrap().len(), 1);

    let first_image = listing["images"][0].as_str().unwrap().to_string();
    let (status, _) = app.json(Method::GET, &first_image, None, None).await;
    assert_eq!(status, StatusCode::OK);

    // Keep one image, drop the video
    let (status, body) = app
        .multipart(
            Method::PUT,
            &format!("/api/listings/{}", id),
            &admin,
            json!({ "price_cents": 2_300_000, "images": [first_image], "videos": [] }),
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["price_cents"], 2_300_000);
    assert_eq!(body["data"]["images"].as_array().unwrap().len(), 1);
    assert!(body["data"]["videos"].as_array().unwrap().is_empty());

    let (status, _) = app
        .json(Method::DELETE, &format!("/api/listings/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .json(Method::GET, &format!("/api/listings/{}", id), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.json(Method::GET, &first_image, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_rejects_invalid_input() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/listings",
            &admin,
            json!({ "type": "auto", "name": "", "price_cents": 100 }),
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/listings",
            &admin,
            json!({ "type": "auto", "name": "Polo", "price_cents": 100 }),
            &[("images", "script.exe", &b"MZ"[..])],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .multipart(
            Method::POST,
            "/api/listings",
            &admin,
            json!({ "type": "auto", "name": "   ", "price_cents": 100 }),
            &[],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_sees_only_own_appointments() {
    let app = TestApp::new().await;
    let (_, anna) = app.customer("anna@example.nl").await;
    let (_, bram) = app.customer("bram@example.nl").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/appointments",
            Some(&anna),
            Some(json!({
                "service_type": "Onderhoudsbeurt",
                "requested_date": "2030-05-01T09:00:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .json(Method::GET, "/api/appointments", Some(&bram), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);

    let (status, _) = app
        .json(Method::GET, &format!("/api/appointments/{}", id), Some(&bram), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let (_, body) = app
        .json(Method::GET, "/api/appointments", Some(&admin), None)
        .await;
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn admin_appointment_for_new_email_provisions_guest() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/appointments",
            Some(&admin),
            Some(json!({
                "email": "nieuw@example.nl",
                "first_name": "Nina",
                "last_name": "Nieuw",
                "service_type": "Proefvaart",
                "requested_date": "2030-06-12T14:30:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    // Inactive until the activation link is used
    let (status, _) = app
        .json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nieuw@example.nl", "password": "whatever-123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mail = app
        .wait_for_mail("Activeer uw account")
        .await
        .expect("activation email");
    assert_eq!(mail.to, "nieuw@example.nl");
    let token = mail
        .text_body
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap()
        .to_string();

    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/activate",
            None,
            Some(json!({ "token": token, "password": "mijn-nieuwe-wachtwoord" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let guest = app.login("nieuw@example.nl", "mijn-nieuwe-wachtwoord").await;
    let (_, body) = app
        .json(Method::GET, "/api/appointments", Some(&guest), None)
        .await;
    assert_eq!(body["data"]["total"], 1);

    // Tokens are single use
    let (status, _) = app
        .json(
            Method::POST,
            "/api/auth/activate",
            None,
            Some(json!({ "token": token, "password": "nog-een-wachtwoord" })),
        )
        .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn only_the_customer_answers_a_quote_once() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (klant_id, klant) = app.customer("offerte@example.nl").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/quotes",
            Some(&admin),
            Some(json!({
                "userId": klant_id,
                "subject": "Inruil Golf",
                "amount_cents": 725_000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let status_uri = format!("/api/quotes/{}/status", body["data"]["id"].as_str().unwrap());
    let accept = json!({ "status": "geaccepteerd" });

    let (status, _) = app
        .json(Method::PATCH, &status_uri, Some(&admin), Some(accept.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .json(Method::PATCH, &status_uri, Some(&klant), Some(accept.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "geaccepteerd");

    let (status, _) = app
        .json(
            Method::PATCH,
            &status_uri,
            Some(&klant),
            Some(json!({ "status": "geweigerd" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn customers_cannot_manage_users() {
    let app = TestApp::new().await;
    let (_, klant) = app.customer("klant@example.nl").await;

    let (status, _) = app.json(Method::GET, "/api/users", Some(&klant), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.json(Method::GET, "/api/auth/me", Some(&klant), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "klant");
}

#[tokio::test]
async fn register_validates_payload() {
    let app = TestApp::new().await;
    let (status, body) = app
        .json(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "geen-email", "password": "kort" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    app.customer("dubbel@example.nl").await;
    let (status, _) = app
        .json(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "dubbel@example.nl", "password": "klant-wachtwoord" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn blank_quote_subject_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (klant_id, _) = app.customer("leeg@example.nl").await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/quotes",
            Some(&admin),
            Some(json!({ "userId": klant_id, "subject": "  ", "amount_cents": 5_000 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
