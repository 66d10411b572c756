#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{http::header, test};
use async_trait::async_trait;
use serde_json::json;
use taskboard::auth::TokenSigner;
use taskboard::email::{DeliveryError, EmailDelivery, EmailMessage, Notifier};
use taskboard::models::AuthResponse;
use taskboard::store::MemoryStore;
use taskboard::AppState;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Builds the app the way `main` does, minus CORS, around the given state.
macro_rules! init_app {
    ($state:expr) => {{
        let state = actix_web::web::Data::new($state);
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(state.clone())
                .wrap(taskboard::auth::AuthMiddleware::new(
                    state.tokens.clone(),
                    state.users.clone(),
                ))
                .wrap(actix_web::middleware::Logger::default())
                .configure(taskboard::routes::config),
        )
        .await
    }};
}

pub const TEST_SECRET: &str = "integration_test_secret";

// Lowest cost bcrypt accepts.
const TEST_BCRYPT_COST: u32 = 4;

pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

/// Captures every message handed to the delivery layer.
pub struct ChannelDelivery(pub mpsc::UnboundedSender<EmailMessage>);

#[async_trait]
impl EmailDelivery for ChannelDelivery {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        let _ = self.0.send(message);
        Ok(())
    }
}

pub fn test_state() -> (AppState, mpsc::UnboundedReceiver<EmailMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let notifier = Notifier::new(Arc::new(ChannelDelivery(tx)), "tasks@example.com");
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        notifier,
        TokenSigner::new(TEST_SECRET),
        TEST_BCRYPT_COST,
    );
    (state, rx)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
) -> Result<TestUser, String> {
    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": "Red12345!"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if status != actix_web::http::StatusCode::CREATED {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let auth: AuthResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse registration response: {}", e))?;

    Ok(TestUser {
        id: auth.user.id,
        token: auth.token,
    })
}
