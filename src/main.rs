use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use taskboard::auth::{AuthMiddleware, TokenSigner};
use taskboard::config::Config;
use taskboard::email::{EmailDelivery, LogDelivery, Notifier, SendGridClient};
use taskboard::routes;
use taskboard::store::{MemoryStore, PgStore};
use taskboard::AppState;

fn startup_error(context: &str, error: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    let delivery: Arc<dyn EmailDelivery> = match &config.sendgrid_api_key {
        Some(key) => Arc::new(SendGridClient::new(key.clone())),
        None => {
            log::warn!("SENDGRID_API_KEY not set; emails will only be logged");
            Arc::new(LogDelivery)
        }
    };
    let notifier = Notifier::new(delivery, config.email_from.clone());
    let tokens = TokenSigner::new(&config.jwt_secret);

    let state = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url)
                .await
                .map_err(|e| startup_error("failed to connect to database", e))?;
            store
                .migrate()
                .await
                .map_err(|e| startup_error("failed to run migrations", e))?;
            AppState::new(Arc::new(store), notifier, tokens, config.bcrypt_cost)
        }
        None => {
            log::warn!("DATABASE_URL not set; using the in-memory store");
            AppState::new(
                Arc::new(MemoryStore::new()),
                notifier,
                tokens,
                config.bcrypt_cost,
            )
        }
    };

    log::info!("Starting server at {}", config.server_url());

    let state = web::Data::new(state);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware::new(state.tokens.clone(), state.users.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
