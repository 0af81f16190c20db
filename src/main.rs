use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use chrono::Utc;
use dotenv::dotenv;
use log::info;
use std::io;
use std::sync::Arc;

mod analytics;
mod config;
mod escalation;
mod health;
mod models;
mod mutators;
mod routes;
mod search;
mod seed;
mod store;
mod telegram;
mod validation;

use config::Config;
use store::container::StateContainer;
use store::sqlite_store::{self, SqliteStore};
use telegram::TelegramClient;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;
    let pool = sqlite_store::connect(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    let store = SqliteStore::new(pool).await.map_err(io::Error::other)?;

    let container = Arc::new(StateContainer::open(Arc::new(store), Utc::now()).await);
    escalation::spawn(container.clone(), config.escalation_interval);

    let telegram = web::Data::new(TelegramClient::new(
        config.telegram_api_base.clone(),
        config.bot_token.clone(),
    ));
    if !telegram.has_token() {
        info!("BOT_TOKEN is not set; membership checks will fail");
    }

    let state = web::Data::from(container);
    info!("Server running at http://{}", config.server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(telegram.clone())
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("Hello, world!") }))
            .configure(routes::routes::api_configure)
            .configure(routes::routes::admin_configure)
    })
    .bind(&config.server_address)?
    .run()
    .await
}
