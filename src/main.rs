// src/main.rs

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use thiserror::Error;

use tasklist::app_state::AppState;
use tasklist::config::{Config, Storage};
use tasklist::db::MongoDB;
use tasklist::repository::{InMemoryTaskRepository, MongoTaskRepository, TaskRepository};
use tasklist::task;

#[derive(Debug, Error)]
enum StartupError {
    #[error("Failed to initialize MongoDB client: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

async fn build_repository(config: &Config) -> Result<Arc<dyn TaskRepository>, StartupError> {
    match &config.storage {
        Storage::InMemory => {
            info!("Using in-memory task storage");
            Ok(Arc::new(InMemoryTaskRepository::new()))
        }
        Storage::Mongo { uri } => {
            let mongodb = MongoDB::init(uri, &config.database_name).await?;
            info!(
                "Using MongoDB collection {}.{} (transactions: {})",
                config.database_name, config.tasks_collection, config.mongo_transactions
            );
            Ok(Arc::new(MongoTaskRepository::new(
                &mongodb,
                &config.tasks_collection,
                config.mongo_transactions,
            )))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let repository = match build_repository(&config).await {
        Ok(repository) => repository,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let state = web::Data::new(AppState::new(repository));

    let frontend_origin = config.frontend_origin.clone();
    info!("Server running at http://{}", config.bind_address);
    info!("Allowed CORS Origin: {}", frontend_origin);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(task::configure)
    })
    .bind(config.bind_address.as_str())?
    .run()
    .await
}
