extern crate actix_files;
extern crate actix_web;
extern crate chrono;
extern crate dotenv;
extern crate env_logger;
extern crate serde;
extern crate serde_json;
extern crate sqlx;
extern crate tera;
extern crate thiserror;

mod config;
mod core;
mod error;
mod handlers;
mod impls;
pub mod request;
pub mod response;

use crate::actix_web::{middleware::Logger, web::Data, App, HttpServer};
use crate::config::Config;
use crate::core::ports::repository::Manager;
use crate::core::renderer::Renderer;
use crate::error::Error;
use crate::impls::{
    renderer::tera::TeraRenderer,
    repository::{memory::MemoryManager, pg::PgSqlxManager},
};
use actix_files::Files;
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("actix_web=info,polls=info")).init();
    let config = Config::from_env()?;
    let renderer = TeraRenderer::new(&config.template_dir)?;
    if config.is_memory() {
        log::warn!("using the in-memory store, data is lost on shutdown");
        return serve(MemoryManager::new(), renderer, config).await;
    }
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    serve(PgSqlxManager::new(pool), renderer, config).await
}

async fn serve<M, R>(manager: M, renderer: R, config: Config) -> Result<(), Error>
where
    M: Manager + Send + Sync + 'static,
    R: Renderer + Send + Sync + 'static,
{
    let manager = Data::new(manager);
    let renderer = Data::new(renderer);
    let static_dir = config.static_dir.clone();
    log::info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(manager.clone())
            .app_data(renderer.clone())
            .service(Files::new("/static", &static_dir))
            .configure(handlers::routes::<M, R>)
    })
    .bind(&config.bind_address)?
    .run()
    .await?;
    Ok(())
}
