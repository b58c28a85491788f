mod api;
mod config;
mod database;
mod error;
mod hash;
mod model;
mod text;

use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use config::Config;
use database::Store;
use log::info;

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("cineclub=info,actix_web=info"),
    )
    .init();

    let config = Config::parse();
    let store = Store::open(&config)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let store = web::Data::new(store);

    info!("Listening on http://{}", config.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .configure(api::configure)
    })
    .bind(&config.bind)?
    .run()
    .await
}
