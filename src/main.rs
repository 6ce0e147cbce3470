mod config;
mod handlers;
mod logging;
mod models;
mod security;
mod services;

use actix_files::Files;
use actix_web::{
    middleware::{Logger, NormalizePath, TrailingSlash},
    web, App, HttpServer,
};
use handlers::api_routes;
use log::{info, warn};
use logging::init_logging;
use security::cors::CorsMiddleware;
use services::{docker::Engine, hardware::Sampler, log_session::LogSettings};
use std::{io, path::Path};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = config::Config::from_file("config").map_err(io::Error::other)?;
    init_logging(&config).map_err(io::Error::other)?;

    let engine = Engine::connect(config.docker_socket.as_deref()).await;
    if !engine.is_connected() {
        warn!("Starting without Docker: container features are disabled");
    }

    let engine = web::Data::new(engine);
    let sampler = web::Data::new(Sampler::new(config.disk_path.clone()));
    let log_settings = web::Data::new(LogSettings::from(&config));

    let static_dir = config.static_dir.clone();
    let serve_static = Path::new(&static_dir).is_dir();
    if !serve_static {
        warn!("Static directory {} not found; only the API is served", static_dir);
    }

    info!(
        "Listening on {}:{}",
        config.server_address, config.server_port
    );

    HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::default())
            .wrap(CorsMiddleware)
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .app_data(engine.clone())
            .app_data(sampler.clone())
            .app_data(log_settings.clone())
            .configure(api_routes);

        // last: it matches every remaining path
        if serve_static {
            app.service(Files::new("/", &static_dir).index_file("index.html"))
        } else {
            app
        }
    })
    .bind((config.server_address.as_str(), config.server_port))?
    .run()
    .await
}
