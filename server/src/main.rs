use actix_web::{web, App, HttpServer};
use env_logger::Env;
use std::io;

use paint_server::config::Config;
use paint_server::connection::ConnectionIdSource;
use paint_server::handlers::root;
use paint_server::server::spawn_server;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let srv_tx = spawn_server(&config);
    let connection_ids = web::Data::new(ConnectionIdSource::new());

    log::info!("Server is running on {}", config.bind_address());

    HttpServer::new(move || {
        App::new()
            .data(srv_tx.clone())
            .app_data(connection_ids.clone())
            .configure(root)
    })
    .bind(config.bind_address())?
    .run()
    .await
}
