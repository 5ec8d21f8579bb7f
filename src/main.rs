use crate::config::Config;
use crate::mls::AmpreGateway;
use crate::responses::error_to_response;
use crate::router::{handle, AppState};
use crate::search::images::image_pool;
use astra::Server;
use env_logger::Env;

mod config;
mod domain;
mod errors;
mod mls;
mod responses;
mod router;
mod search;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // 1️⃣ Load settings from the environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Build the provider client
    let gateway = match AmpreGateway::new(&config.provider) {
        Ok(gateway) => gateway,
        Err(e) => {
            log::error!("❌ Provider setup failed: {e}");
            std::process::exit(1);
        }
    };

    // 3️⃣ Pool for image batches
    let pool = match image_pool(config.images.max_concurrency) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("❌ Image pool setup failed: {e}");
            std::process::exit(1);
        }
    };

    // 4️⃣ Start the server
    let addr = config.bind_addr;
    let workers = config.max_workers;
    log::info!("Starting server at http://{addr} ({workers} workers)");

    let state = AppState {
        config,
        gateway: Box::new(gateway),
        image_pool: pool,
    };
    let server = Server::bind(&addr).max_workers(workers);

    // 5️⃣ Serve requests; handler errors become JSON error bodies
    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        log::error!("Server ended with error: {e}");
    }

    log::info!("Server shut down cleanly.");
}
