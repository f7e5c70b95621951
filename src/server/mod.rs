pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use log::info;
use tiny_http::Server;

use crate::config::ServerConfig;
use crate::predictor::Predictor;

pub use error::{RequestError, ServerError};

/// Opens the listener described by `config`.
pub fn bind(config: &ServerConfig) -> Result<Server, ServerError> {
    let addr = config.addr();
    let server = Server::http(&addr)
        .map_err(|e| ServerError::Bind { addr: addr.clone(), reason: e.to_string() })?;
    match server.server_addr().to_ip() {
        Some(local) => info!("listening on http://{local}"),
        None => info!("listening on {addr}"),
    }
    Ok(server)
}

/// Serves requests until the listener shuts down.
///
/// Each request runs on its own thread; the predictor is only ever read, so
/// the threads share it without locking.
pub fn serve(server: Server, predictor: Arc<Predictor>) {
    for request in server.incoming_requests() {
        let predictor = Arc::clone(&predictor);
        std::thread::spawn(move || routes::dispatch(request, predictor));
    }
}
