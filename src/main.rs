//! threat-nn: serves `POST /predict` on 0.0.0.0:5000.
//!
//! At startup a small placeholder network is fitted on random data, then
//! shared read-only with every request. Log verbosity follows `RUST_LOG`
//! (default `info`).

use std::process;
use std::sync::Arc;

use log::{error, info};
use thiserror::Error;

use threat_nn::{server, AppConfig, NnError, Predictor};

#[derive(Debug, Error)]
enum StartupError {
    #[error("model bootstrap failed: {0}")]
    Model(#[from] NnError),

    #[error(transparent)]
    Server(#[from] server::ServerError),
}

fn run(config: AppConfig) -> Result<(), StartupError> {
    info!(
        "fitting placeholder model: {} samples x {} features, {} epochs",
        config.model.samples, config.model.features, config.model.epochs
    );
    let predictor = Arc::new(Predictor::bootstrap(&config.model)?);

    let listener = server::bind(&config.server)?;
    server::serve(listener, predictor);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(AppConfig::default()) {
        error!("{e}");
        process::exit(1);
    }
}
