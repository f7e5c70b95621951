pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod error;
pub mod config;
pub mod predictor;
pub mod server;

// Convenience re-exports
pub use math::matrix::{Matrix, ShapeError};
pub use activation::activation::ActivationFunction;
pub use layers::dense::Dense;
pub use network::network::Network;
pub use loss::bce::BceLoss;
pub use optim::adam::Adam;
pub use train::{train_loop, EpochStats, TrainConfig};
pub use data::synthetic::SyntheticDataset;
pub use error::NnError;
pub use config::{AppConfig, ModelConfig, ServerConfig};
pub use predictor::Predictor;
