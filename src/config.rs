//! Fixed runtime settings for the service.
//!
//! Every value has a compiled-in default; nothing is read from files or the
//! environment. Tests build their own instances to bind ephemeral ports or
//! shrink the startup fit.

use crate::error::{NnError, Result};
use crate::train::train_config::TrainConfig;

/// Where the HTTP listener binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { host: "0.0.0.0".to_owned(), port: 5000 }
    }
}

/// Shape of the synthetic dataset and the startup fit.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub samples: usize,
    /// Input width of the network and of every request's `input` array.
    pub features: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.features == 0 {
            return Err(NnError::Config("features must be at least 1".into()));
        }
        if self.samples == 0 {
            return Err(NnError::Config("samples must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(NnError::Config("batch_size must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(NnError::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig::new(self.epochs, self.batch_size, self.learning_rate)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            samples: 100,
            features: 10,
            epochs: 5,
            batch_size: 32,
            learning_rate: 0.001,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
}
