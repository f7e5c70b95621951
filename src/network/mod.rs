pub mod network;

pub use network::{ForwardTrace, Network};
