pub mod activation;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use loss::mse::MseLoss;
pub use math::matrix::Matrix;
pub use network::network::Network;
pub use network::snapshot::NetworkSnapshot;
pub use train::trainer::{evaluate, train_epoch, train_loop};
pub use train::{EpochStats, TrainConfig};
