pub mod config;
pub mod error;
mod room;
mod routes;
mod signaling;

pub use config::Config;
pub use error::RelayError;
pub use room::*;
pub use routes::*;
pub use signaling::*;
