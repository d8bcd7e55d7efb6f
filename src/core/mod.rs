pub mod error;
pub mod services;
pub mod traits;
pub mod transcript;
