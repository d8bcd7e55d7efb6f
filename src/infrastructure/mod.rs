pub mod database;
pub mod entities;
pub mod gemini;
pub mod repositories;
pub mod traits;
