pub mod engine;
mod error;
pub mod export;
pub mod model;
pub mod scheduler;
pub mod store;
pub mod summary;


pub use error::Error;
pub use error::Result;
