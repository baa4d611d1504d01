#![forbid(unsafe_code)]

pub mod cursor;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod model;
pub mod order;
pub mod time;

pub use error::Error;
pub use time::Clock;
