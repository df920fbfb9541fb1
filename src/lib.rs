pub mod classify;
pub mod dates;
pub mod error;
pub mod passage;
pub mod schedule;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};
