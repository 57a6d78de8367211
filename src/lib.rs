pub mod bounds;
pub mod camera;
pub mod error;
pub mod fusion;
pub mod image;
pub mod io;
pub mod projection;
pub mod transform;

#[cfg(test)]
mod unit_test;

pub use error::{Error, Result};
