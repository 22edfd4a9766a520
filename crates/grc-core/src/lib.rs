pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod installer;
pub mod invoker;
pub mod io;
pub mod memo;
pub mod parse;
pub mod paths;
pub mod presenter;
pub mod probe;
pub mod session;

#[cfg(test)]
mod testing;

pub use error::{ErrorKind, GrcError, Result};
