pub mod actions;
pub mod config;
pub mod effect;
pub mod error;
pub mod facts;
pub mod io;
pub mod paths;
pub mod reconciler;
pub mod relations;
pub mod templates;
pub mod types;

pub use error::{PadopError, Result};
