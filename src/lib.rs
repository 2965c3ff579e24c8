pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod interlock;
pub mod logging;
pub mod poller;
pub mod state;

pub use error::{PanelError, Result};
