pub mod handlers;
pub mod routes;

pub use routes::panel_routes;

/// Delay the page waits after a config update or file deletion before it reloads
pub const RELOAD_DELAY_MS: u64 = 500;
