pub mod config;
pub mod health;
pub mod suggest;
pub mod ws;

pub use config::{get_config_handler, update_config_handler};
pub use health::{health_handler, ready_handler};
pub use suggest::{suggest_handler, tools_handler};
pub use ws::ws_handler;
