pub mod balance;
pub mod config;
pub mod personas;
pub mod play;

pub use balance::handle_balance;
pub use config::{handle_config_command, ConfigCommands};
pub use personas::handle_personas;
pub use play::{handle_play, PlayArgs};
