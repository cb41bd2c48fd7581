// server/src/cli/mod.rs

pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, RxCommand};
pub use handlers::{handle_command, start_cli};
