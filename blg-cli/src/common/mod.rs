mod base_cli;
mod cli_mode;
mod editor_utils;
mod prompt_utils;
mod style;

pub use base_cli::BaseCli;
pub use cli_mode::CliModeResult;
pub use editor_utils::{create_editor_buffer, resolve_editor};
pub use prompt_utils::confirm;
pub use style::ColorMode;
