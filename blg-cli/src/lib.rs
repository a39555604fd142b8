mod cli_modes;
mod common;
mod render;
pub mod ui;

pub use cli_modes::BlgCli;
pub use common::{BaseCli, CliModeResult, ColorMode};
pub use render::{RenderOptions, Renderer};
