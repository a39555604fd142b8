mod blg_cli;

pub use blg_cli::BlgCli;
