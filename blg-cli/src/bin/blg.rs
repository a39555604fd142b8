use anyhow::Result;
use blg_cli::{BaseCli, BlgCli};
use blg_core::{Blog, Config};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("blg: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = BaseCli::new();
    let config = Config::load()?;
    let blog = Blog::open(&config);
    let mut blg_cli = BlgCli::new(cli, config, blog);
    blg_cli.run()
}
