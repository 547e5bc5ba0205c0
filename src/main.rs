use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::Level;
use marquee::{
    app::App,
    cli::{Cli, SubCommands},
    config::{self, Config},
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(Level::Info.as_str())).init();

    let cli = Cli::parse();
    let config_dir = cli
        .config_path
        .unwrap_or_else(config::get_default_config_path);

    match cli.command {
        SubCommands::Run { orientation } => App::new(config_dir, orientation).run(),
        SubCommands::DefaultConfig {
            replace_current_config,
        } => {
            if replace_current_config {
                let path = config::write_default_config(&config_dir)?;
                log::info!("default config written to {}", path.display());
            } else {
                println!("{}", Config::with_plugin_defaults()?.to_ron()?);
            }
            Ok(())
        }
    }
}
