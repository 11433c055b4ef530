mod app;
mod backend;
mod config;
mod error;
mod events;
mod logger;
mod session;
mod share;
mod state;
mod ui;

use anyhow::Result;
use app::App;
use clap::{App as ClapApp, Arg};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapApp::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Use a custom configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("theme")
                .short("t")
                .long("theme")
                .value_name("NAME")
                .help("Color theme to use (default, dark)")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(theme) = matches.value_of("theme") {
        config.theme_name = theme.to_string();
    }

    App::start(config).await?;
    Ok(())
}
