mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use agrod_core::Session;
use agrod_tui::config::init_app_config;
use agrod_tui::{logging, DetectClient};
use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::eyre::eyre;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let client = DetectClient::new(config.endpoint.clone(), config.timeout)?;

    // Headless when asked to, or when stdout is not a terminal
    if args.headless || !is_terminal() {
        logging::init_stderr_logging(config.debug)?;
        let image = args.image.ok_or_else(|| {
            eyre!("Headless mode needs --image PATH\n\n{}", CliArgs::help_text())
        })?;
        let mut session = Session::with_simulation(config.crop, seed);
        return event::run_headless(&client, &mut session, &image, args.json).await;
    }

    logging::init_file_logging(&config.log_file, config.debug)?;
    tracing::info!(endpoint = %config.endpoint, crop = config.crop.as_str(), seed, "starting");

    let mut app = App::new(&config, seed);
    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app, client).await;
    terminal::cleanup(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
