// Entrypoint for the bot.
// - Parses flags, sets up logging and builds the configuration once.
// - This is the only place that decides the process exit code.

use anyhow::Context;
use clap::Parser;
use peeweebot::bot;
use peeweebot::cli::{Cli, Mode};
use peeweebot::config::Config;
use peeweebot::drive::DriveClient;
use peeweebot::select::ClockSeeded;
use peeweebot::twitter::TwitterClient;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<peeweebot::Error>() {
                Some(err) => eprintln!("peeweebot: {} failed: {:#}", err.stage(), e),
                None => eprintln!("peeweebot: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli).context("Unable to load configuration")?;
    let drive = DriveClient::from_config(&config).context("Unable to get Google Drive service")?;
    let mut rng = ClockSeeded::new();

    match cli.mode {
        Mode::Post => {
            let twitter = TwitterClient::from_config(&config).context("Unable to get Twitter client")?;
            let post = bot::post_random_picture(&drive, &twitter, &mut rng, &config.folder_id)?;
            tracing::info!(post_id = %post, "Done");
        }
        Mode::Save => {
            let twitter = TwitterClient::from_config(&config).context("Unable to get Twitter client")?;
            let (post, path) = bot::save_random_picture(
                &drive,
                &twitter,
                &mut rng,
                &config.folder_id,
                &cli.out_dir,
                &cli.text,
            )?;
            tracing::info!(post_id = %post, path = %path.display(), "Done");
        }
        Mode::List => {
            let pick = bot::pick_file(&drive, &mut rng, &config.folder_id)?;
            for file in &pick.files {
                println!("{}", file.id);
            }
            println!("selected: {}", pick.selected.id);
        }
    }
    Ok(())
}
