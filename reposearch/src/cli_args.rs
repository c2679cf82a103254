use crate::{app::App, config::Config, error::Error, headless::Headless, utils::any::Any};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Mutex};

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Print the search url for QUERY without fetching it
    Url { query: String },

    /// Fetch QUERY once and print the raw response body
    Fetch { query: String },
}

#[derive(Clone, Parser)]
#[command(version, about = "Search GitHub repositories from the terminal")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long = "config")]
    pub config_filepath: Option<PathBuf>,

    #[arg(long = "logs")]
    pub log_filepath: Option<PathBuf>,

    /// Search for this as soon as the screen opens
    #[arg(long)]
    pub query: Option<String>,
}

impl CliArgs {
    // NOTE: the interactive screen owns the terminal, so logs only ever go to a file
    fn init_tracing(&self) -> Result<(), Error> {
        let Some(log_filepath) = &self.log_filepath else {
            return ().ok();
        };
        let log_file = log_filepath.create()?;

        tracing_subscriber::fmt().with_writer(Mutex::new(log_file)).json().init();

        ().ok()
    }

    pub async fn run(self) -> Result<(), Error> {
        self.init_tracing()?;

        let config = Config::load(self.config_filepath.as_deref())?;

        match self.command {
            Some(Command::Url { query }) => Headless::url(&config, &query)?,
            Some(Command::Fetch { query }) => Headless::run(&config, &query).await?,
            None => App::run(config, self.query).await?,
        }

        ().ok()
    }
}
