mod app;
mod cli_args;
mod config;
mod error;
mod fetch;
mod headless;
mod query;
mod screen;
mod utils;

use crate::{cli_args::CliArgs, error::Error};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Error> {
    CliArgs::parse().run().await
}
