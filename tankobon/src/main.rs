#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    args::{Args, Spreads, Subcommands},
    config::Config,
};

mod args;
mod commands;
mod config;
mod tools;
mod types;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::load()?;

    match args.command {
        Subcommands::Autosplit(autosplit) => commands::autosplit::run(&autosplit, &config)?,
        Subcommands::Manualsplit(manualsplit) => commands::manualsplit::run(manualsplit)?,
        Subcommands::Releases(releases) => commands::releases::run(releases, &config).await?,
        Subcommands::Pack(pack) => commands::pack::run(&pack, &config)?,
        Subcommands::Merge(merge) => commands::merge::run(&merge)?,
        Subcommands::Tag(tag) => commands::tag::run(&tag, &config).await?,
        Subcommands::Optimize(optimize) => commands::optimize::run(&optimize, &config).await?,
        Subcommands::Spreads(Spreads::Join(join)) => commands::spreads::join(&join).await?,
        Subcommands::Spreads(Spreads::Split(split)) => commands::spreads::split(&split).await?,
        Subcommands::Shiftname(shiftname) => commands::shiftname::run(&shiftname)?,
        Subcommands::Packcomment(packcomment) => commands::packcomment::run(&packcomment)?,
        Subcommands::Lookup(lookup) => commands::lookup::run(&lookup, &config)?,
        Subcommands::Config(command) => commands::config::run(&command, config)?,
    }

    Ok(())
}
