use anyhow::Result;
use cli_table::{print_stdout, WithTitle};
use tracing::info;

use crate::{args::ConfigCommand, config::Config, types::ConfigRow};

pub fn run(command: &ConfigCommand, mut config: Config) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let rows = config
                .entries()?
                .into_iter()
                .map(ConfigRow::from)
                .collect::<Vec<_>>();

            println!("{}", Config::path()?);
            print_stdout(rows.with_title())?;
        }
        ConfigCommand::Set { key, value } => {
            config.set(key, value)?;
            config.save()?;

            info!("{key} set to {value:?}");
        }
    }

    Ok(())
}
