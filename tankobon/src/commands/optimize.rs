use anyhow::{bail, Result};

use crate::{args::Optimize, config::Config, tools::Pingo};

pub async fn run(args: &Optimize, config: &Config) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("{} is not a directory", args.dir);
    }

    Pingo::new(&config.executables.pingo_path)
        .optimize(&args.dir, args.aggressive)
        .await
}
