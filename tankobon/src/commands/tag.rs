use anyhow::{bail, Result};

use super::{email, pack::archive_title};
use crate::{args::Tag, config::Config, tools::Exiftool};

pub async fn run(args: &Tag, config: &Config) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("{} is not a directory", args.dir);
    }

    let title = archive_title(&args.release, args.chapter, config)?;

    Exiftool::new(&config.executables.exiftool_path)
        .tag(&args.dir, &title, email(&args.release, config))
        .await
}
