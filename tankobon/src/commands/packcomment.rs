use anyhow::{bail, Context, Result};
use cbz::{CbzWrite, CbzWriter};
use tracing::info;

use crate::args::Packcomment;

pub fn run(args: &Packcomment) -> Result<()> {
    if !args.archive.is_file() {
        bail!("{} is not a file", args.archive);
    }

    let comment = match (&args.comment, args.remove) {
        (_, true) | (None, false) => String::new(),
        (Some(comment), false) => comment.clone(),
    };

    let mut writer =
        CbzWriter::open(&args.archive).with_context(|| format!("opening {}", args.archive))?;
    writer.set_comment(comment);
    writer.finish()?.truncate()?;

    if args.remove {
        info!("removed the comment of {}", args.archive);
    } else {
        info!("commented {}", args.archive);
    }

    Ok(())
}
