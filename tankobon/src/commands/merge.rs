use std::fs;

use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8PathBuf;
use cbz::{CbzRead, CbzReader, CbzWrite, CbzWriter, CbzWriterInsertionBuilder};
use glob::glob;
use tracing::{debug, info, warn};

use crate::args::Merge;

pub fn run(args: &Merge) -> Result<()> {
    let mut archives = glob(&args.archives_glob)?
        .map(|path| {
            Utf8PathBuf::from_path_buf(path?)
                .map_err(|path| anyhow!("{path:?} is not a valid utf-8 path"))
        })
        .collect::<Result<Vec<_>>>()?;
    archives.sort();
    if archives.is_empty() {
        bail!("{} doesn't match any archive", args.archives_glob);
    }

    fs::create_dir_all(&args.outdir).with_context(|| format!("creating {}", args.outdir))?;
    let output_path = args
        .outdir
        .join(sanitize_filename::sanitize(format!("{}.cbz", args.name)));
    if archives.contains(&output_path) {
        bail!("{output_path} is one of the merged archives");
    }

    let mut merged_cbz_writer = CbzWriter::create(&output_path)?;
    let mut comment = None;

    for path in &archives {
        let mut current_cbz =
            CbzReader::from_path(path).with_context(|| format!("opening {path}"))?;
        if comment.is_none() {
            comment = current_cbz.comment();
        }

        current_cbz.try_for_each_image(|file| {
            let mut file = file?;
            let name = file.file_name().to_string();
            if merged_cbz_writer.contains(&name) {
                warn!("{name} from {path} is already merged, skipping");
                return Ok(());
            }

            let insertion = CbzWriterInsertionBuilder::from_filename(&name)
                .set_bytes_from_reader(&mut file)?
                .build()?;
            merged_cbz_writer.insert(insertion)?;

            Ok::<(), anyhow::Error>(())
        })?;
        debug!("merged {path}");
    }

    if let Some(comment) = comment {
        merged_cbz_writer.set_comment(comment);
    }
    merged_cbz_writer.finish()?;
    info!("merged {} archives into {output_path}", archives.len());

    if args.remove_sources {
        for path in &archives {
            fs::remove_file(path).with_context(|| format!("removing {path}"))?;
        }
        info!("removed the merged archives");
    }

    Ok(())
}
