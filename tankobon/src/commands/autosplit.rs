use std::{collections::BTreeMap, fs::File};

use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cbz::{CbzRead, CbzReader, CbzWrite, CbzWriter, CbzWriterInsertionBuilder};
use tankobon_core::{chapter_archive_stem, ChapterNumbering, MatchOptions, Matcher};
use tracing::{debug, error, info, warn};

use super::archives_in;
use crate::{args::Autosplit, config::Config};

/// The `vNN` directory key of every volume archive
fn volume_keys(archives: &[Utf8PathBuf], args: &Autosplit) -> Result<Vec<(Utf8PathBuf, String)>> {
    if args.oneshot {
        return Ok(archives
            .iter()
            .enumerate()
            .map(|(index, archive)| (archive.clone(), format!("{index:02}")))
            .collect());
    }

    let mut options = MatchOptions::new(args.title.as_str());
    if let Some(limit_to) = &args.limit_to {
        options = options.with_limit_to(limit_to.as_str());
    }
    let matcher = Matcher::archives(options);

    archives
        .iter()
        .filter_map(|archive| {
            let name = archive.file_name().unwrap_or(archive.as_str());
            match matcher.match_name(name) {
                Ok(parsed) => match parsed.volume {
                    Some(volume) => Some(Ok((archive.clone(), volume.pad(2, '.')))),
                    None => Some(Ok((archive.clone(), "00".to_string()))),
                },
                Err(err) if archives.len() == 1 => {
                    warn!("{err}, splitting it as volume 00");
                    Some(Ok((archive.clone(), "00".to_string())))
                }
                Err(err) if args.limit_to.is_some() => {
                    debug!("skipping {archive}: {err}");
                    None
                }
                Err(err) => Some(Err(err).context("volume archive couldn't be read")),
            }
        })
        .collect()
}

fn split_volume(
    archive: &Utf8Path,
    outdir: &Utf8Path,
    matcher: &Matcher<'_>,
    numbering: ChapterNumbering,
) -> Result<usize> {
    let mut reader = CbzReader::from_path(archive).with_context(|| format!("opening {archive}"))?;
    let has_publisher = matcher.options().publisher.is_some();

    let mut chapters = BTreeMap::new();
    for name in reader.image_names() {
        let file_name = cbz::entry_file_name(&name);
        let parsed = match matcher.match_name(file_name) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!("{err}");
                bail!("{archive} contains a page that couldn't be read");
            }
        };
        let stem =
            sanitize_filename::sanitize(chapter_archive_stem(&parsed, has_publisher, numbering));
        chapters.entry(stem).or_insert_with(Vec::new).push(name);
    }

    std::fs::create_dir_all(outdir).with_context(|| format!("creating {outdir}"))?;

    let mut written = 0;
    for (stem, pages) in chapters {
        let path = outdir.join(format!("{stem}.cbz"));
        if path.exists() {
            warn!("{path} already exists, skipping");
            continue;
        }

        let mut writer: CbzWriter<File> = CbzWriter::create(&path)?;
        for page in &pages {
            let bytes = reader.read_by_name(page)?.to_bytes()?;
            let insertion = CbzWriterInsertionBuilder::from_filename(page)
                .set_bytes(bytes.to_vec())
                .build()?;
            writer.insert(insertion)?;
        }
        writer.finish()?;

        debug!("wrote {} pages to {path}", pages.len());
        written += 1;
    }

    Ok(written)
}

pub fn run(args: &Autosplit, config: &Config) -> Result<()> {
    let archives = if args.path.is_dir() {
        archives_in(&args.path)?
    } else {
        vec![args.path.clone()]
    };
    if archives.is_empty() {
        bail!("no archive found in {}", args.path);
    }

    let numbering = args
        .numbering
        .unwrap_or(config.defaults.chapter_numbering);
    let mut options = MatchOptions::new(args.inner_title.as_deref().unwrap_or(&args.title))
        .with_numbering(numbering);
    if let Some(publisher) = &args.publisher {
        options = options.with_publisher(publisher.as_str());
    }
    if args.oneshot {
        options = options.oneshot();
    }
    let matcher = Matcher::pages(options);

    for (archive, key) in volume_keys(&archives, args)? {
        let Some(parent) = archive.parent() else {
            bail!("{archive} has no parent directory");
        };
        let outdir = parent.join(format!("v{key}"));

        info!("splitting {archive} into {outdir}");
        let written = split_volume(&archive, &outdir, &matcher, numbering)?;
        info!("{written} chapter archives written");
    }

    Ok(())
}
