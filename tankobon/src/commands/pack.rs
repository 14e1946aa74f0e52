use anyhow::{bail, Context, Result};
use cbz::{CbzWrite, CbzWriter, CbzWriterInsertionBuilder};
use tankobon_core::{BatchContext, ChapterRange, Formatter, Number, PageSpan, ReleaseMetadata};
use tracing::{debug, info};

use super::{base_record, email, images_in, progress_bar};
use crate::{
    args::{Pack, Release},
    config::Config,
};

fn release_record(release: &Release, chapter: Option<Number>, config: &Config) -> ReleaseMetadata {
    let mut record = base_record(release, config);
    if let Some(chapter) = chapter {
        record.manga_volume = None;
        record.chapter = Some(ChapterRange::new(chapter, PageSpan::from_start(0)));
    }

    record
}

/// The archive name of a whole volume, or of a single chapter
pub fn archive_title(release: &Release, chapter: Option<Number>, config: &Config) -> Result<String> {
    let record = release_record(release, chapter, config);
    let options = config.format_options(None);
    let context = BatchContext::collect([&record]);

    Ok(Formatter::new(&options, &context).archive_filename(&record)?)
}

pub fn run(args: &Pack, config: &Config) -> Result<()> {
    let images = images_in(&args.dir)?;
    if images.is_empty() {
        bail!("no image found in {}", args.dir);
    }

    let outdir = match (&args.outdir, args.dir.parent()) {
        (Some(outdir), _) => outdir.clone(),
        (None, Some(parent)) => parent.to_path_buf(),
        (None, None) => bail!("{} has no parent directory, set --outdir", args.dir),
    };
    std::fs::create_dir_all(&outdir).with_context(|| format!("creating {outdir}"))?;

    let title = archive_title(&args.release, args.chapter, config)?;
    let path = outdir.join(format!("{title}.cbz"));
    if path.exists() {
        bail!("{path} already exists");
    }

    let mut writer = CbzWriter::create(&path)?;
    let email = email(&args.release, config);
    if !email.is_empty() {
        writer.set_comment(email.to_string());
    }

    let bar = progress_bar(images.len())?;
    for image in &images {
        let bytes = std::fs::read(image).with_context(|| format!("reading {image}"))?;
        writer.insert(
            CbzWriterInsertionBuilder::from_filename(image.as_str())
                .set_bytes(bytes)
                .build()?,
        )?;
        debug!("packed {image}");
        bar.inc(1);
    }
    writer.finish()?;
    bar.finish();

    info!("packed {} pages into {path}", images.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::args::{Args, Subcommands};

    fn pack(args: &[&str]) -> Pack {
        let args = Args::try_parse_from(
            ["tankobon", "pack", "pages"]
                .iter()
                .chain(args)
                .copied(),
        )
        .unwrap();
        let Subcommands::Pack(pack) = args.command else {
            panic!("expected the pack subcommand");
        };

        pack
    }

    #[test]
    fn volumes_are_named_after_the_release() {
        let args = pack(&["-t", "Test Manga", "-v", "1", "-y", "2023", "--extra", "Omnibus 2-in-1"]);
        assert_eq!(
            archive_title(&args.release, args.chapter, &Config::default()).unwrap(),
            "Test Manga v01 (2023) (Omnibus 2-in-1) (Digital) (nao)"
        );
    }

    #[test]
    fn chapters_replace_the_volume() {
        let args = pack(&[
            "-t",
            "Test Manga",
            "-v",
            "1",
            "-y",
            "2023",
            "--chapter",
            "12.5",
            "--bracket-type",
            "square",
            "--revision",
            "2",
        ]);
        assert_eq!(
            archive_title(&args.release, args.chapter, &Config::default()).unwrap(),
            "Test Manga 012.5 (2023) (Digital) [nao] (v2)"
        );
    }
}
