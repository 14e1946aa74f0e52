use std::{collections::HashSet, fs};

use anyhow::{anyhow, bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Datelike, FixedOffset, Utc};
use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tankobon_core::ReleaseMetadata;

use crate::{args::Release, config::Config};

pub mod autosplit;
pub mod config;
pub mod lookup;
pub mod manualsplit;
pub mod merge;
pub mod optimize;
pub mod pack;
pub mod packcomment;
pub mod releases;
pub mod shiftname;
pub mod spreads;
pub mod tag;

fn paths_matching(dir: &Utf8Path, file_pattern: &str) -> Result<Vec<Utf8PathBuf>> {
    let pattern = format!("{}/{file_pattern}", Pattern::escape(dir.as_str()));

    let mut paths = glob(&pattern)?
        .map(|path| {
            Utf8PathBuf::from_path_buf(path?)
                .map_err(|path| anyhow!("{path:?} is not a valid utf-8 path"))
        })
        .collect::<Result<Vec<_>>>()?;
    paths.sort();

    Ok(paths)
}

/// The images directly inside `dir`, sorted by name
pub fn images_in(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    Ok(paths_matching(dir, "*")?
        .into_iter()
        .filter(|path| path.is_file() && cbz::is_image_name(path.as_str()))
        .collect())
}

/// The `.cbz` archives directly inside `dir`, sorted by name
pub fn archives_in(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    paths_matching(dir, "*.cbz")
}

pub fn progress_bar(len: usize) -> Result<ProgressBar> {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar().template("[{elapsed_precise}] [{wide_bar}] {pos}/{len} {msg}")?,
    );

    Ok(bar)
}

/// Checks a whole batch of renames before anything moves. Targets must be
/// unique and can only exist if they are renamed away in the same batch.
fn check_renames(
    renames: &[(Utf8PathBuf, Utf8PathBuf)],
    exists: impl Fn(&Utf8Path) -> bool,
) -> Result<()> {
    let sources = renames
        .iter()
        .map(|(source, _)| source.as_path())
        .collect::<HashSet<_>>();
    let mut targets = HashSet::new();

    for (source, target) in renames {
        if !targets.insert(target.as_path()) {
            bail!("{source} and another file would both be renamed to {target}, nothing was renamed");
        }
        if !sources.contains(target.as_path()) && exists(target) {
            bail!("{target} already exists, nothing was renamed");
        }
    }

    Ok(())
}

fn staging_path(path: &Utf8Path) -> Utf8PathBuf {
    path.with_file_name(format!(".{}.tankobon", path.file_name().unwrap_or_default()))
}

/// Renames every pair or none of them. When a file takes the name of another
/// renamed file, every file goes through a staging name first.
pub fn rename_all(renames: &[(Utf8PathBuf, Utf8PathBuf)]) -> Result<usize> {
    let renames = renames
        .iter()
        .filter(|(source, target)| source != target)
        .cloned()
        .collect::<Vec<_>>();
    check_renames(&renames, Utf8Path::exists)?;

    let sources = renames
        .iter()
        .map(|(source, _)| source.as_path())
        .collect::<HashSet<_>>();
    let staged = renames
        .iter()
        .any(|(_, target)| sources.contains(target.as_path()));
    if staged {
        if let Some((source, _)) = renames
            .iter()
            .find(|(source, _)| staging_path(source).exists())
        {
            bail!("{} is in the way, nothing was renamed", staging_path(source));
        }
        for (source, _) in &renames {
            fs::rename(source, staging_path(source))
                .with_context(|| format!("renaming {source}"))?;
        }
    }

    let bar = progress_bar(renames.len())?;
    for (source, target) in &renames {
        let current = if staged {
            staging_path(source)
        } else {
            source.clone()
        };
        fs::rename(&current, target).with_context(|| format!("renaming {source}"))?;
        bar.inc(1);
    }
    bar.finish();

    Ok(renames.len())
}

/// Releases are dated in UTC-8
pub fn current_year() -> u16 {
    let now = FixedOffset::west_opt(8 * 3600)
        .map_or_else(|| Utc::now().year(), |offset| Utc::now().with_timezone(&offset).year());

    u16::try_from(now).unwrap_or_default()
}

/// The record shared by every page of a release, flags override the config defaults
pub fn base_record(release: &Release, config: &Config) -> ReleaseMetadata {
    let defaults = &config.defaults;
    let mut record = ReleaseMetadata::new(
        release.title.trim(),
        release
            .credit
            .clone()
            .unwrap_or_else(|| defaults.ripper_credit.clone()),
    );

    record.manga_volume = release.volume;
    record.manga_year = Some(release.year.unwrap_or_else(current_year));
    record.publisher = release.publisher.clone();
    record.publication_type = release
        .publication_type
        .unwrap_or(defaults.publication_type);
    record.bracket_type = release.bracket_type.unwrap_or(defaults.bracket_type);
    record.revision = release.revision;
    record.extra_metadata = release.extra.clone();

    record
}

pub fn email<'a>(release: &'a Release, config: &'a Config) -> &'a str {
    release
        .email
        .as_deref()
        .unwrap_or(&config.defaults.ripper_email)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tankobon_core::{BracketType, Number, PublicationType};

    use super::*;
    use crate::args::{Args, Subcommands};

    fn release(args: &[&str]) -> Release {
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

        pack.release
    }

    #[test]
    fn flags_override_config_defaults() {
        let config = Config::default();
        let record = base_record(
            &release(&[
                "-t",
                " Test ",
                "-v",
                "2",
                "-y",
                "2021",
                "-c",
                "someone",
                "--bracket-type",
                "square",
            ]),
            &config,
        );

        assert_eq!(record.manga_title, "Test");
        assert_eq!(record.manga_volume, Some(Number::new(2)));
        assert_eq!(record.manga_year, Some(2021));
        assert_eq!(record.ripper_credit, "someone");
        assert_eq!(record.bracket_type, BracketType::Square);
        assert_eq!(record.publication_type, PublicationType::Digital);
    }

    fn pairs(renames: &[(&str, &str)]) -> Vec<(Utf8PathBuf, Utf8PathBuf)> {
        renames
            .iter()
            .map(|(source, target)| (Utf8PathBuf::from(*source), Utf8PathBuf::from(*target)))
            .collect()
    }

    #[test]
    fn colliding_renames_are_rejected_up_front() {
        let same_target = pairs(&[("a p001.jpg", "p001.jpg"), ("b p001.jpg", "p001.jpg")]);
        assert!(check_renames(&same_target, |_| false).is_err());

        let taken = pairs(&[("a.jpg", "p001.jpg")]);
        assert!(check_renames(&taken, |path| path == "p001.jpg").is_err());

        let shifted = pairs(&[("p001.jpg", "p000.jpg"), ("p002.jpg", "p001.jpg")]);
        assert!(check_renames(&shifted, |path| path == "p001.jpg").is_ok());
    }

    #[test]
    fn failed_batches_leave_the_directory_untouched() {
        let dir = Utf8PathBuf::from_path_buf(std::env::temp_dir())
            .unwrap()
            .join(format!("tankobon-renames-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for name in ["a p001.jpg", "b p001.jpg", "p001.jpg"] {
            fs::write(dir.join(name), name).unwrap();
        }

        let colliding = vec![
            (dir.join("a p001.jpg"), dir.join("x p001.jpg")),
            (dir.join("b p001.jpg"), dir.join("x p001.jpg")),
        ];
        assert!(rename_all(&colliding).is_err());

        let shifted = vec![
            (dir.join("p001.jpg"), dir.join("p000.jpg")),
            (dir.join("a p001.jpg"), dir.join("p001.jpg")),
        ];
        assert_eq!(rename_all(&shifted).unwrap(), 2);

        let mut names = fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();
        assert_eq!(names, vec!["b p001.jpg", "p000.jpg", "p001.jpg"]);
        assert_eq!(fs::read_to_string(dir.join("p001.jpg")).unwrap(), "a p001.jpg");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn config_fills_missing_flags() {
        let mut config = Config::default();
        config.defaults.ripper_email = "nao@example.com".to_string();
        let release = release(&["-t", "Test"]);
        let record = base_record(&release, &config);

        assert_eq!(record.ripper_credit, "nao");
        assert_eq!(record.bracket_type, BracketType::Round);
        assert_eq!(record.manga_year, Some(current_year()));
        assert_eq!(email(&release, &config), "nao@example.com");
    }
}
