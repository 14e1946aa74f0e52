use std::collections::HashMap;

use anyhow::{bail, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tankobon_core::{
    BatchContext, ChapterRanges, FormatOptions, Formatter, ImageQuality, MatchOptions, Matcher,
    ReleaseMetadata,
};
use tracing::{error, info, warn};

use super::{base_record, email, images_in, manualsplit::prompt_ranges, rename_all};
use crate::{args::Releases, config::Config, tools::Exiftool};

/// One record per page, `None` for pages outside every chapter
fn page_records(
    file_names: &[&str],
    base: &ReleaseMetadata,
    ranges: &ChapterRanges,
    page_tags: &HashMap<u32, String>,
) -> Result<Vec<Option<ReleaseMetadata>>> {
    let matcher = Matcher::pages(MatchOptions::new(""));

    file_names
        .iter()
        .map(|file_name| {
            let parsed = match matcher.match_name(file_name) {
                Ok(parsed) => parsed,
                Err(err) => {
                    error!("{err}");
                    bail!("{file_name} has no page number, rename it to `pNNN` first");
                }
            };
            let Some(page) = parsed.page else {
                bail!("{file_name} has no page number");
            };
            let Some(range) = ranges.resolve(page.first.base) else {
                warn!("page {page} isn't part of any chapter, skipping");
                return Ok(None);
            };

            let mut record = base.clone();
            record.manga_volume = base.manga_volume.or(parsed.volume);
            record.chapter = Some(range.clone());
            record.page_number = page;
            record.page_tag = page_tags.get(&page.first.base).cloned();
            record.is_cover = parsed.is_cover;

            Ok(Some(record))
        })
        .collect()
}

/// Pairs every page with its release name, the extension is kept
fn renames(
    images: &[Utf8PathBuf],
    records: &[Option<ReleaseMetadata>],
    options: &FormatOptions,
) -> Result<Vec<(Utf8PathBuf, Utf8PathBuf)>> {
    let context = BatchContext::collect(records.iter().flatten());
    let formatter = Formatter::new(options, &context);

    images
        .iter()
        .zip(records)
        .filter_map(|(image, record)| record.as_ref().map(|record| (image, record)))
        .map(|(image, record)| {
            let name = formatter.image_filename(record)?;
            let target = match image.extension() {
                Some(extension) => format!("{name}.{extension}"),
                None => name,
            };
            let parent = image.parent().unwrap_or(Utf8Path::new("."));

            Ok((image.clone(), parent.join(target)))
        })
        .collect()
}

pub async fn run(args: Releases, config: &Config) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("{} is not a directory", args.dir);
    }

    let ranges = if args.ranges.is_empty() {
        prompt_ranges()?
    } else {
        args.ranges
    };
    let ranges = ChapterRanges::new(ranges)?;
    info!("release has {} chapters", ranges.len());

    let mut base = base_record(&args.release, config);
    if args.hq {
        base.image_quality = Some(ImageQuality::Hq);
    }
    let page_tags = args
        .page_tags
        .iter()
        .map(|page_tag| (page_tag.page, page_tag.tag.clone()))
        .collect::<HashMap<_, _>>();

    let images = images_in(&args.dir)?;
    if images.is_empty() {
        bail!("no image found in {}", args.dir);
    }
    let file_names = images
        .iter()
        .map(|image| image.file_name().unwrap_or(image.as_str()))
        .collect::<Vec<_>>();
    let records = page_records(&file_names, &base, &ranges, &page_tags)?;

    let options = config.format_options(args.numbering);
    let renames = renames(&images, &records, &options)?;

    let renamed = rename_all(&renames)?;
    info!("renamed {renamed} pages");

    if args.no_tag {
        return Ok(());
    }
    let Some(first) = records.iter().flatten().next() else {
        return Ok(());
    };
    let context = BatchContext::collect(records.iter().flatten());
    let title = Formatter::new(&options, &context).archive_filename(first)?;

    Exiftool::new(&config.executables.exiftool_path)
        .tag(&args.dir, &title, email(&args.release, config))
        .await
}

#[cfg(test)]
mod tests {
    use tankobon_core::{ChapterRange, Number, PageNumber};

    use super::*;
    use crate::commands::check_renames;

    fn base() -> ReleaseMetadata {
        let mut record = ReleaseMetadata::new("Test", "nao");
        record.publisher = Some("Yen Press".to_string());
        record
    }

    fn ranges(ranges: &[&str]) -> ChapterRanges {
        ChapterRanges::new(
            ranges
                .iter()
                .map(|range| range.parse::<ChapterRange>().unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn pages_take_their_chapter_and_tag() {
        let tags = HashMap::from([(1, "ToC".to_string())]);
        let records = page_records(
            &["Test - v01 - p000.jpg", "Test - v01 - p001.jpg", "Test - v01 - p002-003.jpg"],
            &base(),
            &ranges(&["1:0-1", "2:2"]),
            &tags,
        )
        .unwrap();

        let records = records.into_iter().flatten().collect::<Vec<_>>();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_cover);
        assert_eq!(records[0].manga_volume, Some(Number::new(1)));
        assert_eq!(records[1].page_tag.as_deref(), Some("ToC"));
        assert_eq!(records[2].chapter_number(), Some(Number::new(2)));
        assert_eq!(records[2].page_number, PageNumber::spread(2, 3));
    }

    #[test]
    fn pages_outside_chapters_are_kept_in_place() {
        let records = page_records(
            &["p000.jpg", "p001.jpg", "p005.jpg"],
            &base(),
            &ranges(&["1:1-4"]),
            &HashMap::new(),
        )
        .unwrap();

        assert!(records[0].is_none());
        assert!(records[1].is_some());
        assert!(records[2].is_none());
    }

    #[test]
    fn unnumbered_pages_stop_the_release() {
        assert!(page_records(&["cover.jpg"], &base(), &ranges(&["1:0"]), &HashMap::new()).is_err());
    }

    #[test]
    fn pages_sharing_a_number_are_not_renamed() {
        let names = ["a p001.jpg", "b p001.jpg", "c p002.jpg"];
        let images = names.map(Utf8PathBuf::from).to_vec();
        let records = page_records(&names, &base(), &ranges(&["1:0"]), &HashMap::new()).unwrap();

        let renames = renames(&images, &records, &FormatOptions::default()).unwrap();
        assert_eq!(renames[0].1, renames[1].1);
        assert!(check_renames(&renames, |_| false).is_err());
    }

    #[test]
    fn renamed_pages_keep_their_extension() {
        let mut base = base();
        base.manga_volume = Some(Number::new(3));
        let images = vec![Utf8PathBuf::from("pages/p001.png")];
        let records = page_records(&["p001.png"], &base, &ranges(&["26:1"]), &HashMap::new()).unwrap();

        let renames = renames(&images, &records, &FormatOptions::default()).unwrap();
        assert_eq!(
            renames,
            vec![(
                Utf8PathBuf::from("pages/p001.png"),
                Utf8PathBuf::from("pages/Test - c026 (v03) - p001 [dig] [Yen Press] [nao].png")
            )]
        );
    }
}
