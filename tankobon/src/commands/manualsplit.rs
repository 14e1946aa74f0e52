use std::{collections::BTreeMap, fs::File};

use anyhow::{bail, Context, Result};
use camino::Utf8Path;
use cbz::{CbzRead, CbzReader, CbzWrite, CbzWriter, CbzWriterInsertionBuilder};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use tankobon_core::{
    chapter_archive_stem, split_page_name, ChapterNumbering, ChapterRange, ChapterRanges, Number,
    PageSpan, ParsedRelease,
};
use tracing::{debug, info, warn};

use crate::args::Manualsplit;

/// Asks for chapters until the user is done
pub fn prompt_ranges() -> Result<Vec<ChapterRange>> {
    let theme = ColorfulTheme::default();
    let mut ranges = Vec::new();

    loop {
        let number: Number = Input::<String>::with_theme(&theme)
            .with_prompt("Chapter number")
            .validate_with(|input: &String| -> Result<(), String> {
                input.trim().parse::<Number>().map(|_| ()).map_err(|err| err.to_string())
            })
            .interact_text()?
            .trim()
            .parse()?;
        let pages: PageSpan = Input::<String>::with_theme(&theme)
            .with_prompt("Chapter pages (x-y or x)")
            .validate_with(|input: &String| -> Result<(), String> {
                input.trim().parse::<PageSpan>().map(|_| ()).map_err(|err| err.to_string())
            })
            .interact_text()?
            .trim()
            .parse()?;
        let title: String = Input::with_theme(&theme)
            .with_prompt("Chapter title (optional)")
            .allow_empty(true)
            .interact_text()?;

        let range = ChapterRange::new(number, pages);
        ranges.push(match title.trim() {
            "" => range,
            title => range.with_title(title),
        });

        if !Confirm::with_theme(&theme)
            .with_prompt("Add another chapter?")
            .default(true)
            .interact()?
        {
            return Ok(ranges);
        }
    }
}

/// The page number of every image, read from its name or its position when the name has none
fn page_numbers(names: &[String]) -> Vec<u32> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let file_name = cbz::entry_file_name(name);
            let stem = file_name
                .rsplit_once('.')
                .map_or(file_name, |(stem, _)| stem);
            split_page_name(stem).map_or_else(
                || u32::try_from(index).unwrap_or(u32::MAX),
                |page_name| page_name.page.first.base,
            )
        })
        .collect()
}

fn chapter_pages(
    names: Vec<String>,
    ranges: &ChapterRanges,
    volume: Option<Number>,
) -> BTreeMap<String, Vec<String>> {
    let pages = page_numbers(&names);
    let mut chapters = BTreeMap::new();

    for (name, page) in names.into_iter().zip(pages) {
        let Some(range) = ranges.resolve(page) else {
            warn!("page {page} ({name}) isn't part of any chapter, skipping");
            continue;
        };
        let parsed = ParsedRelease {
            volume,
            chapter: Some(range.number),
            chapter_title: range.title.clone(),
            ..ParsedRelease::default()
        };
        let stem = sanitize_filename::sanitize(chapter_archive_stem(
            &parsed,
            false,
            ChapterNumbering::Literal,
        ));
        chapters.entry(stem).or_insert_with(Vec::new).push(name);
    }

    chapters
}

pub fn run(args: Manualsplit) -> Result<()> {
    let ranges = if args.ranges.is_empty() {
        prompt_ranges()?
    } else {
        args.ranges
    };
    let ranges = ChapterRanges::new(ranges)?;
    if ranges.is_empty() {
        bail!("no chapter given");
    }

    let Some(parent) = args.archive.parent() else {
        bail!("{} has no parent directory", args.archive);
    };
    let outdir = parent.join(
        args.volume
            .map_or_else(|| "v00".to_string(), |volume| format!("v{}", volume.pad(2, '.'))),
    );
    std::fs::create_dir_all(&outdir).with_context(|| format!("creating {outdir}"))?;

    let mut reader =
        CbzReader::from_path(&args.archive).with_context(|| format!("opening {}", args.archive))?;
    let chapters = chapter_pages(reader.image_names(), &ranges, args.volume);

    for (stem, pages) in chapters {
        write_chapter(&mut reader, &outdir.join(format!("{stem}.cbz")), &pages)?;
        info!("wrote chapter {stem} ({} pages)", pages.len());
    }

    Ok(())
}

fn write_chapter(reader: &mut CbzReader<File>, path: &Utf8Path, pages: &[String]) -> Result<()> {
    if path.exists() {
        warn!("{path} already exists, skipping");
        return Ok(());
    }

    let mut writer = CbzWriter::create(path)?;
    for page in pages {
        let bytes = reader.read_by_name(page)?.to_bytes()?;
        writer.insert(
            CbzWriterInsertionBuilder::from_filename(page)
                .set_bytes(bytes.to_vec())
                .build()?,
        )?;
    }
    writer.finish()?;
    debug!("wrote {path}");

    Ok(())
}
