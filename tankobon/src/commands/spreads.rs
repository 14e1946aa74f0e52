use std::fs;

use anyhow::{bail, Context, Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use cbz::image::Image;
use futures::future::try_join_all;
use tankobon_core::{split_page_name, PageNumber, PageSpan};
use tracing::{debug, info};

use super::images_in;
use crate::args::{JoinSpreads, SplitSpreads};

const BACKUP_DIR: &str = "backup";

fn page_number(path: &Utf8Path) -> Option<PageNumber> {
    split_page_name(path.file_stem()?).map(|name| name.page)
}

/// `path` renamed to another page number, the directory and extension are kept
fn with_page(path: &Utf8Path, page: PageNumber) -> Result<Utf8PathBuf> {
    let Some(name) = path.file_stem().and_then(split_page_name) else {
        bail!("{path} has no page number");
    };
    let mut file_name = name.with_page(page);
    if let Some(extension) = path.extension() {
        file_name.push('.');
        file_name.push_str(extension);
    }

    Ok(path.with_file_name(file_name))
}

fn backup(dir: &Utf8Path, paths: &[Utf8PathBuf]) -> Result<()> {
    let backup_dir = dir.join(BACKUP_DIR);
    fs::create_dir_all(&backup_dir).with_context(|| format!("creating {backup_dir}"))?;

    for path in paths {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        fs::rename(path, backup_dir.join(file_name))
            .with_context(|| format!("moving {path} to {backup_dir}"))?;
    }

    Ok(())
}

/// The single pages a spread is made of, in page order
fn spread_pages(images: &[Utf8PathBuf], span: PageSpan) -> Result<Vec<Utf8PathBuf>> {
    let Some(end) = span.end else {
        bail!("spread {} has no end page, expected `start-end`", span.start);
    };

    let mut pages = images
        .iter()
        .filter_map(|path| {
            let page = page_number(path)?;
            (page.last.is_none() && span.contains(page.first.base))
                .then(|| (page.first.base, path.clone()))
        })
        .collect::<Vec<_>>();
    pages.sort();

    let found = pages.iter().map(|(page, _)| *page).collect::<Vec<_>>();
    let expected = (span.start..=end).collect::<Vec<_>>();
    if found != expected {
        bail!("spread {}-{end} needs the pages {expected:?}, found {found:?}", span.start);
    }

    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

pub async fn join(args: &JoinSpreads) -> Result<()> {
    let images = images_in(&args.dir)?;
    let spreads = args
        .spreads
        .iter()
        .map(|span| Ok((*span, spread_pages(&images, *span)?)))
        .collect::<Result<Vec<_>>>()?;

    let joined = try_join_all(spreads.into_iter().map(|(span, pages)| {
        let reading_order = args.reading_order;
        let quality = args.quality;
        tokio::task::spawn_blocking(move || {
            let images = pages.iter().map(Image::open).collect::<Result<Vec<_>, _>>()?;
            let joined = Image::join(&images, reading_order)?;
            let end = span.end.unwrap_or(span.start);
            let output = with_page(&pages[0], PageNumber::spread(span.start, end))?;
            joined.save(&output, quality)?;
            debug!("joined {} pages into {output}", pages.len());

            Ok::<_, Error>(pages)
        })
    }))
    .await?;

    let mut count = 0;
    for pages in joined {
        backup(&args.dir, &pages?)?;
        count += 1;
    }
    info!("joined {count} spreads, originals moved to {}", args.dir.join(BACKUP_DIR));

    Ok(())
}

pub async fn split(args: &SplitSpreads) -> Result<()> {
    let spreads = images_in(&args.dir)?
        .into_iter()
        .filter_map(|path| {
            let page = page_number(&path)?;
            page.last.map(|last| (path, page.first, last))
        })
        .collect::<Vec<_>>();
    if spreads.is_empty() {
        info!("no spread found in {}", args.dir);
        return Ok(());
    }

    let split = try_join_all(spreads.into_iter().map(|(path, first, last)| {
        let reading_order = args.reading_order;
        let quality = args.quality;
        tokio::task::spawn_blocking(move || {
            let (first_image, last_image) = Image::open(&path)?.split(reading_order);
            first_image.save(with_page(&path, first.into())?, quality)?;
            last_image.save(with_page(&path, last.into())?, quality)?;
            debug!("split {path}");

            Ok::<_, Error>(path)
        })
    }))
    .await?
    .into_iter()
    .collect::<Result<Vec<_>>>()?;

    backup(&args.dir, &split)?;
    info!("split {} spreads, originals moved to {}", split.len(), args.dir.join(BACKUP_DIR));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<Utf8PathBuf> {
        names.iter().map(|name| Utf8PathBuf::from(*name)).collect()
    }

    #[test]
    fn spreads_are_named_after_their_pages() {
        assert_eq!(
            with_page(
                Utf8Path::new("pages/Test - v01 - p012 [dig] [nao].jpg"),
                PageNumber::spread(12, 13)
            )
            .unwrap(),
            Utf8PathBuf::from("pages/Test - v01 - p012-013 [dig] [nao].jpg")
        );
        assert!(with_page(Utf8Path::new("cover.jpg"), PageNumber::single(1)).is_err());
    }

    #[test]
    fn spreads_need_every_page() {
        let images = paths(&["p011.jpg", "p013.jpg", "p012.jpg", "p014-015.jpg"]);

        assert_eq!(
            spread_pages(&images, PageSpan::new(12, 13)).unwrap(),
            paths(&["p012.jpg", "p013.jpg"])
        );
        assert!(spread_pages(&images, PageSpan::new(13, 15)).is_err());
        assert!(spread_pages(&images, PageSpan::from_start(12)).is_err());
    }
}
