use anyhow::{bail, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tankobon_core::{number_body_pages, split_page_name, PageName, PageNumber};
use tracing::info;

use super::{images_in, rename_all};
use crate::args::Shiftname;

/// Page numbers take at least three digits
fn page_width(last_page: u32) -> usize {
    last_page.to_string().len().max(3)
}

fn is_cover(stem: &str) -> bool {
    stem.to_ascii_lowercase().contains("cover")
}

fn shifted_stem(stem: &str, page: u32, width: usize, title: Option<&str>) -> String {
    if let Some(title) = title {
        return format!("{title} - p{page:0width$}");
    }

    match split_page_name(stem) {
        Some(name) => PageName { width, ..name }.with_page(PageNumber::single(page)),
        None => format!("p{page:0width$}"),
    }
}

/// New names in page order, extensions are lowercased
fn shifted_names(images: &[Utf8PathBuf], args: &Shiftname) -> Vec<(Utf8PathBuf, Utf8PathBuf)> {
    let mut images = images.to_vec();
    if args.reverse {
        images.reverse();
    }

    let covers = images
        .iter()
        .map(|image| is_cover(image.file_stem().unwrap_or_default()))
        .collect::<Vec<_>>();
    let pages = number_body_pages(&covers, args.start);
    let width = page_width(pages.iter().copied().max().unwrap_or(args.start));

    let title = args.title.as_deref().map(|title| match args.volume {
        Some(volume) => format!("{} - v{}", title.trim(), volume.pad(2, '.')),
        None => title.trim().to_string(),
    });

    images
        .into_iter()
        .zip(pages)
        .map(|(image, page)| {
            let stem = shifted_stem(image.file_stem().unwrap_or_default(), page, width, title.as_deref());
            let name = match image.extension() {
                Some(extension) => format!("{stem}.{}", extension.to_ascii_lowercase()),
                None => stem,
            };
            let target = image.parent().unwrap_or(Utf8Path::new(".")).join(name);

            (image, target)
        })
        .collect()
}

pub fn run(args: &Shiftname) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("{} is not a directory", args.dir);
    }

    let images = images_in(&args.dir)?;
    if images.is_empty() {
        bail!("no image found in {}", args.dir);
    }

    let renamed = rename_all(&shifted_names(&images, args))?;
    info!("renamed {renamed} pages starting at {}", args.start);

    Ok(())
}

#[cfg(test)]
mod tests {
    use tankobon_core::Number;

    use super::*;

    fn args(start: u32, reverse: bool, title: Option<&str>, volume: Option<Number>) -> Shiftname {
        Shiftname {
            dir: Utf8PathBuf::from("pages"),
            start,
            reverse,
            title: title.map(str::to_string),
            volume,
        }
    }

    fn targets(names: &[&str], args: &Shiftname) -> Vec<String> {
        let images = names
            .iter()
            .map(|name| Utf8PathBuf::from("pages").join(name))
            .collect::<Vec<_>>();

        shifted_names(&images, args)
            .into_iter()
            .map(|(_, target)| target.file_name().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn pages_keep_their_prefix() {
        assert_eq!(
            targets(&["Test - p001.JPG", "Test - p002.jpg", "scan.png"], &args(1, false, None, None)),
            vec!["Test - p001.jpg", "Test - p002.jpg", "p003.png"]
        );
    }

    #[test]
    fn covers_stay_at_zero() {
        assert_eq!(
            targets(&["a.jpg", "b.jpg", "cover.jpg"], &args(5, true, None, None)),
            vec!["p000.jpg", "p005.jpg", "p006.jpg"]
        );
    }

    #[test]
    fn titles_replace_the_whole_name() {
        let names = (0..1000).map(|page| format!("{page}.png")).collect::<Vec<_>>();
        let names = names.iter().map(String::as_str).collect::<Vec<_>>();
        let targets = targets(&names, &args(1, false, Some("Test"), Some(Number::new(1))));

        assert_eq!(targets[0], "Test - v01 - p0001.png");
        assert_eq!(targets[999], "Test - v01 - p1000.png");
    }
}
