//! Recognizes release names.
//!
//! Names are tried against an ordered list of dialects, the first one whose
//! pattern matches wins even if the name then fails the expected title,
//! publisher or group.

use std::fmt;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::{
    errors::{AmbiguousNumber, Field, MatchError, Mismatch},
    metadata::{BracketType, ImageQuality, PageNumber, PublicationType, ReleaseMetadata},
    number::{ChapterNumbering, Number},
    ranges::{ChapterRange, PageSpan},
};

static KNOWN_EXTENSIONS: [&str; 16] = [
    "jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff", "avif", "jxl", "cbz", "cbr",
    "cb7", "zip", "rar", "7z",
];

const CHAPTER_HEAD: &str = concat!(
    r"^(?P<series>.+?) - c(?P<chapter>\d{1,4})(?P<chapter_ex>[#x.]\d{1,2})?",
    r"(?: \(c(?P<actual>\d{1,4}\.\d{1,2})\))?",
    r" \((?P<volume>v\d{1,3}(?:[#x.]\d{1,2})?|[A-Za-z][A-Za-z -]*)\)",
    r" - p(?P<page>\d{1,4}(?:[#x.]\d{1,2})?)(?:-(?P<page_end>\d{1,4}(?:[#x.]\d{1,2})?))?",
);

const QUALITY_TAIL: &str = r"(?: \{(?P<quality>HQ|LQ)\})?(?: \{r(?P<revision>\d+)\})?$";

const PAGE_PATTERN: &str =
    r"^(?P<prefix>.*)p(?P<page>\d{1,4})(?:-(?P<page_end>\d{1,4}))?(?P<suffix>.*)$";

const ARCHIVE_PATTERN: &str = concat!(
    r"^(?P<series>[^\[({]+?)",
    r"(?: (?P<volume>v\d{1,3}(?:\.\d{1,2})?)| c?(?P<chapter>\d{3,4})(?P<chapter_ex>[#x.]\d{1,2})?)?",
    r"(?: \((?P<year>\d{4})\))?",
    // lazy, a round credit followed by `(vN)` is not extra metadata
    r"(?: \((?P<extra>[^()]+)\))??",
    r"(?: \((?P<label>Digital|c2c)\))?",
    r" (?P<open>[\[({])(?P<group>[^\])}]+)[\])}]",
    r"(?: \(v(?P<revision>\d+)\))?$",
);

type Extracted = Result<ParsedRelease, (Field, AmbiguousNumber)>;

type Extractor = fn(&Captures<'_>, &MatchOptions) -> Extracted;

/// One naming convention: a pattern and how to read its captures
#[derive(Clone)]
pub struct Dialect {
    pub name: &'static str,
    pattern: Regex,
    extract: Extractor,
}

impl Dialect {
    fn new(name: &'static str, pattern: &str, extract: Extractor) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("dialect patterns are valid regexes"),
            extract,
        }
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

lazy_static! {
    static ref PUBLICATION_TAGS: String = PublicationType::IMAGE_TAGS.join("|");

    static ref PAGE_DIALECTS: Vec<Dialect> = vec![
        Dialect::new(
            "daiz-titled",
            &[
                CHAPTER_HEAD,
                r"(?: \[(?P<tag>[^\]]+)\])? \[(?P<publication>",
                &PUBLICATION_TAGS,
                r")\] \[(?P<chapter_title>.+)\] \[(?P<publisher>[^\]]+)\] \[(?P<group>[^\]]+)\]",
                QUALITY_TAIL,
            ]
            .concat(),
            extract_fields,
        ),
        Dialect::new(
            "daiz",
            &[
                CHAPTER_HEAD,
                r"(?: \[(?P<tag>[^\]]+)\])? \[(?P<publication>",
                &PUBLICATION_TAGS,
                r")\] \[(?P<publisher>[^\]]+)\] \[(?P<group>[^\]]+)\]",
                QUALITY_TAIL,
            ]
            .concat(),
            extract_fields,
        ),
        Dialect::new(
            "daiz-unpublished",
            &[
                CHAPTER_HEAD,
                r"(?: \[(?P<tag>[^\]]+)\])? \[(?P<publication>",
                &PUBLICATION_TAGS,
                r")\] \[(?P<group>[^\]]+)\]",
                QUALITY_TAIL,
            ]
            .concat(),
            extract_fields,
        ),
        Dialect::new(
            "daiz-untyped",
            &[
                CHAPTER_HEAD,
                r"(?: \[(?P<pre>.+)\])? \[(?P<publisher>[^\]]+)\] \[(?P<group>[^\]]+)\]",
                QUALITY_TAIL,
            ]
            .concat(),
            extract_untyped,
        ),
        Dialect::new(
            "daiz-credit-only",
            &[
                CHAPTER_HEAD,
                r"(?: \[(?P<tag>[^\]]+)\])? \[(?P<group>[^\]]+)\]",
                QUALITY_TAIL,
            ]
            .concat(),
            extract_untyped,
        ),
        Dialect::new(
            "daiz-basic",
            &[CHAPTER_HEAD, r"(?P<rest>.*)$"].concat(),
            extract_fields,
        ),
        Dialect::new(
            "comix",
            concat!(
                r"^(?P<series>.+?)(?: - (?P<volume>v\d{1,3}(?:[#x.]\d{1,2})?))?",
                r" - p(?P<page>\d{1,4})(?:-(?P<page_end>\d{1,4}))?(?P<rest>.*)$",
            ),
            extract_comix,
        ),
        Dialect::new("page", PAGE_PATTERN, extract_fields),
    ];

    static ref ARCHIVE_DIALECTS: Vec<Dialect> = vec![
        Dialect::new("archive", ARCHIVE_PATTERN, extract_archive),
        Dialect::new(
            "volume",
            r"^(?P<series>.+?) v(?P<volume>\d{1,3}(?:\.\d{1,2})?)(?P<rest>.*)$",
            extract_loose_volume,
        ),
    ];

    static ref PAGE_NAME: Regex = Regex::new(PAGE_PATTERN).expect("page pattern is a valid regex");

    static ref BRACKET_TOKEN: Regex =
        Regex::new(r"\[([^\]]+)\]").expect("bracket pattern is a valid regex");

    static ref ANY_BRACKET_TOKEN: Regex =
        Regex::new(r"[\[(]([^\])]+)[\])]").expect("bracket pattern is a valid regex");
}

/// Page image dialects, most specific first
#[must_use]
pub fn page_dialects() -> &'static [Dialect] {
    &PAGE_DIALECTS
}

/// Volume archive dialects, most specific first
#[must_use]
pub fn archive_dialects() -> &'static [Dialect] {
    &ARCHIVE_DIALECTS
}

/// What the matched name is expected to contain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compared loosely: case, leading article and punctuation are ignored. Empty accepts any title.
    pub title: String,
    /// Must prefix the publisher of names that carry one
    pub publisher: Option<String>,
    /// Must prefix the group of the name
    pub limit_to: Option<String>,
    pub is_oneshot: bool,
    pub numbering: ChapterNumbering,
}

impl MatchOptions {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    #[must_use]
    pub fn with_limit_to(mut self, group: impl Into<String>) -> Self {
        self.limit_to = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_numbering(mut self, numbering: ChapterNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    #[must_use]
    pub fn oneshot(mut self) -> Self {
        self.is_oneshot = true;
        self
    }
}

/// The fields found in a release name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRelease {
    pub dialect: &'static str,
    pub title: Option<String>,
    pub volume: Option<Number>,
    pub chapter: Option<Number>,
    pub chapter_title: Option<String>,
    pub page: Option<PageNumber>,
    pub page_tag: Option<String>,
    pub publication_type: Option<PublicationType>,
    pub publisher: Option<String>,
    pub group: Option<String>,
    pub bracket_type: Option<BracketType>,
    pub quality: Option<ImageQuality>,
    pub year: Option<u16>,
    pub extra_metadata: Option<String>,
    pub revision: Option<u32>,
    pub is_cover: bool,
}

impl ParsedRelease {
    /// Builds a full record, `ripper_credit` is used when the name has no group
    #[must_use]
    pub fn into_metadata(
        self,
        manga_title: impl Into<String>,
        ripper_credit: impl Into<String>,
    ) -> ReleaseMetadata {
        let mut record = ReleaseMetadata::new(
            manga_title,
            self.group.unwrap_or_else(|| ripper_credit.into()),
        );
        let page = self.page.unwrap_or_default();

        record.manga_volume = self.volume;
        record.manga_year = self.year;
        record.chapter = self.chapter.map(|number| ChapterRange {
            number,
            title: self.chapter_title,
            pages: PageSpan::from_start(page.first.base),
        });
        record.page_number = page;
        record.publisher = self.publisher;
        record.publication_type = self.publication_type.unwrap_or_default();
        record.image_quality = self.quality;
        record.revision = self.revision.unwrap_or(1);
        record.extra_metadata = self.extra_metadata;
        record.page_tag = self.page_tag;
        record.bracket_type = self.bracket_type.unwrap_or_default();
        record.is_cover = self.is_cover;

        record
    }
}

/// A page name cut around its page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageName<'a> {
    pub prefix: &'a str,
    pub page: PageNumber,
    /// Digits used by the first page number
    pub width: usize,
    pub suffix: &'a str,
}

impl PageName<'_> {
    /// The same name with another page number
    #[must_use]
    pub fn with_page(&self, page: PageNumber) -> String {
        format!(
            "{}p{}{}",
            self.prefix,
            page.pad(self.width, 'x'),
            self.suffix
        )
    }
}

/// Finds the last `pNNN` or `pNNN-NNN` of a file stem
#[must_use]
pub fn split_page_name(stem: &str) -> Option<PageName<'_>> {
    let captures = PAGE_NAME.captures(stem)?;
    let page = captures.name("page")?;
    let first = page.as_str().parse().ok()?;
    let last = match captures.name("page_end") {
        Some(end) => Some(end.as_str().parse().ok()?),
        None => None,
    };

    Some(PageName {
        prefix: captures.name("prefix").map_or("", |prefix| prefix.as_str()),
        page: PageNumber {
            first: Number::new(first),
            last: last.map(Number::new),
        },
        width: page.as_str().len(),
        suffix: captures.name("suffix").map_or("", |suffix| suffix.as_str()),
    })
}

/// Lowercases, drops a leading English article and keeps letters and digits only
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let without_article = ["the ", "a ", "an "]
        .iter()
        .find_map(|article| lowered.strip_prefix(article))
        .unwrap_or(&lowered);

    without_article
        .chars()
        .filter(|character| character.is_alphanumeric())
        .collect()
}

fn strip_extension(filename: &str) -> &str {
    let filename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match filename.rsplit_once('.') {
        Some((stem, extension))
            if KNOWN_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension)) =>
        {
            stem
        }
        _ => filename,
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Tries the dialects in order against release names
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    options: MatchOptions,
    dialects: &'a [Dialect],
}

impl Matcher<'static> {
    #[must_use]
    pub fn pages(options: MatchOptions) -> Self {
        Self::with_dialects(options, page_dialects())
    }

    #[must_use]
    pub fn archives(options: MatchOptions) -> Self {
        Self::with_dialects(options, archive_dialects())
    }
}

impl<'a> Matcher<'a> {
    #[must_use]
    pub fn with_dialects(options: MatchOptions, dialects: &'a [Dialect]) -> Self {
        Self { options, dialects }
    }

    #[must_use]
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Parses `filename`, with or without its extension
    ///
    /// ## Errors
    ///
    /// `NoDialectMatch` when no pattern fits, `FieldMismatch` when the first fitting
    /// pattern disagrees with the options, `AmbiguousNumeric` on malformed numbers
    pub fn match_name(&self, filename: &str) -> Result<ParsedRelease, MatchError> {
        let stem = strip_extension(filename);

        for dialect in self.dialects {
            let Some(captures) = dialect.pattern.captures(stem) else {
                trace!("{stem:?} isn't a {} name", dialect.name);
                continue;
            };

            let mut parsed = (dialect.extract)(&captures, &self.options).map_err(
                |(field, AmbiguousNumber { value })| MatchError::AmbiguousNumeric {
                    filename: filename.to_string(),
                    field,
                    value,
                },
            )?;
            parsed.dialect = dialect.name;

            self.check(&parsed)
                .map_err(|mismatch| MatchError::FieldMismatch {
                    filename: filename.to_string(),
                    dialect: dialect.name,
                    mismatch,
                })?;
            self.apply_flags(&mut parsed);
            debug!("{stem:?} matched as {}", dialect.name);

            return Ok(parsed);
        }

        Err(MatchError::NoDialectMatch {
            filename: filename.to_string(),
        })
    }

    fn check(&self, parsed: &ParsedRelease) -> Result<(), Mismatch> {
        if let Some(found) = &parsed.title {
            if !self.options.title.is_empty()
                && normalize_title(found) != normalize_title(&self.options.title)
            {
                return Err(Mismatch::Title {
                    expected: self.options.title.clone(),
                    found: found.clone(),
                });
            }
        }

        if let (Some(expected), Some(found)) = (&self.options.publisher, &parsed.publisher) {
            if !starts_with_ignore_case(found, expected) {
                return Err(Mismatch::Publisher {
                    expected: expected.clone(),
                    found: Some(found.clone()),
                });
            }
        }

        if let Some(expected) = &self.options.limit_to {
            match &parsed.group {
                Some(found) if starts_with_ignore_case(found, expected) => {}
                found => {
                    return Err(Mismatch::Group {
                        expected: expected.clone(),
                        found: found.clone(),
                    })
                }
            }
        }

        Ok(())
    }

    fn apply_flags(&self, parsed: &mut ParsedRelease) {
        let tagged_cover = parsed
            .page_tag
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(ReleaseMetadata::COVER_TAG));
        parsed.is_cover = tagged_cover || parsed.page == Some(PageNumber::COVER);

        if self.options.is_oneshot {
            parsed.volume = None;
            parsed.chapter.get_or_insert(Number::new(0));
        }
    }
}

fn text(captures: &Captures<'_>, name: &str) -> Option<String> {
    captures
        .name(name)
        .map(|value| value.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// `12`, `12.5`, `12x5` and `12#5` are all read literally
fn parse_number(raw: &str) -> Result<Number, AmbiguousNumber> {
    raw.replace(['x', '#'], ".")
        .parse()
        .map_err(|_| AmbiguousNumber {
            value: raw.to_string(),
        })
}

fn number(
    captures: &Captures<'_>,
    name: &str,
    field: Field,
) -> Result<Option<Number>, (Field, AmbiguousNumber)> {
    captures
        .name(name)
        .map(|value| parse_number(value.as_str()).map_err(|err| (field, err)))
        .transpose()
}

fn integer<T: std::str::FromStr>(
    captures: &Captures<'_>,
    name: &str,
    field: Field,
) -> Result<Option<T>, (Field, AmbiguousNumber)> {
    captures
        .name(name)
        .map(|value| {
            value.as_str().parse().map_err(|_| {
                (
                    field,
                    AmbiguousNumber {
                        value: value.as_str().to_string(),
                    },
                )
            })
        })
        .transpose()
}

fn chapter(
    captures: &Captures<'_>,
    numbering: ChapterNumbering,
) -> Result<Option<Number>, (Field, AmbiguousNumber)> {
    if let Some(actual) = number(captures, "actual", Field::Chapter)? {
        return Ok(Some(actual));
    }
    let Some(base) = captures.name("chapter") else {
        return Ok(None);
    };

    let Some(extra) = captures.name("chapter_ex").map(|extra| extra.as_str()) else {
        return parse_number(base.as_str())
            .map(Some)
            .map_err(|err| (Field::Chapter, err));
    };

    let mut chapter = parse_number(&format!("{}{extra}", base.as_str()))
        .map_err(|err| (Field::Chapter, err))?;
    if numbering == ChapterNumbering::Bonus && !extra.starts_with('.') {
        chapter.fraction = chapter
            .fraction
            .map(|fraction| fraction + ChapterNumbering::BONUS_OFFSET);
    }

    Ok(Some(chapter))
}

/// Volume labels such as `NA` or `OShot` mean there is no volume
fn volume(captures: &Captures<'_>) -> Result<Option<Number>, (Field, AmbiguousNumber)> {
    match captures.name("volume").map(|volume| volume.as_str()) {
        Some(volume) if volume.starts_with('v') => parse_number(&volume[1..])
            .map(Some)
            .map_err(|err| (Field::Volume, err)),
        _ => Ok(None),
    }
}

fn page(captures: &Captures<'_>) -> Result<Option<PageNumber>, (Field, AmbiguousNumber)> {
    let Some(first) = number(captures, "page", Field::Page)? else {
        return Ok(None);
    };

    Ok(Some(PageNumber {
        first,
        last: number(captures, "page_end", Field::Page)?,
    }))
}

/// Reads every known capture of the pattern, missing ones stay empty
fn extract_fields(captures: &Captures<'_>, options: &MatchOptions) -> Extracted {
    Ok(ParsedRelease {
        title: text(captures, "series"),
        volume: volume(captures)?,
        chapter: chapter(captures, options.numbering)?,
        chapter_title: text(captures, "chapter_title"),
        page: page(captures)?,
        page_tag: text(captures, "tag"),
        publication_type: text(captures, "publication")
            .and_then(|tag| PublicationType::from_image_tag(&tag)),
        publisher: text(captures, "publisher"),
        group: text(captures, "group"),
        quality: text(captures, "quality").and_then(|quality| quality.parse().ok()),
        year: integer(captures, "year", Field::Year)?,
        extra_metadata: text(captures, "extra"),
        revision: integer(captures, "revision", Field::Revision)?,
        ..ParsedRelease::default()
    })
}

/// Names without a publication tag, the bracket before the publisher holds a page tag, a chapter title or both
fn extract_untyped(captures: &Captures<'_>, options: &MatchOptions) -> Extracted {
    let mut parsed = extract_fields(captures, options)?;
    parsed.publication_type = Some(PublicationType::None);

    let is_cover_tag = |value: &str| value.eq_ignore_ascii_case(ReleaseMetadata::COVER_TAG);

    if let Some(pre) = text(captures, "pre") {
        match pre.split_once("] [") {
            Some((tag, title)) => {
                parsed.page_tag = Some(tag.to_string());
                parsed.chapter_title = Some(title.to_string());
            }
            None if is_cover_tag(&pre) => parsed.page_tag = Some(pre),
            None => parsed.chapter_title = Some(pre),
        }
    } else if parsed.page_tag.is_none() && parsed.publisher.as_deref().is_some_and(is_cover_tag) {
        parsed.page_tag = parsed.publisher.take();
    }

    Ok(parsed)
}

/// Trailing brackets of comix names may hold a page tag, a publication tag and a group
fn extract_comix(captures: &Captures<'_>, options: &MatchOptions) -> Extracted {
    let mut parsed = extract_fields(captures, options)?;
    let rest = captures.name("rest").map_or("", |rest| rest.as_str());

    for token in BRACKET_TOKEN.captures_iter(rest) {
        let token = token[1].trim();
        if let Some(publication_type) = PublicationType::from_image_tag(token) {
            parsed.publication_type = Some(publication_type);
        } else if token.eq_ignore_ascii_case(ReleaseMetadata::COVER_TAG) {
            parsed.page_tag = Some(token.to_string());
        } else {
            parsed.group = Some(token.to_string());
        }
    }
    if rest.contains("{HQ}") {
        parsed.quality = Some(ImageQuality::Hq);
    }

    Ok(parsed)
}

fn extract_archive(captures: &Captures<'_>, options: &MatchOptions) -> Extracted {
    let mut parsed = extract_fields(captures, options)?;

    let mut label = text(captures, "label");
    if label.is_none()
        && parsed
            .extra_metadata
            .as_deref()
            .and_then(PublicationType::from_archive_label)
            .is_some()
    {
        label = parsed.extra_metadata.take();
    }
    parsed.publication_type = Some(
        label
            .as_deref()
            .and_then(PublicationType::from_archive_label)
            .unwrap_or(PublicationType::None),
    );
    parsed.bracket_type = captures
        .name("open")
        .and_then(|open| open.as_str().chars().next())
        .and_then(BracketType::from_opening);

    Ok(parsed)
}

/// Any `Title vNN ...` name, the group is looked for in every trailing bracket
fn extract_loose_volume(captures: &Captures<'_>, options: &MatchOptions) -> Extracted {
    let mut parsed = extract_fields(captures, options)?;
    let rest = captures.name("rest").map_or("", |rest| rest.as_str());

    let tokens = ANY_BRACKET_TOKEN
        .captures_iter(rest)
        .map(|token| token[1].trim().to_string())
        .filter(|token| {
            PublicationType::from_archive_label(token).is_none()
                && !(token.len() == 4 && token.bytes().all(|byte| byte.is_ascii_digit()))
        })
        .collect::<Vec<_>>();

    parsed.group = match &options.limit_to {
        Some(limit) => tokens
            .iter()
            .find(|token| starts_with_ignore_case(token, limit))
            .or_else(|| tokens.last())
            .cloned(),
        None => tokens.last().cloned(),
    };

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_compiles() {
        assert_eq!(page_dialects().len(), 8);
        assert_eq!(archive_dialects().len(), 2);
        assert!(split_page_name("x - p001").is_some());
    }

    #[test]
    fn strips_known_extensions_only() {
        assert_eq!(strip_extension("Title - p001.jpg"), "Title - p001");
        assert_eq!(strip_extension("dir/Title v01.cbz"), "Title v01");
        assert_eq!(strip_extension("Title v01.5"), "Title v01.5");
    }

    #[test]
    fn normalizes_titles() {
        assert_eq!(normalize_title("The Necromancer Maid"), "necromancermaid");
        assert_eq!(normalize_title("Necromancer  Maid!"), "necromancermaid");
        assert_eq!(normalize_title("Re：Zero"), normalize_title("Re:Zero"));
        assert_eq!(normalize_title("Theory"), "theory");
    }

    #[test]
    fn reads_bonus_numbering() {
        let name = "Captain Corinth - c013x1 (v02) - p183 [dig] [Cleria's Conversation With the Spirits] [One Peace Books] [nao]";
        let options = MatchOptions::new("Captain Corinth");

        let literal = Matcher::pages(options.clone()).match_name(name).unwrap();
        assert_eq!(literal.chapter, Some(Number::with_fraction(13, 1)));

        let bonus = Matcher::pages(options.with_numbering(ChapterNumbering::Bonus))
            .match_name(name)
            .unwrap();
        assert_eq!(bonus.chapter, Some(Number::with_fraction(13, 5)));
        assert_eq!(bonus.volume, Some(Number::new(2)));
        assert_eq!(bonus.page, Some(PageNumber::single(183)));
    }

    #[test]
    fn actual_number_wins_over_position() {
        let parsed = Matcher::pages(
            MatchOptions::new("Test").with_numbering(ChapterNumbering::Bonus),
        )
        .match_name("Test - c002x2 (c002.2) (v01) - p030 [dig] [Real Publisher] [nao]")
        .unwrap();
        assert_eq!(parsed.chapter, Some(Number::with_fraction(2, 2)));
        assert_eq!(parsed.dialect, "daiz");
    }

    #[test]
    fn splits_page_names() {
        let name = split_page_name("Title - v01 - p0012-0013 [dig]").unwrap();
        assert_eq!(name.prefix, "Title - v01 - ");
        assert_eq!(name.page, PageNumber::spread(12, 13));
        assert_eq!(name.width, 4);
        assert_eq!(name.suffix, " [dig]");
        assert_eq!(
            name.with_page(PageNumber::single(12)),
            "Title - v01 - p0012 [dig]"
        );
    }
}
