//! Generates the canonical names of a release.
//!
//! Padding widths and split chapter positions depend on the whole batch, they
//! are collected once in a [`BatchContext`] before any name is rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{Field, FormatError},
    matcher::ParsedRelease,
    metadata::ReleaseMetadata,
    number::{ChapterNumbering, FractionSeparator, Number},
    sanitize::{sanitize, FilenamePlatform, Substitution},
};

/// Digits used to zero pad each kind of number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberWidths {
    pub volume: usize,
    pub chapter: usize,
    pub page: usize,
}

impl Default for NumberWidths {
    fn default() -> Self {
        Self {
            volume: 2,
            chapter: 3,
            page: 3,
        }
    }
}

impl NumberWidths {
    /// Widens the padding so `record` fits
    pub fn fit(&mut self, record: &ReleaseMetadata) {
        if record.manga_volume.is_some_and(|volume| volume.base >= 100) {
            self.volume = self.volume.max(3);
        }
        if record
            .chapter_number()
            .is_some_and(|chapter| chapter.base >= 1000)
        {
            self.chapter = self.chapter.max(4);
        }
        if record.effective_page().largest() >= 1000 {
            self.page = self.page.max(4);
        }
    }
}

/// What a batch of records shares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchContext {
    pub widths: NumberWidths,
    /// Sorted chapter sub-indexes per chapter base
    siblings: BTreeMap<u32, Vec<u32>>,
}

impl BatchContext {
    #[must_use]
    pub fn collect<'a>(records: impl IntoIterator<Item = &'a ReleaseMetadata>) -> Self {
        let mut context = Self::default();

        for record in records {
            context.widths.fit(record);
            if let Some(Number {
                base,
                fraction: Some(fraction),
            }) = record.chapter_number()
            {
                context.siblings.entry(base).or_default().push(fraction);
            }
        }
        for fractions in context.siblings.values_mut() {
            fractions.sort_unstable();
            fractions.dedup();
        }

        context
    }

    fn siblings(&self, base: u32) -> &[u32] {
        self.siblings.get(&base).map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub separator: FractionSeparator,
    pub numbering: ChapterNumbering,
    /// Written in place of the volume when there is none
    pub fallback_volume_name: String,
    pub platform: FilenamePlatform,
    /// Chapter archives are named `Title c001` instead of `Title 001`
    pub chapter_c_prefix: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            separator: FractionSeparator::default(),
            numbering: ChapterNumbering::default(),
            fallback_volume_name: "NA".to_string(),
            platform: FilenamePlatform::default(),
            chapter_c_prefix: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub image_filename: String,
    pub archive_filename: String,
    /// Unsafe characters replaced in the free text fields, each listed once
    pub substitutions: Vec<Substitution>,
}

#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    options: &'a FormatOptions,
    context: &'a BatchContext,
}

impl<'a> Formatter<'a> {
    #[must_use]
    pub fn new(options: &'a FormatOptions, context: &'a BatchContext) -> Self {
        Self { options, context }
    }

    /// Renders both names of `record`
    ///
    /// ## Errors
    ///
    /// Fails on an empty title or ripper credit, or a revision of zero
    pub fn format(&self, record: &ReleaseMetadata) -> Result<Formatted, FormatError> {
        validate(record)?;

        let mut substitutions = Vec::new();
        let image_filename = self.render_image(record, &mut substitutions);
        let archive_filename = self.render_archive(record, &mut substitutions);

        Ok(Formatted {
            image_filename,
            archive_filename,
            substitutions,
        })
    }

    /// The page image name, without extension
    ///
    /// ## Errors
    ///
    /// See [`Formatter::format`]
    pub fn image_filename(&self, record: &ReleaseMetadata) -> Result<String, FormatError> {
        validate(record)?;
        Ok(self.render_image(record, &mut Vec::new()))
    }

    /// The archive name, without extension
    ///
    /// ## Errors
    ///
    /// See [`Formatter::format`]
    pub fn archive_filename(&self, record: &ReleaseMetadata) -> Result<String, FormatError> {
        validate(record)?;
        Ok(self.render_archive(record, &mut Vec::new()))
    }

    fn clean(&self, value: &str, substitutions: &mut Vec<Substitution>) -> String {
        let sanitized = sanitize(value, self.options.platform);
        for substitution in sanitized.substitutions {
            debug!(
                "replaced {:?} with {:?} in {value:?}",
                substitution.original, substitution.replacement
            );
            if !substitutions.contains(&substitution) {
                substitutions.push(substitution);
            }
        }
        sanitized.value.into_owned()
    }

    fn render_image(
        &self,
        record: &ReleaseMetadata,
        substitutions: &mut Vec<Substitution>,
    ) -> String {
        let widths = self.context.widths;
        let separator = self.options.separator.as_char();

        let chapter = self.chapter_text(record.chapter_number().unwrap_or_default());
        let volume = record.manga_volume.map_or_else(
            || self.options.fallback_volume_name.clone(),
            |volume| format!("v{}", volume.pad(widths.volume, separator)),
        );
        let page = record.effective_page().pad(widths.page, separator);

        let mut segments = vec![format!(
            "{} - c{chapter} ({volume}) - p{page}",
            self.clean(&record.manga_title, substitutions)
        )];

        if let Some(tag) = record.effective_page_tag() {
            segments.push(format!("[{}]", self.clean(tag, substitutions)));
        }
        if let Some(tag) = record.publication_type.image_tag() {
            segments.push(format!("[{tag}]"));
        }
        if let Some(publisher) = &record.publisher {
            if let Some(title) = record.chapter_title() {
                segments.push(format!("[{}]", self.clean(title, substitutions)));
            }
            segments.push(format!("[{}]", self.clean(publisher, substitutions)));
        }
        segments.push(format!(
            "[{}]",
            self.clean(&record.ripper_credit, substitutions)
        ));
        if let Some(quality) = record.image_quality {
            segments.push(format!("{{{quality}}}"));
        }

        segments.join(" ")
    }

    fn render_archive(
        &self,
        record: &ReleaseMetadata,
        substitutions: &mut Vec<Substitution>,
    ) -> String {
        let mut name = self.clean(&record.manga_title, substitutions);

        match (record.manga_volume, record.chapter_number()) {
            (Some(volume), _) => {
                name.push_str(&format!(" v{}", volume.pad(self.context.widths.volume, '.')));
            }
            (None, Some(chapter)) => {
                name.push(' ');
                if self.options.chapter_c_prefix {
                    name.push('c');
                }
                name.push_str(&self.archive_chapter_text(chapter));
            }
            (None, None) => {}
        }
        if let Some(year) = record.manga_year {
            name.push_str(&format!(" ({year})"));
        }
        if let Some(extra) = &record.extra_metadata {
            name.push_str(&format!(" ({})", self.clean(extra, substitutions)));
        }
        if let Some(label) = record.publication_type.archive_label() {
            name.push_str(&format!(" ({label})"));
        }
        name.push(' ');
        name.push_str(
            &record
                .bracket_type
                .wrap(&self.clean(&record.ripper_credit, substitutions)),
        );
        if record.revision > 1 {
            name.push_str(&format!(" (v{})", record.revision));
        }

        name
    }

    /// Bonus chapters above `.4` shift down to `x1`, smaller sub-indexes are
    /// split chapters written with their position and their actual number
    fn chapter_text(&self, chapter: Number) -> String {
        let width = self.context.widths.chapter;
        let separator = self.options.separator.as_char();

        let Some(fraction) = chapter.fraction else {
            return chapter.pad(width, separator);
        };
        if self.options.numbering == ChapterNumbering::Literal {
            return chapter.pad(width, separator);
        }

        let siblings = self.context.siblings(chapter.base);
        let smallest = siblings.first().map_or(fraction, |first| (*first).min(fraction));
        if fraction > ChapterNumbering::BONUS_OFFSET && smallest > ChapterNumbering::BONUS_OFFSET {
            return Number::with_fraction(chapter.base, fraction - ChapterNumbering::BONUS_OFFSET)
                .pad(width, separator);
        }

        let position = siblings
            .iter()
            .position(|sibling| *sibling == fraction)
            .map_or(1, |index| index + 1);
        format!(
            "{base:0width$}{separator}{position} (c{base:0width$}.{fraction})",
            base = chapter.base
        )
    }

    fn archive_chapter_text(&self, chapter: Number) -> String {
        let width = self.context.widths.chapter;
        match chapter.fraction {
            Some(fraction)
                if self.options.numbering == ChapterNumbering::Bonus
                    && fraction > ChapterNumbering::BONUS_OFFSET =>
            {
                Number::with_fraction(chapter.base, fraction - ChapterNumbering::BONUS_OFFSET)
                    .pad(width, self.options.separator.as_char())
            }
            _ => chapter.pad(width, '.'),
        }
    }
}

fn validate(record: &ReleaseMetadata) -> Result<(), FormatError> {
    if record.manga_title.trim().is_empty() {
        return Err(FormatError::MissingField(Field::Title));
    }
    if record.ripper_credit.trim().is_empty() {
        return Err(FormatError::MissingField(Field::Credit));
    }
    if record.revision == 0 {
        return Err(FormatError::InvalidRevision);
    }
    Ok(())
}

/// The name of one chapter archive cut out of a volume: `01.003 - Title`,
/// or `01.003.5 - Extra 1` for an untitled bonus chapter of a published release
#[must_use]
pub fn chapter_archive_stem(
    parsed: &ParsedRelease,
    has_publisher: bool,
    numbering: ChapterNumbering,
) -> String {
    let chapter = parsed.chapter.unwrap_or_default();
    let mut stem = parsed
        .volume
        .map(|volume| format!("{}.", volume.pad(2, '.')))
        .unwrap_or_default();
    stem.push_str(&chapter.pad(3, '.'));

    match (&parsed.chapter_title, chapter.fraction) {
        (Some(title), _) => stem.push_str(&format!(" - {title}")),
        (None, Some(fraction)) if has_publisher => {
            let extra = match numbering {
                ChapterNumbering::Bonus if fraction > ChapterNumbering::BONUS_OFFSET => {
                    fraction - ChapterNumbering::BONUS_OFFSET
                }
                _ => fraction,
            };
            stem.push_str(&format!(" - Extra {extra}"));
        }
        _ => {}
    }

    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{BracketType, PageNumber, PublicationType},
        ranges::{ChapterRange, PageSpan},
    };

    fn record(chapter: Number) -> ReleaseMetadata {
        let mut record = ReleaseMetadata::new("Test", "nao");
        record.manga_volume = Some(Number::new(1));
        record.chapter = Some(ChapterRange::new(chapter, PageSpan::from_start(1)));
        record.page_number = PageNumber::single(5);
        record
    }

    #[test]
    fn bonus_chapters_shift_down() {
        let options = FormatOptions {
            numbering: ChapterNumbering::Bonus,
            ..FormatOptions::default()
        };
        let records = [record(Number::with_fraction(1, 5)), record(Number::with_fraction(1, 6))];
        let context = BatchContext::collect(&records);
        let formatter = Formatter::new(&options, &context);

        assert_eq!(
            formatter.image_filename(&records[1]).unwrap(),
            "Test - c001x2 (v01) - p005 [dig] [nao]"
        );
    }

    #[test]
    fn split_chapters_keep_their_actual_number() {
        let options = FormatOptions {
            numbering: ChapterNumbering::Bonus,
            ..FormatOptions::default()
        };
        let records = [record(Number::with_fraction(2, 1)), record(Number::with_fraction(2, 2))];
        let context = BatchContext::collect(&records);
        let formatter = Formatter::new(&options, &context);

        assert_eq!(
            formatter.image_filename(&records[1]).unwrap(),
            "Test - c002x2 (c002.2) (v01) - p005 [dig] [nao]"
        );
    }

    #[test]
    fn literal_chapters_use_the_separator() {
        let options = FormatOptions {
            separator: FractionSeparator::Hash,
            ..FormatOptions::default()
        };
        let records = [record(Number::with_fraction(1, 5))];
        let context = BatchContext::collect(&records);
        let formatted = Formatter::new(&options, &context).format(&records[0]).unwrap();

        assert_eq!(formatted.image_filename, "Test - c001#5 (v01) - p005 [dig] [nao]");
        assert_eq!(formatted.archive_filename, "Test v01 (Digital) [nao]");
    }

    #[test]
    fn chapter_archives_use_the_chapter_number() {
        let options = FormatOptions {
            chapter_c_prefix: true,
            ..FormatOptions::default()
        };
        let mut record = record(Number::new(12));
        record.manga_volume = None;
        record.publication_type = PublicationType::None;
        record.bracket_type = BracketType::Curly;
        let context = BatchContext::collect([&record]);
        let formatted = Formatter::new(&options, &context).format(&record).unwrap();

        assert_eq!(formatted.archive_filename, "Test c012 {nao}");
        assert_eq!(formatted.image_filename, "Test - c012 (NA) - p005 [nao]");
    }

    #[test]
    fn substitutions_are_listed_once() {
        let mut record = record(Number::new(1));
        record.manga_title = "Re:Zero".to_string();
        let options = FormatOptions::default();
        let context = BatchContext::collect([&record]);
        let formatted = Formatter::new(&options, &context).format(&record).unwrap();

        assert_eq!(formatted.archive_filename, "Re：Zero v01 (Digital) [nao]");
        assert_eq!(formatted.substitutions.len(), 1);
    }

    #[test]
    fn incomplete_records_are_rejected() {
        let options = FormatOptions::default();
        let context = BatchContext::default();
        let formatter = Formatter::new(&options, &context);

        let mut record = record(Number::new(1));
        record.ripper_credit = String::new();
        assert_eq!(
            formatter.format(&record),
            Err(FormatError::MissingField(Field::Credit))
        );

        record.ripper_credit = "nao".to_string();
        record.revision = 0;
        assert_eq!(formatter.format(&record), Err(FormatError::InvalidRevision));
    }

    #[test]
    fn names_chapter_archives() {
        let mut parsed = ParsedRelease {
            volume: Some(Number::new(2)),
            chapter: Some(Number::with_fraction(13, 5)),
            ..ParsedRelease::default()
        };
        assert_eq!(
            chapter_archive_stem(&parsed, true, ChapterNumbering::Bonus),
            "02.013.5 - Extra 1"
        );
        assert_eq!(
            chapter_archive_stem(&parsed, false, ChapterNumbering::Bonus),
            "02.013.5"
        );

        parsed.chapter_title = Some("The Return".to_string());
        parsed.volume = None;
        assert_eq!(
            chapter_archive_stem(&parsed, true, ChapterNumbering::Literal),
            "013.5 - The Return"
        );
    }
}
