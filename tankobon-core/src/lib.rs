//! Filename grammar of manga scan releases.
//!
//! [`Matcher`] reads the names used by several release groups into a
//! [`ParsedRelease`], [`Formatter`] writes a [`ReleaseMetadata`] back as one
//! canonical page image name and one archive name.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod errors;
pub mod formatter;
pub mod matcher;
pub mod metadata;
pub mod number;
pub mod ranges;
pub mod sanitize;

pub use errors::{Error, Result};
pub use formatter::{
    chapter_archive_stem, BatchContext, FormatOptions, Formatted, Formatter, NumberWidths,
};
pub use matcher::{
    archive_dialects, normalize_title, page_dialects, split_page_name, Dialect, MatchOptions,
    Matcher, PageName, ParsedRelease,
};
pub use metadata::{BracketType, ImageQuality, PageNumber, PublicationType, ReleaseMetadata};
pub use number::{ChapterNumbering, FractionSeparator, Number};
pub use ranges::{number_body_pages, ChapterRange, ChapterRanges, PageSpan};
pub use sanitize::{sanitize, FilenamePlatform, Sanitized, Substitution};
