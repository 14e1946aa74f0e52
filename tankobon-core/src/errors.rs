use std::fmt::{self, Display};

/// A numeric field that is neither an integer nor an integer with a single sub-index
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not an integer or an integer with a single sub-index")]
pub struct AmbiguousNumber {
    pub value: String,
}

/// The part of a release name a failure points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Volume,
    Chapter,
    Page,
    Year,
    Revision,
    Publisher,
    Group,
    Credit,
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Title => "title",
            Self::Volume => "volume",
            Self::Chapter => "chapter",
            Self::Page => "page",
            Self::Year => "year",
            Self::Revision => "revision",
            Self::Publisher => "publisher",
            Self::Group => "group",
            Self::Credit => "ripper credit",
        })
    }
}

/// Which expectation a structurally matching name failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Title {
        expected: String,
        found: String,
    },
    Publisher {
        expected: String,
        found: Option<String>,
    },
    Group {
        expected: String,
        found: Option<String>,
    },
}

impl Mismatch {
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::Title { .. } => Field::Title,
            Self::Publisher { .. } => Field::Publisher,
            Self::Group { .. } => Field::Group,
        }
    }
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (expected, found) = match self {
            Self::Title { expected, found } => (expected, Some(found)),
            Self::Publisher { expected, found } | Self::Group { expected, found } => {
                (expected, found.as_ref())
            }
        };
        match found {
            Some(found) => write!(f, "{} is {found:?}, expected {expected:?}", self.field()),
            None => write!(f, "{} is missing, expected {expected:?}", self.field()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("{filename:?} doesn't follow any known naming convention")]
    NoDialectMatch { filename: String },

    #[error("{filename:?} looks like a {dialect} name but its {mismatch}")]
    FieldMismatch {
        filename: String,
        dialect: &'static str,
        mismatch: Mismatch,
    },

    #[error("{filename:?} has an ambiguous {field} number {value:?}")]
    AmbiguousNumeric {
        filename: String,
        field: Field,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("{0:?} is not a page range, expected `start` or `start-end`")]
    InvalidSpan(String),

    #[error("{0:?} is not a chapter range, expected `chapter:start[-end][:title]`")]
    InvalidChapter(String),

    #[error("chapter {chapter} overlaps chapter {other} at page {page}")]
    Overlap {
        chapter: String,
        other: String,
        page: u32,
    },

    #[error(transparent)]
    Number(#[from] AmbiguousNumber),
}

/// Raised when the formatter is handed an incomplete record, this is a caller bug
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("release metadata has an empty {0}")]
    MissingField(Field),

    #[error("revision must be at least 1")]
    InvalidRevision,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("match error: {0}")]
    Match(#[from] MatchError),

    #[error("range error: {0}")]
    Range(#[from] RangeError),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("number error: {0}")]
    Number(#[from] AmbiguousNumber),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
