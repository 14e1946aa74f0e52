use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{number::Number, ranges::ChapterRange};

/// Where the pages were sourced from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PublicationType {
    #[default]
    Digital,
    Magazine,
    Web,
    Scan,
    DigitalRaw,
    MagazineRaw,
    Mix,
    None,
}

impl PublicationType {
    pub const ALL: [Self; 8] = [
        Self::Digital,
        Self::Magazine,
        Self::Web,
        Self::Scan,
        Self::DigitalRaw,
        Self::MagazineRaw,
        Self::Mix,
        Self::None,
    ];

    /// Every tag accepted in an image name, legacy spellings included
    pub const IMAGE_TAGS: [&'static str; 14] = [
        "dig",
        "web",
        "c2c",
        "mag",
        "scan",
        "paper",
        "raw",
        "raw-d",
        "raw-dig",
        "raw-digital",
        "raw-m",
        "raw-mag",
        "raw-magazine",
        "mix",
    ];

    /// The bracketed tag of the image name, `None` omits it
    #[must_use]
    pub fn image_tag(self) -> Option<&'static str> {
        match self {
            Self::Digital => Some("dig"),
            Self::Magazine => Some("mag"),
            Self::Web => Some("web"),
            Self::Scan => Some("c2c"),
            Self::DigitalRaw => Some("raw-d"),
            Self::MagazineRaw => Some("raw-m"),
            Self::Mix => Some("mix"),
            Self::None => None,
        }
    }

    /// The human readable label of the archive name
    #[must_use]
    pub fn archive_label(self) -> Option<&'static str> {
        match self {
            Self::Digital | Self::Web | Self::DigitalRaw | Self::Mix => Some("Digital"),
            Self::Magazine | Self::Scan | Self::MagazineRaw => Some("c2c"),
            Self::None => None,
        }
    }

    #[must_use]
    pub fn from_image_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "dig" => Some(Self::Digital),
            "web" => Some(Self::Web),
            "c2c" | "scan" | "paper" => Some(Self::Scan),
            "mag" => Some(Self::Magazine),
            "raw" | "raw-d" | "raw-dig" | "raw-digital" => Some(Self::DigitalRaw),
            "raw-m" | "raw-mag" | "raw-magazine" => Some(Self::MagazineRaw),
            "mix" => Some(Self::Mix),
            _ => None,
        }
    }

    /// Archive labels are shared by several types, the most common one is returned
    #[must_use]
    pub fn from_archive_label(label: &str) -> Option<Self> {
        match label {
            "Digital" => Some(Self::Digital),
            "c2c" => Some(Self::Scan),
            _ => None,
        }
    }
}

impl Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Digital => "digital",
            Self::Magazine => "magazine",
            Self::Web => "web",
            Self::Scan => "scan",
            Self::DigitalRaw => "digital-raw",
            Self::MagazineRaw => "magazine-raw",
            Self::Mix => "mix",
            Self::None => "none",
        })
    }
}

/// Brackets wrapping the ripper credit of an archive name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BracketType {
    #[default]
    Square,
    Round,
    Curly,
}

impl BracketType {
    #[must_use]
    pub fn pair(self) -> (char, char) {
        match self {
            Self::Square => ('[', ']'),
            Self::Round => ('(', ')'),
            Self::Curly => ('{', '}'),
        }
    }

    #[must_use]
    pub fn from_opening(opening: char) -> Option<Self> {
        match opening {
            '[' => Some(Self::Square),
            '(' => Some(Self::Round),
            '{' => Some(Self::Curly),
            _ => None,
        }
    }

    #[must_use]
    pub fn wrap(self, value: &str) -> String {
        let (open, close) = self.pair();
        format!("{open}{value}{close}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageQuality {
    #[serde(rename = "HQ")]
    Hq,
    #[serde(rename = "LQ")]
    Lq,
}

impl Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hq => "HQ",
            Self::Lq => "LQ",
        })
    }
}

impl FromStr for ImageQuality {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "HQ" => Ok(Self::Hq),
            "LQ" => Ok(Self::Lq),
            _ => Err(format!("unknown image quality {value:?}")),
        }
    }
}

/// A page, or a joined spread covering `first` to `last`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageNumber {
    pub first: Number,
    pub last: Option<Number>,
}

impl PageNumber {
    pub const COVER: Self = Self::single(0);

    #[must_use]
    pub const fn single(page: u32) -> Self {
        Self {
            first: Number::new(page),
            last: None,
        }
    }

    #[must_use]
    pub const fn spread(first: u32, last: u32) -> Self {
        Self {
            first: Number::new(first),
            last: Some(Number::new(last)),
        }
    }

    #[must_use]
    pub fn largest(&self) -> u32 {
        self.last.map_or(self.first.base, |last| last.base.max(self.first.base))
    }

    #[must_use]
    pub fn pad(&self, width: usize, separator: char) -> String {
        match self.last {
            Some(last) => format!(
                "{}-{}",
                self.first.pad(width, separator),
                last.pad(width, separator)
            ),
            None => self.first.pad(width, separator),
        }
    }
}

impl From<Number> for PageNumber {
    fn from(first: Number) -> Self {
        Self { first, last: None }
    }
}

impl Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last {
            Some(last) => write!(f, "{}-{last}", self.first),
            None => write!(f, "{}", self.first),
        }
    }
}

/// Everything a release name encodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMetadata {
    pub manga_title: String,
    pub manga_volume: Option<Number>,
    pub manga_year: Option<u16>,
    pub chapter: Option<ChapterRange>,
    pub page_number: PageNumber,
    pub publisher: Option<String>,
    pub ripper_credit: String,
    pub publication_type: PublicationType,
    pub image_quality: Option<ImageQuality>,
    pub revision: u32,
    /// Archive only, rendered as `(Omnibus 2-in-1)` before the label
    pub extra_metadata: Option<String>,
    /// Image only, rendered as `[Cover]` before the publication tag
    pub page_tag: Option<String>,
    pub bracket_type: BracketType,
    pub is_cover: bool,
}

impl ReleaseMetadata {
    pub const COVER_TAG: &'static str = "Cover";

    #[must_use]
    pub fn new(manga_title: impl Into<String>, ripper_credit: impl Into<String>) -> Self {
        Self {
            manga_title: manga_title.into(),
            manga_volume: None,
            manga_year: None,
            chapter: None,
            page_number: PageNumber::default(),
            publisher: None,
            ripper_credit: ripper_credit.into(),
            publication_type: PublicationType::default(),
            image_quality: None,
            revision: 1,
            extra_metadata: None,
            page_tag: None,
            bracket_type: BracketType::default(),
            is_cover: false,
        }
    }

    #[must_use]
    pub fn chapter_number(&self) -> Option<Number> {
        self.chapter.as_ref().map(|chapter| chapter.number)
    }

    #[must_use]
    pub fn chapter_title(&self) -> Option<&str> {
        self.chapter.as_ref().and_then(|chapter| chapter.title.as_deref())
    }

    /// The page actually rendered, covers are always page zero
    #[must_use]
    pub fn effective_page(&self) -> PageNumber {
        if self.is_cover {
            PageNumber::COVER
        } else {
            self.page_number
        }
    }

    /// The tag actually rendered, covers are tagged even when none was given
    #[must_use]
    pub fn effective_page_tag(&self) -> Option<&str> {
        match (&self.page_tag, self.is_cover) {
            (Some(tag), _) => Some(tag.as_str()),
            (None, true) => Some(Self::COVER_TAG),
            (None, false) => None,
        }
    }
}
