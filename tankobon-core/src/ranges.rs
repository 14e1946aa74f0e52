use std::{
    fmt::{self, Display},
    ops::RangeInclusive,
    str::FromStr,
};

use crate::{errors::RangeError, number::Number};

/// Pages `start` to `end`, an open end runs until the next chapter or the end of the volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub start: u32,
    pub end: Option<u32>,
}

impl PageSpan {
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    #[must_use]
    pub const fn from_start(start: u32) -> Self {
        Self { start, end: None }
    }

    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        page >= self.start && self.end.map_or(true, |end| page <= end)
    }

    /// The pages of the span, an open end stops at `last_page`
    #[must_use]
    pub fn pages(&self, last_page: u32) -> RangeInclusive<u32> {
        self.start..=self.end.unwrap_or(last_page)
    }
}

impl FromStr for PageSpan {
    type Err = RangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::InvalidSpan(value.to_string());
        let parse = |page: &str| page.trim().parse::<u32>().map_err(|_| invalid());

        match value.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse(start)?, parse(end)?);
                if end < start {
                    return Err(invalid());
                }
                Ok(Self::new(start, end))
            }
            None => Ok(Self::from_start(parse(value)?)),
        }
    }
}

impl Display for PageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{end}", self.start),
            None => write!(f, "{}-", self.start),
        }
    }
}

/// One logical chapter and the pages it covers in its volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRange {
    pub number: Number,
    pub title: Option<String>,
    pub pages: PageSpan,
}

impl ChapterRange {
    #[must_use]
    pub fn new(number: Number, pages: PageSpan) -> Self {
        Self {
            number,
            title: None,
            pages,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl FromStr for ChapterRange {
    type Err = RangeError;

    /// `chapter:pages[:title]`, e.g. `1:0-20`, `1.5:21` or `2:30-41:The Return`
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(3, ':');
        let (Some(number), Some(pages)) = (parts.next(), parts.next()) else {
            return Err(RangeError::InvalidChapter(value.to_string()));
        };

        let range = Self::new(number.trim().parse()?, pages.parse()?);
        Ok(match parts.next().map(str::trim) {
            Some(title) if !title.is_empty() => range.with_title(title),
            _ => range,
        })
    }
}

/// The chapters of a volume, sorted by first page, with open ends resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterRanges(Vec<ChapterRange>);

impl ChapterRanges {
    /// ## Errors
    ///
    /// Fails when two chapters share a page
    pub fn new(mut ranges: Vec<ChapterRange>) -> Result<Self, RangeError> {
        ranges.sort_by_key(|range| (range.pages.start, range.number));

        for index in 1..ranges.len() {
            let next_start = ranges[index].pages.start;
            let previous = &ranges[index - 1];
            let overlap = match previous.pages.end {
                Some(end) => end >= next_start,
                None => previous.pages.start >= next_start,
            };
            if overlap {
                return Err(RangeError::Overlap {
                    chapter: ranges[index].number.to_string(),
                    other: previous.number.to_string(),
                    page: next_start,
                });
            }
            let previous = &mut ranges[index - 1];
            if previous.pages.end.is_none() {
                previous.pages.end = Some(next_start - 1);
            }
        }

        Ok(Self(ranges))
    }

    /// The chapter owning `page`
    #[must_use]
    pub fn resolve(&self, page: u32) -> Option<&ChapterRange> {
        self.0.iter().find(|range| range.pages.contains(page))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChapterRange> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for ChapterRanges {
    type Item = ChapterRange;
    type IntoIter = std::vec::IntoIter<ChapterRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Numbers the body pages in order starting at `first`, covers get page zero and are skipped
#[must_use]
pub fn number_body_pages(covers: &[bool], first: u32) -> Vec<u32> {
    let mut next = first;
    covers
        .iter()
        .map(|is_cover| {
            if *is_cover {
                0
            } else {
                let page = next;
                next += 1;
                page
            }
        })
        .collect()
}
