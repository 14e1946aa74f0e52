use std::str::FromStr;

use camino::Utf8PathBuf;
use cbz::image::ReadingOrder;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tankobon_core::{BracketType, ChapterNumbering, ChapterRange, Number, PageSpan, PublicationType};

/// A tag given to one page, written `PAGE=TAG`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTag {
    pub page: u32,
    pub tag: String,
}

impl FromStr for PageTag {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((page, tag)) = value.split_once('=') else {
            return Err(format!("{value:?} is not a page tag, expected `page=tag`"));
        };
        let page = page
            .trim()
            .parse()
            .map_err(|_| format!("{page:?} is not a page number"))?;
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(format!("{value:?} has an empty tag"));
        }

        Ok(Self {
            page,
            tag: tag.to_string(),
        })
    }
}

/// What every generated name is made of, unset values fall back to the config file
#[derive(ClapArgs, Debug, Clone)]
pub struct Release {
    /// The title of the series
    #[clap(short, long)]
    pub title: String,
    /// The volume number, `1` or `1.5`
    #[clap(short, long)]
    pub volume: Option<Number>,
    /// The release year, defaults to the current year
    #[clap(short, long)]
    pub year: Option<u16>,
    /// The publisher of the series
    #[clap(short, long)]
    pub publisher: Option<String>,
    /// Where the pages were sourced from
    #[clap(long, value_enum)]
    pub publication_type: Option<PublicationType>,
    /// The ripper credit
    #[clap(short, long)]
    pub credit: Option<String>,
    /// The ripper email, stored in the archive comment and the image metadata
    #[clap(short, long)]
    pub email: Option<String>,
    /// Brackets around the ripper credit in the archive name
    #[clap(long, value_enum)]
    pub bracket_type: Option<BracketType>,
    /// Revision of the release, only written when above 1
    #[clap(long, default_value_t = 1)]
    pub revision: u32,
    /// Extra archive information, e.g. `Omnibus 2-in-1`
    #[clap(long)]
    pub extra: Option<String>,
}

#[derive(Parser, Debug)]
pub struct Autosplit {
    /// A volume archive or a directory of volume archives
    pub path: Utf8PathBuf,
    /// The title of the series, as written in the archive names
    #[clap(short, long)]
    pub title: String,
    /// The publisher written in the page names
    #[clap(short, long)]
    pub publisher: Option<String>,
    /// The title written in the page names, defaults to `--title`
    #[clap(long)]
    pub inner_title: Option<String>,
    /// Only split volumes released by this group
    #[clap(long)]
    pub limit_to: Option<String>,
    /// The series is a oneshot, volumes are numbered in order
    #[clap(long)]
    pub oneshot: bool,
    /// How chapter sub-indexes are written in the page names
    #[clap(long, value_enum)]
    pub numbering: Option<ChapterNumbering>,
}

#[derive(Parser, Debug)]
pub struct Manualsplit {
    /// The volume archive to split
    pub archive: Utf8PathBuf,
    /// The volume number, chapter archives are written in `vNN` next to the archive
    #[clap(short, long)]
    pub volume: Option<Number>,
    /// A chapter as `chapter:first-last[:title]`, prompted for when none is given
    #[clap(short, long = "range")]
    pub ranges: Vec<ChapterRange>,
}

#[derive(Parser, Debug)]
pub struct Releases {
    /// The directory of pages to rename
    pub dir: Utf8PathBuf,
    #[clap(flatten)]
    pub release: Release,
    /// A chapter as `chapter:first-last[:title]`, prompted for when none is given
    #[clap(short, long = "range")]
    pub ranges: Vec<ChapterRange>,
    /// Tag a page, e.g. `0=Cover` or `12=Extra`
    #[clap(long = "page-tag")]
    pub page_tags: Vec<PageTag>,
    /// Mark the pages as high quality
    #[clap(long)]
    pub hq: bool,
    /// Don't write the image metadata with exiftool
    #[clap(long)]
    pub no_tag: bool,
    /// How chapter sub-indexes are written
    #[clap(long, value_enum)]
    pub numbering: Option<ChapterNumbering>,
}

#[derive(Parser, Debug)]
pub struct Pack {
    /// The directory of pages to pack
    pub dir: Utf8PathBuf,
    #[clap(flatten)]
    pub release: Release,
    /// Pack a single chapter instead of a volume
    #[clap(long)]
    pub chapter: Option<Number>,
    /// The output directory, defaults to the parent of the pages directory
    #[clap(short, long)]
    pub outdir: Option<Utf8PathBuf>,
}

#[derive(Parser, Debug)]
pub struct Merge {
    /// A glob that matches all the archives to merge
    pub archives_glob: String,
    /// The merged archive name
    #[clap(short, long)]
    pub name: String,
    /// The output directory for the merged archive
    #[clap(short, long, default_value = "./")]
    pub outdir: Utf8PathBuf,
    /// Delete the merged archives
    #[clap(long)]
    pub remove_sources: bool,
}

#[derive(Parser, Debug)]
pub struct Tag {
    /// The directory of pages to tag
    pub dir: Utf8PathBuf,
    #[clap(flatten)]
    pub release: Release,
    /// Tag a single chapter instead of a volume
    #[clap(long)]
    pub chapter: Option<Number>,
}

#[derive(Parser, Debug)]
pub struct Optimize {
    /// The directory of pages to optimize
    pub dir: Utf8PathBuf,
    /// Let pingo rewrite jpeg files more aggressively
    #[clap(short, long)]
    pub aggressive: bool,
}

#[derive(Parser, Debug)]
pub struct JoinSpreads {
    /// The directory of pages
    pub dir: Utf8PathBuf,
    /// Pages to join, e.g. `12-13`
    #[clap(short, long = "spread", required = true)]
    pub spreads: Vec<PageSpan>,
    /// Reading order of the pages
    #[clap(long, value_enum, default_value_t = ReadingOrder::Rtl)]
    pub reading_order: ReadingOrder,
    /// Jpeg quality of the joined pages
    #[clap(short, long, default_value_t = 100)]
    pub quality: u8,
}

#[derive(Parser, Debug)]
pub struct SplitSpreads {
    /// The directory of pages
    pub dir: Utf8PathBuf,
    /// Reading order of the pages
    #[clap(long, value_enum, default_value_t = ReadingOrder::Rtl)]
    pub reading_order: ReadingOrder,
    /// Jpeg quality of the split pages
    #[clap(short, long, default_value_t = 100)]
    pub quality: u8,
}

#[derive(Subcommand, Debug)]
pub enum Spreads {
    /// Join pages into spreads, originals are moved to a `backup` directory
    #[clap(alias = "j")]
    Join(JoinSpreads),
    /// Split every `pNNN-NNN` spread back into pages
    #[clap(alias = "s")]
    Split(SplitSpreads),
}

#[derive(Parser, Debug)]
pub struct Lookup {
    /// The names to parse
    #[clap(required = true)]
    pub names: Vec<String>,
    /// The expected title, any title is accepted when empty
    #[clap(short, long, default_value = "")]
    pub title: String,
    /// The expected publisher
    #[clap(short, long)]
    pub publisher: Option<String>,
    /// The expected group
    #[clap(long)]
    pub limit_to: Option<String>,
    #[clap(long)]
    pub oneshot: bool,
    /// Parse the names as volume archives instead of pages
    #[clap(short, long)]
    pub archive: bool,
    #[clap(long, value_enum)]
    pub numbering: Option<ChapterNumbering>,
}

#[derive(Parser, Debug)]
pub struct Shiftname {
    /// The directory of pages
    pub dir: Utf8PathBuf,
    /// The first page number, covers are always page 0
    #[clap(short, long, default_value_t = 0)]
    pub start: u32,
    /// Number the pages from the last one
    #[clap(short, long)]
    pub reverse: bool,
    /// Name pages `TITLE - vNN - pNNN`, otherwise only the page number changes
    #[clap(short, long)]
    pub title: Option<String>,
    #[clap(short, long, requires = "title")]
    pub volume: Option<Number>,
}

#[derive(Parser, Debug)]
pub struct Packcomment {
    /// The archive to update
    pub archive: Utf8PathBuf,
    /// The new comment, usually the ripper email
    #[clap(short, long, required_unless_present = "remove", conflicts_with = "remove")]
    pub comment: Option<String>,
    /// Remove the comment
    #[clap(long)]
    pub remove: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the current config
    Show,
    /// Update one value, e.g. `defaults.ripper_credit nao`
    Set { key: String, value: String },
}

#[derive(Subcommand, Debug)]
pub enum Subcommands {
    /// Split volume archives into chapter archives using the page names
    #[clap(alias = "as")]
    Autosplit(Autosplit),
    /// Split a volume archive into chapter archives using page ranges
    #[clap(alias = "ms")]
    Manualsplit(Manualsplit),
    /// Rename pages to their release name
    #[clap(alias = "rls")]
    Releases(Releases),
    /// Pack pages into an archive named after the release
    #[clap(alias = "p")]
    Pack(Pack),
    /// Merge several archives into one
    #[clap(alias = "m")]
    Merge(Merge),
    /// Write the release metadata into the pages
    Tag(Tag),
    /// Optimize pages with pingo
    #[clap(alias = "o")]
    Optimize(Optimize),
    /// Join or split spreads
    #[clap(subcommand)]
    Spreads(Spreads),
    /// Renumber pages from a start index
    #[clap(alias = "shift")]
    Shiftname(Shiftname),
    /// Set or remove the comment of an archive
    #[clap(alias = "pc")]
    Packcomment(Packcomment),
    /// Display how names are parsed
    #[clap(alias = "l")]
    Lookup(Lookup),
    /// Display or update the config file
    #[clap(subcommand)]
    Config(ConfigCommand),
}

#[derive(Parser, Debug)]
#[clap(about, author, version)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Subcommands,
}
