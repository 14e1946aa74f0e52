use std::fmt::Display;

use cli_table::Table;
use tankobon_core::{errors::MatchError, ParsedRelease};

fn display_optional_value<Value>(value: &Option<Value>) -> impl Display
where
    Value: Display,
{
    match value {
        None => String::from("-"),
        Some(value) => format!("{value}"),
    }
}

/// How one name was read by the matcher
#[derive(Debug, Clone, Table)]
pub struct LookupRow {
    #[table(title = "Name")]
    name: String,
    #[table(title = "Dialect", display_fn = "display_optional_value")]
    dialect: Option<String>,
    #[table(title = "Title", display_fn = "display_optional_value")]
    title: Option<String>,
    #[table(title = "Volume", display_fn = "display_optional_value")]
    volume: Option<String>,
    #[table(title = "Chapter", display_fn = "display_optional_value")]
    chapter: Option<String>,
    #[table(title = "Page", display_fn = "display_optional_value")]
    page: Option<String>,
    #[table(title = "Publisher", display_fn = "display_optional_value")]
    publisher: Option<String>,
    #[table(title = "Group", display_fn = "display_optional_value")]
    group: Option<String>,
    #[table(title = "Error", display_fn = "display_optional_value")]
    error: Option<String>,
}

impl LookupRow {
    pub fn new(name: &str, result: Result<ParsedRelease, MatchError>) -> Self {
        match result {
            Ok(parsed) => Self {
                name: name.to_string(),
                dialect: Some(parsed.dialect.to_string()),
                title: parsed.title,
                volume: parsed.volume.map(|volume| volume.to_string()),
                chapter: parsed.chapter.map(|chapter| chapter.to_string()),
                page: parsed.page.map(|page| page.to_string()),
                publisher: parsed.publisher,
                group: parsed.group,
                error: None,
            },
            Err(err) => Self {
                name: name.to_string(),
                dialect: None,
                title: None,
                volume: None,
                chapter: None,
                page: None,
                publisher: None,
                group: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Table)]
pub struct ConfigRow {
    #[table(title = "Key")]
    key: String,
    #[table(title = "Value")]
    value: String,
}

impl From<(String, String)> for ConfigRow {
    fn from((key, value): (String, String)) -> Self {
        Self { key, value }
    }
}
