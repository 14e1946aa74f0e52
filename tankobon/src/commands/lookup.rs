use anyhow::Result;
use cli_table::{print_stdout, WithTitle};
use tankobon_core::{MatchOptions, Matcher};

use crate::{args::Lookup, config::Config, types::LookupRow};

fn rows(args: &Lookup, config: &Config) -> Vec<LookupRow> {
    let mut options = MatchOptions::new(args.title.as_str())
        .with_numbering(args.numbering.unwrap_or(config.defaults.chapter_numbering));
    if let Some(publisher) = &args.publisher {
        options = options.with_publisher(publisher.as_str());
    }
    if let Some(limit_to) = &args.limit_to {
        options = options.with_limit_to(limit_to.as_str());
    }
    if args.oneshot {
        options = options.oneshot();
    }

    let matcher = if args.archive {
        Matcher::archives(options)
    } else {
        Matcher::pages(options)
    };

    args.names
        .iter()
        .map(|name| LookupRow::new(name, matcher.match_name(name)))
        .collect()
}

pub fn run(args: &Lookup, config: &Config) -> Result<()> {
    print_stdout(rows(args, config).with_title())?;

    Ok(())
}
