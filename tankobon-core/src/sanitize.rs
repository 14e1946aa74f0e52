use std::{borrow::Cow, ops::RangeInclusive};

use serde::{Deserialize, Serialize};

/// Which filesystem the generated names must be valid on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FilenamePlatform {
    /// Replaces every character of the table, names stay portable
    #[default]
    Windows,
    /// Only the path separator is replaced
    Posix,
}

static WINDOWS_TABLE: [(char, &str); 10] = [
    ('/', "／"),
    (':', "："),
    ('<', "＜"),
    ('>', "＞"),
    ('"', "”"),
    ('\\', "＼"),
    ('?', "？"),
    ('*', "⋆"),
    ('|', "｜"),
    ('#', ""),
];

static POSIX_TABLE: [(char, &str); 1] = [('/', "／")];

static EMOJI_RANGES: [RangeInclusive<char>; 11] = [
    '\u{1f1e0}'..='\u{1f1ff}',
    '\u{1f300}'..='\u{1f5ff}',
    '\u{1f600}'..='\u{1f64f}',
    '\u{1f680}'..='\u{1f6ff}',
    '\u{1f700}'..='\u{1f77f}',
    '\u{1f780}'..='\u{1f7ff}',
    '\u{1f800}'..='\u{1f8ff}',
    '\u{1f900}'..='\u{1f9ff}',
    '\u{1fa00}'..='\u{1fa6f}',
    '\u{1fa70}'..='\u{1faff}',
    '\u{2702}'..='\u{27b0}',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    pub original: char,
    pub replacement: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized<'a> {
    pub value: Cow<'a, str>,
    pub substitutions: Vec<Substitution>,
}

impl FilenamePlatform {
    fn table(self) -> &'static [(char, &'static str)] {
        match self {
            Self::Windows => &WINDOWS_TABLE,
            Self::Posix => &POSIX_TABLE,
        }
    }

    /// The replacement of `character`, `None` when it is safe as is
    #[must_use]
    pub fn replacement(self, character: char) -> Option<&'static str> {
        if let Some((_, replacement)) = self
            .table()
            .iter()
            .find(|(unsafe_character, _)| *unsafe_character == character)
        {
            return Some(*replacement);
        }

        EMOJI_RANGES
            .iter()
            .any(|range| range.contains(&character))
            .then_some("_")
    }
}

/// Replaces the characters that can't appear in a file name on `platform`.
/// No replacement is itself unsafe, so sanitizing twice changes nothing.
#[must_use]
pub fn sanitize(value: &str, platform: FilenamePlatform) -> Sanitized<'_> {
    let mut substitutions = Vec::new();
    for character in value.chars() {
        if let Some(replacement) = platform.replacement(character) {
            substitutions.push(Substitution {
                original: character,
                replacement,
            });
        }
    }

    if substitutions.is_empty() {
        return Sanitized {
            value: Cow::Borrowed(value),
            substitutions,
        };
    }

    let mut sanitized = String::with_capacity(value.len());
    for character in value.chars() {
        match platform.replacement(character) {
            Some(replacement) => sanitized.push_str(replacement),
            None => sanitized.push(character),
        }
    }

    Sanitized {
        value: Cow::Owned(sanitized),
        substitutions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_replaces_the_whole_table() {
        let sanitized = sanitize(r#"Re:Zero / What? <"Why"> *|\ #1"#, FilenamePlatform::Windows);
        assert_eq!(sanitized.value, "Re：Zero ／ What？ ＜”Why”＞ ⋆｜＼ 1");
        assert_eq!(sanitized.substitutions.len(), 11);
        assert_eq!(
            sanitized.substitutions[0],
            Substitution {
                original: ':',
                replacement: "："
            }
        );
    }

    #[test]
    fn posix_tolerates_more() {
        let sanitized = sanitize("Re:Zero / What?", FilenamePlatform::Posix);
        assert_eq!(sanitized.value, "Re:Zero ／ What?");
        assert_eq!(sanitized.substitutions.len(), 1);
    }

    #[test]
    fn emojis_become_underscores() {
        let sanitized = sanitize("Love \u{1f496} Live \u{2708}", FilenamePlatform::Posix);
        assert_eq!(sanitized.value, "Love _ Live _");
    }

    #[test]
    fn is_idempotent() {
        for platform in [FilenamePlatform::Windows, FilenamePlatform::Posix] {
            let once = sanitize("a/b:c<d>e\"f\\g?h*i|j#k \u{1f600}", platform);
            let twice = sanitize(&once.value, platform);
            assert_eq!(twice.value, once.value);
            assert!(twice.substitutions.is_empty());
        }
    }

    #[test]
    fn safe_names_are_borrowed() {
        let sanitized = sanitize("Necromancer Maid", FilenamePlatform::Windows);
        assert!(matches!(sanitized.value, Cow::Borrowed(_)));
    }
}
