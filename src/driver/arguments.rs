//! Tokenizer for the driver's argument vector.
//!
//! A token starting with `-` is a flag. The next token is its value unless it
//! is a flag itself or missing, in which case the value is empty.

use crate::error::DriverError;
use std::collections::BTreeMap;

/// Marker that starts a flag token
pub const FLAG_MARKER: char = '-';

/// Flags and their values, one entry per flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    values: BTreeMap<String, String>,
}

impl ParsedArguments {
    /// Value of `flag` (without marker); empty string for valueless flags
    pub fn get(&self, flag: &str) -> Option<&str> {
        self.values.get(flag).map(String::as_str)
    }

    /// Whether `flag` was given at all
    pub fn contains(&self, flag: &str) -> bool {
        self.values.contains_key(flag)
    }

    /// All flags in lexical order
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of distinct flags
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No flags at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tokenize `args`.
///
/// Leading markers are stripped from flag names (`--foo` and `-foo` are the
/// same flag). A flag given twice is rejected.
pub fn parse_arguments<I, S>(args: I) -> Result<ParsedArguments, DriverError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens: Vec<S> = args.into_iter().collect();
    let mut values = BTreeMap::new();

    for (current, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        if !token.starts_with(FLAG_MARKER) {
            continue;
        }
        let flag = token.trim_start_matches(FLAG_MARKER).to_string();

        let value = tokens
            .get(current + 1)
            .map(|next| next.as_ref())
            .filter(|next| !next.starts_with(FLAG_MARKER))
            .unwrap_or("")
            .to_string();

        log::info!("Found flag \"{}\" with value \"{}\".", flag, value);

        if values.contains_key(&flag) {
            return Err(DriverError::DuplicateArgument { flag });
        }
        values.insert(flag, value);
    }

    Ok(ParsedArguments { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_followed_by_flag_has_empty_value() {
        let parsed = parse_arguments(["-a", "-b", "v1", "-c"]).expect("parse");

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.get("a"), Some(""));
        assert_eq!(parsed.get("b"), Some("v1"));
        assert_eq!(parsed.get("c"), Some(""));
    }

    #[test]
    fn leading_non_flag_tokens_are_skipped() {
        let parsed = parse_arguments(["/usr/bin/unity-editor", "stray", "-quit"]).expect("parse");
        assert_eq!(parsed.flags().collect::<Vec<_>>(), vec!["quit"]);
    }

    #[test]
    fn only_the_next_token_is_a_value() {
        let parsed = parse_arguments(["-projectPath", "game", "extra", "-buildTarget", "iOS"])
            .expect("parse");
        assert_eq!(parsed.get("projectPath"), Some("game"));
        assert_eq!(parsed.get("buildTarget"), Some("iOS"));
        assert!(!parsed.contains("extra"));
    }

    #[test]
    fn double_markers_are_stripped() {
        let parsed = parse_arguments(["--customBuildPath", "out/game.exe"]).expect("parse");
        assert_eq!(parsed.get("customBuildPath"), Some("out/game.exe"));
    }

    #[test]
    fn duplicate_flags_are_rejected() {
        let err = parse_arguments(["-buildTarget", "iOS", "-buildTarget", "Android"])
            .expect_err("duplicate");
        assert_eq!(
            err,
            DriverError::DuplicateArgument {
                flag: "buildTarget".to_string()
            }
        );
    }

    #[test]
    fn empty_vector_parses_to_nothing() {
        let parsed = parse_arguments(Vec::<String>::new()).expect("parse");
        assert!(parsed.is_empty());
    }
}
