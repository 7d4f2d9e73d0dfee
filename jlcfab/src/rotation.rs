//! Footprint rotation corrections.
//!
//! KiCad and the assembly house disagree on the zero orientation of many
//! packages. A rotation table maps footprint name patterns to a correction
//! in degrees:
//!
//! ```text
//! # pattern        degrees
//! ^SOT-23          180
//! QFN-             270
//! ```
//!
//! Blank lines and `#` comments are skipped, as are lines with fewer than two
//! tokens. Rules are tried in file order and the first match wins.

use regex::{Regex, RegexBuilder};
use std::path::Path;
use thiserror::Error;

/// Separates the library name from the footprint name (`Library:Footprint`).
const LIBRARY_SEPARATOR: char = ':';

#[derive(Debug, Error)]
pub enum RotationError {
    #[error("IO error reading rotation table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: rotation '{token}' is not an integer")]
    InvalidRotation { line: usize, token: String },
}

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    /// Lowercased literal for patterns that do not compile.
    Literal(String),
}

/// A single `pattern degrees` rule.
#[derive(Debug, Clone)]
pub struct RotationRule {
    pattern: String,
    matcher: Matcher,
    rotation: i32,
}

impl RotationRule {
    /// Compile `pattern` case-insensitively. Patterns that are not valid
    /// regular expressions match as literal text.
    pub fn new(pattern: &str, rotation: i32) -> Self {
        let matcher = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Matcher::Regex(regex),
            Err(e) => {
                tracing::debug!("Rotation pattern '{}' is not a regex ({}), matching literally", pattern, e);
                Matcher::Literal(pattern.to_lowercase())
            }
        };

        Self {
            pattern: pattern.to_string(),
            matcher,
            rotation,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn matches(&self, footprint_name: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(footprint_name),
            Matcher::Literal(literal) => footprint_name.to_lowercase().contains(literal.as_str()),
        }
    }
}

/// Ordered list of rotation rules.
#[derive(Debug, Clone, Default)]
pub struct RotationTable {
    rules: Vec<RotationRule>,
}

impl RotationTable {
    pub fn new(rules: Vec<RotationRule>) -> Self {
        Self { rules }
    }

    /// Load a rotation table file.
    pub fn load(path: &Path) -> Result<Self, RotationError> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::parse(&content)?;
        tracing::info!("Loaded {} rotation rules from {:?}", table.len(), path);
        Ok(table)
    }

    pub fn parse(content: &str) -> Result<Self, RotationError> {
        let mut rules = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let (Some(pattern), Some(token)) = (tokens.next(), tokens.next()) else {
                continue;
            };

            let rotation = token.parse().map_err(|_| RotationError::InvalidRotation {
                line: idx + 1,
                token: token.to_string(),
            })?;
            rules.push(RotationRule::new(pattern, rotation));
        }

        Ok(Self { rules })
    }

    /// Rotation correction for a footprint, or 0 when no rule matches.
    ///
    /// Only the part after the last `:` is matched, so the library a
    /// footprint came from does not matter.
    pub fn resolve(&self, footprint: &str) -> i32 {
        let name = footprint
            .rsplit_once(LIBRARY_SEPARATOR)
            .map_or(footprint, |(_, name)| name);

        self.rules
            .iter()
            .find(|rule| rule.matches(name))
            .map_or(0, |rule| {
                tracing::debug!("Footprint {} matched rotation rule '{}'", footprint, rule.pattern);
                rule.rotation
            })
    }

    pub fn rules(&self) -> &[RotationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_strips_library_prefix() {
        let table = RotationTable::new(vec![RotationRule::new("SOT-23", 90)]);
        assert_eq!(table.resolve("Package_TO_SOT_SMD:SOT-23"), 90);
    }

    #[test]
    fn test_library_name_is_not_matched() {
        let table = RotationTable::new(vec![RotationRule::new("^Package", 90)]);
        assert_eq!(table.resolve("Package_TO_SOT_SMD:SOT-23"), 0);
        assert_eq!(table.resolve("Package_DIP"), 90);
    }

    #[test]
    fn test_only_last_separator_counts() {
        let table = RotationTable::new(vec![RotationRule::new("^QFN", 270)]);
        assert_eq!(table.resolve("a:b:QFN-32"), 270);
    }

    #[test]
    fn test_first_match_wins() {
        let table = RotationTable::new(vec![
            RotationRule::new("SOT-23-5", 180),
            RotationRule::new("SOT-23", 90),
        ]);
        assert_eq!(table.resolve("Lib:SOT-23-5"), 180);
        assert_eq!(table.resolve("Lib:SOT-23"), 90);
    }

    #[test]
    fn test_case_insensitive() {
        let table = RotationTable::new(vec![RotationRule::new("sot-23", 90)]);
        assert_eq!(table.resolve("Lib:SOT-23"), 90);
    }

    #[test]
    fn test_invalid_regex_matches_literally() {
        let table = RotationTable::new(vec![RotationRule::new("SOIC(8", 270)]);
        assert_eq!(table.resolve("Lib:soic(8_3.9mm"), 270);
        assert_eq!(table.resolve("Lib:SOIC-8"), 0);
    }

    #[test]
    fn test_empty_table_resolves_to_zero() {
        assert_eq!(RotationTable::default().resolve("Lib:SOT-23"), 0);
    }

    #[test]
    fn test_parse_skips_comments_blank_and_short_lines() {
        let table = RotationTable::parse(
            "# comment\n\n^SOT-23 180\nlonely\n  QFN-  270  trailing words\n",
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rules()[0].pattern(), "^SOT-23");
        assert_eq!(table.rules()[1].rotation(), 270);
    }

    #[test]
    fn test_parse_negative_rotation() {
        let table = RotationTable::parse("SOD-123 -90").unwrap();
        assert_eq!(table.resolve("Diode_SMD:D_SOD-123"), -90);
    }

    #[test]
    fn test_parse_rejects_non_integer_rotation() {
        let err = RotationTable::parse("ok 90\nSOT-23 ninety\n").unwrap_err();
        match err {
            RotationError::InvalidRotation { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "ninety");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
