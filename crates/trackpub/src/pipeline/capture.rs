//! Regex capture extraction shared by grouping and display derivation.
//!
//! Both the group assigner and the `regex:` display mode are "given a
//! path, produce some strings" operations; they share one compiled shape
//! instead of branching on mode strings.

use super::error::{PipelineError, Result};
use regex::Regex;
use std::path::Path;

/// A capability that derives zero or more strings from a path.
/// `None` means the path did not match at all.
pub trait PathCaptures {
    fn captures(&self, path: &Path) -> Option<Vec<String>>;
}

/// A compiled regex guaranteed to carry at least one capture group.
#[derive(Debug, Clone)]
pub struct RegexCaptures {
    regex: Regex,
}

impl RegexCaptures {
    /// Compile and validate. Patterns without a capture group are a
    /// configuration error, detected before any traversal starts.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| PipelineError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        // captures_len() counts the implicit whole-match group.
        if regex.captures_len() < 2 {
            return Err(PipelineError::MissingCaptureGroup(pattern.to_string()));
        }
        Ok(Self { regex })
    }

    pub fn as_pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl PathCaptures for RegexCaptures {
    /// All non-empty explicit captures, in order. Empty on no match.
    fn captures(&self, path: &Path) -> Option<Vec<String>> {
        let text = path.to_str()?;
        let caps = self.regex.captures(text)?;
        Some(
            caps.iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_pattern_without_capture() {
        assert!(matches!(
            RegexCaptures::new("no capture here"),
            Err(PipelineError::MissingCaptureGroup(_))
        ));
    }

    #[test]
    fn rejects_invalid_pattern() {
        assert!(matches!(
            RegexCaptures::new("(["),
            Err(PipelineError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn extracts_captures_in_order() {
        let caps = RegexCaptures::new(r"/(\w+)/(\w+)\.bam$").unwrap();
        let got = caps.captures(Path::new("/data/run1/sampleA.bam")).unwrap();
        assert_eq!(got, vec!["run1".to_string(), "sampleA".to_string()]);
    }

    #[test]
    fn non_match_is_none() {
        let caps = RegexCaptures::new(r"(\d+)").unwrap();
        assert!(caps.captures(Path::new("/no/digits/here.bam")).is_none());
    }
}
