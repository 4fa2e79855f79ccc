//! Display label derivation.
//!
//! Three modes share the path-captures strategy from [`super::capture`]:
//! `nameonly` (default) and `fullpath` are trivial, `regex:<pattern>`
//! joins all non-empty captures and falls back to the full path when the
//! pattern does not match.

use super::capture::{PathCaptures, RegexCaptures};
use super::error::{PipelineError, Result};
use super::report::RunReport;
use std::path::Path;

/// Separator between joined captures in `regex` mode.
const CAPTURE_SEPARATOR: &str = " ";

/// How to derive the user-visible label for a displayable file.
#[derive(Debug, Clone)]
pub enum DisplayMode {
    /// Basename of the source path (default).
    NameOnly,
    /// Original absolute path, unchanged.
    FullPath,
    /// Joined captures of a user-supplied pattern.
    Regex(RegexCaptures),
}

impl DisplayMode {
    /// Parse a mode spec: `nameonly`, `fullpath`, or `regex:<pattern>`.
    pub fn parse(spec: &str) -> Result<Self> {
        match spec {
            "nameonly" => Ok(Self::NameOnly),
            "fullpath" => Ok(Self::FullPath),
            _ => match spec.strip_prefix("regex:") {
                Some(pattern) => Ok(Self::Regex(RegexCaptures::new(pattern)?)),
                None => Err(PipelineError::UnknownDisplayMode(spec.to_string())),
            },
        }
    }

    /// Derive the label for one path.
    pub fn label(&self, path: &Path, report: &mut RunReport) -> String {
        match self {
            Self::NameOnly => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::FullPath => path.display().to_string(),
            Self::Regex(captures) => match captures.captures(path) {
                Some(parts) if !parts.is_empty() => parts.join(CAPTURE_SEPARATOR),
                _ => {
                    report.record_unparseable(path);
                    path.display().to_string()
                }
            },
        }
    }
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self::NameOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn parse_known_modes() {
        assert!(matches!(DisplayMode::parse("nameonly"), Ok(DisplayMode::NameOnly)));
        assert!(matches!(DisplayMode::parse("fullpath"), Ok(DisplayMode::FullPath)));
        assert!(matches!(
            DisplayMode::parse(r"regex:/(\w+)\.bam"),
            Ok(DisplayMode::Regex(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_mode() {
        assert!(matches!(
            DisplayMode::parse("basename"),
            Err(PipelineError::UnknownDisplayMode(_))
        ));
    }

    #[test]
    fn parse_rejects_captureless_regex() {
        assert!(matches!(
            DisplayMode::parse("regex:nocapture"),
            Err(PipelineError::MissingCaptureGroup(_))
        ));
    }

    #[test]
    fn nameonly_and_fullpath_labels() {
        let mut report = RunReport::default();
        let path = Path::new("/data/s1/a.bam");

        assert_eq!(DisplayMode::NameOnly.label(path, &mut report), "a.bam");
        assert_eq!(DisplayMode::FullPath.label(path, &mut report), "/data/s1/a.bam");
        assert!(report.unparseable_paths.is_empty());
    }

    #[test]
    fn regex_mode_joins_captures() {
        let mode = DisplayMode::parse(r"regex:/data/(\w+)/(\w+)\.bam").unwrap();
        let mut report = RunReport::default();
        let label = mode.label(Path::new("/data/s1/tumor.bam"), &mut report);
        assert_eq!(label, "s1 tumor");
    }

    #[test]
    fn regex_non_match_falls_back_to_path() {
        let mode = DisplayMode::parse(r"regex:(\d{8})").unwrap();
        let mut report = RunReport::default();
        let label = mode.label(Path::new("/data/s1/a.bam"), &mut report);
        assert_eq!(label, "/data/s1/a.bam");
        assert_eq!(report.unparseable_paths.len(), 1);
    }
}
