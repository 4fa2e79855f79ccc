//! Built-in file format tables.
//!
//! The allow-list and the data/index pairing rules are fixed: they encode
//! which bioinformatics formats a genome viewer can load and which of them
//! need a companion index before they are worth showing. Extensions are
//! matched as case-insensitive basename suffixes so multi-dot forms like
//! `.vcf.gz.tbi` work; the longest listed suffix wins.

use std::path::Path;

/// What role a file plays once its extension is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Primary content that needs a companion index to be displayable.
    IndexedData,
    /// Primary content that is displayable on its own.
    StandaloneData,
    /// Companion index; linked but never listed.
    Index,
}

/// One entry of the extension allow-list.
#[derive(Debug, Clone, Copy)]
pub struct FileFormat {
    /// Lowercase extension without the leading dot; may contain dots.
    pub extension: &'static str,
    pub kind: FormatKind,
}

/// A data extension together with the index-extension conventions that
/// can confirm it. The expected index path is the data path with the data
/// suffix swapped for the index suffix (`a.bam` -> `a.bai` or `a.bam.bai`).
#[derive(Debug, Clone, Copy)]
pub struct IndexRule {
    pub data_ext: &'static str,
    pub index_exts: &'static [&'static str],
}

/// Extension allow-list. Anything else is silently dropped by the
/// classifier, as are zero-byte files.
pub const FORMATS: &[FileFormat] = &[
    // Alignments
    FileFormat { extension: "bam", kind: FormatKind::IndexedData },
    FileFormat { extension: "cram", kind: FormatKind::IndexedData },
    FileFormat { extension: "sam", kind: FormatKind::StandaloneData },
    // Variants
    FileFormat { extension: "vcf", kind: FormatKind::IndexedData },
    FileFormat { extension: "vcf.gz", kind: FormatKind::IndexedData },
    FileFormat { extension: "bcf", kind: FormatKind::IndexedData },
    // Reference sequence
    FileFormat { extension: "fa", kind: FormatKind::IndexedData },
    FileFormat { extension: "fasta", kind: FormatKind::IndexedData },
    // Annotation / signal tracks, loadable without an index
    FileFormat { extension: "bed", kind: FormatKind::StandaloneData },
    FileFormat { extension: "bed.gz", kind: FormatKind::StandaloneData },
    FileFormat { extension: "bedgraph", kind: FormatKind::StandaloneData },
    FileFormat { extension: "wig", kind: FormatKind::StandaloneData },
    FileFormat { extension: "bigwig", kind: FormatKind::StandaloneData },
    FileFormat { extension: "bw", kind: FormatKind::StandaloneData },
    FileFormat { extension: "bigbed", kind: FormatKind::StandaloneData },
    FileFormat { extension: "bb", kind: FormatKind::StandaloneData },
    FileFormat { extension: "gff", kind: FormatKind::StandaloneData },
    FileFormat { extension: "gff3", kind: FormatKind::StandaloneData },
    FileFormat { extension: "gtf", kind: FormatKind::StandaloneData },
    FileFormat { extension: "tdf", kind: FormatKind::StandaloneData },
    FileFormat { extension: "seg", kind: FormatKind::StandaloneData },
    FileFormat { extension: "narrowpeak", kind: FormatKind::StandaloneData },
    FileFormat { extension: "broadpeak", kind: FormatKind::StandaloneData },
    // Companion indexes
    FileFormat { extension: "bai", kind: FormatKind::Index },
    FileFormat { extension: "bam.bai", kind: FormatKind::Index },
    FileFormat { extension: "crai", kind: FormatKind::Index },
    FileFormat { extension: "cram.crai", kind: FormatKind::Index },
    FileFormat { extension: "tbi", kind: FormatKind::Index },
    FileFormat { extension: "vcf.gz.tbi", kind: FormatKind::Index },
    FileFormat { extension: "csi", kind: FormatKind::Index },
    FileFormat { extension: "vcf.idx", kind: FormatKind::Index },
    FileFormat { extension: "fai", kind: FormatKind::Index },
    FileFormat { extension: "fa.fai", kind: FormatKind::Index },
    FileFormat { extension: "fasta.fai", kind: FormatKind::Index },
];

/// Data/index pairing conventions. A data extension may pair with more
/// than one convention; matching any one of them confirms the data file.
pub const INDEX_RULES: &[IndexRule] = &[
    IndexRule { data_ext: "bam", index_exts: &["bai", "bam.bai"] },
    IndexRule { data_ext: "cram", index_exts: &["crai", "cram.crai"] },
    IndexRule { data_ext: "vcf.gz", index_exts: &["tbi", "vcf.gz.tbi", "vcf.gz.csi"] },
    IndexRule { data_ext: "vcf", index_exts: &["vcf.idx"] },
    IndexRule { data_ext: "bcf", index_exts: &["csi", "bcf.csi"] },
    IndexRule { data_ext: "fa", index_exts: &["fa.fai"] },
    IndexRule { data_ext: "fasta", index_exts: &["fasta.fai"] },
];

/// Classify a path against the allow-list.
///
/// Returns the longest matching format, so `reads.bam.bai` is the
/// `bam.bai` index rather than a `bai` hit on a shorter suffix, and
/// `calls.vcf.gz` is `vcf.gz` data rather than an unlisted `gz`.
pub fn classify(path: &Path) -> Option<&'static FileFormat> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();

    let mut best: Option<&'static FileFormat> = None;
    for format in FORMATS {
        // Suffix must sit after a dot: "xbam" is not a bam.
        if name.len() > format.extension.len() + 1
            && name.ends_with(format.extension)
            && name.as_bytes()[name.len() - format.extension.len() - 1] == b'.'
        {
            match best {
                Some(current) if current.extension.len() >= format.extension.len() => {}
                _ => best = Some(format),
            }
        }
    }
    best
}

/// Pairing rules for a data extension.
pub fn index_rules_for(data_ext: &str) -> Option<&'static IndexRule> {
    INDEX_RULES.iter().find(|rule| rule.data_ext == data_ext)
}
