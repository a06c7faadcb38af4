//! Built-in manifests for the transcription project.
//! Used when the config file does not list files of its own.

use std::path::PathBuf;

use super::types::ArchiveGroup;

/// Generated data files that belong in `output/`.
pub const OUTPUT_FILES: &[&str] = &[
    "bashkir_clean_cyrillic.txt",
    "bashkir_clean_cyrillic_base.txt",
    "kazakh_clean_cyrillic.txt",
    "kazakh_clean_cyrillic_base.txt",
    "kyrgyz_clean_cyrillic.txt",
    "kyrgyz_clean_cyrillic_base.txt",
    "cleaned_transcript.txt",
    "demo_original.txt",
    "demo_corrected.txt",
    "demo_comparison.txt",
    "turkic_classification_results.txt",
    "turkic_bashkir_classification_results.txt",
];

/// Development scripts grouped by archive subdirectory.
pub const ARCHIVE_GROUPS: &[(&str, &[&str])] = &[
    (
        "training",
        &[
            "train_sklearn_turkic.py",
            "train_turkic_classifier_full_base.py",
            "train_fasttext_turkic.py",
        ],
    ),
    ("data_preparation", &["download_mmteb.py"]),
    (
        "utilities",
        &["demo_whisper_correction.py", "latin_to_cyrillic_turkic.py"],
    ),
];

pub fn output_files() -> Vec<String> {
    OUTPUT_FILES.iter().map(|s| s.to_string()).collect()
}

pub fn archive_groups() -> Vec<ArchiveGroup> {
    ARCHIVE_GROUPS
        .iter()
        .map(|(dir, files)| ArchiveGroup {
            dir: PathBuf::from(dir),
            files: files.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}
