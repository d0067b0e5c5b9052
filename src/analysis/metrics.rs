use crate::models::metrics::CodeMetrics;
use crate::models::snapshot::FileEntry;

const NO_EXTENSION_KEY: &str = "no_extension";

/// Derive aggregate counts from the full file listing. Independent of
/// manifest parsing, so metrics stay intact even when every manifest is
/// malformed.
pub fn compute_metrics(files: &[FileEntry]) -> CodeMetrics {
    let mut metrics = CodeMetrics {
        total_files: files.len(),
        ..CodeMetrics::default()
    };

    for file in files {
        metrics.total_size_bytes += file.size;

        if let Some(language) = &file.language {
            *metrics.languages_breakdown.entry(language.clone()).or_insert(0) += 1;
        }

        let key = if file.extension.is_empty() {
            NO_EXTENSION_KEY.to_string()
        } else {
            file.extension.clone()
        };
        *metrics.file_types.entry(key).or_insert(0) += 1;
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, size: u64, ext: &str, language: Option<&str>) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            size,
            extension: ext.to_string(),
            language: language.map(str::to_string),
        }
    }

    #[test]
    fn totals_match_listing_length_and_sizes() {
        let files = vec![
            entry("src/main.rs", 100, ".rs", Some("Rust")),
            entry("src/lib.rs", 250, ".rs", Some("Rust")),
            entry("README.md", 50, ".md", Some("Markdown")),
            entry("LICENSE", 10, "", None),
        ];

        let metrics = compute_metrics(&files);
        assert_eq!(metrics.total_files, files.len());
        assert_eq!(metrics.total_size_bytes, 410);
        assert_eq!(metrics.languages_breakdown["Rust"], 2);
        assert_eq!(metrics.file_types[".rs"], 2);
        assert_eq!(metrics.file_types["no_extension"], 1);
    }

    #[test]
    fn extension_counts_sum_to_total_files() {
        let files = vec![
            entry("a.rs", 1, ".rs", Some("Rust")),
            entry("b.py", 1, ".py", Some("Python")),
            entry("c", 1, "", None),
            entry("d.py", 1, ".py", Some("Python")),
        ];

        let metrics = compute_metrics(&files);
        let extension_sum: usize = metrics.file_types.values().sum();
        assert_eq!(extension_sum, metrics.total_files);
    }

    #[test]
    fn empty_listing_yields_zeroed_metrics() {
        let metrics = compute_metrics(&[]);
        assert_eq!(metrics.total_files, 0);
        assert_eq!(metrics.total_size_bytes, 0);
        assert!(metrics.languages_breakdown.is_empty());
        assert!(metrics.file_types.is_empty());
    }
}
