use crate::models::dependency::DependencyRecord;
use crate::models::metrics::CodeMetrics;
use crate::models::snapshot::RepositorySnapshot;
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = "\
You are a software architecture analyst. Your task is to provide a summary of a code repository.

Structure your response as follows:

## Summary
A brief overview of the repository's purpose and architecture.

## Insights
Key observations about the codebase, as a bulleted list.

## Recommendations
Actionable suggestions for improvement, as a bulleted list.

Be specific and base every statement on the repository structure and content provided.";

const MAX_PROMPT_FILES: usize = 100;
const MAX_PROMPT_DEPENDENCIES: usize = 50;
const MAX_README_CHARS: usize = 3000;

/// Render the snapshot and metadata into a bounded prompt context. Large
/// inputs are truncated deterministically: first N files, first N
/// dependencies, first N README characters.
pub fn build_context(
    snapshot: &RepositorySnapshot,
    metrics: &CodeMetrics,
    dependencies: &[DependencyRecord],
) -> String {
    let mut context = String::new();

    let _ = writeln!(context, "Repository: {}/{}", snapshot.owner, snapshot.name);
    let _ = writeln!(
        context,
        "Description: {}",
        snapshot.description.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(context, "Default branch: {}", snapshot.default_branch);
    let _ = writeln!(context, "Languages: {}", snapshot.languages.join(", "));
    let _ = writeln!(
        context,
        "Totals: {} files, {} bytes",
        metrics.total_files, metrics.total_size_bytes
    );

    let _ = writeln!(
        context,
        "\nFile listing (first {} of {}):",
        snapshot.files.len().min(MAX_PROMPT_FILES),
        snapshot.files.len()
    );
    for file in snapshot.files.iter().take(MAX_PROMPT_FILES) {
        let _ = writeln!(context, "- {} ({} bytes)", file.path, file.size);
    }

    let _ = writeln!(
        context,
        "\nDependencies (first {} of {}):",
        dependencies.len().min(MAX_PROMPT_DEPENDENCIES),
        dependencies.len()
    );
    for dep in dependencies.iter().take(MAX_PROMPT_DEPENDENCIES) {
        let _ = writeln!(
            context,
            "- {} {} [{}]",
            dep.name,
            dep.version.as_deref().unwrap_or("(unversioned)"),
            dep.source_file
        );
    }

    match &snapshot.readme {
        Some(readme) => {
            let truncated: String = readme.chars().take(MAX_README_CHARS).collect();
            let _ = writeln!(context, "\nREADME:\n{truncated}");
        }
        None => {
            let _ = writeln!(context, "\nREADME: not available");
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dependency::Ecosystem;
    use crate::models::snapshot::FileEntry;

    fn big_snapshot() -> RepositorySnapshot {
        RepositorySnapshot {
            owner: "acme".to_string(),
            name: "widget".to_string(),
            url: RepositorySnapshot::repo_url("acme", "widget"),
            description: None,
            default_branch: "main".to_string(),
            languages: vec![],
            readme: Some("x".repeat(10_000)),
            files: (0..250)
                .map(|i| FileEntry {
                    path: format!("src/f{i}.rs"),
                    size: 1,
                    extension: ".rs".to_string(),
                    language: Some("Rust".to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn context_caps_files_dependencies_and_readme() {
        let snapshot = big_snapshot();
        let deps: Vec<DependencyRecord> = (0..80)
            .map(|i| DependencyRecord {
                name: format!("pkg{i}"),
                version: None,
                ecosystem: Ecosystem::Pip,
                source_file: "requirements.txt".to_string(),
            })
            .collect();

        let context = build_context(&snapshot, &CodeMetrics::default(), &deps);

        assert!(context.contains("first 100 of 250"));
        assert!(context.contains("first 50 of 80"));
        assert!(context.contains("src/f99.rs"));
        assert!(!context.contains("src/f100.rs"));
        assert!(context.contains("pkg49"));
        assert!(!context.contains("pkg50 "));
        // README capped at 3000 chars, not the original 10000.
        assert!(context.matches('x').count() <= 3000 + 100);
    }

    #[test]
    fn context_is_deterministic() {
        let snapshot = big_snapshot();
        let first = build_context(&snapshot, &CodeMetrics::default(), &[]);
        let second = build_context(&snapshot, &CodeMetrics::default(), &[]);
        assert_eq!(first, second);
    }
}
