use std::path::Path;

/// Map a file path to its lowercase extension, dot included. Files without
/// an extension yield an empty string.
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Infer a language tag from a path, preferring special filenames over the
/// extension map.
pub fn language_for(path: &str) -> Option<&'static str> {
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match file_name.as_str() {
        "dockerfile" => return Some("Docker"),
        "makefile" | "gnumakefile" => return Some("Make"),
        _ => {}
    }

    match extension_of(path).as_str() {
        ".py" => Some("Python"),
        ".js" | ".jsx" => Some("JavaScript"),
        ".ts" | ".tsx" => Some("TypeScript"),
        ".cs" => Some("C#"),
        ".java" => Some("Java"),
        ".go" => Some("Go"),
        ".rb" => Some("Ruby"),
        ".rs" => Some("Rust"),
        ".cpp" | ".cc" => Some("C++"),
        ".c" => Some("C"),
        ".h" | ".hpp" => Some("C/C++"),
        ".php" => Some("PHP"),
        ".swift" => Some("Swift"),
        ".kt" => Some("Kotlin"),
        ".scala" => Some("Scala"),
        ".r" => Some("R"),
        ".sql" => Some("SQL"),
        ".html" => Some("HTML"),
        ".css" => Some("CSS"),
        ".scss" => Some("SCSS"),
        ".sass" => Some("SASS"),
        ".less" => Some("LESS"),
        ".json" => Some("JSON"),
        ".xml" | ".csproj" => Some("XML"),
        ".yaml" | ".yml" => Some("YAML"),
        ".toml" => Some("TOML"),
        ".md" => Some("Markdown"),
        ".txt" => Some("Text"),
        ".sh" | ".bash" => Some("Shell"),
        ".ps1" => Some("PowerShell"),
        ".tf" => Some("Terraform"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_with_leading_dot() {
        assert_eq!(extension_of("src/Main.RS"), ".rs");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("a/b/config.yaml"), ".yaml");
    }

    #[test]
    fn special_filenames_override_extensions() {
        assert_eq!(language_for("docker/Dockerfile"), Some("Docker"));
        assert_eq!(language_for("Makefile"), Some("Make"));
    }

    #[test]
    fn unknown_extensions_yield_no_language() {
        assert_eq!(language_for("assets/logo.webp"), None);
        assert_eq!(language_for("src/lib.rs"), Some("Rust"));
    }
}
