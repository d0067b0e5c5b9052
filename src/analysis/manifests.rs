use crate::error::ExtractionError;
use crate::models::dependency::{DependencyRecord, Ecosystem};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

fn pip_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(==|>=|<=|~=|!=|>|<)?\s*([^\s#;]+)?")
            .expect("pip line regex")
    })
}

fn package_reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<PackageReference\s+Include="([^"]+)"(?:\s+Version="([^"]+)")?"#)
            .expect("PackageReference regex")
    })
}

/// Classify a path as a manifest by its final component. Non-manifests get
/// `None` and are skipped by the extractor.
pub fn manifest_ecosystem(path: &str) -> Option<Ecosystem> {
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())?;

    match file_name.as_str() {
        "package.json" => Some(Ecosystem::Npm),
        "requirements.txt" => Some(Ecosystem::Pip),
        "packages.config" | "Directory.Packages.props" => Some(Ecosystem::Nuget),
        name if name.ends_with(".csproj") => Some(Ecosystem::Nuget),
        _ => None,
    }
}

/// Parse one manifest's content into dependency records. A malformed
/// manifest is an error for that file only; the caller records it and moves
/// on.
pub fn parse_manifest(
    content: &str,
    ecosystem: Ecosystem,
    source_file: &str,
) -> Result<Vec<DependencyRecord>, ExtractionError> {
    match ecosystem {
        Ecosystem::Npm => parse_npm(content, source_file),
        Ecosystem::Pip => Ok(parse_pip(content, source_file)),
        Ecosystem::Nuget => Ok(parse_nuget(content, source_file)),
        Ecosystem::Other => Ok(Vec::new()),
    }
}

fn parse_npm(content: &str, source_file: &str) -> Result<Vec<DependencyRecord>, ExtractionError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ExtractionError::Malformed {
            path: source_file.to_string(),
            detail: e.to_string(),
        })?;

    let Some(root) = value.as_object() else {
        return Err(ExtractionError::Malformed {
            path: source_file.to_string(),
            detail: "top-level value is not an object".to_string(),
        });
    };

    let mut records = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(map) = root.get(section).and_then(Value::as_object) {
            for (name, version) in map {
                records.push(DependencyRecord {
                    name: name.clone(),
                    version: version.as_str().map(str::to_string),
                    ecosystem: Ecosystem::Npm,
                    source_file: source_file.to_string(),
                });
            }
        }
    }
    Ok(records)
}

fn parse_pip(content: &str, source_file: &str) -> Vec<DependencyRecord> {
    let mut records = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Oversized lines are never legitimate requirement specs.
        if line.len() > 500 {
            continue;
        }

        if let Some(caps) = pip_line_re().captures(line) {
            let version = caps
                .get(2)
                .and_then(|_| caps.get(3))
                .map(|m| m.as_str().to_string());
            records.push(DependencyRecord {
                name: caps[1].to_string(),
                version,
                ecosystem: Ecosystem::Pip,
                source_file: source_file.to_string(),
            });
        }
    }
    records
}

fn parse_nuget(content: &str, source_file: &str) -> Vec<DependencyRecord> {
    package_reference_re()
        .captures_iter(content)
        .map(|caps| DependencyRecord {
            name: caps[1].to_string(),
            version: caps.get(2).map(|m| m.as_str().to_string()),
            ecosystem: Ecosystem::Nuget,
            source_file: source_file.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_manifests_by_final_path_component() {
        assert_eq!(manifest_ecosystem("package.json"), Some(Ecosystem::Npm));
        assert_eq!(
            manifest_ecosystem("services/api/requirements.txt"),
            Some(Ecosystem::Pip)
        );
        assert_eq!(
            manifest_ecosystem("src/Web/Web.csproj"),
            Some(Ecosystem::Nuget)
        );
        assert_eq!(
            manifest_ecosystem("Directory.Packages.props"),
            Some(Ecosystem::Nuget)
        );
        assert_eq!(manifest_ecosystem("src/main.rs"), None);
        assert_eq!(manifest_ecosystem("docs/package.json.md"), None);
    }

    #[test]
    fn parses_npm_dependencies_and_dev_dependencies() {
        let content = r#"{
            "name": "demo",
            "dependencies": { "left-pad": "1.0.0", "react": "^18.0.0" },
            "devDependencies": { "jest": "~29.0.0" }
        }"#;

        let records = parse_manifest(content, Ecosystem::Npm, "package.json").expect("parse");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.ecosystem == Ecosystem::Npm));
        let left_pad = records.iter().find(|r| r.name == "left-pad").expect("left-pad");
        assert_eq!(left_pad.version.as_deref(), Some("1.0.0"));
        assert_eq!(left_pad.source_file, "package.json");
    }

    #[test]
    fn malformed_npm_manifest_is_an_error_not_a_panic() {
        let result = parse_manifest("{ not json", Ecosystem::Npm, "package.json");
        assert!(result.is_err());

        let result = parse_manifest("[1, 2, 3]", Ecosystem::Npm, "package.json");
        assert!(result.is_err());
    }

    #[test]
    fn parses_pip_requirements_with_and_without_versions() {
        let content = "\
# comment line
requests==2.31.0
flask>=2.0
uvicorn

gunicorn  # inline comment
";
        let records = parse_manifest(content, Ecosystem::Pip, "requirements.txt").expect("parse");
        assert_eq!(records.len(), 4);

        let requests = &records[0];
        assert_eq!(requests.name, "requests");
        assert_eq!(requests.version.as_deref(), Some("2.31.0"));

        let uvicorn = records.iter().find(|r| r.name == "uvicorn").expect("uvicorn");
        assert_eq!(uvicorn.version, None);
    }

    #[test]
    fn parses_nuget_package_references() {
        let content = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Newtonsoft.Json" Version="13.0.3" />
    <PackageReference Include="Serilog" />
  </ItemGroup>
</Project>"#;

        let records = parse_manifest(content, Ecosystem::Nuget, "App.csproj").expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Newtonsoft.Json");
        assert_eq!(records[0].version.as_deref(), Some("13.0.3"));
        assert_eq!(records[1].version, None);
    }

    #[test]
    fn invalid_nuget_content_yields_zero_records() {
        let records = parse_manifest("binary garbage \u{0}\u{1}", Ecosystem::Nuget, "App.csproj")
            .expect("parse");
        assert!(records.is_empty());
    }
}
