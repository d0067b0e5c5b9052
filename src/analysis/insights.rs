use crate::models::insight::InsightBundle;

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Summary,
    Insights,
    Recommendations,
}

/// Parse a generation response that should follow the
/// Summary/Insights/Recommendations convention. The rules are tolerant:
/// headings may use `#`, `**` or a trailing colon. When no section marker is
/// found at all, the whole response becomes the summary and both lists stay
/// empty.
pub fn parse_generation_response(response: &str) -> InsightBundle {
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut insights: Vec<String> = Vec::new();
    let mut recommendations: Vec<String> = Vec::new();

    let mut current = Section::Summary;
    let mut found_marker = false;

    for line in response.lines() {
        if let Some(section) = section_heading(line) {
            current = section;
            found_marker = true;
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match current {
            Section::Summary => summary_lines.push(trimmed),
            Section::Insights => {
                if let Some(item) = bullet_text(trimmed) {
                    insights.push(item);
                }
            }
            Section::Recommendations => {
                if let Some(item) = bullet_text(trimmed) {
                    recommendations.push(item);
                }
            }
        }
    }

    if !found_marker {
        return InsightBundle {
            summary: response.trim().to_string(),
            insights: Vec::new(),
            recommendations: Vec::new(),
        };
    }

    InsightBundle {
        summary: summary_lines.join(" ").trim().to_string(),
        insights,
        recommendations,
    }
}

fn section_heading(line: &str) -> Option<Section> {
    let trimmed = line.trim();
    let heading_shaped =
        trimmed.starts_with('#') || trimmed.starts_with("**") || trimmed.ends_with(':');
    if !heading_shaped {
        return None;
    }

    let normalized = trimmed
        .trim_matches(|c: char| matches!(c, '#' | '*' | ':') || c.is_whitespace())
        .to_lowercase();

    if normalized.contains("insight") {
        Some(Section::Insights)
    } else if normalized.contains("recommendation") {
        Some(Section::Recommendations)
    } else if normalized.contains("summary") || normalized.contains("overview") {
        Some(Section::Summary)
    } else {
        None
    }
}

fn bullet_text(line: &str) -> Option<String> {
    let rest = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))?;
    let text = rest.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labeled_sections_with_bullets() {
        let response = "\
## Summary
A CLI tool for widgets.
It is small.

## Insights
- Clean module layout
- Few dependencies

## Recommendations
- Add integration tests
";
        let bundle = parse_generation_response(response);
        assert_eq!(bundle.summary, "A CLI tool for widgets. It is small.");
        assert_eq!(bundle.insights, vec!["Clean module layout", "Few dependencies"]);
        assert_eq!(bundle.recommendations, vec!["Add integration tests"]);
    }

    #[test]
    fn tolerates_bold_and_colon_style_headings() {
        let response = "\
Summary:
Widget service.

**Key Insights**
* Uses npm workspaces

Recommendations:
- Pin dependency versions
";
        let bundle = parse_generation_response(response);
        assert_eq!(bundle.summary, "Widget service.");
        assert_eq!(bundle.insights, vec!["Uses npm workspaces"]);
        assert_eq!(bundle.recommendations, vec!["Pin dependency versions"]);
    }

    #[test]
    fn missing_markers_fall_back_to_raw_summary() {
        let response = "This repository looks like a standard web application.";
        let bundle = parse_generation_response(response);
        assert_eq!(bundle.summary, response);
        assert!(bundle.insights.is_empty());
        assert!(bundle.recommendations.is_empty());
    }

    #[test]
    fn non_bullet_lines_inside_lists_are_ignored() {
        let response = "\
## Insights
Here are some observations.
- Actual insight
";
        let bundle = parse_generation_response(response);
        assert_eq!(bundle.insights, vec!["Actual insight"]);
        assert_eq!(bundle.summary, "");
    }
}
