//! @ai:module:intent Format output for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_parse_result, format_lint_result
//! @ai:module:depends_on annotation, linter, context
//! @ai:module:stateless true

use crate::annotation::ParseResult;
use crate::context::{Context, ContextKind};
use crate::error::Result;
use crate::linter::{LintResult, Severity};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format a parse result as a string
/// @ai:post fails only when a handler value cannot be serialized
/// @ai:effects pure
pub fn format_parse_result(result: &ParseResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result, false),
        OutputFormat::JsonPretty => to_json(result, true),
        OutputFormat::Text => Ok(format_parse_result_text(result)),
    }
}

/// @ai:intent Format a parse result as human-readable text
/// @ai:effects pure
fn format_parse_result_text(result: &ParseResult) -> String {
    let mut output = String::new();

    for kind in ContextKind::ALL {
        let comments = result.get(kind);
        if comments.is_empty() {
            continue;
        }

        output.push_str(&format!("{} ({}):\n", kind.as_str().bold(), comments.len()));

        for comment in comments {
            let label = match &comment.context {
                Context::Variable { name, scope, .. } => format!("${} ({})", name, scope.as_str()),
                Context::Placeholder { name, .. } => format!("%{}", name),
                Context::Unknown => "<unknown>".to_string(),
                other => other.name().unwrap_or_default().to_string(),
            };

            output.push_str(&format!(
                "  {} (line {})\n",
                label.cyan(),
                comment.comment_range.start
            ));

            if let Context::Variable { value, .. } = &comment.context {
                output.push_str(&format!("    value: {}\n", first_line(value)));
            }

            let description = comment.description.trim();
            if !description.is_empty() {
                output.push_str(&format!("    {}\n", first_line(description)));
            }

            for (name, values) in &comment.annotations {
                let rendered: Vec<String> = values.iter().map(render_value).collect();
                output.push_str(&format!(
                    "    {} {}\n",
                    format!("@{}", name).yellow(),
                    rendered.join(", ")
                ));
            }
        }

        output.push('\n');
    }

    for warning in &result.warnings {
        output.push_str(&format!(
            "{} line {}: {}\n",
            "WARN".yellow().bold(),
            warning.comment_line,
            warning.message
        ));
    }

    output
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => first_line(text).to_string(),
        other => other.to_string(),
    }
}

/// @ai:intent Format lint results as a string
/// @ai:effects pure
pub fn format_lint_result(result: &LintResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result, false),
        OutputFormat::JsonPretty => to_json(result, true),
        OutputFormat::Text => Ok(format_lint_result_text(result)),
    }
}

/// @ai:intent Format lint results as human-readable text
/// @ai:effects pure
fn format_lint_result_text(result: &LintResult) -> String {
    let mut output = String::new();

    for issue in &result.issues {
        let severity_str = match issue.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warning => "WARN".yellow().bold(),
            Severity::Info => "INFO".blue(),
        };

        let location = format!("{}:{}", issue.file.display(), issue.line);

        output.push_str(&format!(
            "{} {} - {} ({})\n",
            severity_str,
            location.dimmed(),
            issue.message,
            issue.code.dimmed()
        ));

        if let Some(suggestion) = &issue.suggestion {
            output.push_str(&format!("  {} {}\n", "hint:".cyan(), suggestion));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "Checked {} files, {} comments\n",
        result.files_checked, result.comments_checked
    ));

    if result.errors > 0 {
        output.push_str(&format!(
            "{} errors, {} warnings\n",
            result.errors.to_string().red().bold(),
            result.warnings.to_string().yellow()
        ));
    } else if result.warnings > 0 {
        output.push_str(&format!(
            "{} {} warnings\n",
            "OK".green().bold(),
            result.warnings.to_string().yellow()
        ));
    } else {
        output.push_str(&format!("{} No issues found\n", "OK".green().bold()));
    }

    output
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
