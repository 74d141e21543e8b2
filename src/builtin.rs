//! @ai:module:intent Provide default handlers for common SassDoc annotations
//! @ai:module:layer domain
//! @ai:module:public_api default_registry
//! @ai:module:depends_on annotation
//! @ai:module:stateless true

use crate::annotation::AnnotationRegistry;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;

static PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\{([^}]*)\})?\s*(?:\$?([\w-]+))?\s*(?:\[([^\]]*)\])?\s*(?:-\s*)?([\s\S]*)$")
        .expect("Invalid regex")
});

static TYPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\{([^}]*)\})?\s*(?:-\s*)?([\s\S]*)$").expect("Invalid regex")
});

/// Annotations whose value is their trimmed text.
const TEXT_ANNOTATIONS: &[&str] = &[
    "access",
    "author",
    "content",
    "deprecated",
    "group",
    "ignore",
    "output",
    "require",
    "see",
    "since",
    "throw",
    "todo",
    "type",
];

const ALIASES: &[(&str, &str)] = &[
    ("arg", "param"),
    ("argument", "param"),
    ("parameter", "param"),
    ("returns", "return"),
    ("requires", "require"),
    ("throws", "throw"),
    ("exception", "throw"),
    ("source", "link"),
];

/// @ai:intent Build a registry with the built-in annotation handlers and aliases
/// @ai:effects pure
pub fn default_registry() -> AnnotationRegistry {
    let registry = TEXT_ANNOTATIONS
        .iter()
        .fold(AnnotationRegistry::new(), |registry, name| {
            registry.with_annotation(*name, parse_text)
        })
        .with_annotation("param", parse_param)
        .with_annotation("return", parse_return)
        .with_annotation("example", parse_example)
        .with_annotation("link", parse_link);

    ALIASES
        .iter()
        .fold(registry, |registry, (alias, target)| {
            registry.with_alias(*alias, *target)
        })
}

fn parse_text(text: &str) -> Value {
    Value::String(text.trim().to_string())
}

/// @ai:intent Parse `{Type} $name [default] - description`
/// @ai:example ("{Number} $size [1em] - Base size") -> {"type":"Number","name":"size","default":"1em","description":"Base size"}
/// @ai:effects pure
fn parse_param(text: &str) -> Value {
    let mut fields = Map::new();

    if let Some(caps) = PARAM_RE.captures(text) {
        insert_capture(&mut fields, "type", caps.get(1).map(|m| m.as_str()));
        insert_capture(&mut fields, "name", caps.get(2).map(|m| m.as_str()));
        insert_capture(&mut fields, "default", caps.get(3).map(|m| m.as_str()));
        insert_capture(&mut fields, "description", caps.get(4).map(|m| m.as_str()));
    }

    Value::Object(fields)
}

/// @ai:intent Parse `{Type} description`
/// @ai:effects pure
fn parse_return(text: &str) -> Value {
    let mut fields = Map::new();

    if let Some(caps) = TYPED_RE.captures(text) {
        insert_capture(&mut fields, "type", caps.get(1).map(|m| m.as_str()));
        insert_capture(&mut fields, "description", caps.get(2).map(|m| m.as_str()));
    }

    Value::Object(fields)
}

/// @ai:intent Parse an example: `[language] [- description]` then the code lines
/// @ai:example ("scss - Usage\n.a { @include b; }") -> {"type":"scss","description":"Usage","code":".a { @include b; }"}
/// @ai:effects pure
fn parse_example(text: &str) -> Value {
    let (header, code) = text.split_once('\n').unwrap_or((text, ""));
    let header = header.trim();
    let (language, description) = match header.strip_prefix("- ") {
        Some(description) => ("", description),
        None => header.split_once(" - ").unwrap_or((header, "")),
    };
    let language = match language.trim() {
        "" => "scss",
        language => language,
    };

    let mut example = json!({
        "type": language,
        "code": dedent(code),
    });
    if !description.trim().is_empty() {
        example["description"] = json!(description.trim());
    }
    example
}

/// @ai:intent Parse `url [caption]`
/// @ai:effects pure
fn parse_link(text: &str) -> Value {
    let text = text.trim();
    let (url, caption) = text
        .split_once(char::is_whitespace)
        .map(|(url, caption)| (url, caption.trim()))
        .unwrap_or((text, ""));

    let mut link = json!({ "url": url });
    if !caption.is_empty() {
        link["caption"] = json!(caption);
    }
    link
}

fn insert_capture(fields: &mut Map<String, Value>, key: &str, capture: Option<&str>) {
    if let Some(value) = capture.map(str::trim).filter(|v| !v.is_empty()) {
        fields.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// Remove the indentation shared by all non-blank lines.
fn dedent(code: &str) -> String {
    let indent = code
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    code.lines()
        .map(|line| line.get(indent..).unwrap_or(line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_param_full() {
        assert_eq!(
            parse_param("{Number} $size [1em] - Base size"),
            json!({
                "type": "Number",
                "name": "size",
                "default": "1em",
                "description": "Base size"
            })
        );
    }

    #[test]
    fn test_param_partial() {
        assert_eq!(parse_param("$color"), json!({ "name": "color" }));
        assert_eq!(
            parse_param("{Color} $color - Text\ncolor"),
            json!({ "type": "Color", "name": "color", "description": "Text\ncolor" })
        );
    }

    #[test]
    fn test_return() {
        assert_eq!(
            parse_return("{Number} - Doubled value"),
            json!({ "type": "Number", "description": "Doubled value" })
        );
        assert_eq!(parse_return("{Bool}"), json!({ "type": "Bool" }));
    }

    #[test]
    fn test_example_with_language_and_description() {
        assert_eq!(
            parse_example("scss - Usage\n  .a {\n    @include b;\n  }"),
            json!({
                "type": "scss",
                "description": "Usage",
                "code": ".a {\n  @include b;\n}"
            })
        );
    }

    #[test]
    fn test_example_defaults_to_scss() {
        assert_eq!(
            parse_example("\n  $a: double(2);"),
            json!({ "type": "scss", "code": "$a: double(2);" })
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            parse_link("https://sass-lang.com Sass docs"),
            json!({ "url": "https://sass-lang.com", "caption": "Sass docs" })
        );
        assert_eq!(parse_link("https://x.io"), json!({ "url": "https://x.io" }));
    }

    #[test]
    fn test_default_registry_resolves_aliases() {
        let registry = default_registry();
        let (name, handler) = registry.resolve("arg").unwrap();
        assert_eq!(name, "param");
        assert_eq!(handler.parse("$a"), json!({ "name": "a" }));

        let (name, _) = registry.resolve("returns").unwrap();
        assert_eq!(name, "return");
        assert!(registry.resolve("bogus").is_none());
    }

    #[test]
    fn test_text_annotations() {
        let registry = default_registry();
        let (_, handler) = registry.resolve("author").unwrap();
        assert_eq!(handler.parse("  Jane Doe  "), json!("Jane Doe"));
    }
}
