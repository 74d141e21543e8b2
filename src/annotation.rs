//! @ai:module:intent Dispatch annotation lines to registered handlers and group results
//! @ai:module:layer domain
//! @ai:module:public_api AnnotationHandler, AnnotationRegistry, AnnotationDispatcher, ParsedComment, ParseResult, Warning
//! @ai:module:depends_on context, extractor
//! @ai:module:stateless true

use crate::context::{Context, ContextKind};
use crate::extractor::{Comment, CommentRange};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// @ai:intent Turn the text of one annotation into a result value
pub trait AnnotationHandler: Send + Sync {
    /// `text` is the annotation body without the `@name` prefix. It may span
    /// several lines when continuation lines were folded into it.
    fn parse(&self, text: &str) -> Value;
}

impl<F> AnnotationHandler for F
where
    F: Fn(&str) -> Value + Send + Sync,
{
    fn parse(&self, text: &str) -> Value {
        self(text)
    }
}

/// @ai:intent Named annotation handlers plus an alias table
///
/// Built once by value and then owned by a parser; nothing mutates it
/// after construction.
#[derive(Clone, Default)]
pub struct AnnotationRegistry {
    handlers: HashMap<String, Arc<dyn AnnotationHandler>>,
    aliases: HashMap<String, String>,
}

impl AnnotationRegistry {
    /// @ai:intent Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Register a handler under `name`, replacing any previous one
    pub fn with_annotation(
        mut self,
        name: impl Into<String>,
        handler: impl AnnotationHandler + 'static,
    ) -> Self {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    /// @ai:intent Make `alias` resolve to the annotation registered as `target`
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    /// @ai:intent Find the canonical name and handler for an annotation name
    /// @ai:post direct registrations win over aliases; aliases resolve one level
    /// @ai:effects pure
    pub fn resolve(&self, name: &str) -> Option<(&str, &dyn AnnotationHandler)> {
        if let Some((key, handler)) = self.handlers.get_key_value(name) {
            return Some((key.as_str(), handler.as_ref()));
        }

        let target = self.aliases.get(name)?;
        self.handlers
            .get_key_value(target.as_str())
            .map(|(key, handler)| (key.as_str(), handler.as_ref()))
    }

    /// @ai:intent List registered annotation names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// @ai:intent List aliases as sorted (alias, target) pairs
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut aliases: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(alias, target)| (alias.as_str(), target.as_str()))
            .collect();
        aliases.sort_unstable();
        aliases
    }
}

impl fmt::Debug for AnnotationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationRegistry")
            .field("annotations", &self.names())
            .field("aliases", &self.aliases())
            .finish()
    }
}

/// @ai:intent A documentation comment after annotation dispatch
#[derive(Debug, Clone, Serialize)]
pub struct ParsedComment {
    pub description: String,
    pub comment_range: CommentRange,
    pub context: Context,
    /// Handler results per canonical annotation name, in source order.
    #[serde(flatten)]
    pub annotations: BTreeMap<String, Vec<Value>>,
}

impl ParsedComment {
    /// @ai:intent Get the results of one annotation, empty when it never appeared
    pub fn annotation(&self, name: &str) -> &[Value] {
        self.annotations.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// @ai:intent Recoverable problem reported while dispatching annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub annotation: String,
    /// First source line of the comment holding the annotation.
    pub comment_line: usize,
    pub message: String,
}

/// @ai:intent Parsed comments grouped by the kind of construct they document
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseResult {
    #[serde(flatten)]
    pub groups: BTreeMap<ContextKind, Vec<ParsedComment>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl ParseResult {
    /// @ai:intent Get the comments documenting one kind of construct, in source order
    pub fn get(&self, kind: ContextKind) -> &[ParsedComment] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// @ai:intent Iterate over all parsed comments, grouped by kind
    pub fn comments(&self) -> impl Iterator<Item = &ParsedComment> {
        self.groups.values().flatten()
    }

    /// @ai:intent Count all parsed comments
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// @ai:intent Apply an annotation registry to extracted comments
#[derive(Debug, Clone)]
pub struct AnnotationDispatcher {
    registry: Arc<AnnotationRegistry>,
}

impl AnnotationDispatcher {
    /// @ai:intent Create a dispatcher that owns `registry`
    pub fn new(registry: AnnotationRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    /// @ai:intent Parse every comment and group the results by context kind
    /// @ai:post every input comment appears exactly once in the result
    /// @ai:post unknown annotations are reported as warnings and omitted
    /// @ai:effects log
    pub fn dispatch(&self, comments: Vec<Comment>) -> ParseResult {
        let mut result = ParseResult::default();

        for comment in comments {
            let parsed = self.parse_comment(comment, &mut result.warnings);
            result
                .groups
                .entry(parsed.context.kind())
                .or_default()
                .push(parsed);
        }

        result
    }

    fn parse_comment(&self, comment: Comment, warnings: &mut Vec<Warning>) -> ParsedComment {
        let mut description = String::new();
        let mut annotations: BTreeMap<String, Vec<Value>> = BTreeMap::new();

        for line in &comment.lines {
            let Some((name, body)) = split_annotation(line) else {
                description.push_str(line);
                description.push('\n');
                continue;
            };

            match self.registry.resolve(name) {
                Some((canonical, handler)) => {
                    annotations
                        .entry(canonical.to_string())
                        .or_default()
                        .push(handler.parse(body));
                }
                None => {
                    let start = comment.comment_range.start;
                    tracing::warn!("Unknown annotation @{} in comment at line {}", name, start);
                    warnings.push(Warning {
                        annotation: name.to_string(),
                        comment_line: start,
                        message: format!("Parser for annotation `{}` not found", name),
                    });
                }
            }
        }

        ParsedComment {
            description,
            comment_range: comment.comment_range,
            context: comment.context,
            annotations,
        }
    }
}

/// @ai:intent Split an annotation line into its name and body
/// @ai:example ("@param {Number} $a") -> Some(("param", "{Number} $a"))
/// @ai:example ("  @example\n  .a {}") -> Some(("example", "\n  .a {}"))
/// @ai:example ("plain text") -> None
/// @ai:effects pure
fn split_annotation(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix('@')?;
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let body = rest[end..].trim_start_matches([' ', '\t']).trim_end();
    Some((&rest[..end], body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Scope;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn comment(lines: &[&str], context: Context) -> Comment {
        Comment {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            comment_range: CommentRange { start: 1, end: lines.len() },
            context,
        }
    }

    fn mixin(name: &str) -> Context {
        Context::Mixin {
            name: name.to_string(),
            code: "{}".to_string(),
        }
    }

    fn registry() -> AnnotationRegistry {
        AnnotationRegistry::new()
            .with_annotation("annotationTest", |_: &str| json!("Working"))
            .with_annotation("echo", |text: &str| json!(text))
            .with_alias("aliasTest", "annotationTest")
    }

    #[test]
    fn test_description_and_annotations() {
        let dispatcher = AnnotationDispatcher::new(registry());
        let result = dispatcher.dispatch(vec![comment(
            &["Test a mixin", "@aliasTest", "@echo  one", "@echo two\nmore"],
            mixin("testMixin"),
        )]);

        let mixins = result.get(ContextKind::Mixin);
        assert_eq!(mixins.len(), 1);
        assert_eq!(mixins[0].description, "Test a mixin\n");
        assert_eq!(mixins[0].annotation("annotationTest"), &[json!("Working")]);
        assert_eq!(
            mixins[0].annotation("echo"),
            &[json!("one"), json!("two\nmore")]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_annotation_warns_and_continues() {
        let dispatcher = AnnotationDispatcher::new(registry());
        let result = dispatcher.dispatch(vec![comment(
            &["@nope value", "@echo kept"],
            Context::Unknown,
        )]);

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].annotation, "nope");
        assert_eq!(result.warnings[0].comment_line, 1);
        let parsed = &result.get(ContextKind::Unknown)[0];
        assert!(parsed.annotation("nope").is_empty());
        assert_eq!(parsed.annotation("echo"), &[json!("kept")]);
    }

    #[test]
    fn test_warning_reports_comment_line() {
        let dispatcher = AnnotationDispatcher::new(registry());
        let mut late = comment(&["Desc", "more", "@nope"], Context::Unknown);
        late.comment_range = CommentRange { start: 12, end: 14 };

        let result = dispatcher.dispatch(vec![late]);
        assert_eq!(
            serde_json::to_value(&result.warnings).unwrap(),
            json!([{
                "annotation": "nope",
                "comment_line": 12,
                "message": "Parser for annotation `nope` not found"
            }])
        );
    }

    #[test]
    fn test_direct_name_wins_over_alias() {
        let registry = AnnotationRegistry::new()
            .with_annotation("a", |_: &str| json!("a"))
            .with_annotation("b", |_: &str| json!("b"))
            .with_alias("a", "b");

        let (name, handler) = registry.resolve("a").unwrap();
        assert_eq!(name, "a");
        assert_eq!(handler.parse(""), json!("a"));
    }

    #[test]
    fn test_alias_to_missing_target_is_unresolved() {
        let registry = AnnotationRegistry::new().with_alias("x", "missing");
        assert!(registry.resolve("x").is_none());
    }

    #[test]
    fn test_groups_keep_source_order() {
        let dispatcher = AnnotationDispatcher::new(registry());
        let variable = |name: &str| Context::Variable {
            name: name.to_string(),
            value: "1".to_string(),
            scope: Scope::Private,
        };
        let result = dispatcher.dispatch(vec![
            comment(&["a"], variable("first")),
            comment(&["b"], mixin("m")),
            comment(&["c"], variable("second")),
        ]);

        let names: Vec<_> = result
            .get(ContextKind::Variable)
            .iter()
            .filter_map(|c| c.context.name())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(result.len(), 3);
        assert!(result.get(ContextKind::Function).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let dispatcher = AnnotationDispatcher::new(registry());
        let result = dispatcher.dispatch(vec![comment(&["Desc", "@echo hi"], mixin("m"))]);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "mixin": [{
                    "description": "Desc\n",
                    "comment_range": { "start": 1, "end": 2 },
                    "context": { "type": "mixin", "name": "m", "code": "{}" },
                    "echo": ["hi"]
                }]
            })
        );
    }

    #[test]
    fn test_split_annotation() {
        assert_eq!(split_annotation("@param {Number} $a"), Some(("param", "{Number} $a")));
        assert_eq!(split_annotation("  @example\n  .a {}"), Some(("example", "\n  .a {}")));
        assert_eq!(split_annotation("@ alone"), None);
        assert_eq!(split_annotation("mail me@example.com"), None);
    }
}
