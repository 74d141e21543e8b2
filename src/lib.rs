//! @ai:module:intent Parse SCSS documentation comments into structured, annotated records
//! @ai:module:layer infrastructure
//! @ai:module:public_api scanner, context, grouping, extractor, annotation, builtin, parser, linter, config, output, error
//! @ai:module:stateless true
//!
//! # SCSS Comment Parser
//!
//! Finds `///` and `/** */` documentation comments in SCSS, works out which
//! construct each one documents (mixin, function, placeholder, variable),
//! folds multi-line annotations and dispatches them to registered handlers.
//!
//! ## Example
//!
//! ```rust
//! use scss_comment_parser::{AnnotationRegistry, ContextKind, ScssCommentParser};
//! use serde_json::json;
//!
//! let registry = AnnotationRegistry::new()
//!     .with_annotation("author", |text: &str| json!(text))
//!     .with_alias("by", "author");
//! let parser = ScssCommentParser::new(registry);
//!
//! let result = parser.parse("/// Spacing unit\n/// @by Jane\n$unit: 4px;\n");
//! let variable = &result.get(ContextKind::Variable)[0];
//! assert_eq!(variable.description, "Spacing unit\n");
//! assert_eq!(variable.annotation("author"), &[json!("Jane")]);
//! ```

pub mod annotation;
pub mod builtin;
pub mod config;
pub mod context;
pub mod error;
pub mod extractor;
pub mod grouping;
pub mod linter;
pub mod output;
pub mod parser;
pub mod scanner;

pub use annotation::{
    AnnotationDispatcher, AnnotationHandler, AnnotationRegistry, ParseResult, ParsedComment,
    Warning,
};
pub use builtin::default_registry;
pub use config::Config;
pub use context::{classify, Context, ContextKind, Scope};
pub use error::{Error, Result};
pub use extractor::{Comment, CommentExtractor, CommentRange};
pub use grouping::group_lines;
pub use linter::{check_directory, check_file, check_source, LintIssue, LintResult, Severity};
pub use output::{format_lint_result, format_parse_result, to_json, OutputFormat};
pub use parser::ScssCommentParser;
pub use scanner::{extract_balanced_block, find_statement_end, CodeScanner};
