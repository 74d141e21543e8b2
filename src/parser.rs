//! @ai:module:intent Parse SCSS documentation comments into grouped, annotated records
//! @ai:module:layer application
//! @ai:module:public_api ScssCommentParser
//! @ai:module:depends_on extractor, context, grouping, annotation, scanner, error
//! @ai:module:stateless true

use crate::annotation::{AnnotationDispatcher, AnnotationRegistry, ParseResult};
use crate::builtin::default_registry;
use crate::context::{classify, Context};
use crate::error::{Error, Result};
use crate::extractor::CommentExtractor;
use crate::grouping::group_lines;
use crate::scanner::extract_balanced_block;
use std::fmt;
use std::path::Path;

/// @ai:intent Parser for SCSS documentation comments
///
/// Holds an immutable annotation registry; `parse` can be called any number
/// of times and shares no state between calls.
pub struct ScssCommentParser {
    extractor: CommentExtractor<fn(&str) -> Context>,
    dispatcher: AnnotationDispatcher,
}

impl ScssCommentParser {
    /// @ai:intent Create a parser dispatching annotations through `registry`
    pub fn new(registry: AnnotationRegistry) -> Self {
        Self {
            extractor: CommentExtractor::new(classify as fn(&str) -> Context),
            dispatcher: AnnotationDispatcher::new(registry),
        }
    }

    /// @ai:intent Create a parser with the built-in SassDoc annotations
    pub fn with_default_annotations() -> Self {
        Self::new(default_registry())
    }

    pub fn registry(&self) -> &AnnotationRegistry {
        self.dispatcher.registry()
    }

    /// @ai:intent Parse SCSS source into comments grouped by context kind
    /// @ai:post every documentation comment in source appears in the result
    /// @ai:post continuation lines are folded into their annotation before dispatch
    /// @ai:effects log
    pub fn parse(&self, source: &str) -> ParseResult {
        let mut comments = self.extractor.extract(source);

        for comment in &mut comments {
            comment.lines = group_lines(std::mem::take(&mut comment.lines));
        }

        let result = self.dispatcher.dispatch(comments);
        tracing::debug!(
            "Parsed {} comments ({} warnings)",
            result.len(),
            result.warnings.len()
        );

        result
    }

    /// @ai:intent Read and parse an SCSS file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read, log
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!("Parsing {}", path.display());
        Ok(self.parse(&content))
    }

    /// @ai:intent Extract the balanced block whose `{` is at `open_index`
    /// @ai:post empty when the block is unbalanced
    /// @ai:effects pure
    pub fn extract_code(text: &str, open_index: usize) -> &str {
        extract_balanced_block(text, open_index)
    }

    /// @ai:intent Classify the construct at the start of `text`
    /// @ai:effects pure
    pub fn classify(text: &str) -> Context {
        classify(text)
    }
}

impl fmt::Debug for ScssCommentParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScssCommentParser")
            .field("registry", self.registry())
            .finish()
    }
}

impl Default for ScssCommentParser {
    fn default() -> Self {
        Self::with_default_annotations()
    }
}
