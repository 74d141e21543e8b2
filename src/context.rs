//! @ai:module:intent Classify the SCSS construct that follows a documentation comment
//! @ai:module:layer domain
//! @ai:module:public_api Context, ContextKind, Scope, classify
//! @ai:module:depends_on scanner
//! @ai:module:stateless true

use crate::scanner::{extract_balanced_block, find_statement_end, CodeScanner};
use serde::{Deserialize, Serialize};
use std::fmt;

/// @ai:intent The SCSS construct a comment documents
///
/// Serializes as a flat record tagged by `type`, carrying only the fields
/// that belong to that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Context {
    Mixin { name: String, code: String },
    Function { name: String, code: String },
    Placeholder { name: String, code: String },
    Variable { name: String, value: String, scope: Scope },
    Unknown,
}

/// @ai:intent Discriminant of a Context, used to group parse results
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Mixin,
    Function,
    Placeholder,
    Variable,
    Unknown,
}

/// @ai:intent Visibility of a variable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    #[default]
    Private,
}

impl Context {
    /// @ai:intent Get the discriminant of this context
    /// @ai:effects pure
    pub fn kind(&self) -> ContextKind {
        match self {
            Context::Mixin { .. } => ContextKind::Mixin,
            Context::Function { .. } => ContextKind::Function,
            Context::Placeholder { .. } => ContextKind::Placeholder,
            Context::Variable { .. } => ContextKind::Variable,
            Context::Unknown => ContextKind::Unknown,
        }
    }

    /// @ai:intent Get the construct name, if the construct has one
    /// @ai:effects pure
    pub fn name(&self) -> Option<&str> {
        match self {
            Context::Mixin { name, .. }
            | Context::Function { name, .. }
            | Context::Placeholder { name, .. }
            | Context::Variable { name, .. } => Some(name),
            Context::Unknown => None,
        }
    }

    /// @ai:intent Get the captured block of a mixin, function or placeholder
    /// @ai:post an empty string means the block could not be balanced
    /// @ai:effects pure
    pub fn code(&self) -> Option<&str> {
        match self {
            Context::Mixin { code, .. }
            | Context::Function { code, .. }
            | Context::Placeholder { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl ContextKind {
    pub const ALL: [ContextKind; 5] = [
        ContextKind::Mixin,
        ContextKind::Function,
        ContextKind::Placeholder,
        ContextKind::Variable,
        ContextKind::Unknown,
    ];

    /// @ai:intent Get the lowercase name of this kind
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Mixin => "mixin",
            ContextKind::Function => "function",
            ContextKind::Placeholder => "placeholder",
            ContextKind::Variable => "variable",
            ContextKind::Unknown => "unknown",
        }
    }
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Private => "private",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// @ai:intent Classify the raw code that follows a comment
/// @ai:pre text starts right after the comment; leading whitespace is ignored
/// @ai:post Context::Unknown when no supported construct starts the text
/// @ai:example ("$name: 'value';") -> Variable { name: "name", value: "'value'", scope: Private }
/// @ai:example ("@mixin name { a: b; }") -> Mixin { name: "name", code: "{ a: b; }" }
/// @ai:example (".selector { }") -> Unknown
/// @ai:effects pure
pub fn classify(text: &str) -> Context {
    let text = text.trim_start();

    let classified = if let Some(rest) = text.strip_prefix('@') {
        classify_at_rule(text, rest)
    } else if let Some(rest) = text.strip_prefix('%') {
        let name = identifier(rest);
        (!name.is_empty()).then(|| Context::Placeholder {
            name: name.to_string(),
            code: block_after(text, 1 + name.len()).to_string(),
        })
    } else if let Some(rest) = text.strip_prefix('$') {
        classify_variable(text, rest)
    } else {
        None
    };

    classified.unwrap_or(Context::Unknown)
}

/// Handles `@mixin name` and `@function name`; `rest` is `text` without the `@`.
fn classify_at_rule(text: &str, rest: &str) -> Option<Context> {
    let keyword = identifier(rest);
    if keyword != "mixin" && keyword != "function" {
        return None;
    }

    let after_keyword = &rest[keyword.len()..];
    let spaced = after_keyword.trim_start();
    if spaced.len() == after_keyword.len() {
        // `@mixinfoo` or `@mixin{`
        return None;
    }

    let name = identifier(spaced);
    if name.is_empty() {
        return None;
    }

    let header_end = text.len() - spaced.len() + name.len();
    let name = name.to_string();
    let code = block_after(text, header_end).to_string();

    Some(if keyword == "mixin" {
        Context::Mixin { name, code }
    } else {
        Context::Function { name, code }
    })
}

/// Handles `$name: value [!flag...];`; `rest` is `text` without the `$`.
fn classify_variable(text: &str, rest: &str) -> Option<Context> {
    let name = identifier(rest);
    if name.is_empty() {
        return None;
    }

    let after_name = rest[name.len()..].trim_start();
    let after_colon = after_name.strip_prefix(':')?;
    let value_start = text.len() - after_colon.len();
    let value_end = find_statement_end(text, value_start)?;

    let (value, flags) = split_flags(&text[value_start..value_end]);
    let scope = if flags.contains(&"global") {
        Scope::Global
    } else {
        Scope::Private
    };

    Some(Context::Variable {
        name: name.to_string(),
        value: value.trim().to_string(),
        scope,
    })
}

/// @ai:intent Strip trailing whitespace-separated `!flag` markers from a value
/// @ai:example ("1px !default !global") -> ("1px", ["default", "global"])
/// @ai:example ("'a !b'") -> ("'a !b'", [])
/// @ai:effects pure
fn split_flags(raw: &str) -> (&str, Vec<&str>) {
    let mut value = raw.trim_end();
    let mut flags = Vec::new();

    while let Some(space) = value.rfind(char::is_whitespace) {
        let token = value[space..].trim_start();
        let Some(flag) = token.strip_prefix('!') else {
            break;
        };
        if flag.is_empty() || identifier(flag).len() != flag.len() {
            break;
        }
        flags.push(flag);
        value = value[..space].trim_end();
    }

    flags.reverse();
    (value, flags)
}

/// Balanced block following the header that ends at `header_end`, or "" if none.
/// Braces inside argument strings and comments do not open the block.
fn block_after(text: &str, header_end: usize) -> &str {
    match CodeScanner::new(text, header_end).find(|&(_, byte)| byte == b'{') {
        Some((open_index, _)) => extract_balanced_block(text, open_index),
        None => "",
    }
}

/// Leading identifier of `text`: letters, digits, `-` and `_`.
fn identifier(text: &str) -> &str {
    let end = text
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(text.len());
    &text[..end]
}
