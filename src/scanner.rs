//! @ai:module:intent Scan SCSS code while skipping strings and comments
//! @ai:module:layer domain
//! @ai:module:public_api CodeScanner, extract_balanced_block, find_statement_end
//! @ai:module:stateless true

/// Lexical state of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    String(u8),
    /// Raw body of an unquoted `url(...)`, where `//` is not a comment.
    Url,
    LineComment,
    BlockComment,
}

/// @ai:intent Iterate over the bytes of a buffer that are plain code
/// @ai:invariant bytes inside quoted strings, `//` and `/* */` comments are never yielded
/// @ai:invariant string, comment and escape delimiters are never yielded
/// @ai:invariant the body of an unquoted `url(...)` is skipped like a string
///
/// All delimiters the scanner cares about are ASCII, so every yielded index
/// is a valid char boundary for slicing the original `&str`.
#[derive(Debug, Clone)]
pub struct CodeScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    state: State,
}

impl<'a> CodeScanner<'a> {
    /// @ai:intent Start scanning `text` at byte offset `from`, assuming plain code there
    pub fn new(text: &'a str, from: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: from,
            state: State::Code,
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// True when the `(` at `index` opens a `url(` whose argument is not quoted.
    fn opens_unquoted_url(&self, index: usize) -> bool {
        if index < 3 || !self.bytes[index - 3..index].eq_ignore_ascii_case(b"url") {
            return false;
        }
        if index > 3 && is_ident_byte(self.bytes[index - 4]) {
            return false;
        }

        let argument = self.bytes[index + 1..]
            .iter()
            .find(|byte| !byte.is_ascii_whitespace());
        !matches!(argument, Some(&(b'"' | b'\'')))
    }
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

impl Iterator for CodeScanner<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(byte) = self.peek(0) {
            let index = self.pos;

            match self.state {
                State::Code => match byte {
                    // Escaped character, e.g. `\{` or `\'`
                    b'\\' => self.pos += 2,
                    b'"' | b'\'' => {
                        self.state = State::String(byte);
                        self.pos += 1;
                    }
                    b'/' if self.peek(1) == Some(b'/') => {
                        self.state = State::LineComment;
                        self.pos += 2;
                    }
                    b'/' if self.peek(1) == Some(b'*') => {
                        self.state = State::BlockComment;
                        self.pos += 2;
                    }
                    b'(' if self.opens_unquoted_url(index) => {
                        self.state = State::Url;
                        self.pos += 1;
                        return Some((index, byte));
                    }
                    _ => {
                        self.pos += 1;
                        return Some((index, byte));
                    }
                },
                State::String(quote) => {
                    if byte == b'\\' {
                        self.pos += 2;
                    } else {
                        if byte == quote {
                            self.state = State::Code;
                        }
                        self.pos += 1;
                    }
                }
                State::Url => match byte {
                    b'\\' => self.pos += 2,
                    // The closing paren is yielded as code
                    b')' => self.state = State::Code,
                    _ => self.pos += 1,
                },
                State::LineComment => {
                    if byte == b'\n' {
                        self.state = State::Code;
                    }
                    self.pos += 1;
                }
                State::BlockComment => {
                    if byte == b'*' && self.peek(1) == Some(b'/') {
                        self.state = State::Code;
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                    }
                }
            }
        }

        None
    }
}

/// @ai:intent Return the brace-balanced block starting at `open_index`, braces included
/// @ai:pre open_index points at a `{` in text
/// @ai:post result is empty when the block never balances or open_index is not a `{`
/// @ai:example ("{ a { b } c }", 0) -> "{ a { b } c }"
/// @ai:example ("{ '}' }", 0) -> "{ '}' }"
/// @ai:example ("{ a", 0) -> ""
/// @ai:complexity O(n)
/// @ai:effects pure
pub fn extract_balanced_block(text: &str, open_index: usize) -> &str {
    if text.as_bytes().get(open_index) != Some(&b'{') {
        return "";
    }

    let mut depth = 1usize;

    for (index, byte) in CodeScanner::new(text, open_index + 1) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return &text[open_index..=index];
                }
            }
            _ => {}
        }
    }

    ""
}

/// @ai:intent Find the `;` that terminates the statement starting at `from`
/// @ai:post result is None when no terminator exists outside strings and comments
/// @ai:effects pure
pub fn find_statement_end(text: &str, from: usize) -> Option<usize> {
    CodeScanner::new(text, from)
        .find(|&(_, byte)| byte == b';')
        .map(|(index, _)| index)
}
