//! @ai:module:intent Fold continuation lines into the annotation line they belong to
//! @ai:module:layer domain
//! @ai:module:public_api group_lines
//! @ai:module:stateless true

/// Lines starting with this marker are visual separators and never reach dispatch.
const SEPARATOR: &str = "---";

/// @ai:intent Merge each annotation's continuation lines into a single entry
/// @ai:pre lines are in source order
/// @ai:post result.len() <= lines.len()
/// @ai:post separator lines (`---`) are dropped
/// @ai:post lines before the first annotation are kept as separate entries
/// @ai:example (["Desc", "@param {x}", "more", "@return y"]) -> ["Desc", "@param {x}\nmore", "@return y"]
/// @ai:effects pure
pub fn group_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut grouped: Vec<String> = Vec::new();
    let mut grouping = false;

    for line in lines {
        let line = line.into();
        let trimmed = line.trim();

        if trimmed.starts_with(SEPARATOR) {
            continue;
        }

        if trimmed.starts_with('@') {
            grouping = true;
            grouped.push(line);
            continue;
        }

        match grouped.last_mut() {
            Some(last) if grouping => {
                last.push('\n');
                last.push_str(&line);
            }
            _ => grouped.push(line),
        }
    }

    grouped
}
