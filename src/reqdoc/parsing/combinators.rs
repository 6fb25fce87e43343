//! Parser combinators
//!
//! Plain functions over a shared [`LineCursor`]. Each one consumes the lines it
//! recognizes and either returns what it read or a [`SyntaxError`]. The parser
//! composes them; nothing here knows about documents as a whole.

use crate::reqdoc::ast::{DocumentKind, Pair};
use crate::reqdoc::error::SyntaxError;
use crate::reqdoc::grammar;
use crate::reqdoc::lexing::{classify_line, split_pair, LineClass};
use crate::reqdoc::parsing::LineCursor;

/// Skip blank lines, returning how many were consumed
pub fn skip_blank_lines(cursor: &mut LineCursor<'_>) -> usize {
    let mut skipped = 0;
    while cursor.peek().is_some_and(|line| line.is_blank()) {
        cursor.advance();
        skipped += 1;
    }
    skipped
}

/// Block name on a begin marker line. Surrounding whitespace is not part of it.
pub fn block_name(text: &str) -> &str {
    text.trim()
}

/// If `text` ends the multimap block `open` early, return the marker that did.
///
/// That is the case for a line naming a block recognized for `kind`, or an end
/// marker that closes a different block known to the grammar. Anything else is
/// just a pair line.
pub fn interrupting_marker(kind: DocumentKind, open: &str, text: &str) -> Option<String> {
    match classify_line(text) {
        LineClass::EndMarker(other) if other != open && grammar::is_known_block(other) => {
            Some(grammar::end_marker(other))
        }
        LineClass::Content(content) => {
            let name = block_name(content);
            grammar::is_recognized(kind, name).then(|| name.to_string())
        }
        _ => None,
    }
}

/// Read a multimap body up to and including the end marker of `name`.
///
/// Blank lines are dropped. `begin_line` is the line of the begin marker and is
/// only used for error reporting.
pub fn multimap_body(
    cursor: &mut LineCursor<'_>,
    kind: DocumentKind,
    name: &str,
    begin_line: usize,
) -> Result<Vec<Pair>, SyntaxError> {
    let mut pairs = Vec::new();

    while let Some(line) = cursor.advance() {
        match classify_line(line.text) {
            LineClass::Blank => continue,
            LineClass::EndMarker(closed) if closed == name => return Ok(pairs),
            _ => {}
        }

        if let Some(marker) = interrupting_marker(kind, name, line.text) {
            return Err(SyntaxError::interrupted(
                name,
                begin_line,
                marker,
                line.number,
            ));
        }

        let pair = split_pair(line.text);
        pairs.push(Pair::new(pair.key, pair.value).with_enabled(pair.enabled));
    }

    Err(SyntaxError::end_of_input(name, begin_line))
}

/// Read a raw body up to and including the end marker of `name`.
///
/// The body is the exact slice of `source` between the begin and end marker
/// lines, without the newline that precedes the end marker. Nothing but the
/// block's own end marker terminates it.
pub fn raw_body(
    cursor: &mut LineCursor<'_>,
    source: &str,
    name: &str,
    begin_line: usize,
) -> Result<String, SyntaxError> {
    let mut body: Option<(usize, usize)> = None;

    while let Some(line) = cursor.advance() {
        if grammar::is_end_marker_of(line.text, name) {
            let text = body
                .and_then(|(start, end)| source.get(start..end))
                .unwrap_or_default();
            return Ok(text.to_string());
        }
        let start = body.map_or(line.span.start, |(start, _)| start);
        body = Some((start, line.span.end));
    }

    Err(SyntaxError::end_of_input(name, begin_line))
}
