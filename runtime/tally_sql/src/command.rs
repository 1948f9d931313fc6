//! Text-level parsing of SQL commands.
//!
//! Nothing here talks to a driver. The translator strings these steps
//! together: pick the verb, substitute parameters, strip the `CONNECTION`
//! and cursor clauses, then parse whatever the verb needs.

use tally_bridge::{to_text, BridgeError};
use tally_edit::numeric::atoi_wrapping;
use tally_value::is_null;

use crate::driver::{CursorOptions, FetchOrientation, Lock, Scroll};
use crate::error::SqlError;
use crate::manager::ConnectParams;

/// Cursor used when a command names none.
pub const TABLE_CURSOR: &str = "table_cursor";

const CURSOR_NAME_MAX: usize = 19;
const CONNECTION_NAME_MAX: usize = 20;
/// Only this many leading bytes are searched for the verb.
const VERB_WINDOW: usize = 50;
/// Longest positional `CONNECT` parameter.
const CONNECT_PARAM_MAX: usize = 50;

/// The first word of `text`, uppercased.
pub fn verb(text: &str) -> Option<String> {
    let window = &text.as_bytes()[..text.len().min(VERB_WINDOW)];
    let word = window
        .split(|&b| b == b' ' || b == b'\t')
        .find(|w| !w.is_empty())?;
    Some(String::from_utf8_lossy(word).to_ascii_uppercase())
}

/// Byte offset of `keyword` in `text`, skipping quoted strings and the
/// character after a backslash.
///
/// `keyword` must be uppercase; `text` matches in any case. The search
/// starts at offset 1, so a keyword at the very start is never found.
pub fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    let src = text.as_bytes();
    let key = keyword.as_bytes();
    let last = src.len().checked_sub(key.len())?;
    let mut quote = None;
    let mut pos = 1;
    while pos <= last {
        let byte = src[pos];
        if byte == b'\\' {
            pos += 2;
            continue;
        }
        match quote {
            Some(open) => {
                if byte == open {
                    quote = None;
                }
            }
            None if byte == b'\'' || byte == b'"' => quote = Some(byte),
            None => {
                let candidate = &src[pos..pos + key.len()];
                if candidate.iter().zip(key).all(|(s, k)| s.to_ascii_uppercase() == *k) {
                    return Some(pos);
                }
            }
        }
        pos += 1;
    }
    None
}

/// End of the word starting at `start`: the next space or the end of text.
fn word_end(text: &str, start: usize) -> usize {
    text[start..].find(' ').map_or(text.len(), |n| start + n)
}

fn skip_spaces(text: &str, mut pos: usize) -> usize {
    while text.as_bytes().get(pos) == Some(&b' ') {
        pos += 1;
    }
    pos
}

/// Remove a `USING <cursor>` clause, or else an `OF <cursor>` clause, and
/// return the cursor name.
///
/// The keyword must follow whitespace. `None` means the command names no
/// cursor and runs on [`TABLE_CURSOR`].
pub fn take_cursor_clause(sql: &mut String) -> Option<String> {
    let (at, len) = match find_keyword(sql, "USING ") {
        Some(at) => (at, "USING ".len()),
        None => (find_keyword(sql, "OF ")?, "OF ".len()),
    };
    if !sql.as_bytes()[at - 1].is_ascii_whitespace() {
        return None;
    }
    let start = skip_spaces(sql, at + len);
    let end = word_end(sql, start);
    let name: String = sql[start..end].chars().take(CURSOR_NAME_MAX).collect();
    sql.replace_range(at..end, "");
    if name.is_empty() {
        return Some(TABLE_CURSOR.to_owned());
    }
    Some(name)
}

/// Remove a `CONNECTION [=] <name>` clause and return the name.
pub fn take_connection_clause(sql: &mut String) -> Option<String> {
    const KEYWORD: &str = "CONNECTION ";
    let at = find_keyword(sql, KEYWORD)?;
    let mut start = skip_spaces(sql, at + KEYWORD.len());
    if sql.as_bytes().get(start) == Some(&b'=') {
        start = skip_spaces(sql, start + 1);
    }
    let end = word_end(sql, start);
    let name = sql[start..end].chars().take(CONNECTION_NAME_MAX).collect();
    sql.replace_range(at..end, "");
    Some(name)
}

/// Substitute `:<n>` placeholders with the text of `params[n - 1]`.
///
/// `\:` stands for a literal colon. Placeholders are left alone when there
/// are no parameters at all and dropped when `n` is out of range. A null
/// parameter becomes `NULL`, swallowing a quote pair around the
/// placeholder. The result must stay shorter than `limit` bytes.
pub fn build_command(text: &str, params: &[&[u8]], limit: usize) -> Result<String, BridgeError> {
    let src = text.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(src.len());
    let mut pos = 0;
    while pos < src.len() {
        let next_is_digit = src.get(pos + 1).is_some_and(u8::is_ascii_digit);
        if src[pos] == b'\\' && src.get(pos + 1) == Some(&b':') {
            out.push(b':');
            pos += 2;
        } else if src[pos] == b':' && next_is_digit && !params.is_empty() {
            pos += 1;
            let mut number: usize = 0;
            while let Some(digit) = src.get(pos).filter(|b| b.is_ascii_digit()) {
                number = number.saturating_mul(10).saturating_add(usize::from(digit - b'0'));
                pos += 1;
            }
            if let Some(param) = number.checked_sub(1).and_then(|n| params.get(n)) {
                if is_null(param) {
                    if out.last() == Some(&b'\'') && src.get(pos) == Some(&b'\'') {
                        out.pop();
                        pos += 1;
                    }
                    out.extend_from_slice(b"NULL");
                } else {
                    let room = limit.saturating_sub(out.len());
                    out.extend_from_slice(&to_text(param, room)?);
                }
            }
        } else {
            out.push(src[pos]);
            pos += 1;
        }
        if pos >= limit || out.len() >= limit {
            return Err(BridgeError::Overflow {
                len: out.len().max(pos),
                max: limit,
            });
        }
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// A parsed `CONNECT` command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectCommand {
    /// Connection name; empty for the default connection.
    pub name: String,
    pub params: ConnectParams,
}

/// Parse a `CONNECT` command.
///
/// Without any `=` in the text the server, user and password come from the
/// parameters: three give all of them, two give user and password, one
/// gives the user. Otherwise the text holds `KEY=value` pairs.
pub fn parse_connect(text: &str, params: &[&[u8]]) -> Result<ConnectCommand, SqlError> {
    let verb_end = text
        .find(|c: char| c != ' ' && c != '\t')
        .and_then(|start| text[start..].find([' ', '\t']).map(|n| start + n))
        .unwrap_or(text.len());
    let rest = &text[verb_end..];
    let mut command = ConnectCommand {
        params: ConnectParams {
            raw: rest.trim_start().to_owned(),
            ..ConnectParams::default()
        },
        ..ConnectCommand::default()
    };
    if text.contains('=') {
        parse_connect_keywords(rest.trim_start_matches([' ', '\t']), &mut command)?;
    } else {
        let fields = &mut command.params;
        let targets: Vec<&mut String> = match params.len() {
            3 => vec![&mut fields.server, &mut fields.user, &mut fields.password],
            2 => vec![&mut fields.user, &mut fields.password],
            1 => vec![&mut fields.user],
            _ => Vec::new(),
        };
        for (param, target) in params.iter().zip(targets) {
            match to_text(param, CONNECT_PARAM_MAX) {
                Ok(bytes) => *target = String::from_utf8_lossy(&bytes).into_owned(),
                Err(err) => {
                    tracing::debug!(%err, "connect parameter did not convert");
                    break;
                }
            }
        }
    }
    Ok(command)
}

fn parse_connect_keywords(mut rest: &str, command: &mut ConnectCommand) -> Result<(), SqlError> {
    const SEPARATORS: [char; 3] = [',', ' ', '\t'];
    let mut named = 0;
    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else {
            break;
        };
        let key = rest[..eq].to_ascii_uppercase();
        let params = &mut command.params;
        let (target, cap) = match key.as_str() {
            "NAME" => (&mut params.user, 49),
            "PASSWORD" => (&mut params.password, 49),
            "SERVER" => (&mut params.server, 49),
            "CONNECTION" => {
                named += 1;
                (&mut command.name, CONNECTION_NAME_MAX)
            }
            "STRING" => (&mut params.extra, 249),
            _ => break,
        };
        let value = &rest[eq + 1..];
        let end = value.find(SEPARATORS).unwrap_or(value.len());
        *target = value[..end].chars().take(cap).collect();
        if end == value.len() {
            break;
        }
        rest = value[end + 1..].trim_start_matches(SEPARATORS);
    }
    if named > 1 {
        return Err(SqlError::DuplicateConnectionKeyword);
    }
    Ok(())
}

/// `strtok`-style walk over a string: each call skips leading delimiters,
/// returns the next token and consumes the delimiter that ends it.
struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens { text, pos: 0 }
    }

    /// The next token and its byte offset.
    fn next(&mut self, delims: &[char]) -> Option<(usize, &'a str)> {
        let rest = &self.text[self.pos..];
        let Some(skip) = rest.find(|c: char| !delims.contains(&c)) else {
            self.pos = self.text.len();
            return None;
        };
        let start = self.pos + skip;
        let tail = &self.text[start..];
        match tail.find(|c: char| delims.contains(&c)) {
            Some(len) => {
                self.pos = start + len + 1;
                Some((start, &tail[..len]))
            }
            None => {
                self.pos = self.text.len();
                Some((start, tail))
            }
        }
    }
}

/// Split a `SELECT` into the SQL to run and its cursor options.
///
/// An `OPTIONS(LOCK=..., SCROLL=...)` clause right after the verb is parsed
/// and removed. Scanning stops once both options are set or at the first
/// other keyword.
pub fn parse_select_options(sql: &str) -> Result<(String, CursorOptions), SqlError> {
    let mut tokens = Tokens::new(sql);
    tokens.next(&[' ', '\t']);
    let (opt_start, first) = tokens
        .next(&[' ', '(', '\t'])
        .ok_or(SqlError::SelectSyntax { stage: 1 })?;
    if !first.eq_ignore_ascii_case("OPTIONS") {
        return Ok((sql.to_owned(), CursorOptions::default()));
    }
    let close = sql.find(')').ok_or(SqlError::SelectSyntax { stage: 2 })?;

    let mut options = CursorOptions::default();
    let mut key = tokens.next(&[' ', ',', '(', ')', '=', '\t']);
    loop {
        let (_, word) = key.ok_or(SqlError::SelectSyntax { stage: 3 })?;
        match word.to_ascii_uppercase().as_str() {
            "LOCK" => {
                let (_, value) = tokens
                    .next(&[' ', '=', ',', ')', '\t'])
                    .ok_or(SqlError::SelectSyntax { stage: 4 })?;
                options.lock = Some(match value.to_ascii_uppercase().as_str() {
                    "READONLY" => Lock::ReadOnly,
                    "OPTBYTIME" => Lock::OptByTime,
                    "OPTBYVAL" => Lock::OptByValue,
                    "FETCH" => Lock::Fetch,
                    _ => return Err(SqlError::IllegalLock),
                });
            }
            "SCROLL" => {
                let (_, value) = tokens
                    .next(&[' ', '=', ',', ')', '\t'])
                    .ok_or(SqlError::SelectSyntax { stage: 5 })?;
                options.scroll = Some(match value.to_ascii_uppercase().as_str() {
                    "FORWARD" => Scroll::Forward,
                    "DYNAMIC" => Scroll::Dynamic,
                    "KEYSET" => Scroll::Keyset,
                    _ => return Err(SqlError::IllegalScroll),
                });
            }
            _ => break,
        }
        if options.lock.is_some() && options.scroll.is_some() {
            break;
        }
        key = tokens.next(&[' ', ',', '=', ')', '\t']);
    }

    let mut stripped = String::with_capacity(sql.len());
    stripped.push_str(&sql[..opt_start.min(close)]);
    stripped.push_str(&sql[close + 1..]);
    Ok((stripped, options))
}

/// Parse the position of a `FETCH`; `NEXT` when none is given.
pub fn parse_fetch(sql: &str) -> Result<FetchOrientation, SqlError> {
    const BLANKS: [char; 2] = [' ', '\t'];
    let mut tokens = Tokens::new(sql);
    tokens.next(&BLANKS);
    let Some((_, word)) = tokens.next(&BLANKS) else {
        return Ok(FetchOrientation::Next);
    };
    let mut count = |missing: u8, zero: u8| -> Result<i64, SqlError> {
        let (_, number) = tokens
            .next(&BLANKS)
            .ok_or(SqlError::FetchSyntax { stage: missing })?;
        let (negative, digits) = match number.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, number),
        };
        let value = i64::from(atoi_wrapping(digits.as_bytes()));
        if value == 0 && !digits.starts_with('0') {
            return Err(SqlError::FetchSyntax { stage: zero });
        }
        Ok(if negative { -value } else { value })
    };
    match word.to_ascii_uppercase().as_str() {
        "FIRST" => Ok(FetchOrientation::First),
        "NEXT" => Ok(FetchOrientation::Next),
        "LAST" => Ok(FetchOrientation::Last),
        "PRIOR" | "PREV" | "PREVIOUS" => Ok(FetchOrientation::Prior),
        "RELATIVE" => Ok(FetchOrientation::Relative(count(1, 2)?)),
        "ABSOLUTE" | "RANDOM" => Ok(FetchOrientation::Absolute(count(3, 4)?)),
        _ => Err(SqlError::FetchSyntax { stage: 5 }),
    }
}

/// Second word of a `CLOSE` command: the cursor to close.
pub fn close_target(sql: &str) -> Option<&str> {
    let mut tokens = Tokens::new(sql);
    tokens.next(&[' ', '\t'])?;
    tokens.next(&[' ', '\t']).map(|(_, name)| name)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
