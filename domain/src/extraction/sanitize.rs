//! Repairs for the JSON-like text generators tend to emit.
//!
//! [`sanitize`] is applied to every candidate span before parsing. It is
//! idempotent: `sanitize(&sanitize(s)) == sanitize(s)` for every input.

use regex::Regex;
use std::sync::LazyLock;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```(?:json)?").expect("fence pattern is valid"));

/// Clean a candidate span so `serde_json` has a chance to parse it.
///
/// 1. Remove code fence markers (repeated until none are left).
/// 2. Trim surrounding whitespace.
/// 3. Drop trailing commas before `}` or `]`.
/// 4. Quote bare identifier keys that follow `{` or `,` and precede `:`.
///
/// Steps 3 and 4 skip over double-quoted string literals.
///
/// ```
/// use concord_domain::extraction::sanitize;
///
/// assert_eq!(sanitize("```json\n{name: \"X\", tags: [1, 2,],}\n```"),
///            r#"{"name": "X", "tags": [1, 2]}"#);
/// ```
pub fn sanitize(raw: &str) -> String {
    let stripped = strip_fences(raw);
    repair_structure(stripped.trim())
}

/// Remove every code fence marker from `text`.
pub(crate) fn strip_fences(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = FENCE_RE.replace_all(&current, "").into_owned();
        // Removing one fence can join two backtick runs into a new one
        if next == current {
            return current;
        }
        current = next;
    }
}

fn repair_structure(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 8);
    let mut in_string = false;
    let mut escaped = false;
    let mut expect_key = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                expect_key = false;
                out.push(c);
            }
            '{' | ',' => {
                expect_key = true;
                out.push(c);
            }
            '}' | ']' => {
                drop_trailing_commas(&mut out);
                expect_key = false;
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            c if expect_key && (c.is_ascii_alphabetic() || c == '_') => {
                expect_key = false;
                if let Some(end) = bare_key_end(&chars, i) {
                    out.push('"');
                    out.extend(&chars[i..end]);
                    out.push('"');
                    i = end;
                    continue;
                }
                out.push(c);
            }
            _ => {
                expect_key = false;
                out.push(c);
            }
        }
        i += 1;
    }

    out
}

/// End index of an identifier starting at `start` if it is followed by
/// optional whitespace and a colon.
fn bare_key_end(chars: &[char], start: usize) -> Option<usize> {
    let end = chars[start..]
        .iter()
        .position(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(chars.len(), |offset| start + offset);

    let colon = chars[end..]
        .iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| *c == ':');

    colon.then_some(end)
}

fn drop_trailing_commas(out: &mut String) {
    if out.trim_end().ends_with(',') {
        let keep = out
            .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
            .len();
        out.truncate(keep);
    }
}
