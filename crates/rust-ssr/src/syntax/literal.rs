//! Typed values of Rust literals.
//!
//! Literals compare by value, so `0x10`, `16` and `1_6u8` are the same
//! integer and `"a"` equals `r"a"`.

use tree_sitter::Node;

use super::node_text;

const INTEGER_SUFFIXES: &[&str] = &[
    "u128", "i128", "usize", "isize", "u64", "i64", "u32", "i32", "u16", "i16", "u8", "i8",
];

/// The values a literal node denotes, one slot per literal flavour.
///
/// Two literals match when every slot is equal; unparseable text leaves its
/// slot empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct LiteralValues {
    boolean: Option<bool>,
    integer: Option<u128>,
    float: Option<f64>,
    character: Option<char>,
    string: Option<String>,
}

impl LiteralValues {
    pub(crate) fn of(node: Node<'_>, source: &str) -> Self {
        let text = node_text(node, source);
        let mut values = Self::default();
        match node.kind() {
            "boolean_literal" => values.boolean = text.parse().ok(),
            "integer_literal" if has_float_suffix(text) => values.float = parse_float(text),
            "integer_literal" => values.integer = parse_integer(text),
            "float_literal" => values.float = parse_float(text),
            "char_literal" => {
                values.character = quoted_body(text, '\'')
                    .and_then(unescape)
                    .and_then(|decoded| single_char(&decoded));
            }
            "string_literal" => values.string = quoted_body(text, '"').and_then(unescape),
            "raw_string_literal" => values.string = raw_body(text).map(str::to_owned),
            _ => {}
        }
        values
    }
}

/// `1f32` lexes as an integer literal but denotes a float; hex digits may
/// end in `f32` without being a suffix.
fn has_float_suffix(text: &str) -> bool {
    !text.starts_with("0x") && (text.ends_with("f32") || text.ends_with("f64"))
}

fn parse_integer(text: &str) -> Option<u128> {
    let digits: String = strip_integer_suffix(text)
        .chars()
        .filter(|c| *c != '_')
        .collect();
    let (radix, body) = if let Some(hex) = digits.strip_prefix("0x") {
        (16, hex)
    } else if let Some(octal) = digits.strip_prefix("0o") {
        (8, octal)
    } else if let Some(binary) = digits.strip_prefix("0b") {
        (2, binary)
    } else {
        (10, digits.as_str())
    };
    u128::from_str_radix(body, radix).ok()
}

fn strip_integer_suffix(text: &str) -> &str {
    INTEGER_SUFFIXES
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .unwrap_or(text)
}

fn parse_float(text: &str) -> Option<f64> {
    let body = text
        .strip_suffix("f32")
        .or_else(|| text.strip_suffix("f64"))
        .unwrap_or(text);
    body.chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .parse()
        .ok()
}

/// Strips an optional `b`/`c` prefix and the surrounding quotes.
fn quoted_body(text: &str, quote: char) -> Option<&str> {
    text.trim_start_matches(['b', 'c'])
        .strip_prefix(quote)?
        .strip_suffix(quote)
}

fn raw_body(text: &str) -> Option<&str> {
    let after_prefix = text.trim_start_matches(['b', 'c']).strip_prefix('r')?;
    let hashes = after_prefix.len() - after_prefix.trim_start_matches('#').len();
    let closing = format!("\"{}", "#".repeat(hashes));
    after_prefix
        .trim_start_matches('#')
        .strip_prefix('"')?
        .strip_suffix(closing.as_str())
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

/// Resolves Rust escape sequences, returning `None` on malformed input.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                out.push(char::from(u8::from_str_radix(&hex, 16).ok()?));
            }
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let hex: String = chars
                    .by_ref()
                    .take_while(|c| *c != '}')
                    .filter(|c| *c != '_')
                    .collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            '\n' => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            _ => return None,
        }
    }
    Some(out)
}
