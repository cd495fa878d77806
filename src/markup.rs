//! Typst markup sanitization and notation substitution.
//!
//! Raw field text is escaped first; every rewrite after that only matches
//! tokens in their escaped spelling, so the substitution table and the
//! script rewrites are the only sources of live markup in the output.

use lazy_static::lazy_static;
use regex::Regex;

/// Characters with special meaning in Typst markup content position.
///
/// `=`, `-` and `+` are only markers at a line start, but escaping them
/// everywhere renders identically and keeps the escape context-free.
const MARKUP_SPECIALS: &[char] = &[
    '\\', '#', '$', '*', '_', '[', ']', '`', '<', '>', '@', '~', '/', '=', '-', '+',
];

lazy_static! {
    /// Notation tokens and their display substitutions, applied in order
    /// to escaped text. Tokens are stored pre-escaped so they match the
    /// spelling the escape pass produces.
    static ref SYMBOL_SUBSTITUTIONS: Vec<(String, &'static str)> = [
        (r"\pi", "π"),
        (r"\theta", "θ"),
        (r"\omega", "ω"),
        (r"\Delta", "Δ"),
        (r"\alpha", "α"),
        (r"\mu", "μ"),
        (r"\tau", "τ"),
        (r"\times", "×"),
        (r"\approx", "≈"),
        (r"\circ", "°"),
        (r"\infty", "∞"),
        (r"\pm", "±"),
        (r"\rightarrow", "→"),
        // The vector marker is stripped, keeping its argument.
        (r"\vec", ""),
    ]
    .iter()
    .map(|(token, substitute)| (escape(token), *substitute))
    .collect();

    /// `^2` style exponents.
    static ref SUPERSCRIPT_PLAIN: Regex = Regex::new(r"\^(\d+)").unwrap();
    /// `^{...}` style exponents.
    static ref SUPERSCRIPT_BRACED: Regex = Regex::new(r"\^\{([^}]+)\}").unwrap();
    /// `_0` / `_x` style subscripts; the underscore appears escaped.
    static ref SUBSCRIPT_PLAIN: Regex = Regex::new(r"\\_(\d+|[a-z])").unwrap();
    /// `_{...}` style subscripts.
    static ref SUBSCRIPT_BRACED: Regex = Regex::new(r"\\_\{([^}]+)\}").unwrap();
}

/// Escape every character Typst markup treats specially.
///
/// A digit run followed by a dot at a line start would parse as an enum
/// item, so that dot is escaped as well.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    let mut digit_run = false;
    let mut line_empty = true;
    for ch in text.chars() {
        if ch == '\n' {
            escaped.push('\n');
            digit_run = false;
            line_empty = true;
            continue;
        }
        if MARKUP_SPECIALS.contains(&ch) {
            escaped.push('\\');
            escaped.push(ch);
            digit_run = false;
            line_empty = false;
            continue;
        }
        if ch == '.' && digit_run {
            escaped.push('\\');
        }
        escaped.push(ch);
        digit_run = ch.is_ascii_digit() && (line_empty || digit_run);
        line_empty = false;
    }
    escaped
}

/// Convert raw field text into safe Typst markup.
///
/// Escapes the text (unless the caller already escaped each part, as the
/// composer does for synthesized fields), applies the symbol substitution
/// table, rewrites `^`/`_` notation into `#super[..]`/`#sub[..]`, strips
/// leftover `$` delimiters and empty brace pairs, and converts line
/// breaks into the Typst linebreak escape.
pub fn to_safe_markup(raw: &str, already_sanitized: bool) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut text = if already_sanitized {
        raw.to_string()
    } else {
        escape(raw)
    };

    for (token, substitute) in SYMBOL_SUBSTITUTIONS.iter() {
        if text.contains(token.as_str()) {
            text = text.replace(token.as_str(), substitute);
        }
    }

    let text = SUPERSCRIPT_PLAIN.replace_all(&text, "#super[${1}]");
    let text = SUPERSCRIPT_BRACED.replace_all(&text, "#super[${1}]");
    let text = SUBSCRIPT_PLAIN.replace_all(&text, "#sub[${1}]");
    let text = SUBSCRIPT_BRACED.replace_all(&text, "#sub[${1}]");

    let text = text.replace("\\$", "").replace("{}", "");
    text.replace("\r\n", "\n").replace('\n', "\\ ")
}
