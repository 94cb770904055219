//! Flagged-line rendering.
//!
//! Produces the decorated input line: the misspelled word in the flag
//! color followed by the bracketed suggestion list, with the current
//! selection highlighted while cycling. Colors are plain ANSI escapes
//! looked up by name, so hosts that speak ANSI can print the result
//! as-is.

use phf::phf_map;

use crate::session::SuggestionState;

/// Escape that returns to the terminal's default attributes.
pub const RESET: &str = "\x1b[0m";

static COLORS: phf::Map<&'static str, &'static str> = phf_map! {
    "default" => "\x1b[39m",
    "black" => "\x1b[30m",
    "red" => "\x1b[31m",
    "green" => "\x1b[32m",
    "yellow" => "\x1b[33m",
    "blue" => "\x1b[34m",
    "magenta" => "\x1b[35m",
    "cyan" => "\x1b[36m",
    "white" => "\x1b[37m",
    "gray" => "\x1b[90m",
    "lightred" => "\x1b[91m",
    "lightgreen" => "\x1b[92m",
    "lightyellow" => "\x1b[93m",
    "lightblue" => "\x1b[94m",
    "lightmagenta" => "\x1b[95m",
    "lightcyan" => "\x1b[96m",
    "lightwhite" => "\x1b[97m",
};

/// Escape code for a color name, if the name is known.
pub fn color(name: &str) -> Option<&'static str> {
    COLORS.get(name).copied()
}

/// Resolved pair of escapes used while decorating.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub word: &'static str,
    pub selection: &'static str,
}

impl Palette {
    /// Resolve color names, falling back to red/magenta for names the
    /// table does not know.
    pub fn from_names(word: &str, selection: &str) -> Self {
        Self {
            word: color(word).unwrap_or("\x1b[31m"),
            selection: color(selection).unwrap_or("\x1b[35m"),
        }
    }
}

/// Splice the flag decoration over the state's span.
///
/// The original word is shown in the flag color even while a
/// replacement occupies the span, so the user never loses sight of
/// what they typed. Callers guarantee the span is valid for `text`.
pub fn decorate(text: &str, state: &SuggestionState, palette: &Palette) -> String {
    let span = state.span();
    let mut out = String::with_capacity(text.len() + 64);
    out.push_str(&text[..span.start]);
    out.push_str(palette.word);
    out.push_str(state.original());
    out.push_str(RESET);
    out.push_str(" [");
    for (i, s) in state.suggestions().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if state.selected() == Some(i) {
            out.push_str(palette.selection);
            out.push_str(s);
            out.push_str(RESET);
        } else {
            out.push_str(s);
        }
    }
    out.push(']');
    out.push_str(&text[span.end()..]);
    out
}
