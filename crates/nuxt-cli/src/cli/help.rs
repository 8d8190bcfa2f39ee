//! Help text rendering.
//!
//! Layout:
//!
//! ```text
//!   Usage: nuxt build <dir> [options]
//!
//!   Compiles the application for production deployment
//!
//!   Options:
//!
//!     --analyze, -a  Launch webpack-bundle-analyzer to optimize your bundles
//!     --no-generate  Don't generate static version for SPA mode (useful for nuxt
//!                      start)
//! ```
//!
//! Widths are measured with `console` so styled text wraps like plain text.

use console::measure_text_width;

use crate::cli::OptionSchema;

/// Indent of every block.
pub const START_SPACES: usize = 2;
/// Gap between the flag column and the description.
pub const OPTION_SPACES: usize = 2;
/// Wrap width, not counting the indent.
pub const MAX_CHARS_PER_LINE: usize = 80;

pub fn indent(count: usize) -> String {
    " ".repeat(count)
}

/// Indent the first line by `first_line_spaces` (or `spaces`) and every
/// following line by `spaces`.
pub fn indent_lines<S: AsRef<str>>(
    lines: &[S],
    spaces: usize,
    first_line_spaces: Option<usize>,
) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push_str(&indent(first_line_spaces.unwrap_or(spaces)));
        } else {
            out.push('\n');
            out.push_str(&indent(spaces));
        }
        out.push_str(line.as_ref());
    }
    out
}

/// Word-wrap `text` to `max_chars` columns, keeping runs of spaces inside a
/// line. Words longer than the width are not split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let mut row = String::new();
        let mut row_len = 0;

        for (i, word) in line.split(' ').enumerate() {
            let word_len = measure_text_width(word);

            if i != 0 {
                if row_len >= max_chars {
                    rows.push(row.trim_end().to_string());
                    row.clear();
                    row_len = 0;
                } else {
                    row.push(' ');
                    row_len += 1;
                }
            }

            if row_len + word_len > max_chars && row_len > 0 && word_len > 0 {
                rows.push(row.trim_end().to_string());
                row.clear();
                row_len = 0;
            }

            row.push_str(word);
            row_len += word_len;
        }

        rows.push(row.trim_end().to_string());
    }

    rows
}

/// Wrap then indent.
pub fn fold_lines(
    text: &str,
    max_chars: usize,
    spaces: usize,
    first_line_spaces: Option<usize>,
) -> String {
    indent_lines(&wrap(text, max_chars), spaces, first_line_spaces)
}

/// Flag token shown in the left column, e.g. `--no-generate` or `--port, -p`.
pub fn flag_token(name: &str, negatable: bool, alias: Option<char>) -> String {
    let mut token = String::from("--");
    if negatable {
        token.push_str("no-");
    }
    token.push_str(name);
    if let Some(alias) = alias {
        token.push_str(", -");
        token.push(alias);
    }
    token
}

/// Render the full help page.
pub fn render(program: &str, usage: &str, description: &str, options: &OptionSchema) -> String {
    let rows: Vec<(String, &str)> = options
        .iter()
        .map(|(name, option)| {
            (
                flag_token(name, option.is_negatable(), option.alias),
                option.description.as_str(),
            )
        })
        .collect();

    let max_option_len = rows
        .iter()
        .map(|(token, _)| measure_text_width(token))
        .max()
        .unwrap_or(0);

    let opts = rows
        .iter()
        .map(|(token, description)| {
            let pad = indent(max_option_len + OPTION_SPACES - measure_text_width(token));
            fold_lines(
                &format!("{}{}{}", token, pad, description),
                MAX_CHARS_PER_LINE,
                START_SPACES + max_option_len + OPTION_SPACES * 2,
                Some(START_SPACES + OPTION_SPACES),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let usage = fold_lines(
        &format!("Usage: {} {} [options]", program, usage),
        MAX_CHARS_PER_LINE,
        START_SPACES,
        None,
    );
    let description = fold_lines(description, MAX_CHARS_PER_LINE, START_SPACES, None);
    let heading = fold_lines("Options:", MAX_CHARS_PER_LINE, START_SPACES, None);

    format!("{}\n\n{}\n\n{}\n\n{}\n\n", usage, description, heading, opts)
}
