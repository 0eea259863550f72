//! Post-processing: deterministic cleanup of model-generated Markdown.
//!
//! Even a well-prompted model occasionally wraps its answer in
//! ` ```markdown ` fences, emits `\r\n` line endings or sprinkles zero-width
//! characters. Those artefacts break the line-based outline scan (a fenced
//! answer has no headings at column 0 once rendered as code) and the
//! download file, so they are removed before the result is stored.
//!
//! Rules (applied in order):
//! 1. Strip outer markdown fences
//! 2. Normalise line endings (CRLF/CR → LF)
//! 3. Trim trailing whitespace per line
//! 4. Collapse 3+ consecutive blank lines down to 2
//! 5. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
//! 6. End with exactly one newline

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to raw model output.
///
/// Whitespace-only input stays empty so the caller can still detect an
/// empty result.
pub fn clean_markdown(input: &str) -> String {
    let s = strip_markdown_fences(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    ensure_final_newline(&s)
}

// ── Rule 1 ───────────────────────────────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:markdown|md)?\r?\n(.*?)\r?\n```\s*$").unwrap());

fn strip_markdown_fences(input: &str) -> String {
    match RE_OUTER_FENCES.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

// ── Rules 2–4 ────────────────────────────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").into_owned()
}

// ── Rules 5–6 ────────────────────────────────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        ['\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}'],
        "",
    )
}

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fence_wrapper() {
        let raw = "```markdown\n# Title\n\nBody\n```\n";
        assert_eq!(clean_markdown(raw), "# Title\n\nBody\n");
    }

    #[test]
    fn keeps_inner_code_blocks() {
        let raw = "# T\n\n```rust\nfn main() {}\n```\n\nafter";
        assert_eq!(clean_markdown(raw), "# T\n\n```rust\nfn main() {}\n```\n\nafter\n");
    }

    #[test]
    fn normalises_crlf_and_trailing_space() {
        assert_eq!(clean_markdown("# A  \r\nb\t\r\n"), "# A\nb\n");
    }

    #[test]
    fn collapses_blank_runs() {
        assert_eq!(clean_markdown("a\n\n\n\n\n\nb"), "a\n\n\nb\n");
    }

    #[test]
    fn removes_invisible_characters() {
        assert_eq!(clean_markdown("\u{FEFF}# Ti\u{200B}tle"), "# Title\n");
    }

    #[test]
    fn whitespace_only_stays_empty() {
        assert_eq!(clean_markdown("  \n\r\n\t"), "");
        assert_eq!(clean_markdown("```markdown\n\n```"), "");
    }
}
