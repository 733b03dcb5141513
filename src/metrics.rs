//! Space-cost estimation: characters, lines and pages

/// Characters that fit on one rendered line.
pub const CHARS_PER_LINE: usize = 80;

/// Lines that fit on one rendered page.
pub const LINES_PER_PAGE: i64 = 45;

/// Convert a page count to the line budget it grants.
pub fn pages_to_lines(pages: i64) -> i64 {
    pages.saturating_mul(LINES_PER_PAGE)
}

/// Lines needed for a run of `chars` characters (ceiling division).
pub fn chars_to_lines(chars: usize) -> u32 {
    if chars == 0 {
        return 0;
    }
    ((chars + CHARS_PER_LINE - 1) / CHARS_PER_LINE) as u32
}

/// Lines needed to display `text`, accounting for explicit newlines and
/// wrapping. Blank text costs nothing; an empty line inside text still
/// takes one line.
pub fn text_lines(text: &str) -> u32 {
    if text.trim().is_empty() {
        return 0;
    }

    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                1
            } else {
                chars_to_lines(line.chars().count())
            }
        })
        .sum()
}
