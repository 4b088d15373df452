use crate::font::FontSpec;
use crate::measure::TextMeasurer;
use crate::units::Px;
use unicode_segmentation::UnicodeSegmentation;

/// Limits applied when wrapping a block of text
#[derive(Debug, Clone, PartialEq)]
pub struct WrapOptions {
    /// The widest a line may measure
    pub max_width: Px,
    /// The most lines to produce. Text beyond this is cut off and the last line
    /// ends with `ellipsis`
    pub max_lines: usize,
    /// Appended to the last line when text is cut off
    pub ellipsis: String,
}

impl WrapOptions {
    pub fn new(max_width: Px) -> WrapOptions {
        WrapOptions {
            max_width,
            max_lines: 20,
            ellipsis: "…".to_string(),
        }
    }

    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn ellipsis<S: ToString>(mut self, ellipsis: S) -> Self {
        self.ellipsis = ellipsis.to_string();
        self
    }
}

/// Split text into user-perceived characters (extended grapheme clusters)
pub fn split_graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// Shorten `text` to at most `max` graphemes. Text that is too long keeps its first
/// `max - 1` graphemes followed by `marker`.
pub fn truncate_graphemes(text: &str, max: usize, marker: &str) -> String {
    if split_graphemes(text).count() <= max {
        return text.to_string();
    }
    let mut short: String = split_graphemes(text)
        .take(max.saturating_sub(1))
        .collect();
    short.push_str(marker);
    short
}

fn is_blank(token: &str) -> bool {
    token.chars().all(char::is_whitespace)
}

/// Split a paragraph into alternating runs of whitespace and non-whitespace,
/// in order. Runs never split a grapheme cluster.
fn tokens(paragraph: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, g) in paragraph.grapheme_indices(true) {
        let space = g.starts_with(char::is_whitespace);
        if in_space.is_some_and(|s| s != space) {
            tokens.push(&paragraph[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < paragraph.len() {
        tokens.push(&paragraph[start..]);
    }
    tokens
}

struct Wrapper<'a, M: ?Sized> {
    measurer: &'a M,
    font: &'a FontSpec,
    max_width: Px,
    limit: usize,
    lines: Vec<String>,
}

impl<M: TextMeasurer + ?Sized> Wrapper<'_, M> {
    fn fits(&self, text: &str) -> bool {
        self.measurer.width(self.font, text) <= self.max_width
    }

    fn full(&self) -> bool {
        self.lines.len() >= self.limit
    }

    /// End the current line, dropping its trailing whitespace. A line that is
    /// nothing but whitespace is discarded.
    fn flush(&mut self, current: &mut String) {
        let line = current.trim_end();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        current.clear();
    }

    fn paragraph(&mut self, paragraph: &str) {
        let start = self.lines.len();
        let mut current = String::new();

        for token in tokens(paragraph) {
            if self.full() {
                return;
            }

            let candidate = format!("{current}{token}");
            if self.fits(&candidate) {
                current = candidate;
                continue;
            }

            if is_blank(token) {
                // a whitespace run is always a valid break; it never starts a line
                self.flush(&mut current);
            } else if self.fits(token) {
                self.flush(&mut current);
                current.push_str(token);
            } else {
                // the token can't fit on any line by itself, break it between graphemes
                for g in split_graphemes(token) {
                    let candidate = format!("{current}{g}");
                    if self.fits(&candidate) {
                        current = candidate;
                        continue;
                    }
                    self.flush(&mut current);
                    if self.full() {
                        return;
                    }
                    current.push_str(g);
                }
            }
        }

        if self.full() {
            return;
        }
        self.flush(&mut current);

        // a blank paragraph still takes up a line
        if self.lines.len() == start {
            self.lines.push(String::new());
        }
    }
}

/// Append `ellipsis` to `line`, first dropping trailing graphemes until the result
/// fits in `max_width`. If even the bare ellipsis is too wide it is returned anyway.
fn ellipsize<M: TextMeasurer + ?Sized>(
    measurer: &M,
    font: &FontSpec,
    line: &str,
    ellipsis: &str,
    max_width: Px,
) -> String {
    let mut kept: Vec<&str> = split_graphemes(line).collect();
    loop {
        let candidate = format!("{}{ellipsis}", kept.concat());
        if kept.is_empty() || measurer.width(font, &candidate) <= max_width {
            return candidate;
        }
        kept.pop();
    }
}

/// Greedily wrap `text` into lines no wider than `options.max_width`.
///
/// # Wrapping Behavior
///
/// * Text is split into paragraphs on newlines (`\n`, `\r\n` or `\r`). Every
///   paragraph starts a new line; an empty paragraph becomes an empty line.
/// * Within a paragraph, runs of whitespace and runs of non-whitespace are
///   packed onto the current line while the line still fits. Whitespace inside
///   a line is kept as-is, trailing whitespace is trimmed, and no wrapped line
///   starts with whitespace.
/// * A run that is wider than `max_width` on its own is broken between grapheme
///   clusters. A single cluster wider than `max_width` gets a line to itself and
///   is the only way a line can exceed the limit.
/// * If the text needs more than `options.max_lines` lines, exactly `max_lines`
///   are returned and the last one ends with `options.ellipsis`.
///
/// Empty text produces no lines.
pub fn wrap<M: TextMeasurer + ?Sized>(
    measurer: &M,
    font: &FontSpec,
    text: &str,
    options: &WrapOptions,
) -> Vec<String> {
    if text.is_empty() || options.max_lines == 0 {
        return Vec::new();
    }

    // normalize newlines
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    // wrapping one line past the limit tells us whether anything got cut off
    let mut wrapper = Wrapper {
        measurer,
        font,
        max_width: options.max_width,
        limit: options.max_lines.saturating_add(1),
        lines: Vec::new(),
    };
    for paragraph in text.split('\n') {
        if wrapper.full() {
            break;
        }
        wrapper.paragraph(paragraph);
    }

    let mut lines = wrapper.lines;
    if lines.len() > options.max_lines {
        lines.truncate(options.max_lines);
        if let Some(last) = lines.last_mut() {
            *last = ellipsize(measurer, font, last, &options.ellipsis, options.max_width);
        }
    }

    log::trace!(
        "wrapped {} bytes into {} lines at {}",
        text.len(),
        lines.len(),
        options.max_width
    );
    lines
}
