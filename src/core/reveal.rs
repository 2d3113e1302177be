/// Character-by-character reveal of a single line.

/// Reveals one line of text a character at a time.
///
/// Knows nothing about advancing or events: it only counts visible characters
/// up to the line's length and reports when it got there.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRevealer {
    line: String,
    total: usize,
    visible: usize,
    interval: f32,
    elapsed: f32,
}

impl TextRevealer {
    /// Start revealing `line` with one character per `interval` seconds.
    /// An interval of zero or less reveals one character per tick, and so
    /// does a NaN or infinite one.
    pub fn new(line: &str, interval: f32) -> Self {
        Self {
            line: line.to_string(),
            total: line.chars().count(),
            visible: 0,
            interval: if interval.is_finite() { interval } else { 0.0 },
            elapsed: 0.0,
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.visible >= self.total
    }

    /// The currently visible prefix of the line.
    pub fn visible_text(&self) -> &str {
        match self.line.char_indices().nth(self.visible) {
            Some((byte, _)) => &self.line[..byte],
            None => &self.line,
        }
    }

    /// Advance by one tick of `dt` seconds. Returns true once the whole line
    /// is visible.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.is_finished() {
            return true;
        }
        if self.interval <= 0.0 {
            self.visible += 1;
        } else {
            self.elapsed += dt.max(0.0);
            while self.elapsed >= self.interval && self.visible < self.total {
                self.elapsed -= self.interval;
                self.visible += 1;
            }
        }
        self.is_finished()
    }

    /// Jump straight to the full line.
    pub fn skip(&mut self) {
        self.visible = self.total;
    }
}
