//! Scroll position over the wrapped status lines.

/// Returns `lo` if `value < lo`, `hi` if `value > hi`, else `value`.
///
/// Unlike [`Ord::clamp`] this never panics: when `lo > hi` the lower bound
/// wins, which keeps a corrupt `total_lines` of 0 from producing line 0.
pub fn clamp<T: Ord>(value: T, lo: T, hi: T) -> T {
    value.min(hi).max(lo)
}

/// Directional arrows appended to the rendered line.
///
/// Every variant renders as exactly six characters so the bar does not jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Single-line status; nothing to scroll.
    None,
    /// First line of several.
    Down,
    /// Last line of several.
    Up,
    /// Somewhere in the middle.
    Both,
}

impl Indicator {
    pub const WIDTH: usize = 6;

    pub fn as_str(self) -> &'static str {
        match self {
            Indicator::None => "      ",
            Indicator::Down => " \\/   ",
            Indicator::Up => "    /\\",
            Indicator::Both => " \\/ /\\",
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected line within the current status.
///
/// Lines are 1-based. `1 <= current_line <= total_lines` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    current_line: usize,
    total_lines: usize,
}

impl ScrollState {
    /// Scroll state for a freshly replaced status: first line selected.
    pub fn reset(total_lines: usize) -> Self {
        Self {
            current_line: 1,
            total_lines: total_lines.max(1),
        }
    }

    /// Builds a state from persisted values, clamping anything out of range.
    pub fn from_raw(current_line: i64, total_lines: i64) -> Self {
        let total_lines = total_lines.max(1);
        let current_line = clamp(current_line, 1, total_lines);
        Self {
            current_line: current_line as usize,
            total_lines: total_lines as usize,
        }
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Moves one line towards the start; stays on line 1.
    pub fn line_up(&mut self) {
        self.current_line = clamp(self.current_line.saturating_sub(1), 1, self.total_lines);
    }

    /// Moves one line towards the end; stays on the last line.
    pub fn line_down(&mut self) {
        self.current_line = clamp(self.current_line + 1, 1, self.total_lines);
    }

    /// Replaces `total_lines` with the line count actually stored, keeping the
    /// selection in range. Returns true if anything changed.
    pub fn reconcile(&mut self, stored_lines: usize) -> bool {
        let before = *self;
        self.total_lines = stored_lines.max(1);
        self.current_line = clamp(self.current_line, 1, self.total_lines);
        before != *self
    }

    pub fn indicator(&self) -> Indicator {
        if self.total_lines < 2 {
            Indicator::None
        } else if self.current_line == 1 {
            Indicator::Down
        } else if self.current_line == self.total_lines {
            Indicator::Up
        } else {
            Indicator::Both
        }
    }

    /// Zero-based index of the selected line.
    pub fn line_index(&self) -> usize {
        self.current_line - 1
    }
}
