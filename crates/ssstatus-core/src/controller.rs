//! Status and scroll operations over a [`StateStore`].
//!
//! Each method is one complete read/modify/write sequence; callers are
//! expected to hold the lock for its duration. Missing or invalid config
//! values are logged and replaced by their defaults, never returned as errors.

use anyhow::Result;

use crate::config::{self, ConfigKey, ConfigValue, MaxLength};
use crate::reflow::{count_lines, join_lines, reflow};
use crate::scroll::ScrollState;
use crate::store::StateStore;

/// Width used by `clear`, regardless of the configured `max_length`.
pub const CLEAR_WIDTH: usize = 10;

/// Status text written by `setup`.
pub const SETUP_STATUS: &str = "setup complete\n";

pub struct StatusController<S: StateStore> {
    store: S,
}

impl<S: StateStore> StatusController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the status with `text` wrapped at `max_length`.
    ///
    /// Resets the selection to line 1 and returns the new scroll state.
    pub fn set_status(&mut self, text: &str, max_length: usize) -> Result<ScrollState> {
        let stored = join_lines(&reflow(text, max_length.max(MaxLength::MIN)));
        let state = ScrollState::reset(count_lines(&stored));

        self.store.write_status(&stored)?;
        self.store.write_config(&[
            (ConfigKey::CurrentLine, state.current_line() as i64),
            (ConfigKey::TotalLines, state.total_lines() as i64),
        ])?;

        tracing::debug!(
            total_lines = state.total_lines(),
            max_length,
            "status replaced"
        );
        Ok(state)
    }

    /// Replaces the status, wrapping at the configured `max_length`.
    pub fn set_status_at_configured_width(&mut self, text: &str) -> Result<ScrollState> {
        let max_length = self.max_length()?;
        self.set_status(text, max_length.get())
    }

    /// Stores a new `max_length` and re-wraps the existing status with it.
    pub fn set_max_length(&mut self, requested: i64) -> Result<ScrollState> {
        let max_length = MaxLength::clamped(requested);
        self.store
            .write_config(&[(ConfigKey::MaxLength, max_length.get() as i64)])?;

        let existing = self.store.read_status()?;
        self.set_status(&existing, max_length.get())
    }

    pub fn clear(&mut self) -> Result<ScrollState> {
        self.set_status("", CLEAR_WIDTH)
    }

    pub fn line_up(&mut self) -> Result<ScrollState> {
        self.move_selection(ScrollState::line_up)
    }

    pub fn line_down(&mut self) -> Result<ScrollState> {
        self.move_selection(ScrollState::line_down)
    }

    fn move_selection(&mut self, step: fn(&mut ScrollState)) -> Result<ScrollState> {
        let mut state = self.scroll_state()?;
        step(&mut state);
        self.store
            .write_config(&[(ConfigKey::CurrentLine, state.current_line() as i64)])?;
        Ok(state)
    }

    /// Renders the selected line followed by its six-character indicator.
    ///
    /// Read-only. If the stored status has a different line count than the
    /// config says (for example after the status file was edited by hand),
    /// the stored line count wins for this render.
    pub fn render_line(&self) -> Result<String> {
        let status = self.store.read_status()?;
        let mut state = self.scroll_state()?;

        let stored_lines = count_lines(&status);
        if stored_lines != state.total_lines() && state.reconcile(stored_lines) {
            tracing::warn!(
                stored_lines,
                "total_lines does not match the status file, using the status file"
            );
        }

        let line = status.split('\n').nth(state.line_index()).unwrap_or_default();
        Ok(format!("{line}{}", state.indicator()))
    }

    /// Overwrites status and config with their initial contents.
    pub fn setup(&mut self) -> Result<()> {
        self.store
            .reset(SETUP_STATUS, &config::default_config_text())
    }

    /// Reads `max_length`, clamped into range.
    pub fn max_length(&self) -> Result<MaxLength> {
        Ok(MaxLength::clamped(self.config_int(ConfigKey::MaxLength)?))
    }

    /// Reads the persisted scroll state, clamped into range.
    pub fn scroll_state(&self) -> Result<ScrollState> {
        let current_line = self.config_int(ConfigKey::CurrentLine)?;
        let total_lines = self.config_int(ConfigKey::TotalLines)?;
        Ok(ScrollState::from_raw(current_line, total_lines))
    }

    fn config_int(&self, key: ConfigKey) -> Result<i64> {
        let n = match self.store.config_value(key)? {
            ConfigValue::Int(n) => n,
            ConfigValue::Invalid(raw) => {
                tracing::warn!("error in {key} configuration ({raw:?}), using default value");
                key.default_value()
            }
            ConfigValue::Missing => {
                tracing::warn!("{key} configuration not found, using default value");
                key.default_value()
            }
        };
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};

    fn controller() -> StatusController<MemoryStore> {
        let mut controller = StatusController::new(MemoryStore::new());
        controller.setup().unwrap();
        controller
    }

    fn config(controller: &StatusController<MemoryStore>, key: ConfigKey) -> ConfigValue {
        controller.store().config_value(key).unwrap()
    }

    #[test]
    fn test_setup_initial_state() {
        let controller = controller();
        assert_eq!(controller.store().status(), "setup complete\n");
        assert_eq!(controller.max_length().unwrap().get(), 80);
        assert_eq!(controller.render_line().unwrap(), "setup complete      ");
    }

    #[test]
    fn test_set_status_wraps_and_resets() {
        let mut controller = controller();
        let state = controller
            .set_status("hello world this is a test", 10)
            .unwrap();

        assert_eq!(controller.store().status(), "hello\nworld\nthis is a\ntest\n");
        assert_eq!(state.total_lines(), 4);
        assert_eq!(state.current_line(), 1);
        assert_eq!(config(&controller, ConfigKey::TotalLines), ConfigValue::Int(4));
        assert_eq!(config(&controller, ConfigKey::CurrentLine), ConfigValue::Int(1));
    }

    #[test]
    fn test_set_status_resets_selection() {
        let mut controller = controller();
        controller.set_status("a b c", 2).unwrap();
        controller.line_down().unwrap();
        controller.line_down().unwrap();

        let state = controller.set_status("x y", 2).unwrap();
        assert_eq!(state.current_line(), 1);
        assert_eq!(state.total_lines(), 2);
    }

    #[test]
    fn test_set_status_uses_configured_width() {
        let mut controller = controller();
        controller.set_max_length(6).unwrap();
        let state = controller
            .set_status_at_configured_width("ab cd ef")
            .unwrap();

        assert_eq!(controller.store().status(), "ab cd\nef\n");
        assert_eq!(state.total_lines(), 2);
    }

    #[test]
    fn test_set_status_with_missing_max_length_uses_default() {
        let mut controller = StatusController::new(MemoryStore::new());
        let text = "word ".repeat(30);
        let state = controller.set_status_at_configured_width(&text).unwrap();

        // At width 80 a line holds 16 words (79 chars), so 30 words need 2 lines.
        assert_eq!(state.total_lines(), 2);
    }

    #[test]
    fn test_total_lines_matches_stored_line_count() {
        let mut controller = controller();
        for text in ["", "one", "one two three four five six", "a\n\nb\n  \nc"] {
            let state = controller.set_status(text, 4).unwrap();
            assert_eq!(
                state.total_lines(),
                count_lines(controller.store().status()),
                "text {text:?}"
            );
        }
    }

    #[test]
    fn test_clear_stores_single_empty_line() {
        let mut controller = controller();
        controller.set_status("a b c d e f", 1).unwrap();

        let state = controller.clear().unwrap();
        assert_eq!(controller.store().status(), "\n");
        assert_eq!(state.total_lines(), 1);
        assert_eq!(controller.render_line().unwrap(), "      ");
    }

    #[test]
    fn test_clear_keeps_configured_max_length() {
        let mut controller = controller();
        controller.set_max_length(33).unwrap();
        controller.clear().unwrap();
        assert_eq!(controller.max_length().unwrap().get(), 33);
    }

    #[test]
    fn test_set_max_length_rewraps_existing_status() {
        let mut controller = controller();
        controller.set_status("alpha beta gamma delta", 40).unwrap();
        controller.line_down().unwrap();

        let state = controller.set_max_length(5).unwrap();
        assert_eq!(
            controller.store().status(),
            "alpha\nbeta\ngamma\ndelta\n"
        );
        assert_eq!(state.current_line(), 1);
        assert_eq!(state.total_lines(), 4);
        assert_eq!(config(&controller, ConfigKey::MaxLength), ConfigValue::Int(5));
    }

    #[test]
    fn test_set_max_length_clamps() {
        let mut controller = controller();
        controller.set_max_length(0).unwrap();
        assert_eq!(controller.max_length().unwrap().get(), 1);
        controller.set_max_length(50_000).unwrap();
        assert_eq!(controller.max_length().unwrap().get(), 10_000);
    }

    #[test]
    fn test_widening_keeps_existing_breaks() {
        let mut controller = controller();
        controller.set_status("aa bb cc", 3).unwrap();
        let state = controller.set_max_length(80).unwrap();
        assert_eq!(controller.store().status(), "aa\nbb\ncc\n");
        assert_eq!(state.total_lines(), 3);
    }

    #[test]
    fn test_scrolling_and_indicators() {
        let mut controller = controller();
        controller.set_status("one\ntwo\nthree", 80).unwrap();

        assert_eq!(controller.render_line().unwrap(), "one \\/   ");

        controller.line_down().unwrap();
        assert_eq!(controller.render_line().unwrap(), "two \\/ /\\");

        controller.line_down().unwrap();
        assert_eq!(controller.render_line().unwrap(), "three    /\\");

        let state = controller.line_down().unwrap();
        assert_eq!(state.current_line(), 3);

        controller.line_up().unwrap();
        assert_eq!(controller.render_line().unwrap(), "two \\/ /\\");
    }

    #[test]
    fn test_line_up_at_first_line_stays() {
        let mut controller = controller();
        controller.set_status("one\ntwo", 80).unwrap();
        let state = controller.line_up().unwrap();
        assert_eq!(state.current_line(), 1);
        assert_eq!(config(&controller, ConfigKey::CurrentLine), ConfigValue::Int(1));
    }

    #[test]
    fn test_invalid_config_values_fall_back_to_defaults() {
        let store = MemoryStore::new()
            .with_status("only line\n")
            .with_value(ConfigKey::CurrentLine, ConfigValue::Invalid("two".into()))
            .with_value(ConfigKey::MaxLength, ConfigValue::Invalid("wide".into()));
        let controller = StatusController::new(store);

        assert_eq!(controller.max_length().unwrap(), MaxLength::default());
        assert_eq!(controller.scroll_state().unwrap(), ScrollState::reset(1));
        assert_eq!(controller.render_line().unwrap(), "only line      ");
    }

    #[test]
    fn test_out_of_range_max_length_is_clamped_on_read() {
        let store = MemoryStore::new().with_value(ConfigKey::MaxLength, ConfigValue::Int(0));
        let controller = StatusController::new(store);
        assert_eq!(controller.max_length().unwrap().get(), 1);
    }

    #[test]
    fn test_render_reconciles_with_hand_edited_status() {
        // Config claims 5 lines and line 4 selected; the status only has 2.
        let store = MemoryStore::new()
            .with_status("first\nsecond\n")
            .with_value(ConfigKey::CurrentLine, ConfigValue::Int(4))
            .with_value(ConfigKey::TotalLines, ConfigValue::Int(5));
        let controller = StatusController::new(store);

        assert_eq!(controller.render_line().unwrap(), "second    /\\");
    }

    #[test]
    fn test_render_empty_status_file() {
        let controller = StatusController::new(MemoryStore::new());
        assert_eq!(controller.render_line().unwrap(), "      ");
    }

    #[test]
    fn test_up_and_down_use_persisted_state() {
        let store = MemoryStore::new()
            .with_status("a\nb\nc\n")
            .with_value(ConfigKey::CurrentLine, ConfigValue::Int(2))
            .with_value(ConfigKey::TotalLines, ConfigValue::Int(3));
        let mut controller = StatusController::new(store);

        assert_eq!(controller.line_down().unwrap().current_line(), 3);
        assert_eq!(controller.line_down().unwrap().current_line(), 3);
        assert_eq!(controller.line_up().unwrap().current_line(), 2);
    }

    #[test]
    fn test_broken_max_length_does_not_reset_scrolling() {
        let dir = tempfile::tempdir().unwrap();
        let paths = config::paths::Paths::new(dir.path());
        let mut store = FileStore::new(paths.clone());
        store
            .reset("a\nb\nc\n", "max_length=abc\ncurrent_line=2\ntotal_lines=3\n")
            .unwrap();
        let mut controller = StatusController::new(store);

        assert_eq!(controller.max_length().unwrap(), MaxLength::default());
        assert_eq!(controller.render_line().unwrap(), "b \\/ /\\");

        let state = controller.line_down().unwrap();
        assert_eq!(state.current_line(), 3);
        assert_eq!(state.total_lines(), 3);
        assert_eq!(
            std::fs::read_to_string(paths.config()).unwrap(),
            "max_length=abc\ncurrent_line=3\ntotal_lines=3\n"
        );
    }
}
