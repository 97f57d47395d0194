//! Status text command handlers.

use std::num::IntErrorKind;

use anyhow::Result;
use ssstatus_core::controller::StatusController;
use ssstatus_core::store::StateStore;

pub fn set<S: StateStore>(controller: &mut StatusController<S>, text: &str) -> Result<()> {
    controller.set_status_at_configured_width(text)?;
    Ok(())
}

/// Non-integer input is reported and leaves everything untouched.
pub fn set_length<S: StateStore>(controller: &mut StatusController<S>, raw: &str) -> Result<()> {
    let Some(length) = parse_length(raw) else {
        println!("input must be an integer");
        return Ok(());
    };
    controller.set_max_length(length)?;
    Ok(())
}

/// Parses a requested width. Integers too large for `i64` saturate, since
/// the controller clamps them into range anyway.
fn parse_length(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

pub fn clear<S: StateStore>(controller: &mut StatusController<S>) -> Result<()> {
    controller.clear()?;
    Ok(())
}

pub fn show<S: StateStore>(controller: &StatusController<S>) -> Result<()> {
    println!("{}", controller.render_line()?);
    Ok(())
}
