use anyhow::Result;
use ssstatus_core::controller::StatusController;
use ssstatus_core::store::StateStore;

pub fn up<S: StateStore>(controller: &mut StatusController<S>) -> Result<()> {
    let state = controller.line_up()?;
    tracing::debug!(line = state.current_line(), "scrolled up");
    Ok(())
}

pub fn down<S: StateStore>(controller: &mut StatusController<S>) -> Result<()> {
    let state = controller.line_down()?;
    tracing::debug!(line = state.current_line(), "scrolled down");
    Ok(())
}
