//! Setup command handler.

use anyhow::{Context, Result};
use ssstatus_core::config::paths::Paths;
use ssstatus_core::controller::StatusController;
use ssstatus_core::logging;
use ssstatus_core::store::StateStore;

pub fn run<S: StateStore>(controller: &mut StatusController<S>, paths: &Paths) -> Result<()> {
    controller
        .setup()
        .with_context(|| format!("setup ssstatus in {}", paths.home.display()))?;
    logging::reset(&paths.log())?;
    Ok(())
}
