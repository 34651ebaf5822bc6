//! `deck status`: list services or show one service's desired state.

use std::process::ExitCode;

use anyhow::Result;
use deck_common::ServiceStatusOutput;

use crate::app::AppContext;
use crate::application::ports::ServiceCatalog;

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the services directory or the spec cannot be read.
pub fn run(app: &AppContext, service: Option<&str>) -> Result<ExitCode> {
    let catalog = app.catalog();
    let renderer = app.renderer();

    let Some(name) = service else {
        renderer.render_services(&catalog.list()?)?;
        return Ok(ExitCode::SUCCESS);
    };

    let spec = catalog.load(name)?;
    renderer.render_service_status(&ServiceStatusOutput {
        service: spec.name().to_string(),
        desired_target: spec.default_target().to_string(),
        method: spec.method().to_string(),
        healthy: None,
    })?;
    Ok(ExitCode::SUCCESS)
}
