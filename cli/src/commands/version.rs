//! Version command

use crate::app::AppContext;
use crate::output::human::HumanRenderer;

/// Run the version command.
pub fn run(app: &AppContext) {
    let version = env!("CARGO_PKG_VERSION");

    if app.is_json() {
        app.output.json(&serde_json::json!({ "version": version }).to_string());
    } else {
        HumanRenderer::new(&app.output).render_version(version);
    }
}
