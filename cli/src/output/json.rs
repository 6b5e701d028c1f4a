//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed object.

use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::domain::{Plan, Project, ProvisionReport, Step, StepOutcome};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format the plan that would run for `project`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_plan(project: &Project, plan: &Plan) -> Result<String> {
    let steps: Vec<Value> = plan
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| step_json(index, step))
        .collect();
    let obj = json!({
        "project": project_json(project),
        "steps": steps,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format the result of a provisioning run.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(project: &Project, report: &ProvisionReport) -> Result<String> {
    let steps: Vec<Value> = report
        .records
        .iter()
        .map(|record| {
            let mut obj = step_json(record.index, &record.step);
            let (outcome, detail) = match &record.outcome {
                StepOutcome::Success => ("success", Value::Null),
                StepOutcome::IgnoredFailure(reason) => ("ignored", json!(reason.to_string())),
                StepOutcome::FatalFailure(err) => ("fatal", json!(err.to_string())),
            };
            obj["outcome"] = json!(outcome);
            obj["detail"] = detail;
            obj
        })
        .collect();
    let failure = report.failure.as_ref().map(|err| {
        json!({
            "code": err.code(),
            "message": err.to_string(),
        })
    });
    let obj = json!({
        "project": project_json(project),
        "state": report.state.as_str(),
        "steps": steps,
        "failure": failure,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

fn project_json(project: &Project) -> Value {
    json!({
        "name": project.name,
        "host": project.host,
        "port": project.port,
        "user": project.user,
        "type": project.kind.label(),
    })
}

fn step_json(index: usize, step: &Step) -> Value {
    json!({
        "index": index,
        "kind": step.kind(),
        "action": step.to_string(),
    })
}
