//! Project input: flags first, then validated prompts for anything missing.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::domain::catalogue::{PlanOptions, build_plan};
use crate::domain::project::{
    parse_port, parse_project_kind, validate_host, validate_password, validate_project_name,
};
use crate::domain::{AuthSecret, InputError, Plan, Project, ProjectKind, SiteprepConfig};
use crate::infra::fs::LocalFs;

/// Environment variable holding the SSH password.
pub const PASSWORD_ENV: &str = "SITEPREP_PASSWORD";

/// Environment variable holding the passphrase of `--identity`.
pub const KEY_PASSPHRASE_ENV: &str = "SITEPREP_KEY_PASSPHRASE";

/// Flags describing the project, shared by `provision` and `plan`.
#[derive(Args, Debug, Default)]
pub struct ProjectArgs {
    /// Project name (3-20 letters, digits, '-' or '_')
    #[arg(long)]
    pub name: Option<String>,

    /// Remote hostname, e.g. example.com
    #[arg(long)]
    pub host: Option<String>,

    /// SSH port [default: defaults.port from config]
    #[arg(long)]
    pub port: Option<String>,

    /// Remote login [default: the project name]
    #[arg(long)]
    pub user: Option<String>,

    /// Project type: 1 or yii, 2 or wp
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// Public key to install as the remote ~/.ssh/authorized_keys
    #[arg(long, value_name = "PUB_KEY")]
    pub authorize_key: Option<PathBuf>,
}

/// Build the `Project` from flags, prompting for anything not given.
///
/// # Errors
///
/// Returns an error if a flag is invalid, an input is missing in
/// non-interactive mode, or the prompt fails.
pub fn resolve_project(
    app: &AppContext,
    args: &ProjectArgs,
    default_port: u16,
) -> Result<Project> {
    let name = match &args.name {
        Some(name) => validate_project_name(name)?,
        None => prompt_text(app, "project name", "Project name", validate_project_name)?,
    };
    let host = match &args.host {
        Some(host) => validate_host(host)?,
        None => prompt_text(app, "host", "Hostname (e.g. example.com)", validate_host)?,
    };
    let port = match &args.port {
        Some(port) => parse_port(port, default_port)?,
        None if app.non_interactive => default_port,
        None => prompt_port(default_port)?,
    };
    let kind = match &args.kind {
        Some(kind) => parse_project_kind(kind)?,
        None => prompt_kind(app)?,
    };
    let user = match &args.user {
        Some(user) => validate_project_name(user).map_err(|_| InputError::User)?,
        None => name.clone(),
    };
    Ok(Project {
        name,
        host,
        port,
        user,
        kind,
    })
}

/// Pick the authentication secret: a key file when `identity` is given,
/// otherwise the password from the environment or a hidden prompt.
///
/// # Errors
///
/// Returns an error if the password is invalid, missing in non-interactive
/// mode, or the prompt fails.
pub fn resolve_secret(app: &AppContext, identity: Option<&Path>) -> Result<AuthSecret> {
    if let Some(path) = identity {
        let path = config_service::expand_home(path, &LocalFs)?;
        anyhow::ensure!(path.is_file(), "identity file not found: {}", path.display());
        return Ok(AuthSecret::KeyFile {
            path,
            passphrase: std::env::var(KEY_PASSPHRASE_ENV).ok(),
        });
    }
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(AuthSecret::Password(validate_password(&password)?));
    }
    if app.non_interactive {
        return Err(InputError::Missing("password").into());
    }
    let password = dialoguer::Password::new()
        .with_prompt("SSH password")
        .validate_with(|input: &String| validate_password(input).map(|_| ()))
        .interact()?;
    Ok(AuthSecret::Password(password))
}

/// Build the plan for `project` with the configured sites root.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved or the
/// public key to authorize does not exist.
pub fn plan_for(config: &SiteprepConfig, project: &Project, args: &ProjectArgs) -> Result<Plan> {
    let sites_dir = config_service::sites_dir(config, &LocalFs)?;
    let authorized_key = match &args.authorize_key {
        Some(path) => {
            let path = config_service::expand_home(path, &LocalFs)?;
            anyhow::ensure!(path.is_file(), "public key not found: {}", path.display());
            Some(path)
        }
        None => None,
    };
    Ok(build_plan(
        project,
        &PlanOptions {
            sites_dir,
            authorized_key,
        },
    ))
}

fn prompt_text(
    app: &AppContext,
    what: &'static str,
    prompt: &str,
    parse: fn(&str) -> Result<String, InputError>,
) -> Result<String> {
    if app.non_interactive {
        return Err(InputError::Missing(what).into());
    }
    let raw: String = dialoguer::Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| parse(input).map(|_| ()))
        .interact_text()?;
    Ok(parse(&raw)?)
}

fn prompt_port(default_port: u16) -> Result<u16> {
    let raw: String = dialoguer::Input::new()
        .with_prompt(format!("SSH port (empty for {default_port})"))
        .allow_empty(true)
        .validate_with(|input: &String| parse_port(input, default_port).map(|_| ()))
        .interact_text()?;
    Ok(parse_port(&raw, default_port)?)
}

fn prompt_kind(app: &AppContext) -> Result<ProjectKind> {
    if app.non_interactive {
        return Err(InputError::Missing("project type").into());
    }
    let labels: Vec<&str> = ProjectKind::ALL.iter().map(|k| k.label()).collect();
    let index = dialoguer::Select::new()
        .with_prompt("Project type")
        .items(&labels)
        .default(1)
        .interact()?;
    Ok(ProjectKind::ALL[index])
}
