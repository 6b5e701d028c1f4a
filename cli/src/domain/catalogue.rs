//! Static catalogue of provisioning steps per project type.

use std::path::{Path, PathBuf};

use crate::domain::project::Project;
use crate::domain::step::{FileSource, Plan, PushDestination, Step};

/// Name the hook is stored under in the hub's `hooks/` directory.
pub const HOOK_FILE_NAME: &str = "post-update";

/// Name of the pushed public key file in `~/.ssh`.
pub const AUTHORIZED_KEYS_FILE_NAME: &str = "authorized_keys";

/// Inputs the catalogue needs besides the project itself.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Root under which `<name>.dev` working copies live (usually `~/sites`).
    pub sites_dir: PathBuf,
    /// Public key to install as the remote `authorized_keys`.
    pub authorized_key: Option<PathBuf>,
}

/// Build the ordered plan for `project`.
#[must_use]
pub fn build_plan(project: &Project, opts: &PlanOptions) -> Plan {
    let name = &project.name;
    let hub = format!("~/private/repos/{name}_hub.git");

    let mut steps = vec![
        Step::RemoteCommand("echo -e '[User]\\nname = Pipi, server girl' > .gitconfig".to_string()),
        Step::RemoteCommand("cd ~/www/www/ && git init".to_string()),
        Step::RemoteCommand("cd ~/www/www/ && touch readme.txt && git add . ".to_string()),
        Step::RemoteCommand(
            "cd ~/www/www/ && git commit -m 'on the beginning was the commit'".to_string(),
        ),
        Step::RemoteCommand(format!(
            "cd ~/private/ && mkdir repos && cd repos && mkdir {name}_hub.git && cd {name}_hub.git && git --bare init"
        )),
        Step::RemoteCommand(format!(
            "cd ~/www/www && git remote add hub {hub} && git push hub master"
        )),
        Step::PushFile {
            source: FileSource::Embedded(project.kind.hook_asset().to_string()),
            destination: PushDestination::GitHooks {
                project: name.clone(),
            },
            file_name: HOOK_FILE_NAME.to_string(),
        },
        Step::RemoteCommand(format!("cd {hub}/hooks && chmod 755 {HOOK_FILE_NAME}")),
    ];

    if let Some(key) = &opts.authorized_key {
        steps.push(Step::RemoteCommand(
            "mkdir -p ~/.ssh && chmod 700 ~/.ssh".to_string(),
        ));
        steps.push(Step::PushFile {
            source: FileSource::Local(key.clone()),
            destination: PushDestination::AuthorizedKeys,
            file_name: AUTHORIZED_KEYS_FILE_NAME.to_string(),
        });
    }

    let local_dir = local_project_dir(&opts.sites_dir, project);
    steps.push(Step::LocalDirSync(local_dir.clone()));
    steps.push(Step::LocalGitClone {
        url: project.hub_url(),
        path: local_dir,
    });

    Plan::new(steps)
}

/// `<sites>/<name>.dev`.
#[must_use]
pub fn local_project_dir(sites_dir: &Path, project: &Project) -> PathBuf {
    sites_dir.join(project.local_dir_name())
}
