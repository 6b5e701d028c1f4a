//! SSH implementation of the remote ports, on top of `russh`.
//!
//! One `SshConnection` per run; each `open_session` opens a fresh exec
//! channel that is closed again when the session is waited on or closed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use russh::client::{self, Handle, Msg};
use russh::keys::known_hosts::{check_known_hosts_path, learn_known_hosts_path};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use russh::{Channel, ChannelMsg, Disconnect};
use tracing::{debug, warn};

use crate::application::ports::{
    MAX_CAPTURED_OUTPUT, RemoteConnection, RemoteConnector, RemoteSession, RemoteStdin,
    SessionOutput,
};
use crate::domain::classify::ExitSignal;
use crate::domain::config::HostKeyPolicy;
use crate::domain::{AuthSecret, Credentials};

// ── Connector ─────────────────────────────────────────────────────────────────

/// Dials hosts over SSH and authenticates with a password or key file.
pub struct SshConnector {
    config: Arc<client::Config>,
    host_keys: HostKeyPolicy,
    /// `None` when there is no home directory to find `~/.ssh/known_hosts` in.
    known_hosts: Option<PathBuf>,
}

impl SshConnector {
    /// Connector checking host keys against `~/.ssh/known_hosts`.
    #[must_use]
    pub fn new(host_keys: HostKeyPolicy) -> Self {
        Self {
            config: Arc::new(client::Config::default()),
            host_keys,
            known_hosts: dirs::home_dir().map(|home| home.join(".ssh").join("known_hosts")),
        }
    }
}

impl RemoteConnector for SshConnector {
    type Connection = SshConnection;

    async fn connect(&self, credentials: &Credentials) -> Result<SshConnection> {
        let verifier = HostKeyVerifier {
            host: credentials.host.clone(),
            port: credentials.port,
            policy: self.host_keys,
            known_hosts: self.known_hosts.clone(),
        };
        let mut handle = client::connect(
            Arc::clone(&self.config),
            (credentials.host.as_str(), credentials.port),
            verifier,
        )
        .await
        .with_context(|| format!("connecting to {}", credentials.address()))?;

        let auth = match &credentials.secret {
            AuthSecret::Password(password) => handle
                .authenticate_password(&credentials.user, password)
                .await
                .context("password authentication")?,
            AuthSecret::KeyFile { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_deref())
                    .with_context(|| format!("loading private key {}", path.display()))?;
                let hash_alg = handle
                    .best_supported_rsa_hash()
                    .await
                    .context("negotiating key signature algorithm")?
                    .flatten();
                handle
                    .authenticate_publickey(
                        &credentials.user,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .context("public key authentication")?
            }
        };
        anyhow::ensure!(
            auth.success(),
            "authentication rejected for user '{}'",
            credentials.user
        );

        debug!(address = %credentials.address(), user = %credentials.user, "ssh connection established");
        Ok(SshConnection { handle })
    }
}

/// Checks the server key against a known_hosts file per the configured policy.
struct HostKeyVerifier {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
    known_hosts: Option<PathBuf>,
}

impl client::Handler for HostKeyVerifier {
    type Error = anyhow::Error;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        if self.policy == HostKeyPolicy::Insecure {
            return Ok(true);
        }
        let known_hosts = self
            .known_hosts
            .as_ref()
            .context("cannot locate ~/.ssh/known_hosts without a home directory")?;
        let known = check_known_hosts_path(&self.host, self.port, server_public_key, known_hosts)
            .with_context(|| format!("host key for {} does not match known_hosts", self.host))?;
        if known {
            return Ok(true);
        }
        if self.policy == HostKeyPolicy::AcceptNew {
            learn_known_hosts_path(&self.host, self.port, server_public_key, known_hosts)
                .context("recording host key in known_hosts")?;
            debug!(host = %self.host, "learned new host key");
            return Ok(true);
        }
        warn!(host = %self.host, "unknown host key rejected (ssh.host_keys = strict)");
        Ok(false)
    }
}

// ── Connection ────────────────────────────────────────────────────────────────

/// Authenticated SSH connection.
pub struct SshConnection {
    handle: Handle<HostKeyVerifier>,
}

impl RemoteConnection for SshConnection {
    type Session = SshSession;

    async fn open_session(&self, command: &str) -> Result<SshSession> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .context("opening session channel")?;
        if let Err(e) = channel.exec(true, command).await {
            if let Err(close_err) = channel.close().await {
                debug!(command, error = %close_err, "closing channel after failed exec");
            }
            return Err(e).context("starting remote command");
        }
        let stdin: RemoteStdin = Box::new(Box::pin(channel.make_writer()));
        debug!(command, "sub-session opened");
        Ok(SshSession {
            channel,
            stdin: Some(stdin),
        })
    }

    async fn close(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
            .context("disconnecting")
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One exec channel.
pub struct SshSession {
    channel: Channel<Msg>,
    stdin: Option<RemoteStdin>,
}

impl RemoteSession for SshSession {
    fn take_stdin(&mut self) -> Option<RemoteStdin> {
        self.stdin.take()
    }

    async fn wait(mut self) -> Result<SessionOutput> {
        // Dropping a channel writer sends no EOF, so an untaken stdin is ended here.
        if self.stdin.take().is_some() {
            if let Err(e) = self.channel.eof().await {
                debug!(error = %e, "sending eof");
            }
        }
        let mut output = SessionOutput::default();
        // Exit status may arrive after EOF, so only a close ends the loop.
        while let Some(msg) = self.channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => append_bounded(&mut output.stdout, data),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => {
                    append_bounded(&mut output.stderr, data);
                }
                ChannelMsg::ExitStatus { exit_status } => output.exit_status = Some(exit_status),
                ChannelMsg::ExitSignal {
                    signal_name,
                    error_message,
                    ..
                } => {
                    output.exit_signal = Some(ExitSignal {
                        name: format!("{signal_name:?}"),
                        message: error_message,
                    });
                }
                ChannelMsg::Close => break,
                _ => {}
            }
        }
        if let Err(e) = self.channel.close().await {
            debug!(error = %e, "closing session channel");
        }
        debug!(exit_status = ?output.exit_status, "sub-session closed");
        Ok(output)
    }

    async fn close(self) -> Result<()> {
        self.channel.close().await.context("closing session channel")
    }
}

/// Append `data` to `buf`, keeping at most [`MAX_CAPTURED_OUTPUT`] bytes.
fn append_bounded(buf: &mut Vec<u8>, data: &[u8]) {
    let room = MAX_CAPTURED_OUTPUT.saturating_sub(buf.len());
    buf.extend_from_slice(&data[..data.len().min(room)]);
}
