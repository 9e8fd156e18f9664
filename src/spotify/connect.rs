//! Session capture through a Spotify Connect discovery responder.
//!
//! The responder advertises this machine on the local network. When another
//! device transfers playback to it, librespot hands over a set of credentials,
//! a session is authenticated with them and the credential cache stores the
//! reusable credentials in `credentials.json`. The capture loop only watches
//! for that file to appear.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use console::style;
use futures::StreamExt;
use librespot_core::authentication::Credentials;
use librespot_core::cache::Cache;
use librespot_core::config::{DeviceType, SessionConfig};
use librespot_core::session::Session;
use librespot_discovery::Discovery;
use log::{debug, info, warn};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{CredentialFile, SessionCapture};
use crate::error::AuthError;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Captures a session with a librespot discovery responder.
#[derive(Debug, Clone)]
pub struct ConnectCapture {
    device_name: String,
    poll_interval: Duration,
}

impl ConnectCapture {
    pub fn new(device_name: &str) -> ConnectCapture {
        ConnectCapture {
            device_name: device_name.to_string(),
            poll_interval: POLL_INTERVAL,
        }
    }
}

#[async_trait(?Send)]
impl SessionCapture for ConnectCapture {
    async fn capture(&self, file: &CredentialFile) -> Result<(), AuthError> {
        wait_for_credentials(file, self.poll_interval, |dir| {
            ConnectResponder::start(&self.device_name, dir)
        })
        .await
    }
}

/// The network-facing half of a capture. Dropping it must stop advertising
/// the device.
#[async_trait(?Send)]
pub trait Responder {
    fn device_name(&self) -> &str;

    /// Waits for a Spotify client to hand over credentials and logs in with
    /// them. Returns `false` once no further handovers can arrive.
    async fn accept(&mut self) -> bool;

    /// Username of the last authenticated session.
    fn username(&self) -> Option<String>;
}

/// Clears out the old credential file, starts a responder on its directory
/// and checks the file every `poll_interval` until it has content.
///
/// The responder lives only as long as this future, so it is released
/// however the wait ends, including when the future is dropped.
pub async fn wait_for_credentials<R, F>(
    file: &CredentialFile,
    poll_interval: Duration,
    start: F,
) -> Result<(), AuthError>
where
    R: Responder,
    F: FnOnce(&Path) -> Result<R, AuthError>,
{
    if file.exists() {
        info!("Removing existing '{}'", file.path().display());
    }
    file.remove_stale()?;

    let mut responder = start(file.dir())?;

    info!(
        "Spotify Connect device '{}' is now available on your network.",
        style(responder.device_name()).cyan()
    );
    info!(
        "Please open Spotify on another device, and {}.",
        style("transfer playback to it").bold()
    );
    info!(
        "This will capture your session and save it as '{}'.",
        file.path().display()
    );

    let mut poll = interval_at(Instant::now() + poll_interval, poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // A login in progress must survive poll ticks, so the accept future is
    // only recreated once it has finished.
    'wait: loop {
        let accept = responder.accept();
        tokio::pin!(accept);
        loop {
            tokio::select! {
                _ = poll.tick() => {
                    if file.is_ready() {
                        break 'wait;
                    }
                }
                accepted = &mut accept => {
                    if !accepted {
                        return Err(AuthError::Responder(
                            "discovery stopped before a session was captured".to_string(),
                        ));
                    }
                    break;
                }
            }
        }
    }

    info!("'{}' has been created.", style(file.path().display()).green());
    if let Some(username) = responder.username() {
        info!("Session captured for user: {}", style(username).green());
    }
    Ok(())
}

/// A running discovery responder plus the session it authenticated, if any.
///
/// Dropping the responder shuts the session down and stops advertising the
/// device.
pub struct ConnectResponder {
    device_name: String,
    discovery: Discovery,
    session_config: SessionConfig,
    cache: Cache,
    session: Option<Session>,
}

impl ConnectResponder {
    pub fn start(device_name: &str, credentials_dir: &Path) -> Result<ConnectResponder, AuthError> {
        let session_config = SessionConfig::default();

        let cache = Cache::new(Some(credentials_dir), None, None, None)
            .map_err(|e| AuthError::Responder(format!("credential cache: {e}")))?;

        let discovery = Discovery::builder(
            session_config.device_id.clone(),
            session_config.client_id.clone(),
        )
        .name(device_name.to_string())
        .device_type(DeviceType::Computer)
        .launch()
        .map_err(|e| AuthError::Responder(format!("could not start discovery: {e}")))?;

        debug!("Discovery responder started for device id {}", session_config.device_id);

        Ok(ConnectResponder {
            device_name: device_name.to_string(),
            discovery,
            session_config,
            cache,
            session: None,
        })
    }

    /// Authenticates with credentials handed over by a Spotify client. The
    /// credential cache writes the reusable credentials on success.
    async fn login(&mut self, credentials: Credentials) {
        if let Some(previous) = self.session.take() {
            previous.shutdown();
        }

        let session = Session::new(self.session_config.clone(), Some(self.cache.clone()));
        match session.connect(credentials, true).await {
            Ok(()) => {
                debug!("Spotify Connect session authenticated");
                self.session = Some(session);
            }
            Err(e) => warn!("Spotify Connect login failed, waiting for another attempt: {e}"),
        }
    }
}

#[async_trait(?Send)]
impl Responder for ConnectResponder {
    fn device_name(&self) -> &str {
        &self.device_name
    }

    async fn accept(&mut self) -> bool {
        match self.discovery.next().await {
            Some(credentials) => {
                self.login(credentials).await;
                true
            }
            None => false,
        }
    }

    fn username(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(Session::username)
            .filter(|name| !name.is_empty())
    }
}

impl Drop for ConnectResponder {
    fn drop(&mut self) {
        info!("Shutting down Spotify Connect server...");
        if let Some(session) = self.session.take() {
            session.shutdown();
        }
    }
}
