//! Registers a Spotify account with a Spotizerr server.
//!
//! A Spotify Connect responder captures a reusable credential blob from a
//! Spotify client on the local network; the blob is then uploaded to
//! Spotizerr together with an account name and region. See [`run`] for the
//! full sequence.

use std::future::Future;

use log::info;

pub mod account;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod register;
pub mod request;
pub mod spotify;

pub use account::{AccountName, Region};
pub use config::Settings;
pub use error::AuthError;
pub use prompt::{Prompt, TerminalPrompt};
pub use request::SpotizerrClient;
pub use spotify::connect::ConnectCapture;
pub use spotify::{CredentialFile, SessionCapture};

/// Runs the whole interactive flow: server check, account details, session
/// capture and registration.
///
/// `interrupt` resolves when the user asks to stop. Before registration that
/// ends the run straight away; once the credentials are being sent, the
/// offer to delete the local file is still made before returning
/// [`AuthError::Cancelled`].
pub async fn run<P, C, I>(
    settings: &Settings,
    prompt: &mut P,
    capture: &C,
    interrupt: I,
) -> Result<(), AuthError>
where
    P: Prompt + ?Sized,
    C: SessionCapture + ?Sized,
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);

    let pending = tokio::select! {
        pending = prepare(settings, prompt, capture) => pending?,
        _ = &mut interrupt => return Err(AuthError::Cancelled),
    };

    let registered = register::register_account(
        &pending.client,
        prompt,
        &pending.file,
        &pending.account,
        &pending.region,
        interrupt,
    )
    .await?;
    if !registered {
        return Err(AuthError::RegistrationFailed);
    }

    Ok(())
}

/// Everything needed to send the registration.
struct PendingRegistration {
    client: SpotizerrClient,
    account: AccountName,
    region: Region,
    file: CredentialFile,
}

async fn prepare<P, C>(
    settings: &Settings,
    prompt: &mut P,
    capture: &C,
) -> Result<PendingRegistration, AuthError>
where
    P: Prompt + ?Sized,
    C: SessionCapture + ?Sized,
{
    let input = prompt
        .ask(&format!(
            "Enter the base URL of your Spotizerr instance [default: {}]",
            settings.default_base_url
        ))
        .await?;
    if input.trim().is_empty() {
        info!("Using default base URL: {}", settings.default_base_url);
    }
    let base_url = config::normalize_base_url(&input, &settings.default_base_url);
    let client = SpotizerrClient::new(&base_url)?;

    if !bootstrap::ensure_api_credentials(&client, prompt).await? {
        return Err(AuthError::ApiConfigUnavailable);
    }

    let account = AccountName::parse(
        &prompt
            .ask("Enter a name for this Spotify account")
            .await?,
    )?;
    let region = Region::parse(
        &prompt
            .ask("Enter your Spotify region (e.g., US, DE, MX). This is the 2-letter country code")
            .await?,
    )?;

    let file = CredentialFile::in_dir(&settings.credentials_dir);
    if file.exists() {
        let question = format!(
            "'{}' already exists. Overwrite it by connecting to Spotify?",
            file.path().display()
        );
        if prompt.confirm(&question).await? {
            capture.capture(&file).await?;
        } else {
            info!("Using existing '{}'.", file.path().display());
        }
    } else {
        capture.capture(&file).await?;
    }

    if !file.exists() {
        return Err(AuthError::CredentialsMissing {
            path: file.path().to_path_buf(),
        });
    }

    Ok(PendingRegistration {
        client,
        account,
        region,
        file,
    })
}
