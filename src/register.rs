use std::future::Future;

use console::style;
use log::{error, info, warn};

use crate::account::{AccountName, Region};
use crate::error::AuthError;
use crate::prompt::Prompt;
use crate::request::SpotizerrClient;
use crate::spotify::CredentialFile;

/// Sends the captured credential blob to Spotizerr under `account`.
///
/// Whatever the server answers, and also when `interrupt` fires while the
/// call is in flight, the user is then asked once whether the local
/// credential file should be deleted. Returns whether the registration call
/// succeeded; a missing or malformed credential file is an `Err`, and an
/// interrupted call ends in [`AuthError::Cancelled`] after the cleanup offer.
pub async fn register_account<P, I>(
    client: &SpotizerrClient,
    prompt: &mut P,
    file: &CredentialFile,
    account: &AccountName,
    region: &Region,
    interrupt: I,
) -> Result<bool, AuthError>
where
    P: Prompt + ?Sized,
    I: Future<Output = ()>,
{
    let blob = file.read_json()?;

    info!(
        "Registering account '{}' to Spotizerr at '{}'",
        account,
        client.account_url(account)
    );

    let outcome = tokio::select! {
        result = client.register_account(account, region, &blob) => Some(result),
        _ = interrupt => None,
    };

    let registered = match &outcome {
        Some(Ok(body)) => {
            info!(
                "{}",
                style("Successfully registered/updated Spotify account in Spotizerr!").green()
            );
            if !body.is_empty() {
                info!("Response from server: {body}");
            }
            true
        }
        Some(Err(e)) => {
            error!("Failed to call Spotizerr API: {e}");
            e.log_details();
            false
        }
        None => {
            warn!("Registration interrupted before Spotizerr answered.");
            false
        }
    };

    offer_cleanup(prompt, file).await?;

    match outcome {
        Some(_) => Ok(registered),
        None => Err(AuthError::Cancelled),
    }
}

async fn offer_cleanup<P>(prompt: &mut P, file: &CredentialFile) -> Result<(), AuthError>
where
    P: Prompt + ?Sized,
{
    let name = file.path().display();
    if prompt
        .confirm(&format!("Do you want to delete '{name}' now?"))
        .await?
    {
        match file.delete() {
            Ok(()) => info!("'{name}' deleted."),
            Err(e) => error!("Error deleting '{name}': {e}"),
        }
    } else {
        info!("'{name}' not deleted.");
    }
    Ok(())
}
