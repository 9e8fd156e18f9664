use console::style;
use log::{error, info, warn};

use crate::error::AuthError;
use crate::prompt::Prompt;
use crate::request::{ApiConfig, RequestError, SpotizerrClient};

const DASHBOARD_URL: &str = "https://developer.spotify.com/dashboard";

/// Makes sure the Spotizerr server has Spotify API client credentials,
/// offering to upload them when it doesn't.
///
/// Returns `Ok(false)` when the server is unreachable, answers with an error,
/// or the credentials stay unconfigured. Only a cancelled prompt is an `Err`.
pub async fn ensure_api_credentials<P>(
    client: &SpotizerrClient,
    prompt: &mut P,
) -> Result<bool, AuthError>
where
    P: Prompt + ?Sized,
{
    info!("Checking Spotizerr server for Spotify API configuration...");

    let config = match client.api_config().await {
        Ok(config) => config,
        Err(e) => {
            report(client, &e);
            return Ok(false);
        }
    };

    if config.is_configured() {
        info!(
            "{}",
            style("Spotizerr API credentials are already configured.").green()
        );
        return Ok(true);
    }

    warn!(
        "{}",
        style("Spotizerr server is missing Spotify API credentials (client_id/client_secret).")
            .yellow()
    );
    warn!("You can get these from the Spotify Developer Dashboard: {DASHBOARD_URL}");

    if !prompt.confirm("Do you want to configure them now?").await? {
        info!("Please configure the API credentials on your Spotizerr server before proceeding.");
        return Ok(false);
    }

    let client_id = prompt.ask("Enter your Spotify client_id").await?;
    let client_secret = prompt.ask("Enter your Spotify client_secret").await?;
    let (client_id, client_secret) = (client_id.trim(), client_secret.trim());

    if client_id.is_empty() || client_secret.is_empty() {
        error!(
            "{}",
            style("Both client_id and client_secret must be provided.").red()
        );
        return Ok(false);
    }

    match client
        .put_api_config(&ApiConfig::new(client_id, client_secret))
        .await
    {
        Ok(()) => {
            info!("Successfully configured Spotizerr API credentials.");
            Ok(true)
        }
        Err(e) => {
            report(client, &e);
            Ok(false)
        }
    }
}

fn report(client: &SpotizerrClient, err: &RequestError) {
    error!(
        "Failed to communicate with Spotizerr API at {}: {err}",
        client.api_config_url()
    );
    err.log_details();
    error!("Please ensure your Spotizerr instance is running and accessible at the specified URL.");
}
