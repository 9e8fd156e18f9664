use std::process;

use log::{error, info, warn};
use spotizerr_auth::{logging, run, ConnectCapture, Settings, TerminalPrompt};

#[tokio::main]
async fn main() {
    logging::init();

    let settings = Settings::from_env();
    let capture = ConnectCapture::new(&settings.device_name);
    let mut prompt = TerminalPrompt;

    match run(&settings, &mut prompt, &capture, ctrl_c()).await {
        Ok(()) => process::exit(0),
        Err(e) if e.is_cancellation() => {
            info!("Operation cancelled by user. Exiting.");
            process::exit(0)
        }
        Err(e) => {
            error!("{:#}", anyhow::Error::from(e));
            process::exit(1)
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
