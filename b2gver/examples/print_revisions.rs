//! Print the revisions of the first attached device.
//!
//! Usage: cargo run --example print_revisions [serial]

use std::sync::Arc;

use b2gver::{AdbConfig, AdbTransport, RevisionResolver};

#[tokio::main]
async fn main() -> Result<(), b2gver::Error> {
    env_logger::init();

    let mut config = AdbConfig::default();
    if let Some(serial) = std::env::args().nth(1) {
        config = config.with_serial(serial);
    }

    let transport = Arc::new(AdbTransport::with_config(config));
    let resolver = RevisionResolver::new(transport);

    match resolver.gecko_revision().await {
        Ok(revision) => println!("gecko: {revision}"),
        Err(err) => eprintln!("gecko revision unavailable: {err}"),
    }

    match resolver.gaia_revision().await {
        Ok(revision) => println!("gaia:  {revision}"),
        Err(err) => eprintln!("gaia revision unavailable: {err}"),
    }

    Ok(())
}
