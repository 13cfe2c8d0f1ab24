//! Credential-expiry countdown: token parsing and the countdown tracker.

pub mod token;
pub mod tracker;

pub use token::{amz_properties, TokenExpiry};
pub use tracker::{ChannelSink, Clock, ExpirySignal, ExpirySink, ExpiryTracker, SystemClock};

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

/// Track a raw token on the terminal, printing the remaining validity each
/// second until it expires.
pub async fn watch(token: &str) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut tracker = ExpiryTracker::new(Arc::new(SystemClock), Arc::new(ChannelSink(tx)));

    tracker.set_token(token);
    if !tracker.is_active() {
        println!("Token carries no usable expiry parameters (X-Amz-Date / X-Amz-Expires).");
        return Ok(());
    }

    while let Some(signal) = rx.recv().await {
        match signal {
            ExpirySignal::Percent(percent) => println!("{:6.2}% remaining", percent),
            ExpirySignal::Expired => {
                println!("Token expired.");
                break;
            }
        }
    }

    Ok(())
}
