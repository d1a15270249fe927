#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod comms;
mod launch_control;
mod logger;

use crate::comms::SimLink;
use crate::launch_control::{CommandIssuer, LaunchSequencer, Router};
use std::env;

const SIM_ADDR_DEFAULT: &str = "127.0.0.1:3000";

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let addr_var = env::var("IGNIS_SIM_ADDR");
    let addr = addr_var.as_ref().map_or(SIM_ADDR_DEFAULT, |v| v.as_str());
    let (link, mut feed) = match SimLink::connect(addr).await {
        Ok(pair) => pair,
        Err(e) => fatal!("Simulator link to {addr} failed: {e}"),
    };
    info!("Connected to simulator at {addr}");

    let router = Router::launch_defaults();
    let mut sequencer = LaunchSequencer::new(CommandIssuer::new(link.commands()));
    if let Err(e) = sequencer.begin_oxidizing() {
        fatal!("Launch sequence failed to start: {e}");
    }

    // Single consumer: each handler runs to completion, including any
    // outbound command issuance, before the next frame leaves the queue.
    while let Some(frame) = feed.recv().await {
        match router.route(&frame) {
            Some(route) => {
                if let Err(e) = sequencer.handle(route) {
                    link.shutdown();
                    fatal!("Launch sequence aborted: {e}");
                }
            }
            None => event!("Dropped unrouted frame: {frame:?}"),
        }
    }
    log!("Simulator link closed in phase {}", sequencer.phase());
}
