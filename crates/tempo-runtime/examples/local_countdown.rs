//! Standalone preview of the countdown node
//!
//! Runs without any meeting platform: the node degrades to local-only
//! mode and the countdown just runs. Watch the transitions with
//! `RUST_LOG=debug cargo run --example local_countdown`.

use std::sync::Arc;
use std::time::Duration;

use tempo_host::DetachedHost;
use tempo_runtime::{NodeConfig, TimerNode};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let node = TimerNode::connect(Arc::new(DetachedHost::new()), NodeConfig::default()).await;
    let status = node.status();
    println!(
        "mode: {:?}, control: {}, host: {}",
        status.mode,
        status.has_control,
        status.last_host_error.as_deref().unwrap_or("ok"),
    );

    node.set_from_fields("0", "5");
    node.start();
    println!("countdown started at {}", node.state().clock_face());

    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let status = node.status();
        println!("{} ({:?})", status.clock_face, status.phase);
        if status.remaining == 0 {
            break;
        }
    }
    println!("expired");
}
