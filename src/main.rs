use std::io;
use std::sync::Arc;

use activity_probe::sensing::loop_worker::{sampling_loop, LoopConfig};
use activity_probe::sensing::platform::NativeProbe;
use chrono::Local;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    log::info!(
        "activity probe started at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    // The supervisor stops the probe by killing the process; the token only
    // exists as the loop's shutdown seam and is never cancelled here.
    sampling_loop(
        Arc::new(NativeProbe::new()),
        io::stdout(),
        LoopConfig::default(),
        CancellationToken::new(),
    )
    .await;
}
