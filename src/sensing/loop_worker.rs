use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::HostProbe;

/// Fixed delay between samples. The consumer's cadence assumptions are built
/// around this value, so it is not configurable from the outside.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(2000);

pub struct LoopConfig {
    pub interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval: SAMPLE_INTERVAL,
        }
    }
}

/// Samples the host on a fixed cadence until the token is cancelled, writing
/// one encoded record line to `out` per successful cycle.
///
/// A cycle that fails for any reason logs one diagnostic line and emits
/// nothing; the next cycle starts on schedule regardless.
pub async fn sampling_loop<P, W>(
    probe: Arc<P>,
    mut out: W,
    config: LoopConfig,
    cancel_token: CancellationToken,
) where
    P: HostProbe + 'static,
    W: Write + Send,
{
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = run_cycle(&probe, &mut out).await {
                    error!("sample cycle failed: {err:#}");
                }
            }
            _ = cancel_token.cancelled() => {
                info!("sampling loop shutting down");
                break;
            }
        }
    }
}

async fn run_cycle<P, W>(probe: &Arc<P>, out: &mut W) -> Result<()>
where
    P: HostProbe + 'static,
    W: Write,
{
    let worker = Arc::clone(probe);
    // The readers are plain blocking OS calls; running them on a worker
    // thread also confines a panicking reader to its own cycle.
    let sample = tokio::task::spawn_blocking(move || worker.sample())
        .await
        .context("sample worker failed")?;

    let line = sample.encode().context("sample encoding failed")?;
    writeln!(out, "{line}").context("record write failed")?;
    out.flush().context("record flush failed")?;
    Ok(())
}
