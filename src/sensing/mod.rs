pub mod loop_worker;
pub mod platform;

use crate::models::ActivitySample;

/// Foreground window identity at sample time. Empty/zero fields mean the OS
/// reported no foreground window or refused the lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForegroundContext {
    pub window_title: String,
    pub pid: u32,
    pub process_name: String,
}

/// The OS-facing readers behind one activity sample.
///
/// Every reader is best-effort: a failed OS query reports the field's
/// documented default (zero idle time, empty context, silent audio) rather
/// than failing the tick.
pub trait HostProbe: Send + Sync {
    /// Seconds since the last global keyboard or mouse input.
    fn idle_seconds(&self) -> f64;

    /// Title, owning pid, and executable base name of the foreground window.
    fn foreground_context(&self) -> ForegroundContext;

    /// Whether any session on the default audio render endpoint is playing.
    fn audio_active(&self) -> bool;

    /// Runs all readers and assembles one fully-computed sample.
    fn sample(&self) -> ActivitySample {
        let idle_time = self.idle_seconds();
        let context = self.foreground_context();
        ActivitySample {
            idle_time,
            window_title: context.window_title,
            audio_playing: self.audio_active(),
            pid: context.pid,
            process_name: context.process_name,
        }
    }
}
