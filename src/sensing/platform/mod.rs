#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsProbe as NativeProbe;

// Stub for development on other platforms: every reader reports its
// documented empty/zero default.
#[cfg(not(target_os = "windows"))]
pub struct NativeProbe;

#[cfg(not(target_os = "windows"))]
impl NativeProbe {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_os = "windows"))]
impl Default for NativeProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "windows"))]
impl super::HostProbe for NativeProbe {
    fn idle_seconds(&self) -> f64 {
        0.0
    }

    fn foreground_context(&self) -> super::ForegroundContext {
        super::ForegroundContext::default()
    }

    fn audio_active(&self) -> bool {
        false
    }
}
