use log::{debug, warn};
use windows::core::PWSTR;
use windows::Win32::Foundation::{CloseHandle, MAX_PATH};
use windows::Win32::Media::Audio::{
    eConsole, eRender, AudioSessionStateActive, IAudioSessionManager2, IMMDeviceEnumerator,
    MMDeviceEnumerator,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_MULTITHREADED,
};
use windows::Win32::System::SystemInformation::GetTickCount;
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId,
};

use crate::sensing::{ForegroundContext, HostProbe};

pub struct WindowsProbe;

impl WindowsProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for WindowsProbe {
    fn idle_seconds(&self) -> f64 {
        let mut last_input = LASTINPUTINFO {
            cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
            dwTime: 0,
        };
        if unsafe { GetLastInputInfo(&mut last_input) }.is_err() {
            return 0.0;
        }
        // The tick counter wraps every ~49.7 days; wrapping subtraction keeps
        // the same unsigned arithmetic the counter is defined over.
        let elapsed_ms = unsafe { GetTickCount() }.wrapping_sub(last_input.dwTime);
        f64::from(elapsed_ms) / 1000.0
    }

    fn foreground_context(&self) -> ForegroundContext {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.is_invalid() {
            return ForegroundContext::default();
        }

        // 255 visible characters plus the terminator.
        let mut buffer = [0u16; 256];
        let len = unsafe { GetWindowTextW(hwnd, &mut buffer) };
        let window_title = String::from_utf16_lossy(&buffer[..len.max(0) as usize]);

        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };

        ForegroundContext {
            window_title,
            pid,
            process_name: resolve_process_name(pid),
        }
    }

    fn audio_active(&self) -> bool {
        match any_render_session_active() {
            Ok(active) => active,
            Err(err) => {
                debug!("audio session query failed, reporting silence: {err}");
                false
            }
        }
    }
}

/// Resolves a pid to the lower-cased base name of its executable, or an empty
/// string when the process cannot be opened with query-limited rights.
fn resolve_process_name(pid: u32) -> String {
    if pid == 0 {
        return String::new();
    }

    let handle = match unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) } {
        Ok(handle) => handle,
        Err(err) => {
            warn!("could not open process {pid}: {err}");
            return String::new();
        }
    };

    let mut buffer = [0u16; MAX_PATH as usize];
    let mut len = buffer.len() as u32;
    let queried = unsafe {
        QueryFullProcessImageNameW(handle, PROCESS_NAME_WIN32, PWSTR(buffer.as_mut_ptr()), &mut len)
    };
    let _ = unsafe { CloseHandle(handle) };

    match queried {
        Ok(()) => {
            let path = String::from_utf16_lossy(&buffer[..len as usize]);
            let name = path
                .rsplit(['\\', '/'])
                .next()
                .unwrap_or(path.as_str())
                .to_lowercase();
            debug!("resolved process {name} (pid {pid}, path {path})");
            name
        }
        Err(err) => {
            warn!("could not query image path for pid {pid}: {err}");
            String::new()
        }
    }
}

/// Pairs CoInitializeEx with CoUninitialize around exactly one audio query.
struct ComGuard;

impl ComGuard {
    fn init() -> windows::core::Result<Self> {
        unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) }.ok()?;
        Ok(Self)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

/// True iff any session on the default render endpoint is actively playing.
///
/// Each COM interface in the chain releases itself on drop, so every return
/// path (first active session, exhausted enumeration, or a failed acquisition
/// step) unwinds the enumerator/device/manager chain completely.
fn any_render_session_active() -> windows::core::Result<bool> {
    let _com = ComGuard::init()?;
    unsafe {
        let enumerator: IMMDeviceEnumerator =
            CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)?;
        let device = enumerator.GetDefaultAudioEndpoint(eRender, eConsole)?;
        let manager: IAudioSessionManager2 = device.Activate(CLSCTX_ALL, None)?;
        let sessions = manager.GetSessionEnumerator()?;

        for index in 0..sessions.GetCount()? {
            let Ok(session) = sessions.GetSession(index) else {
                continue;
            };
            if session
                .GetState()
                .is_ok_and(|state| state == AudioSessionStateActive)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
