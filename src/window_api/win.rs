use tracing::{debug, instrument};
use windows::{
    core::{HSTRING, PCWSTR},
    Win32::UI::WindowsAndMessaging::FindWindowW,
};

use super::InstanceGuard;

/// Finds top-level windows by their exact title.
pub struct WindowsInstanceGuard {
    title: HSTRING,
}

impl WindowsInstanceGuard {
    pub fn new(title: &str) -> Self {
        Self {
            title: HSTRING::from(title),
        }
    }
}

impl InstanceGuard for WindowsInstanceGuard {
    #[instrument(skip(self))]
    fn is_running(&self) -> bool {
        // Any class name matches when it's null.
        let window = unsafe { FindWindowW(PCWSTR::null(), PCWSTR(self.title.as_ptr())) };
        match window {
            Ok(window) => !window.is_invalid(),
            Err(e) => {
                debug!("No window titled {} {e:?}", self.title);
                false
            }
        }
    }
}
