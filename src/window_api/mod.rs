//! Detection of an already running instance through the window list of the desktop.
//! [GenericInstanceGuard] is the main artifact of this module, it picks whatever backend the
//! build supports and falls back to [NoopGuard] otherwise.

#[cfg(feature = "win")]
pub mod win;
#[cfg(feature = "x11")]
pub mod x11;

#[cfg(feature = "win")]
extern crate windows;

#[cfg(feature = "x11")]
extern crate xcb;

use anyhow::Result;

use crate::utils::constants::WINDOW_TITLE;

/// Best-effort check for a visible instance of the application. Two processes starting at the
/// same instant can both pass it.
#[cfg_attr(test, mockall::automock)]
pub trait InstanceGuard {
    /// Returns `true` when another instance already shows its window. Failures of the platform
    /// are reported as `false`.
    fn is_running(&self) -> bool;
}

/// Checks window names one by one. A window that can't be read, for example one closed in the
/// middle of the scan, is skipped.
#[cfg_attr(not(feature = "x11"), allow(dead_code))]
pub(crate) fn contains_title(names: impl IntoIterator<Item = Result<String>>, title: &str) -> bool {
    names.into_iter().any(|name| match name {
        Ok(name) => name == title,
        Err(e) => {
            tracing::debug!("Skipping unreadable window {e:?}");
            false
        }
    })
}

/// Used where windows can't be enumerated. Never reports a running instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGuard;

impl InstanceGuard for NoopGuard {
    fn is_running(&self) -> bool {
        false
    }
}

/// Serves as a cross-compatible InstanceGuard implementation.
pub struct GenericInstanceGuard {
    inner: Box<dyn InstanceGuard>,
}

impl GenericInstanceGuard {
    /// Looks for windows titled [WINDOW_TITLE].
    pub fn new() -> Self {
        Self::with_title(WINDOW_TITLE)
    }

    pub fn with_title(title: &str) -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "win")] {
                use win::WindowsInstanceGuard;
                Self {
                    inner: Box::new(WindowsInstanceGuard::new(title)),
                }
            }
            else if #[cfg(feature = "x11")] {
                use x11::X11InstanceGuard;
                match X11InstanceGuard::new(title) {
                    Ok(guard) => Self {
                        inner: Box::new(guard),
                    },
                    Err(e) => {
                        tracing::debug!("Window list is unavailable, skipping check {e:?}");
                        Self::fallback()
                    }
                }
            }
            else {
                tracing::debug!("No window backend, skipping instance check for {title:?}");
                Self::fallback()
            }
        }
    }

    #[allow(dead_code)]
    fn fallback() -> Self {
        Self {
            inner: Box::new(NoopGuard),
        }
    }
}

impl Default for GenericInstanceGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceGuard for GenericInstanceGuard {
    fn is_running(&self) -> bool {
        self.inner.is_running()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::{contains_title, InstanceGuard, NoopGuard};

    #[test]
    fn noop_guard_never_reports_an_instance() {
        assert!(!NoopGuard.is_running());
    }

    #[cfg(not(any(feature = "win", feature = "x11")))]
    #[test]
    fn generic_guard_degrades_without_backend() {
        use super::GenericInstanceGuard;

        assert!(!GenericInstanceGuard::new().is_running());
    }

    #[test]
    fn generic_guard_ignores_unknown_titles() {
        let guard =
            super::GenericInstanceGuard::with_title("drops-miner test window that does not exist");
        assert!(!guard.is_running());
    }

    #[test]
    fn unreadable_window_does_not_hide_a_match() {
        let names = vec![
            Ok("Terminal".to_string()),
            Err(anyhow!("BadWindow")),
            Ok("Drops Miner".to_string()),
        ];
        assert!(contains_title(names, "Drops Miner"));
    }

    #[test]
    fn no_match_among_readable_windows() {
        let names = vec![Err(anyhow!("BadWindow")), Ok("Drops Miner v0".to_string())];
        assert!(!contains_title(names, "Drops Miner"));
        assert!(!contains_title(Vec::new(), "Drops Miner"));
    }
}
