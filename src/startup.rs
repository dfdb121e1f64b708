//! # Login-launch registration.
//!
//! Provides [`AutoStart`] — the seam through which a host application asks
//! whether it is registered to launch at login and toggles that registration
//! — plus [`FileAutoStart`], a marker-file implementation for platforms
//! without a native registry.
//!
//! ## Rules
//! - Queries and toggles are **best-effort**: persistence failures are
//!   logged and swallowed, never surfaced to the caller. A broken registrar
//!   must not take the connection engine down with it.
//! - No registration entry means "disabled"; there is no error state.
//! - `enable()` and `disable()` are idempotent.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

/// Launch-at-login registration seam.
///
/// Implementations back this with whatever the platform offers: a registry
/// run key, a systemd user unit, a LaunchAgent plist, or a plain marker file
/// ([`FileAutoStart`]).
pub trait AutoStart: Send + Sync {
    /// True if the application is currently registered to launch at login.
    fn is_enabled(&self) -> bool;

    /// Registers the application for launch at login. Idempotent;
    /// best-effort.
    fn enable(&self);

    /// Removes the launch-at-login registration. Idempotent; best-effort.
    fn disable(&self);
}

/// Marker-file [`AutoStart`] backend.
///
/// Registration is represented by the existence of a file named after the
/// application inside a per-user directory. The file content is the command
/// line to launch, so external tooling (a login script, a session manager
/// hook) can consume it; the engine itself only checks existence.
pub struct FileAutoStart {
    dir: PathBuf,
    app_name: String,
    command: String,
}

impl FileAutoStart {
    /// Creates a registrar over `dir`, keyed by `app_name`.
    ///
    /// `command` is the launch command written into the marker file on
    /// `enable()`.
    pub fn new(
        dir: impl Into<PathBuf>,
        app_name: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            app_name: app_name.into(),
            command: command.into(),
        }
    }

    fn marker(&self) -> PathBuf {
        self.dir.join(format!("{}.autostart", self.app_name))
    }
}

impl AutoStart for FileAutoStart {
    fn is_enabled(&self) -> bool {
        self.marker().is_file()
    }

    fn enable(&self) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %e, "autostart dir creation failed");
            return;
        }
        if let Err(e) = fs::write(self.marker(), &self.command) {
            warn!(path = %self.marker().display(), error = %e, "autostart enable failed");
        }
    }

    fn disable(&self) {
        match fs::remove_file(self.marker()) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.marker().display(), error = %e, "autostart disable failed");
            }
        }
    }
}
