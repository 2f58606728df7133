//! Process and environment accessors.
//!
//! Tool handlers never read `std::env` directly; they receive a
//! [`HostEnvironment`] so the same code runs against the live process or a
//! fixed snapshot in tests.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Fallback used when no user or home variable resolves.
pub const UNKNOWN: &str = "unknown";

/// Read-only view of the process and its environment.
pub trait HostEnvironment: Send + Sync {
    /// Operating system name (e.g. `linux`, `macos`, `windows`).
    fn platform(&self) -> String;

    /// Version string of the running server binary.
    fn runtime_version(&self) -> String;

    /// Current process id.
    fn process_id(&self) -> u32;

    /// Time since the server started.
    fn uptime(&self) -> Duration;

    /// Current working directory.
    fn current_dir(&self) -> std::io::Result<PathBuf>;

    /// Look up a single environment variable. A value that is not valid
    /// UTF-8 is still reported, with invalid bytes replaced.
    fn var(&self, name: &str) -> Option<String>;

    /// Names of every environment variable present.
    fn var_names(&self) -> Vec<String>;

    /// Resolve the current user: `USER`, then `USERNAME`, then `unknown`.
    fn user(&self) -> String {
        self.first_var(&["USER", "USERNAME"])
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Resolve the home directory: `HOME`, then `USERPROFILE`, then `unknown`.
    fn home(&self) -> String {
        self.first_var(&["HOME", "USERPROFILE"])
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// First non-empty variable among `names`.
    fn first_var(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| self.var(name))
            .find(|value| !value.is_empty())
    }
}

/// The live process.
#[derive(Debug, Clone)]
pub struct ProcessHost {
    started_at: Instant,
}

impl ProcessHost {
    /// Capture the start instant used for uptime.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Default for ProcessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for ProcessHost {
    fn platform(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn runtime_version(&self) -> String {
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    fn process_id(&self) -> u32 {
        std::process::id()
    }

    fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }

    fn var_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::env::vars_os()
            .map(|(key, _)| key.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// A fixed host snapshot, handy for tests and dry runs.
#[derive(Debug, Clone)]
pub struct StaticHost {
    pub platform: String,
    pub runtime_version: String,
    pub pid: u32,
    pub uptime: Duration,
    pub cwd: Option<PathBuf>,
    pub vars: BTreeMap<String, String>,
}

impl StaticHost {
    /// An empty host with deterministic identity values.
    pub fn new() -> Self {
        Self {
            platform: "testos".to_string(),
            runtime_version: "test-runtime v0.0.0".to_string(),
            pid: 4242,
            uptime: Duration::from_secs(12),
            cwd: Some(PathBuf::from("/srv/app")),
            vars: BTreeMap::new(),
        }
    }

    /// Builder-style variable setter.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Default for StaticHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for StaticHost {
    fn platform(&self) -> String {
        self.platform.clone()
    }

    fn runtime_version(&self) -> String {
        self.runtime_version.clone()
    }

    fn process_id(&self) -> u32 {
        self.pid
    }

    fn uptime(&self) -> Duration {
        self.uptime
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        self.cwd.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "working directory unavailable")
        })
    }

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn var_names(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_fallback_chain() {
        let host = StaticHost::new().with_var("USERNAME", "win-user");
        assert_eq!(host.user(), "win-user");

        let host = host.with_var("USER", "unix-user");
        assert_eq!(host.user(), "unix-user");

        assert_eq!(StaticHost::new().user(), UNKNOWN);
    }

    #[test]
    fn test_home_fallback_chain() {
        let host = StaticHost::new().with_var("USERPROFILE", "C:\\Users\\me");
        assert_eq!(host.home(), "C:\\Users\\me");
        assert_eq!(StaticHost::new().home(), UNKNOWN);
    }

    #[test]
    fn test_empty_value_falls_through() {
        let host = StaticHost::new()
            .with_var("USER", "")
            .with_var("USERNAME", "fallback");
        assert_eq!(host.user(), "fallback");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_host_non_utf8_value_is_set() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let _lock = crate::core::config::tests::ENV_TEST_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("SYSINFO_NON_UTF8_VAR", OsStr::from_bytes(b"caf\xe9"));
        }
        let value = ProcessHost::new().var("SYSINFO_NON_UTF8_VAR");
        unsafe {
            std::env::remove_var("SYSINFO_NON_UTF8_VAR");
        }
        assert_eq!(value.as_deref(), Some("caf\u{FFFD}"));
    }

    #[test]
    fn test_process_host_identity() {
        let host = ProcessHost::new();
        assert_eq!(host.process_id(), std::process::id());
        assert_eq!(host.platform(), std::env::consts::OS);
        assert!(host.runtime_version().contains(env!("CARGO_PKG_VERSION")));
        assert!(host.current_dir().is_ok());
    }
}
