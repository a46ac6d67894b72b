//! Host platform detection.
//!
//! Detection is split in two: [`HostInfo::current`] reads what the kernel
//! reports, and [`detect`] maps that report onto a [`Platform`] without
//! touching the host, so every branch can be exercised from tests.

use tracing::debug;

use super::Platform;
use super::arch::Arch;
use super::os::Os;

/// Kernel name and machine type as reported by `uname(2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
  pub sysname: String,
  pub machine: String,
}

impl HostInfo {
  pub fn new(sysname: impl Into<String>, machine: impl Into<String>) -> Self {
    Self {
      sysname: sysname.into(),
      machine: machine.into(),
    }
  }

  /// Query the running kernel.
  ///
  /// Returns `None` where no kernel introspection is available (Windows).
  #[cfg(unix)]
  pub fn current() -> Option<Self> {
    let uname = rustix::system::uname();
    Some(Self {
      sysname: uname.sysname().to_string_lossy().into_owned(),
      machine: uname.machine().to_string_lossy().into_owned(),
    })
  }

  #[cfg(not(unix))]
  pub fn current() -> Option<Self> {
    None
  }

  fn reports(&self, kernel: &str) -> bool {
    self.sysname.contains(kernel)
  }
}

/// Outcome of a successful detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
  pub platform: Platform,
  /// Windows builds pin `PROCESSOR_ARCHITECTURE=x86` for every tool they spawn.
  pub force_x86_processor: bool,
}

/// Map a host report onto a platform.
///
/// A missing report is treated as Windows. Kernel names are matched by
/// substring in a fixed order: `CYGWIN`, `Darwin`, `Linux`. Anything else
/// yields `None`.
pub fn detect(host: Option<&HostInfo>) -> Option<Detection> {
  let detection = match host {
    None => windows(),
    Some(host) if host.reports("CYGWIN") => windows(),
    Some(host) if host.reports("Darwin") => Detection {
      platform: Platform::new(Os::Osx, Arch::X86),
      force_x86_processor: false,
    },
    Some(host) if host.reports("Linux") => {
      let arch = if host.machine == "x86_64" { Arch::X86_64 } else { Arch::X86 };
      Detection {
        platform: Platform::new(Os::Linux, arch),
        force_x86_processor: false,
      }
    }
    Some(host) => {
      debug!(sysname = %host.sysname, "unrecognized kernel name");
      return None;
    }
  };

  Some(detection)
}

fn windows() -> Detection {
  Detection {
    platform: Platform::new(Os::Win32, Arch::X86),
    force_x86_processor: true,
  }
}
