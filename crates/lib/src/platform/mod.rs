pub mod arch;
pub mod detect;
pub mod os;

pub use arch::Arch;
pub use os::Os;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use detect::{Detection, HostInfo, detect};

/// Platform descriptor combining OS and architecture (e.g., "linux-x86_64")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub os: Os,
  pub arch: Arch,
}

impl Platform {
  /// Create a new platform descriptor
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Detect the platform of the running host
  ///
  /// Returns `None` if the host kernel is not one Tide builds on
  pub fn current() -> Option<Self> {
    detect(HostInfo::current().as_ref()).map(|d| d.platform)
  }

  pub fn is_linux(&self) -> bool {
    self.os == Os::Linux
  }

  pub fn is_osx(&self) -> bool {
    self.os == Os::Osx
  }

  pub fn is_win32(&self) -> bool {
    self.os == Os::Win32
  }

  pub fn is_64(&self) -> bool {
    self.arch.is_64()
  }

  pub fn is_32(&self) -> bool {
    !self.is_64()
  }

  /// Returns the platform triple string (e.g., "osx-x86")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.os, self.arch)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}
