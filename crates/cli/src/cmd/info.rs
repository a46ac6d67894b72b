use anyhow::Result;
use tide_build::platform::{HostInfo, detect};

use crate::output::{print_json, print_stat, print_success, print_warning};

pub fn cmd_info(json: bool) -> Result<()> {
  let host = HostInfo::current();
  let detection = detect(host.as_ref());

  if json {
    return print_json(&serde_json::json!({
      "sysname": host.as_ref().map(|h| h.sysname.as_str()),
      "machine": host.as_ref().map(|h| h.machine.as_str()),
      "platform": detection.map(|d| d.platform),
    }));
  }

  match detection {
    Some(d) => {
      print_success(&format!("Platform: {}", d.platform));
      print_stat("OS", d.platform.os.as_str());
      print_stat("Arch", d.platform.arch.as_str());
    }
    None => print_warning("Could not detect platform."),
  }

  if let Some(host) = host {
    print_stat("Kernel", &host.sysname);
    print_stat("Machine", &host.machine);
  }

  Ok(())
}
