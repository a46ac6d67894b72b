mod env;
mod info;
mod thirdparty;
mod vars;

pub use env::cmd_env;
pub use info::cmd_info;
pub use thirdparty::{cmd_thirdparty, target_platform};
pub use vars::cmd_vars;
