//! # Config Commands

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current console configuration.
///
/// ## When Used
/// - Startup (to pre-fill order forms)
/// - Customer messages (shop name)
/// - Currency formatting
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
