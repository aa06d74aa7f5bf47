//! Root greeting.

use crate::config::ROOT_BODY;

/// Root handler, also installed as the router fallback so every unmatched
/// path gets the greeting.
pub async fn index() -> &'static str {
    ROOT_BODY
}
