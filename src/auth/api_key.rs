//! API key generation
//!
//! Keys are short base-36 strings stored in the `security` section of the
//! system settings document and shown to administrators in the dashboard.

use rand::Rng;

/// Length of a generated API key
const API_KEY_LEN: usize = 13;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a new API key (13 lowercase alphanumeric characters)
pub fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    (0..API_KEY_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
