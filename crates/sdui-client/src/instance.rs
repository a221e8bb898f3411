//! Instance ids: `session-<9 base-36 chars>:<app>`.

use std::collections::HashMap;

use rand::Rng;
use sdui_types::INSTANCE_DELIMITER;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LENGTH: usize = 9;

/// Hands out one instance id per app and keeps returning it for the
/// lifetime of the generator.
#[derive(Debug, Default)]
pub struct InstanceIds {
    by_app: HashMap<String, String>,
}

impl InstanceIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_app(&mut self, app: &str) -> String {
        self.by_app
            .entry(app.to_string())
            .or_insert_with(|| format!("{}{}{}", session_id(), INSTANCE_DELIMITER, app))
            .clone()
    }
}

/// `session-` followed by random base-36 characters.
pub fn session_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("session-{}", suffix)
}
