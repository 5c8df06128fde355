//! Secret value generation

use crate::core::SecretValue;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use rand::RngCore;

/// Raw entropy per generated secret, in bytes
pub const SECRET_VALUE_BYTES: usize = 32;

/// Generate a fresh secret value
///
/// Draws exactly [`SECRET_VALUE_BYTES`] bytes from the thread-local CSPRNG
/// (OS-seeded, ChaCha-based) and encodes them as standard base64 for storage
/// as a textual secret. Every call draws fresh entropy; values are never
/// cached or reused across identities.
pub fn generate_secret_value() -> SecretValue {
    let mut bytes = [0u8; SECRET_VALUE_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    SecretValue::new(B64.encode(bytes))
}
