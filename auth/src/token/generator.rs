use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::TokenError;

/// Generator for opaque one-time keys.
///
/// Tokens are raw bytes from the operating system CSPRNG encoded as URL-safe
/// base64 without padding, so they can travel in paths and query strings
/// untouched. No state is kept between calls.
#[derive(Debug, Clone, Copy)]
pub struct TokenGenerator {
    byte_length: usize,
}

impl TokenGenerator {
    /// Bytes of randomness per token by default (256 bits).
    pub const DEFAULT_BYTES: usize = 32;

    /// Create a generator producing 256-bit tokens.
    pub fn new() -> Self {
        Self {
            byte_length: Self::DEFAULT_BYTES,
        }
    }

    /// Produce a fresh token.
    ///
    /// # Returns
    /// URL-safe token string
    ///
    /// # Errors
    /// * `RandomSourceFailed` - The OS random source could not be read
    pub fn generate(&self) -> Result<String, TokenError> {
        let mut bytes = vec![0u8; self.byte_length];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::RandomSourceFailed(e.to_string()))?;

        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
