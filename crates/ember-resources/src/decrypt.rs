//! Decrypt hook contract and scoped ownership of decrypted buffers.

use std::borrow::Cow;
use std::ops::Deref;

use crate::error::{ResourceError, ResourceResult};
use crate::services::FileSource;

/// Caller-supplied transform from encrypted bytes to plaintext.
///
/// Return `Cow::Borrowed` (the input or a slice of it) when no new buffer is
/// needed, `Cow::Owned` when the plaintext lives in a fresh allocation, and
/// `None` when the data cannot be decrypted.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use ember_resources::DecryptFn;
///
/// fn xor_decrypt(data: &[u8]) -> Option<Cow<'_, [u8]>> {
///     Some(Cow::Owned(data.iter().map(|b| b ^ 0x5a).collect()))
/// }
///
/// let hook: DecryptFn = xor_decrypt;
/// assert_eq!(hook(&[0x5a]).as_deref(), Some(&[0u8][..]));
/// ```
pub type DecryptFn = for<'a> fn(&'a [u8]) -> Option<Cow<'a, [u8]>>;

/// Plaintext produced from a raw buffer, borrowing it when possible.
///
/// A pass-through result shares the raw allocation and releases nothing of
/// its own; a distinct result owns its buffer and releases it exactly once.
#[derive(Debug)]
pub struct DecryptedBytes<'a> {
    bytes: Cow<'a, [u8]>,
}

impl<'a> DecryptedBytes<'a> {
    /// Apply `decrypt` to `raw`, or pass `raw` through when there is no hook.
    ///
    /// Returns `None` if the hook fails.
    pub fn decrypt(raw: &'a [u8], decrypt: Option<DecryptFn>) -> Option<Self> {
        let bytes = match decrypt {
            Some(hook) => hook(raw)?,
            None => Cow::Borrowed(raw),
        };
        Some(Self { bytes })
    }

    /// Returns true if the plaintext shares the raw buffer.
    pub fn is_passthrough(&self) -> bool {
        matches!(self.bytes, Cow::Borrowed(_))
    }

    /// The plaintext bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Deref for DecryptedBytes<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Read `path`, decrypt it and hand the plaintext to `consume`.
///
/// Both buffers are dropped before this returns, on success and on every
/// error path.
pub fn with_decrypted_file<R>(
    files: &dyn FileSource,
    path: &str,
    decrypt: Option<DecryptFn>,
    consume: impl FnOnce(&DecryptedBytes<'_>) -> ResourceResult<R>,
) -> ResourceResult<R> {
    let raw = files.read_all(path)?;
    let plain = DecryptedBytes::decrypt(&raw, decrypt).ok_or_else(|| ResourceError::DecryptFailed {
        name: path.to_string(),
    })?;

    tracing::trace!(
        "decrypted '{}': {} -> {} bytes{}",
        path,
        raw.len(),
        plain.len(),
        if plain.is_passthrough() { " (pass-through)" } else { "" }
    );

    consume(&plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(data: &[u8]) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Borrowed(data))
    }

    fn strip_header(data: &[u8]) -> Option<Cow<'_, [u8]>> {
        data.strip_prefix(b"ENC").map(Cow::Borrowed)
    }

    fn xor(data: &[u8]) -> Option<Cow<'_, [u8]>> {
        Some(Cow::Owned(data.iter().map(|b| b ^ 0xff).collect()))
    }

    #[test]
    fn test_no_hook_is_passthrough() {
        let raw = vec![1u8, 2, 3];
        let plain = DecryptedBytes::decrypt(&raw, None).unwrap();

        assert!(plain.is_passthrough());
        assert_eq!(plain.as_bytes(), &[1, 2, 3]);
        assert_eq!(plain.as_ptr(), raw.as_ptr());
    }

    #[test]
    fn test_identity_hook_shares_raw_buffer() {
        let raw = vec![9u8; 16];
        let plain = DecryptedBytes::decrypt(&raw, Some(identity)).unwrap();

        assert!(plain.is_passthrough());
        assert_eq!(plain.as_ptr(), raw.as_ptr());
    }

    #[test]
    fn test_slicing_hook_borrows() {
        let raw = b"ENCpayload".to_vec();
        let plain = DecryptedBytes::decrypt(&raw, Some(strip_header)).unwrap();

        assert!(plain.is_passthrough());
        assert_eq!(&*plain, b"payload");
    }

    #[test]
    fn test_transforming_hook_owns_new_buffer() {
        let raw = vec![0x00u8, 0x0f];
        let plain = DecryptedBytes::decrypt(&raw, Some(xor)).unwrap();

        assert!(!plain.is_passthrough());
        assert_eq!(plain.as_bytes(), &[0xff, 0xf0]);
        assert_ne!(plain.as_ptr(), raw.as_ptr());
    }

    #[test]
    fn test_failing_hook() {
        let raw = b"plain".to_vec();
        assert!(DecryptedBytes::decrypt(&raw, Some(strip_header)).is_none());
    }
}
