// SPDX-License-Identifier: MIT

//! The `Ascend-Send-Secret` / `Ascend-Receive-Secret` obfuscation
//! primitive (spec §1): referenced only by name in the specification,
//! its definition is provided externally by the caller.

/// Implemented by callers who need `ASCEND_SECRET`-flagged attributes
/// decoded. Mirrors the shape of the upstream `fr_radius_ascend_secret`
/// routine: given the request authenticator, the shared secret and the
/// attribute's ciphertext, produce the 16-byte plaintext.
pub trait AscendSecret: Send + Sync {
    fn apply(&self, vector: &[u8; 16], secret: &[u8], ciphertext: &[u8]) -> [u8; 16];
}
