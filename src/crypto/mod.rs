// SPDX-License-Identifier: MIT

//! The crypto collaborator (spec §6) and the two obfuscation codecs built
//! on it (spec §4.2, §4.3), plus the externally-supplied Ascend-Send-Secret
//! hook (spec §1).

mod ascend;
mod tunnel_password;
mod user_password;

pub use ascend::AscendSecret;
pub use tunnel_password::decode_tunnel_password;
pub use user_password::decode_user_password;

use md5::{Digest, Md5};

/// A resumable MD5 state. Wraps the RustCrypto `md-5` crate's `Digest`
/// trait behind the `init`/`update`/`copy`/`finalize` vocabulary the
/// specification's crypto collaborator uses — `copy` matters because the
/// keying schedules below clone the post-secret digest state per block
/// rather than re-hashing the secret each time.
#[derive(Clone)]
pub(crate) struct Md5State(Md5);

impl Md5State {
    pub(crate) fn new() -> Self {
        Self(Md5::new())
    }

    pub(crate) fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    pub(crate) fn copy(&self) -> Self {
        self.clone()
    }

    pub(crate) fn finalize(self) -> [u8; 16] {
        self.0.finalize().into()
    }
}
