// SPDX-License-Identifier: MIT

//! Tunnel-Password de-obfuscation (RFC 2868, spec §4.3).

use super::Md5State;
use crate::error::{DecodeError, Result};

const AUTH_PASS_LEN: usize = 16;

/// De-obfuscates a Tunnel-Password value in place.
///
/// `passwd` holds, starting at index 0: a 2-byte salt, then ciphertext
/// padded to a multiple of 16 whose first decoded byte is the embedded
/// length. `pwlen` is both the input ciphertext-plus-salt length and,
/// on success, is rewritten to the decoded plaintext length.
///
/// Per spec §4.3 / §9 open question 1: a `pwlen <= 3` attribute (salt
/// plus at most one byte) is tolerated as an empty password even though
/// the embedded-length byte is technically missing or meaningless — this
/// mirrors the reference decoder's wire-compatibility exception rather
/// than treating it as malformed.
pub(crate) fn decode_tunnel_password(
    passwd: &mut [u8],
    pwlen: &mut usize,
    secret: &[u8],
    vector: &[u8; 16],
    tunnel_password_zeros: bool,
) -> Result<()> {
    let total_len = *pwlen;
    if total_len < 2 {
        return Err(DecodeError::DecryptWrongSecret);
    }
    if total_len <= 3 {
        passwd[0] = 0;
        *pwlen = 0;
        return Ok(());
    }

    let encrypted_len = total_len - 2;

    let mut base = Md5State::new();
    base.update(secret);

    // B_1 = MD5(secret || vector || salt)
    let mut keyed = base.copy();
    keyed.update(vector);
    keyed.update(&passwd[0..2]);

    let mut digest = [0u8; 16];
    let mut embedded_len = 0usize;
    let mut n = 0usize;
    while n < encrypted_len {
        let block_len = if n + AUTH_PASS_LEN > encrypted_len {
            encrypted_len - n
        } else {
            AUTH_PASS_LEN
        };

        // `digest` already holds this block's key on entry for n > 0 (it
        // was finalized at the end of the previous iteration); only the
        // first block needs computing here.
        let next_digest = if n == 0 {
            digest = keyed.finalize();

            embedded_len = (passwd[2] ^ digest[0]) as usize;
            if embedded_len > encrypted_len {
                return Err(DecodeError::DecryptWrongSecret);
            }

            let mut next = base.copy();
            next.update(&passwd[2..2 + block_len]);
            next
        } else {
            let mut next = base.copy();
            next.update(&passwd[2 + n..2 + n + block_len]);
            next
        };

        let start_i = if n == 0 { 1 } else { 0 };
        for i in start_i..block_len {
            passwd[n + i - 1] = passwd[n + i + 2] ^ digest[i];
        }

        n += AUTH_PASS_LEN;
        if n < encrypted_len {
            digest = next_digest.finalize();
        }
    }

    if tunnel_password_zeros {
        for i in embedded_len..encrypted_len.saturating_sub(1) {
            if passwd[i] != 0 {
                return Err(DecodeError::DecryptWrongSecret);
            }
        }
    }

    *pwlen = embedded_len;
    passwd[embedded_len] = 0;
    Ok(())
}
