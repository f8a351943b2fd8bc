// SPDX-License-Identifier: MIT

//! User-Password de-obfuscation (RFC 2865, spec §4.2).

use super::Md5State;

const AUTH_PASS_LEN: usize = 16;
const MAX_USER_PASSWORD_LEN: usize = 128;

/// De-obfuscates a User-Password value in place.
///
/// `buffer` holds the ciphertext in its first `attr_len` bytes (`attr_len`
/// is truncated to 128 per the RFC maximum) and must have room for a
/// trailing NUL. Returns the `strlen`-equivalent length of the decoded
/// plaintext.
///
/// `attr_len == 0` returns `0` without touching `buffer` beyond writing
/// the terminator — the operation otherwise cannot fail, there being no
/// integrity check defined by the protocol for this field.
pub(crate) fn decode_user_password(
    buffer: &mut [u8],
    attr_len: usize,
    secret: &[u8],
    vector: &[u8; 16],
) -> usize {
    let pwlen = attr_len.min(MAX_USER_PASSWORD_LEN);
    if pwlen == 0 {
        buffer[0] = 0;
        return 0;
    }

    let mut base = Md5State::new();
    base.update(secret);

    // B_0 = MD5(secret || vector)
    let mut keyed = base.copy();
    keyed.update(vector);
    let mut digest = keyed.finalize();

    let mut n = 0usize;
    while n < pwlen {
        let block_len = AUTH_PASS_LEN.min(buffer.len() - n);

        // Key the NEXT block off this block's ciphertext before XOR-ing
        // it into plaintext in place (the cipher is self-synchronizing
        // on ciphertext, same as Tunnel-Password).
        let mut next = base.copy();
        next.update(&buffer[n..n + block_len]);

        for i in 0..block_len {
            buffer[n + i] ^= digest[i];
        }

        n += AUTH_PASS_LEN;
        if n < pwlen {
            digest = next.finalize();
        }
    }

    buffer[pwlen] = 0;
    buffer[..pwlen]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(pwlen)
}
