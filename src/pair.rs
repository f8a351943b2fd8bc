// SPDX-License-Identifier: MIT

//! Decoded pairs and the decoder context (spec §3), plus the top-level
//! pair decoder (spec §4.10, component 10).

use std::sync::Arc;

use crate::crypto::AscendSecret;
use crate::dict::{AttributeDescriptor, Dictionary};
use crate::dispatch;
use crate::error::{DecodeError, Result};
use crate::value::{Value, ValuePrimitive};

/// A decoded attribute value (spec §3). Once appended to the caller's
/// output sequence, a pair is never mutated.
#[derive(Debug, Clone)]
pub struct Pair {
    pub descriptor: Arc<AttributeDescriptor>,
    pub value: Value,
    /// 0 when absent; otherwise in `1..=31`.
    pub tag: u8,
    pub tainted: bool,
}

/// 16-byte RADIUS request authenticator / keying vector.
pub type Vector = [u8; 16];

/// Shared decode-time state (spec §3): the shared secret, the request
/// authenticator, and behavior switches that don't belong on the
/// dictionary.
#[derive(Clone)]
pub struct DecoderContext {
    pub secret: Vec<u8>,
    pub vector: Vector,
    pub tunnel_password_zeros: bool,
    /// The `Ascend-Send-Secret` primitive (spec §1), referenced only by
    /// name in the specification; supplied externally. `None` causes any
    /// attribute demanding this obfuscation to be demoted to raw.
    pub ascend_secret: Option<Arc<dyn AscendSecret>>,
}

impl DecoderContext {
    pub fn new(secret: Vec<u8>, vector: Vector) -> Self {
        Self {
            secret,
            vector,
            tunnel_password_zeros: false,
            ascend_secret: None,
        }
    }
}

/// Consumes exactly one top-level RFC-format attribute (1-byte type,
/// 1-byte length, value) from `packet[offset..]` and appends zero or more
/// decoded pairs to `out`.
///
/// Returns the number of bytes consumed: `2` for a silently-ignored
/// empty attribute, or `2 + value_bytes_consumed` otherwise (which may
/// exceed the header's declared length when reassembly looked ahead).
pub fn decode_pair(
    out: &mut Vec<Pair>,
    dict: &dyn Dictionary,
    values: &dyn ValuePrimitive,
    packet: &[u8],
    offset: usize,
    ctx: Option<&DecoderContext>,
) -> Result<usize> {
    let data_len = packet.len() - offset;
    if data_len < 2 || packet[offset + 1] < 2 || (packet[offset + 1] as usize) > data_len {
        return Err(DecodeError::InsufficientData(
            "attribute header missing or length out of range",
        ));
    }

    let root = dict.root();
    let attr_id = packet[offset] as u32;
    let da = dict
        .child_by_num(&root, attr_id)
        .unwrap_or_else(|| dict.unknown_from_fields(&root, 0, attr_id));

    if data_len == 2 {
        // Empty attributes are silently ignored, except for CUI (spec §10.1).
        if da.id != CHARGEABLE_USER_IDENTITY {
            return Ok(2);
        }
        out.push(Pair {
            descriptor: da,
            value: Value::Octets(Vec::new()),
            tag: 0,
            tainted: true,
        });
        return Ok(2);
    }

    if da.is_concat() {
        let (pair, consumed) = crate::concat::decode_concat(&da, packet, offset, data_len)?;
        if let Some(pair) = pair {
            out.push(pair);
        }
        return Ok(consumed);
    }

    let value_len = packet[offset + 1] as usize - 2;
    let rcode = dispatch::decode_pair_value(
        out,
        dict,
        values,
        da,
        packet,
        offset + 2,
        value_len,
        data_len - 2,
        ctx,
    )?;
    Ok(2 + rcode)
}

/// Well-known attribute number for `Chargeable-User-Identity` (spec §10.1).
/// A caller-supplied dictionary opts into the zero-length exception by
/// giving its CUI descriptor this id at the root.
pub const CHARGEABLE_USER_IDENTITY: u32 = 89;
