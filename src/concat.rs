// SPDX-License-Identifier: MIT

//! Concat decoder (spec §4.6): reassembles a run of consecutive
//! same-type attributes into one opaque value.

use std::sync::Arc;

use crate::buffer::append_bounded;
use crate::dict::AttributeDescriptor;
use crate::error::{DecodeError, Result};
use crate::pair::Pair;
use crate::value::Value;

/// Walks forward from `packet[offset..]` while each successive attribute
/// shares the starting attribute's top-level type and fits within
/// `packet`.
///
/// A malformed attribute (declared length `<= 2`, or overrunning
/// `packet`) is a structural failure that surfaces to the caller and
/// stops decoding the whole packet (spec §7); only a top-level type
/// mismatch is a legitimate stopping point that leaves the mismatched
/// attribute for the caller to decode separately (spec §9 open question
/// 2).
///
/// Returns the reassembled pair (`None` if the concatenated value is
/// empty, per spec §4.6) and the total number of bytes consumed across
/// however many attributes were folded in.
pub(crate) fn decode_concat(
    da: &Arc<AttributeDescriptor>,
    packet: &[u8],
    offset: usize,
    data_len: usize,
) -> Result<(Option<Pair>, usize)> {
    let _ = data_len;
    let type_id = packet[offset];

    let mut value = Vec::new();
    let mut p = offset;
    let mut consumed = 0usize;

    while p + 1 < packet.len() {
        let remaining = packet.len() - p;
        if packet[p] != type_id {
            break;
        }
        let len = packet[p + 1] as usize;
        if len <= 2 {
            return Err(DecodeError::StructuralOverflow(
                "concatenated attribute has a zero-or-negative-length value",
            ));
        }
        if len > remaining {
            return Err(DecodeError::StructuralOverflow(
                "concatenated attribute overruns the packet",
            ));
        }
        append_bounded(&mut value, packet, p + 2, len - 2);
        consumed += len;
        p += len;
    }

    if value.is_empty() {
        return Ok((None, 2));
    }

    let pair = Pair {
        descriptor: da.clone(),
        value: Value::Octets(value),
        tag: 0,
        tainted: true,
    };
    Ok((Some(pair), consumed))
}
