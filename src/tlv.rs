// SPDX-License-Identifier: MIT

//! TLV well-formedness validation (spec §4.4) and decoding (spec §4.5).

use std::sync::Arc;

use crate::dict::{AttributeDescriptor, Dictionary};
use crate::dispatch;
use crate::error::{DecodeError, Result};
use crate::pair::{DecoderContext, Pair};
use crate::value::ValuePrimitive;

/// Checks that `data` is a well-formed concatenation of sub-attributes
/// shaped `[type_width-byte id | length_width-byte length | value]`
/// (spec §4.4). Performs no allocation.
pub(crate) fn tlv_ok(data: &[u8], type_width: u8, length_width: u8) -> Result<()> {
    if length_width > 2 || type_width == 0 || type_width > 4 {
        return Err(DecodeError::InvalidArguments(
            "unsupported (type_width, length_width) sub-format",
        ));
    }

    let type_width = type_width as usize;
    let length_width = length_width as usize;
    let mut p = 0usize;
    let end = data.len();

    while p < end {
        if p + type_width + length_width > end {
            return Err(DecodeError::BadTlvHeader("attribute header overflow"));
        }

        match type_width {
            4 => {
                if data[p] != 0 {
                    return Err(DecodeError::BadTlvHeader("attribute id > 2^24"));
                }
                if data[p] == 0 && data[p + 1] == 0 && data[p + 2] == 0 && data[p + 3] == 0 {
                    return Err(DecodeError::BadTlvHeader("attribute id is zero"));
                }
            }
            2 => {
                if data[p] == 0 && data[p + 1] == 0 {
                    return Err(DecodeError::BadTlvHeader("attribute id is zero"));
                }
            }
            1 => {
                // Id 0 is tolerated: a legacy vendor quirk.
            }
            _ => return Err(DecodeError::InvalidArguments("internal sanity check failed")),
        }

        let attrlen = match length_width {
            0 => return Ok(()),
            2 => {
                if data[p + type_width] != 0 {
                    return Err(DecodeError::BadTlvHeader("attribute longer than 255 octets"));
                }
                data[p + type_width + 1] as usize
            }
            1 => data[p + type_width] as usize,
            _ => return Err(DecodeError::InvalidArguments("internal sanity check failed")),
        };

        if attrlen < type_width + length_width {
            return Err(DecodeError::BadTlvHeader("attribute header has invalid length"));
        }
        if p + attrlen > end {
            return Err(DecodeError::BadTlvHeader("attribute overflows container"));
        }

        p += attrlen;
    }

    Ok(())
}

/// Walks a validated sub-attribute stream, recursively decoding each
/// child under `parent`. Staged in a private buffer and spliced onto
/// `out` only once the whole slice succeeds (spec §4.5's all-or-nothing
/// container semantics).
pub(crate) fn decode_tlv(
    out: &mut Vec<Pair>,
    dict: &dyn Dictionary,
    values: &dyn ValuePrimitive,
    parent: &Arc<AttributeDescriptor>,
    data: &[u8],
    ctx: Option<&DecoderContext>,
) -> Result<usize> {
    if data.len() < 3 {
        return Err(DecodeError::InsufficientData("TLV stream shorter than one header"));
    }

    tlv_ok(data, 1, 1)?;

    let mut staged = Vec::new();
    let mut p = 0usize;
    while p < data.len() {
        let id = data[p] as u32;
        let len = data[p + 1] as usize;
        let child = dict
            .child_by_num(parent, id)
            .unwrap_or_else(|| dict.unknown_from_fields(parent, 0, id));

        dispatch::decode_pair_value(
            &mut staged,
            dict,
            values,
            child,
            data,
            p + 2,
            len - 2,
            len - 2,
            ctx,
        )?;
        p += len;
    }

    out.extend(staged);
    Ok(data.len())
}
