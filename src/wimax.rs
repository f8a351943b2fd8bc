// SPDX-License-Identifier: MIT

//! WiMAX reassembler (spec §4.9): the idiosyncratic Vendor-Specific
//! sub-format used by WiMAX attributes, including cross-VSA fragment
//! reassembly.

use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};

use crate::buffer::append_bounded;
use crate::dict::{AttributeDescriptor, Dictionary};
use crate::dispatch;
use crate::error::{DecodeError, Result};
use crate::pair::{DecoderContext, Pair};
use crate::value::ValuePrimitive;

const MORE_BIT: u8 = 0x80;

/// `vendor_data` layout (past the 4-byte PEN already stripped by the
/// caller): `[w-attr | w-len | flag | data...]`, where `w-len` counts
/// from `w-attr` itself and must equal `attr_len - 4` (the outer VSA's
/// declared value length minus its own PEN).
///
/// `offset`/`vendor_data_len` index into `packet` the same way the VSA
/// decoder's `vendor_data` does; `parent` is the Vendor-Specific
/// descriptor (its id is the outer RFC attribute type, typically 26).
pub(crate) fn decode_wimax(
    out: &mut Vec<Pair>,
    dict: &dyn Dictionary,
    values: &dyn ValuePrimitive,
    parent: &Arc<AttributeDescriptor>,
    pen: u32,
    packet: &[u8],
    offset: usize,
    vendor_data_len: usize,
    ctx: Option<&DecoderContext>,
) -> Result<usize> {
    if vendor_data_len < 3 {
        return Err(DecodeError::BadWimax("WiMAX VSA shorter than its own header"));
    }

    let w_attr = packet[offset];
    let w_len = packet[offset + 1] as usize;
    let flag = packet[offset + 2];

    if w_len != vendor_data_len {
        return Err(DecodeError::BadWimax("WiMAX w-len does not match attribute length"));
    }

    let vendor_node = Arc::new(AttributeDescriptor {
        id: pen,
        parent: Some(parent.clone()),
        kind: crate::value::ValueKind::Vendor,
        flags: crate::dict::AttributeFlags::empty(),
        encrypt_kind: crate::dict::EncryptKind::None,
        fixed_length: 0,
        struct_layout: None,
        unknown: None,
    });

    let child = dict
        .child_by_num(&vendor_node, w_attr as u32)
        .unwrap_or_else(|| dict.unknown_from_fields(&vendor_node, pen, w_attr as u32));

    if flag & MORE_BIT == 0 {
        let mut staged = Vec::new();
        dispatch::decode_pair_value(
            &mut staged,
            dict,
            values,
            child,
            packet,
            offset + 3,
            vendor_data_len - 3,
            vendor_data_len - 3,
            ctx,
        )?;
        out.extend(staged);
        return Ok(4 + vendor_data_len);
    }

    // Fragmented: walk subsequent outer Vendor-Specific attributes
    // (each `[0x1A | outer-len | PEN | w-attr | w-len | flag | data...]`)
    // requiring the same PEN and the same `w-attr`, with `outer-len ==
    // w-len + 6` (1-byte type, 1-byte outer-len, 4-byte PEN, 3-byte
    // w-header all folded into that arithmetic as `6 = 4 + ... `: the
    // outer header contributes 2 (type+len) + 4 (PEN) = 6 bytes beyond
    // the WiMAX `w-len` span starting at `w-attr`).
    let outer_vsa_type = packet[offset - 2 - 4];
    let mut data = Vec::new();
    append_bounded(&mut data, packet, offset + 3, vendor_data_len - 3);

    let anchor_outer_len = 2 + 4 + vendor_data_len;
    let mut consumed = 4 + vendor_data_len;
    let mut more = true;
    let mut p = offset - 2 - 4 + anchor_outer_len;

    while more {
        if p + 9 > packet.len() {
            return Err(DecodeError::BadWimax("truncated WiMAX continuation"));
        }
        let frag_type = packet[p];
        let frag_outer_len = packet[p + 1] as usize;
        let frag_pen = BigEndian::read_u32(&packet[p + 2..p + 6]);
        let frag_w_attr = packet[p + 6];
        let frag_w_len = packet[p + 7] as usize;
        let frag_flag = packet[p + 8];

        if frag_type != outer_vsa_type
            || frag_pen != pen
            || frag_w_attr != w_attr
            || frag_outer_len != frag_w_len + 6
            || p + frag_outer_len > packet.len()
        {
            return Err(DecodeError::BadWimax("malformed WiMAX fragment continuation"));
        }

        let frag_data_len = frag_outer_len - 9;
        append_bounded(&mut data, packet, p + 9, frag_data_len);
        consumed += frag_outer_len;
        more = frag_flag & MORE_BIT != 0;
        p += frag_outer_len;
    }

    let mut staged = Vec::new();
    dispatch::decode_pair_value(&mut staged, dict, values, child, &data, 0, data.len(), data.len(), ctx)?;
    out.extend(staged);
    Ok(consumed)
}
