// SPDX-License-Identifier: MIT

//! Vendor-Specific Attribute decoder (spec §4.8).

use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};

use crate::buffer::bounded_slice;
use crate::dict::{AttributeDescriptor, AttributeFlags, Dictionary, EncryptKind, UnknownPath, VENDORPEC_WIMAX};
use crate::dispatch;
use crate::error::{DecodeError, Result};
use crate::pair::{DecoderContext, Pair};
use crate::tlv::tlv_ok;
use crate::value::{ValueKind, ValuePrimitive};

fn read_uint(data: &[u8], p: usize, width: usize) -> u32 {
    match width {
        1 => data[p] as u32,
        2 => BigEndian::read_u16(&data[p..p + 2]) as u32,
        4 => BigEndian::read_u32(&data[p..p + 4]),
        _ => unreachable!("vendor sub-format widths are validated to 1, 2 or 4"),
    }
}

/// `offset` points at the 4-byte vendor PEN; `attr_len` covers the PEN
/// plus `vendor-data`.
pub(crate) fn decode_vsa(
    out: &mut Vec<Pair>,
    dict: &dyn Dictionary,
    values: &dyn ValuePrimitive,
    parent: &Arc<AttributeDescriptor>,
    packet: &[u8],
    offset: usize,
    attr_len: usize,
    ctx: Option<&DecoderContext>,
) -> Result<usize> {
    if attr_len < 5 {
        return Err(DecodeError::BadVsa("VSA shorter than a PEN header"));
    }

    let pen = BigEndian::read_u32(&packet[offset..offset + 4]);
    if pen & 0xFF00_0000 != 0 {
        return Err(DecodeError::BadVsa("vendor PEN above 24 bits"));
    }

    let vendor_data_start = offset + 4;
    let vendor_data_len = attr_len - 4;
    let vendor_data = bounded_slice(packet, vendor_data_start, vendor_data_len);

    let (vendor, is_unknown) = match dict.vendor_by_num(pen) {
        Some(v) => (v, false),
        None => {
            tlv_ok(vendor_data, 1, 1)?;
            (dict.unknown_vendor_from_num(pen), true)
        }
    };

    if vendor.pen == VENDORPEC_WIMAX && vendor.wimax_continuation {
        return crate::wimax::decode_wimax(
            out,
            dict,
            values,
            parent,
            pen,
            packet,
            vendor_data_start,
            vendor_data_len,
            ctx,
        );
    }

    tlv_ok(vendor_data, vendor.type_width, vendor.length_width)?;

    let vendor_node = Arc::new(AttributeDescriptor {
        id: pen,
        parent: Some(parent.clone()),
        kind: ValueKind::Vendor,
        flags: if is_unknown {
            AttributeFlags::IS_UNKNOWN
        } else {
            AttributeFlags::empty()
        },
        encrypt_kind: EncryptKind::None,
        fixed_length: 0,
        struct_layout: None,
        unknown: is_unknown.then_some(UnknownPath {
            vendor_pen: pen,
            parent_id: parent.id,
            attr_id: 0,
        }),
    });

    let tw = vendor.type_width as usize;
    let lw = vendor.length_width as usize;
    let mut staged = Vec::new();
    let mut p = 0usize;

    while p < vendor_data.len() {
        let id = read_uint(vendor_data, p, tw);
        let sub_len = if lw == 0 {
            vendor_data.len()
        } else {
            read_uint(vendor_data, p + tw, lw) as usize
        };
        let child = dict
            .child_by_num(&vendor_node, id)
            .unwrap_or_else(|| dict.unknown_from_fields(&vendor_node, pen, id));

        let value_len = sub_len - tw - lw;
        dispatch::decode_pair_value(
            &mut staged,
            dict,
            values,
            child,
            vendor_data,
            p + tw + lw,
            value_len,
            value_len,
            ctx,
        )?;

        if lw == 0 {
            break;
        }
        p += sub_len;
    }

    out.extend(staged);
    Ok(4 + vendor_data_len)
}
