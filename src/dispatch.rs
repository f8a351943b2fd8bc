// SPDX-License-Identifier: MIT

//! Pair-value dispatcher (spec §4.10): the recursive decode entry point.
//!
//! Applies tag extraction, obfuscation decoding, length validation and
//! type-specific bit-pattern decoding, falling back to a raw OCTETS
//! "unknown" pair on any semantic failure inside a recognized kind so
//! that the enclosing packet keeps decoding (spec §3's "raw demotion"
//! invariant).

use std::borrow::Cow;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};

use crate::buffer::bounded_slice;
use crate::crypto;
use crate::dict::{AttributeDescriptor, AttributeFlags, Dictionary, EncryptKind};
use crate::error::{DecodeError, Result};
use crate::pair::{DecoderContext, Pair};
use crate::value::{Ipv4Prefix, Ipv6Prefix, Value, ValueKind, ValuePrimitive};
use crate::{extended, tlv, vsa};

const MAX_ATTR_LEN: usize = 128 * 1024;
const MAX_OBFUSCATED_LEN: usize = 253;

/// The private enterprise number a descriptor's own synthesized "unknown"
/// path should carry, recovered from its parent chain (spec §9's
/// unknown-attribute synthesis).
fn vendor_pen_of(da: &Arc<AttributeDescriptor>) -> u32 {
    if let Some(path) = &da.unknown {
        return path.vendor_pen;
    }
    match &da.parent {
        Some(p) if p.kind == ValueKind::Vendor => p.id,
        _ => 0,
    }
}

/// Demotes the attribute at `packet[offset..offset+len]` to a raw OCTETS
/// pair under a freshly synthesized unknown descriptor carrying `da`'s
/// numeric path (spec §3: "demoted to kind OCTETS under an unknown
/// descriptor carrying the original numeric path"). Always succeeds;
/// returns `len` as the bytes consumed, since raw demotion never looks
/// beyond the attribute's own declared value.
fn demote_to_raw(
    out: &mut Vec<Pair>,
    dict: &dyn Dictionary,
    da: &Arc<AttributeDescriptor>,
    packet: &[u8],
    offset: usize,
    len: usize,
) -> usize {
    let parent = da.parent.clone().unwrap_or_else(|| dict.root());
    let pen = vendor_pen_of(da);
    let unknown = dict.unknown_from_fields(&parent, pen, da.id);
    let bytes = bounded_slice(packet, offset, len).to_vec();
    log::debug!(
        "demoting attribute {} under parent {} to raw octets ({} bytes)",
        da.id,
        parent.id,
        bytes.len()
    );
    out.push(Pair {
        descriptor: unknown,
        value: Value::Octets(bytes),
        tag: 0,
        tainted: true,
    });
    len
}

fn clone_with_kind(da: &Arc<AttributeDescriptor>, kind: ValueKind) -> Arc<AttributeDescriptor> {
    let mut d = (**da).clone();
    d.kind = kind;
    Arc::new(d)
}

/// Zeroes every bit of `bytes` at or past `prefix_bits` (spec §4.10,
/// IPV4_PREFIX / IPV6_PREFIX masking).
fn mask_prefix_bits(bytes: &mut [u8], prefix_bits: u8) {
    let full_bytes = (prefix_bits / 8) as usize;
    let remainder = prefix_bits % 8;
    for (i, byte) in bytes.iter_mut().enumerate() {
        if i < full_bytes {
            continue;
        } else if i == full_bytes && remainder > 0 {
            *byte &= !(0xFFu8 >> remainder);
        } else {
            *byte = 0;
        }
    }
}

fn decode_ipv4_prefix(bytes: &[u8]) -> Result<Ipv4Prefix> {
    if bytes.len() != 6 || bytes[0] != 0 {
        return Err(DecodeError::InvalidArguments("malformed IPv4 prefix header"));
    }
    let prefix_bits = bytes[1] & 0x3F;
    if prefix_bits > 32 {
        return Err(DecodeError::InvalidArguments("IPv4 prefix length exceeds 32"));
    }
    let mut octets = [bytes[2], bytes[3], bytes[4], bytes[5]];
    mask_prefix_bits(&mut octets, prefix_bits);
    Ok(Ipv4Prefix {
        addr: Ipv4Addr::from(octets),
        prefix_len: prefix_bits,
    })
}

fn decode_ipv6_prefix(bytes: &[u8]) -> Result<Ipv6Prefix> {
    if bytes.len() < 2 || bytes[0] != 0 {
        return Err(DecodeError::InvalidArguments("malformed IPv6 prefix header"));
    }
    let prefix_bits = bytes[1];
    if prefix_bits > 128 {
        return Err(DecodeError::InvalidArguments("IPv6 prefix length exceeds 128"));
    }
    let tail = &bytes[2..];
    let needed = (prefix_bits as usize + 7) / 8;
    if needed > tail.len() {
        return Err(DecodeError::InsufficientData("IPv6 prefix shorter than its own length"));
    }
    let mut octets = [0u8; 16];
    octets[..tail.len()].copy_from_slice(tail);
    let mut masked = octets;
    mask_prefix_bits(&mut masked, prefix_bits);
    if masked != octets {
        // Bits set beyond the announced prefix: reference decoder falls
        // back to raw rather than silently accepting a lying prefix.
        return Err(DecodeError::InvalidArguments("IPv6 prefix has bits set beyond its length"));
    }
    Ok(Ipv6Prefix {
        addr: Ipv6Addr::from(masked),
        prefix_len: prefix_bits,
    })
}

/// The central recursive decode function (spec §4.10). `offset`/`attr_len`
/// index into `packet` for this attribute's *value* (its header, if any,
/// has already been stripped by the caller). `packet_len` is the number
/// of bytes remaining until the end of the packet, which may exceed
/// `attr_len` to let reassembly (EXTENDED, WiMAX) look ahead at sibling
/// attributes.
///
/// Returns the number of value-level bytes consumed: normally `attr_len`,
/// but larger when fragment reassembly folded in sibling attributes.
pub fn decode_pair_value(
    out: &mut Vec<Pair>,
    dict: &dyn Dictionary,
    values: &dyn ValuePrimitive,
    da: Arc<AttributeDescriptor>,
    packet: &[u8],
    offset: usize,
    attr_len: usize,
    packet_len: usize,
    ctx: Option<&DecoderContext>,
) -> Result<usize> {
    // 1. Sanity.
    if attr_len > packet_len || attr_len > MAX_ATTR_LEN {
        return Err(DecodeError::StructuralOverflow(
            "attribute value exceeds packet bounds or the 128 KiB cap",
        ));
    }
    if offset + attr_len > packet.len() {
        return Err(DecodeError::InsufficientData("attribute value runs past the buffer"));
    }
    if attr_len == 0 {
        return Ok(0);
    }

    let raw = |out: &mut Vec<Pair>| demote_to_raw(out, dict, &da, packet, offset, attr_len);

    // 2. Tag extraction.
    let mut tag: u8 = 0;
    let mut value_offset = offset;
    let mut value_len = attr_len;
    let source = bounded_slice(packet, offset, attr_len);
    let mut working: Cow<[u8]> = Cow::Borrowed(source);

    if da.has_tag() && value_len > 1 {
        let first = working[0];
        let tag_present = (0x01..=0x1F).contains(&first) || da.encrypt_kind == EncryptKind::TunnelPassword;
        if tag_present {
            match da.kind {
                ValueKind::String => {
                    tag = first;
                    working = Cow::Owned(working[1..].to_vec());
                    value_offset += 1;
                    value_len -= 1;
                }
                ValueKind::Uint32 => {
                    if working.len() != 4 {
                        return Ok(raw(out));
                    }
                    tag = first;
                    let mut buf = working.to_vec();
                    buf[0] = 0;
                    working = Cow::Owned(buf);
                }
                _ => return Ok(raw(out)),
            }
        }
    }

    // 3. Obfuscation.
    if let Some(ctx) = ctx {
        if da.encrypt_kind != EncryptKind::None && value_len > MAX_OBFUSCATED_LEN {
            return Ok(raw(out));
        }
        match da.encrypt_kind {
            EncryptKind::None => {}
            EncryptKind::UserPassword => {
                let mut buf = [0u8; 256];
                buf[..value_len].copy_from_slice(&working);
                let strlen = crypto::decode_user_password(&mut buf, value_len, &ctx.secret, &ctx.vector);
                let new_len = if da.flags.contains(AttributeFlags::FIXED_LENGTH) {
                    da.fixed_length.min(value_len.min(128))
                } else {
                    strlen
                };
                working = Cow::Owned(buf[..new_len].to_vec());
                value_len = new_len;
            }
            EncryptKind::TunnelPassword => {
                let mut buf = [0u8; 256];
                buf[..value_len].copy_from_slice(&working);
                let mut pwlen = value_len;
                match crypto::decode_tunnel_password(
                    &mut buf[..value_len],
                    &mut pwlen,
                    &ctx.secret,
                    &ctx.vector,
                    ctx.tunnel_password_zeros,
                ) {
                    Ok(()) => {
                        working = Cow::Owned(buf[..pwlen].to_vec());
                        value_len = pwlen;
                    }
                    // Spec §7: Tunnel-Password reassembly failures fall
                    // through to raw rather than surfacing, since the
                    // only realistic cause is a wrong shared secret.
                    Err(_) => return Ok(raw(out)),
                }
            }
            EncryptKind::AscendSecret => match &ctx.ascend_secret {
                Some(primitive) => {
                    let plaintext = primitive.apply(&ctx.vector, &ctx.secret, &working);
                    let len = plaintext.iter().position(|&b| b == 0).unwrap_or(16);
                    working = Cow::Owned(plaintext[..len].to_vec());
                    value_len = len;
                }
                None => {
                    log::warn!(
                        "attribute {} demands Ascend-Send-Secret obfuscation but no AscendSecret primitive is configured",
                        da.id
                    );
                    return Ok(raw(out));
                }
            },
        }
    }

    // 4/5. Length envelope + kind dispatch.
    match da.kind {
        ValueKind::Tlv => {
            let data = bounded_slice(packet, value_offset, value_len);
            return match tlv::decode_tlv(out, dict, values, &da, data, ctx) {
                Ok(consumed) => Ok(consumed),
                Err(e) => {
                    log::debug!("TLV container under attribute {} failed to decode: {}", da.id, e);
                    Ok(raw(out))
                }
            };
        }
        ValueKind::Vsa => {
            let is_evs = matches!(&da.parent, Some(p) if p.kind == ValueKind::Extended);
            if is_evs {
                if value_len < 5 {
                    return Ok(raw(out));
                }
                let pen = BigEndian::read_u32(&working[0..4]);
                let vendor_type = working[4] as u32;
                let vendor_node = Arc::new(AttributeDescriptor {
                    id: pen,
                    parent: Some(da.clone()),
                    kind: ValueKind::Vendor,
                    flags: AttributeFlags::empty(),
                    encrypt_kind: EncryptKind::None,
                    fixed_length: 0,
                    struct_layout: None,
                    unknown: None,
                });
                let target = dict
                    .vendor_by_num(pen)
                    .and_then(|_| dict.child_by_num(&vendor_node, vendor_type))
                    .unwrap_or_else(|| dict.unknown_from_fields(&da, pen, vendor_type));
                return match decode_pair_value(
                    out,
                    dict,
                    values,
                    target,
                    packet,
                    value_offset + 5,
                    value_len - 5,
                    packet_len - 5,
                    ctx,
                ) {
                    Ok(consumed) => Ok(5 + consumed),
                    Err(e) => {
                        log::debug!("EVS attribute under {} failed to decode: {}", da.id, e);
                        Ok(raw(out))
                    }
                };
            }
            return match vsa::decode_vsa(out, dict, values, &da, packet, value_offset, value_len, ctx) {
                Ok(consumed) => Ok(consumed),
                Err(e) => {
                    log::debug!("VSA under attribute {} failed to decode: {}", da.id, e);
                    Ok(raw(out))
                }
            };
        }
        ValueKind::Extended => {
            if value_len < 1 {
                return Ok(raw(out));
            }
            let ext_type = working[0] as u32;
            let is_long = da.is_long_extended();
            let child = dict.child_by_num(&da, ext_type);

            if is_long && value_len < 2 {
                let target = child.unwrap_or_else(|| da.clone());
                return Ok(demote_to_raw(out, dict, &target, packet, value_offset, value_len));
            }

            let extra = if is_long { 1 } else { 0 };
            let flag = if is_long { working[1] } else { 0 };
            let more = is_long && (flag & 0x80 != 0);
            let target = child.unwrap_or_else(|| dict.unknown_from_fields(&da, vendor_pen_of(&da), ext_type));

            if more {
                let (frag_data, frag_consumed) = extended::reassemble_fragments(packet, value_offset, value_len);
                let frag_len = frag_data.len();
                decode_pair_value(out, dict, values, target, &frag_data, 0, frag_len, frag_len, ctx)?;
                return Ok(frag_consumed);
            }

            let inner_offset = value_offset + 1 + extra;
            let inner_len = value_len - 1 - extra;
            let consumed = decode_pair_value(
                out,
                dict,
                values,
                target,
                packet,
                inner_offset,
                inner_len,
                packet_len - 1 - extra,
                ctx,
            )?;
            return Ok(1 + extra + consumed);
        }
        ValueKind::Struct => {
            let bytes = bounded_slice(packet, value_offset, value_len);
            return match values.struct_from_network(&da, bytes) {
                Ok((value, trailing_parent, consumed)) => {
                    out.push(Pair {
                        descriptor: da.clone(),
                        value,
                        tag,
                        tainted: true,
                    });
                    if consumed < bytes.len() {
                        let trailing = &bytes[consumed..];
                        match trailing_parent {
                            Some(parent) => {
                                if tlv::decode_tlv(out, dict, values, &parent, trailing, ctx).is_err() {
                                    let unknown = dict.unknown_from_fields(&parent, vendor_pen_of(&parent), 0);
                                    out.push(Pair {
                                        descriptor: unknown,
                                        value: Value::Octets(trailing.to_vec()),
                                        tag: 0,
                                        tainted: true,
                                    });
                                }
                            }
                            None => {}
                        }
                    }
                    Ok(value_len)
                }
                Err(e) => {
                    log::debug!("STRUCT attribute {} failed to decode: {}", da.id, e);
                    Ok(raw(out))
                }
            };
        }
        ValueKind::Vendor => {
            // Never reached from a real wire attribute (VENDOR nodes are
            // synthesized internally as TLV/VSA parents, never looked up
            // as a dictionary attribute kind in their own right), kept
            // for match exhaustiveness.
            return Ok(raw(out));
        }
        ValueKind::ComboIpAddr => {
            let resolved_kind = match value_len {
                4 => ValueKind::Ipv4Addr,
                16 => ValueKind::Ipv6Addr,
                _ => return Ok(raw(out)),
            };
            let resolved_da = dict
                .child_by_kind(&da, resolved_kind)
                .unwrap_or_else(|| clone_with_kind(&da, resolved_kind));
            let value = match values.from_network(resolved_kind, &working[..value_len]) {
                Ok(v) => v,
                Err(_) => return Ok(raw(out)),
            };
            out.push(Pair {
                descriptor: resolved_da,
                value,
                tag,
                tainted: true,
            });
            return Ok(attr_len);
        }
        ValueKind::ComboIpPrefix => {
            let (resolved_kind, value) = match value_len {
                6 => match decode_ipv4_prefix(&working[..value_len]) {
                    Ok(p) => (ValueKind::Ipv4Prefix, Value::Ipv4Prefix(p)),
                    Err(_) => return Ok(raw(out)),
                },
                18 => match decode_ipv6_prefix(&working[..value_len]) {
                    Ok(p) => (ValueKind::Ipv6Prefix, Value::Ipv6Prefix(p)),
                    Err(_) => return Ok(raw(out)),
                },
                _ => return Ok(raw(out)),
            };
            let resolved_da = dict
                .child_by_kind(&da, resolved_kind)
                .unwrap_or_else(|| clone_with_kind(&da, resolved_kind));
            out.push(Pair {
                descriptor: resolved_da,
                value,
                tag,
                tainted: true,
            });
            return Ok(attr_len);
        }
        ValueKind::Ipv4Prefix => match decode_ipv4_prefix(&working[..value_len]) {
            Ok(p) => {
                out.push(Pair {
                    descriptor: da.clone(),
                    value: Value::Ipv4Prefix(p),
                    tag,
                    tainted: true,
                });
                return Ok(attr_len);
            }
            Err(_) => return Ok(raw(out)),
        },
        ValueKind::Ipv6Prefix => match decode_ipv6_prefix(&working[..value_len]) {
            Ok(p) => {
                out.push(Pair {
                    descriptor: da.clone(),
                    value: Value::Ipv6Prefix(p),
                    tag,
                    tainted: true,
                });
                return Ok(attr_len);
            }
            Err(_) => return Ok(raw(out)),
        },
        ValueKind::Abinary => {
            // Truncated rather than range-checked (spec §4.10, ABINARY).
            let value = values.from_network(ValueKind::Abinary, &working[..value_len])?;
            out.push(Pair {
                descriptor: da.clone(),
                value,
                tag,
                tainted: true,
            });
            return Ok(attr_len);
        }
        scalar => {
            let (min, max) = crate::value::size_bounds(scalar);
            if value_len < min || value_len > max {
                return Ok(raw(out));
            }
            match values.from_network(scalar, &working[..value_len]) {
                Ok(value) => {
                    out.push(Pair {
                        descriptor: da.clone(),
                        value,
                        tag,
                        tainted: true,
                    });
                    Ok(attr_len)
                }
                Err(_) => Ok(raw(out)),
            }
        }
    }
}
