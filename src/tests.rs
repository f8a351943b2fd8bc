// SPDX-License-Identifier: MIT

//! Whole-packet scenario tests (spec §8). Each sub-component has its own
//! `#[cfg(test)] mod tests` covering its unit-level contract; this module
//! exercises [`decode_pair`] end to end against the bundled
//! [`testing::ReferenceDictionary`], the way a caller actually uses this
//! crate.

use pretty_assertions::assert_eq;

use crate::dict::Dictionary;
use crate::pair::{decode_pair, DecoderContext, Pair};
use crate::testing::ReferenceDictionary;
use crate::value::{DefaultValuePrimitive, Value};

fn decode_all(packet: &[u8], ctx: Option<&DecoderContext>) -> Vec<Pair> {
    let dict = ReferenceDictionary::new();
    let values = DefaultValuePrimitive;
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < packet.len() {
        let consumed = decode_pair(&mut out, &dict, &values, packet, offset, ctx).unwrap();
        assert!(consumed > 0, "decode_pair must make progress");
        offset += consumed;
    }
    assert_eq!(offset, packet.len(), "total consumption must equal packet length");
    out
}

/// Scenario 1: `01 06 75 73 65 72 00` — a single `User-Name` attribute
/// whose header claims length 6, so the value is the 4 bytes `"user"`
/// (the trailing `00` belongs to the next, absent, attribute and is
/// simply outside this attribute's declared length).
#[test]
fn scenario_user_name() {
    let packet = [0x01, 0x06, b'u', b's', b'e', b'r'];
    let pairs = decode_all(&packet, None);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].descriptor.id, 1);
    match &pairs[0].value {
        Value::String(s) => assert_eq!(s, b"user"),
        other => panic!("expected string, got {other:?}"),
    }
}

/// Scenario 2: `1A 0C 00 00 00 09 01 06 66 6F 6F 00` — a VSA for vendor 9
/// (Cisco) carrying sub-attribute 1 = `"foo\0"`.
#[test]
fn scenario_cisco_vsa() {
    let packet = [0x1A, 0x0C, 0x00, 0x00, 0x00, 0x09, 0x01, 0x06, b'f', b'o', b'o', 0x00];
    let dict = ReferenceDictionary::new();
    let values = DefaultValuePrimitive;
    let mut out = Vec::new();
    let consumed = decode_pair(&mut out, &dict, &values, &packet, 0, None).unwrap();
    assert_eq!(consumed, 12);
    assert_eq!(out.len(), 1);
    match &out[0].value {
        Value::String(s) => assert_eq!(s, b"foo\0"),
        other => panic!("expected string, got {other:?}"),
    }
}

/// Scenario 3: a long-extended anchor (`1B 09 01 80 ...`, "more" bit
/// set) followed by one continuation (`1B 06 01 00 ...`, "more" bit
/// clear) — reassembles into one pair with the concatenated value. The
/// continuation's own declared length (6) bounds its contribution to
/// its first two data bytes; total consumption is 15, one byte short
/// of the full 16-byte buffer (spec §8 scenario 3).
#[test]
fn scenario_long_extended_reassembly() {
    let packet = [
        0x1B, 0x09, 0x01, 0x80, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x1B, 0x06, 0x01, 0x00, 0xFF, 0x11,
        0x22,
    ];
    let dict = ReferenceDictionary::new();
    let values = DefaultValuePrimitive;
    let mut out = Vec::new();
    let consumed = decode_pair(&mut out, &dict, &values, &packet, 0, None).unwrap();
    assert_eq!(consumed, 15);
    assert_eq!(out.len(), 1);
    match &out[0].value {
        Value::Octets(bytes) => {
            assert_eq!(bytes, &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x11]);
        }
        other => panic!("expected octets, got {other:?}"),
    }
}

/// Scenario 4: `50 12 00...00` — `Message-Authenticator`, 16 NUL bytes,
/// decoded as opaque OCTETS.
#[test]
fn scenario_message_authenticator() {
    let mut packet = vec![0x50, 0x12];
    packet.extend_from_slice(&[0u8; 16]);
    let pairs = decode_all(&packet, None);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].descriptor.id, 80);
    match &pairs[0].value {
        Value::Octets(bytes) => assert_eq!(bytes, &[0u8; 16]),
        other => panic!("expected octets, got {other:?}"),
    }
}

/// Scenario 6: three consecutive `EAP-Message` (type 79) attributes of
/// lengths 255, 255, 40 concatenate into one opaque value of length
/// 253+253+38 = 544, consuming 550 bytes total.
#[test]
fn scenario_eap_message_concat() {
    let mut packet = vec![79u8, 255];
    packet.extend(std::iter::repeat(0xAAu8).take(253));
    packet.push(79);
    packet.push(255);
    packet.extend(std::iter::repeat(0xBBu8).take(253));
    packet.push(79);
    packet.push(40);
    packet.extend(std::iter::repeat(0xCCu8).take(38));

    let dict = ReferenceDictionary::new();
    let values = DefaultValuePrimitive;
    let mut out = Vec::new();
    let consumed = decode_pair(&mut out, &dict, &values, &packet, 0, None).unwrap();
    assert_eq!(consumed, 550);
    assert_eq!(out.len(), 1);
    match &out[0].value {
        Value::Octets(bytes) => assert_eq!(bytes.len(), 544),
        other => panic!("expected octets, got {other:?}"),
    }
}

/// User-Password determinism (spec §8): known secret/vector/ciphertext
/// recovers `"hello"`, decoded through a full packet rather than the
/// bare codec (that's covered in `crypto::user_password`'s own tests).
#[test]
fn user_password_full_packet() {
    let ciphertext = [
        0xfe, 0x8b, 0x65, 0xa6, 0x1b, 0xfd, 0x7a, 0x1a, 0x10, 0x46, 0x07, 0x24, 0x00, 0x14, 0x82,
        0x8b,
    ];
    let mut packet = vec![0x02, 0x12]; // User-Password, length 18 (2 + 16)
    packet.extend_from_slice(&ciphertext);

    let vector: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
    let ctx = DecoderContext::new(b"testing123".to_vec(), vector);

    let pairs = decode_all(&packet, Some(&ctx));
    assert_eq!(pairs.len(), 1);
    match &pairs[0].value {
        Value::String(s) => assert_eq!(s, b"hello"),
        other => panic!("expected string, got {other:?}"),
    }
}

/// Raw-demotion determinism (spec §8): an attribute whose declared kind
/// can't validate (here, a 4-byte `Ipv4Addr` descriptor fed 3 bytes)
/// yields exactly one OCTETS pair equal to the original value bytes.
#[test]
fn raw_demotion_preserves_original_bytes() {
    let packet = [0x04, 0x05, 0xAA, 0xBB, 0xCC]; // NAS-IP-Address, 3-byte value
    let pairs = decode_all(&packet, None);
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].descriptor.is_unknown());
    match &pairs[0].value {
        Value::Octets(bytes) => assert_eq!(bytes, &[0xAA, 0xBB, 0xCC]),
        other => panic!("expected raw octets, got {other:?}"),
    }
}

/// Bounds: truncating a well-formed packet at every prefix length must
/// never panic, and must either decode cleanly or surface a structured
/// error — never read past the slice (spec §8, "Bounds").
#[test]
fn truncation_never_panics() {
    let mut packet = vec![0x1A, 0x0C, 0x00, 0x00, 0x00, 0x09, 0x01, 0x06, b'f', b'o', b'o', 0x00];
    packet.extend([0x01, 0x06, b'u', b's', b'e', b'r']);

    let dict = ReferenceDictionary::new();
    let values = DefaultValuePrimitive;
    for cut in 0..=packet.len() {
        let truncated = &packet[..cut];
        let mut out = Vec::new();
        let mut offset = 0;
        while offset < truncated.len() {
            match decode_pair(&mut out, &dict, &values, truncated, offset, None) {
                Ok(0) => break,
                Ok(consumed) => offset += consumed,
                Err(_) => break,
            }
        }
    }
}

/// Unknown top-level attribute types are still decoded generically as
/// raw octets under a synthesized unknown descriptor.
#[test]
fn unknown_top_level_attribute_is_octets() {
    let packet = [250u8, 5, 1, 2, 3];
    let pairs = decode_all(&packet, None);
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].descriptor.is_unknown());
    match &pairs[0].value {
        Value::Octets(bytes) => assert_eq!(bytes, &[1, 2, 3]),
        other => panic!("expected octets, got {other:?}"),
    }
}

/// Zero-length attributes are silently ignored, except for
/// Chargeable-User-Identity which still produces a tainted empty pair
/// (spec §10.1).
#[test]
fn zero_length_attribute_is_ignored_except_cui() {
    let packet = [0x01, 0x02]; // User-Name, zero-length value
    let pairs = decode_all(&packet, None);
    assert!(pairs.is_empty());

    let packet = [89u8, 0x02]; // Chargeable-User-Identity, zero-length
    let pairs = decode_all(&packet, None);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].descriptor.id, 89);
    match &pairs[0].value {
        Value::Octets(bytes) => assert!(bytes.is_empty()),
        other => panic!("expected empty octets, got {other:?}"),
    }
}

/// Dictionaries are `Send + Sync`; two decodes against the same
/// dictionary may run on independent threads as long as they don't
/// share a `DecoderContext` or output `Vec<Pair>` (spec §5).
#[test]
fn dictionary_is_shareable_across_threads() {
    use std::sync::Arc;
    let dict: Arc<dyn Dictionary> = Arc::new(ReferenceDictionary::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dict = dict.clone();
            std::thread::spawn(move || {
                let values = DefaultValuePrimitive;
                let packet = [0x01, 0x06, b'u', b's', b'e', b'r'];
                let mut out = Vec::new();
                decode_pair(&mut out, dict.as_ref(), &values, &packet, 0, None).unwrap();
                out.len()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 1);
    }
}
