// SPDX-License-Identifier: MIT

//! Typed decoded values (spec §3) and the value-primitive collaborator
//! (spec §6) that turns wire bytes of a scalar kind into one.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};

use crate::dict::AttributeDescriptor;
use crate::error::{DecodeError, Result};

/// The kind of a decoded value, mirroring the dictionary's attribute
/// `kind` field one-for-one (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Octets,
    Bool,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Date,
    TimeDelta,
    Ipv4Addr,
    Ipv6Addr,
    Ipv4Prefix,
    Ipv6Prefix,
    ComboIpAddr,
    ComboIpPrefix,
    Ifid,
    Ethernet,
    Size,
    Abinary,
    Tlv,
    Struct,
    Vsa,
    Vendor,
    Extended,
}

/// An IPv4 prefix as decoded from the RADIUS wire format (spec §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Prefix {
    pub addr: Ipv4Addr,
    pub prefix_len: u8,
}

/// An IPv6 prefix as decoded from the RADIUS wire format (spec §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Prefix {
    pub addr: Ipv6Addr,
    pub prefix_len: u8,
}

/// A decoded attribute value (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// RADIUS `string` values are not required to be valid UTF-8.
    String(Vec<u8>),
    Octets(Vec<u8>),
    Bool(bool),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Date(u32),
    TimeDelta(u32),
    Ipv4Addr(Ipv4Addr),
    Ipv6Addr(Ipv6Addr),
    Ipv4Prefix(Ipv4Prefix),
    Ipv6Prefix(Ipv6Prefix),
    Ifid([u8; 8]),
    Ethernet([u8; 6]),
    Size(u64),
    Abinary(Vec<u8>),
    Struct(Vec<Value>),
}

/// ASCEND filter binary values are fixed-size; oversize input is
/// truncated (spec §4.10, ABINARY).
pub const ABINARY_LEN: usize = 32;

/// The (min, max) legal byte length for a scalar value kind (spec §4.10
/// step 4, "length envelope"). Container kinds (TLV/STRUCT/VSA/VENDOR/
/// EXTENDED) are not governed by this table; their own decoders bound
/// themselves.
pub fn size_bounds(kind: ValueKind) -> (usize, usize) {
    use ValueKind::*;
    match kind {
        String | Octets => (0, 253),
        Bool | Uint8 | Int8 => (1, 1),
        Uint16 | Int16 => (2, 2),
        Uint32 | Int32 | Float32 | Date | TimeDelta => (4, 4),
        Uint64 | Int64 | Float64 | Size => (8, 8),
        Ipv4Addr => (4, 4),
        Ipv6Addr => (16, 16),
        Ipv4Prefix => (6, 6),
        Ipv6Prefix => (2, 18),
        ComboIpAddr => (4, 16),
        ComboIpPrefix => (6, 18),
        Ifid => (8, 8),
        Ethernet => (6, 6),
        Abinary => (0, ABINARY_LEN),
        Tlv | Struct | Vsa | Vendor | Extended => (0, 128 * 1024),
    }
}

/// The value-primitive collaborator (spec §6): turns a byte slice of a
/// known length (already validated against [`size_bounds`]) into a typed
/// [`Value`] for scalar kinds, and decodes `STRUCT` attributes.
///
/// A default implementation ([`DefaultValuePrimitive`]) covers every
/// scalar kind in the data model; callers needing a custom numeric
/// representation may supply their own.
pub trait ValuePrimitive: Send + Sync {
    fn from_network(&self, kind: ValueKind, bytes: &[u8]) -> Result<Value>;

    /// Decodes a `STRUCT` attribute's fixed fields (and optional trailing
    /// string), returning the decoded value, the parent to use for any
    /// trailing TLV bytes, and the number of bytes consumed by the fixed
    /// portion (not including a trailing string, which consumes the
    /// rest).
    fn struct_from_network(
        &self,
        parent: &Arc<AttributeDescriptor>,
        bytes: &[u8],
    ) -> Result<(Value, Option<Arc<AttributeDescriptor>>, usize)>;
}

/// The bundled default [`ValuePrimitive`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultValuePrimitive;

impl ValuePrimitive for DefaultValuePrimitive {
    fn from_network(&self, kind: ValueKind, bytes: &[u8]) -> Result<Value> {
        use ValueKind::*;
        Ok(match kind {
            String => Value::String(bytes.to_vec()),
            Octets => Value::Octets(bytes.to_vec()),
            Bool => Value::Bool(bytes[0] != 0),
            Uint8 => Value::Uint8(bytes[0]),
            Uint16 => Value::Uint16(BigEndian::read_u16(bytes)),
            Uint32 => Value::Uint32(BigEndian::read_u32(bytes)),
            Uint64 => Value::Uint64(BigEndian::read_u64(bytes)),
            Int8 => Value::Int8(bytes[0] as i8),
            Int16 => Value::Int16(BigEndian::read_i16(bytes)),
            Int32 => Value::Int32(BigEndian::read_i32(bytes)),
            Int64 => Value::Int64(BigEndian::read_i64(bytes)),
            Float32 => Value::Float32(f32::from_bits(BigEndian::read_u32(bytes))),
            Float64 => Value::Float64(f64::from_bits(BigEndian::read_u64(bytes))),
            Date => Value::Date(BigEndian::read_u32(bytes)),
            TimeDelta => Value::TimeDelta(BigEndian::read_u32(bytes)),
            Ipv4Addr => Value::Ipv4Addr(Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])),
            Ipv6Addr => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(bytes);
                Value::Ipv6Addr(Ipv6Addr::from(octets))
            }
            Ifid => {
                let mut id = [0u8; 8];
                id.copy_from_slice(bytes);
                Value::Ifid(id)
            }
            Ethernet => {
                let mut mac = [0u8; 6];
                mac.copy_from_slice(bytes);
                Value::Ethernet(mac)
            }
            Size => Value::Size(BigEndian::read_u64(bytes)),
            Abinary => {
                let len = bytes.len().min(ABINARY_LEN);
                Value::Abinary(bytes[..len].to_vec())
            }
            Ipv4Prefix | Ipv6Prefix | ComboIpAddr | ComboIpPrefix => {
                return Err(DecodeError::InvalidArguments(
                    "prefix/combo kinds are resolved by the dispatcher, not from_network",
                ))
            }
            Tlv | Struct | Vsa | Vendor | Extended => {
                return Err(DecodeError::InvalidArguments(
                    "container kinds are never scalar-decoded",
                ))
            }
        })
    }

    fn struct_from_network(
        &self,
        parent: &Arc<AttributeDescriptor>,
        bytes: &[u8],
    ) -> Result<(Value, Option<Arc<AttributeDescriptor>>, usize)> {
        let layout = parent
            .struct_layout
            .as_ref()
            .ok_or(DecodeError::InvalidArguments("STRUCT descriptor has no layout"))?;

        let mut fields = Vec::with_capacity(layout.fields.len());
        let mut offset = 0usize;
        for field_kind in &layout.fields {
            let (min, max) = size_bounds(*field_kind);
            let width = if min == max { min } else { bytes.len() - offset };
            if offset + width > bytes.len() {
                return Err(DecodeError::InsufficientData("STRUCT field overruns attribute"));
            }
            let field_bytes = &bytes[offset..offset + width];
            fields.push(self.from_network(*field_kind, field_bytes)?);
            offset += width;
        }

        if layout.trailing_string && offset < bytes.len() {
            fields.push(Value::Octets(bytes[offset..].to_vec()));
            offset = bytes.len();
        }

        Ok((Value::Struct(fields), layout.trailing_tlv_parent.clone(), offset))
    }
}
