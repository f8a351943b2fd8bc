// SPDX-License-Identifier: MIT

//! The dictionary collaborator (spec §6): attribute and vendor descriptors,
//! and the runtime lookup interface this crate decodes against.
//!
//! The actual `.dictionary` file loader is out of scope for this crate
//! (see spec.md §1) — callers supply their own [`Dictionary`]
//! implementation. A small in-memory reference dictionary is bundled
//! under the `testing` feature (see [`crate::testing`]) for this crate's
//! own test suite.

use std::sync::Arc;

use crate::value::ValueKind;

bitflags::bitflags! {
    /// Per-attribute behavior flags (spec §3).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct AttributeFlags: u16 {
        /// Attribute carries an optional 1-byte tag (1..=31).
        const HAS_TAG      = 0b0000_0001;
        /// Consecutive same-type attributes concatenate into one value.
        const CONCAT       = 0b0000_0010;
        /// `fixed_length` on the descriptor is authoritative.
        const FIXED_LENGTH = 0b0000_0100;
        /// Descriptor was synthesized for an attribute absent from the
        /// dictionary.
        const IS_UNKNOWN   = 0b0000_1000;
        /// "long extended" continuation marker.
        const EXTRA        = 0b0001_0000;
    }
}

/// Encryption/obfuscation applied to an attribute's wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptKind {
    #[default]
    None,
    UserPassword,
    TunnelPassword,
    AscendSecret,
}

/// The fixed-width member kinds of a `STRUCT` attribute, in wire order,
/// plus how (if at all) the struct's tail should be handled.
///
/// Upstream resolves this from the dictionary's own child-attribute
/// records (each struct member is itself a dictionary attribute carrying
/// a byte offset). This crate models the same information directly on
/// the owning descriptor instead, since the member records themselves
/// are not otherwise needed as standalone attributes (see DESIGN.md).
#[derive(Debug, Clone, Default)]
pub struct StructLayout {
    /// Fixed-width fields, in on-wire order.
    pub fields: Vec<ValueKind>,
    /// If true, any bytes remaining after `fields` are a trailing
    /// variable-length string consumed in full.
    pub trailing_string: bool,
    /// If set, bytes remaining after `fields` are a TLV stream parented
    /// under this descriptor, rather than a trailing string.
    pub trailing_tlv_parent: Option<Arc<AttributeDescriptor>>,
}

/// The full numeric path of a synthesized "unknown" attribute, carried so
/// that a subsequent encoder could reconstruct the original bytes (spec
/// §9's "unknown-attribute synthesis" note). This crate does not itself
/// implement an encoder; the path is retained purely as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnknownPath {
    pub vendor_pen: u32,
    pub parent_id: u32,
    pub attr_id: u32,
}

/// An attribute descriptor (spec §3). Immutable once constructed;
/// "unknown" descriptors are synthesized fresh per decode and never
/// mutated afterwards either.
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    pub id: u32,
    pub parent: Option<Arc<AttributeDescriptor>>,
    pub kind: ValueKind,
    pub flags: AttributeFlags,
    pub encrypt_kind: EncryptKind,
    /// Meaningful only when `flags.contains(FIXED_LENGTH)`.
    pub fixed_length: usize,
    pub struct_layout: Option<StructLayout>,
    pub unknown: Option<UnknownPath>,
}

impl AttributeDescriptor {
    pub fn is_root(&self) -> bool {
        self.parent.is_none() && self.id == 0
    }

    pub fn has_tag(&self) -> bool {
        self.flags.contains(AttributeFlags::HAS_TAG)
    }

    pub fn is_concat(&self) -> bool {
        self.flags.contains(AttributeFlags::CONCAT)
    }

    pub fn is_unknown(&self) -> bool {
        self.flags.contains(AttributeFlags::IS_UNKNOWN)
    }

    pub fn is_long_extended(&self) -> bool {
        self.flags.contains(AttributeFlags::EXTRA)
    }
}

/// A vendor descriptor (spec §3): the sub-format a Vendor-Specific
/// attribute's payload follows for a given private enterprise number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorDescriptor {
    pub pen: u32,
    /// Sub-attribute type-width in bytes: 1, 2 or 4.
    pub type_width: u8,
    /// Sub-attribute length-width in bytes: 0, 1 or 2.
    pub length_width: u8,
    /// WiMAX-style fragment continuation is enabled for this vendor.
    pub wimax_continuation: bool,
}

/// Private enterprise number for WiMAX (spec §4.8/§4.9).
pub const VENDORPEC_WIMAX: u32 = 24757;

/// The dictionary collaborator (spec §6). Implementations are expected to
/// be cheap to look up (typically backed by a hash map or perfect hash)
/// and read-only once constructed, so that one dictionary may be shared
/// (e.g. behind an `Arc`) across concurrent decodes.
pub trait Dictionary: Send + Sync {
    fn root(&self) -> Arc<AttributeDescriptor>;
    fn child_by_num(
        &self,
        parent: &Arc<AttributeDescriptor>,
        id: u32,
    ) -> Option<Arc<AttributeDescriptor>>;
    fn child_by_kind(
        &self,
        parent: &Arc<AttributeDescriptor>,
        kind: ValueKind,
    ) -> Option<Arc<AttributeDescriptor>>;
    fn vendor_by_num(&self, pen: u32) -> Option<VendorDescriptor>;
    fn unknown_from_fields(
        &self,
        parent: &Arc<AttributeDescriptor>,
        vendor_pen: u32,
        id: u32,
    ) -> Arc<AttributeDescriptor>;
    fn unknown_vendor_from_num(&self, pen: u32) -> VendorDescriptor {
        VendorDescriptor {
            pen,
            type_width: 1,
            length_width: 1,
            wimax_continuation: false,
        }
    }
}
