// SPDX-License-Identifier: MIT

//! A minimal in-memory [`Dictionary`] covering the attributes named in
//! this crate's own test scenarios. Not a `.dictionary` file loader —
//! real callers supply their own [`Dictionary`] implementation (spec §1,
//! §6); this one exists purely so `#[cfg(test)]` code across the crate
//! has something concrete to decode against.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dict::{
    AttributeDescriptor, AttributeFlags, Dictionary, EncryptKind, UnknownPath, VendorDescriptor,
    VENDORPEC_WIMAX,
};
use crate::value::ValueKind;

/// Well-known attribute number for `Chargeable-User-Identity` (spec §10.1).
pub const CHARGEABLE_USER_IDENTITY: u32 = crate::pair::CHARGEABLE_USER_IDENTITY;

/// PEN used by the bundled Cisco fixture entry (spec §8 scenario 2).
pub const VENDORPEC_CISCO: u32 = 9;

fn descriptor(
    id: u32,
    parent: Arc<AttributeDescriptor>,
    kind: ValueKind,
    flags: AttributeFlags,
    encrypt_kind: EncryptKind,
) -> Arc<AttributeDescriptor> {
    Arc::new(AttributeDescriptor {
        id,
        parent: Some(parent),
        kind,
        flags,
        encrypt_kind,
        fixed_length: 0,
        struct_layout: None,
        unknown: None,
    })
}

/// A small, hand-populated reference [`Dictionary`] for this crate's own
/// tests and doc examples.
pub struct ReferenceDictionary {
    root: Arc<AttributeDescriptor>,
    children: HashMap<(u32, u32), Arc<AttributeDescriptor>>,
    vendors: HashMap<u32, VendorDescriptor>,
}

impl ReferenceDictionary {
    pub fn new() -> Self {
        let root = Arc::new(AttributeDescriptor {
            id: 0,
            parent: None,
            kind: ValueKind::Tlv,
            flags: AttributeFlags::empty(),
            encrypt_kind: EncryptKind::None,
            fixed_length: 0,
            struct_layout: None,
            unknown: None,
        });

        let mut children = HashMap::new();

        children.insert(
            (0, 1),
            descriptor(1, root.clone(), ValueKind::String, AttributeFlags::empty(), EncryptKind::None),
        ); // User-Name
        children.insert(
            (0, 2),
            descriptor(
                2,
                root.clone(),
                ValueKind::String,
                AttributeFlags::empty(),
                EncryptKind::UserPassword,
            ),
        ); // User-Password
        children.insert(
            (0, 4),
            descriptor(4, root.clone(), ValueKind::Ipv4Addr, AttributeFlags::empty(), EncryptKind::None),
        ); // NAS-IP-Address
        children.insert(
            (0, 26),
            descriptor(26, root.clone(), ValueKind::Vsa, AttributeFlags::empty(), EncryptKind::None),
        ); // Vendor-Specific
        children.insert(
            (0, 69),
            descriptor(
                69,
                root.clone(),
                ValueKind::String,
                AttributeFlags::HAS_TAG,
                EncryptKind::TunnelPassword,
            ),
        ); // Tunnel-Password
        children.insert(
            (0, 79),
            descriptor(79, root.clone(), ValueKind::Octets, AttributeFlags::CONCAT, EncryptKind::None),
        ); // EAP-Message
        children.insert(
            (0, 80),
            descriptor(80, root.clone(), ValueKind::Octets, AttributeFlags::empty(), EncryptKind::None),
        ); // Message-Authenticator
        children.insert(
            (0, CHARGEABLE_USER_IDENTITY),
            descriptor(
                CHARGEABLE_USER_IDENTITY,
                root.clone(),
                ValueKind::Octets,
                AttributeFlags::empty(),
                EncryptKind::None,
            ),
        ); // Chargeable-User-Identity

        let extended = descriptor(
            27,
            root.clone(),
            ValueKind::Extended,
            AttributeFlags::EXTRA,
            EncryptKind::None,
        );
        children.insert(
            (27, 1),
            descriptor(1, extended.clone(), ValueKind::Octets, AttributeFlags::empty(), EncryptKind::None),
        );
        children.insert((0, 27), extended);

        let mut vendors = HashMap::new();
        vendors.insert(
            VENDORPEC_CISCO,
            VendorDescriptor {
                pen: VENDORPEC_CISCO,
                type_width: 1,
                length_width: 1,
                wimax_continuation: false,
            },
        );
        vendors.insert(
            VENDORPEC_WIMAX,
            VendorDescriptor {
                pen: VENDORPEC_WIMAX,
                type_width: 1,
                length_width: 1,
                wimax_continuation: true,
            },
        );

        // Vendor sub-attributes are keyed under their vendor's own PEN
        // as the "parent id", mirroring how `vsa::decode_vsa` constructs
        // a `Vendor`-kind node whose `id` is the PEN before looking up
        // children.
        let cisco_vendor_node = Arc::new(AttributeDescriptor {
            id: VENDORPEC_CISCO,
            parent: Some(root.clone()),
            kind: ValueKind::Vendor,
            flags: AttributeFlags::empty(),
            encrypt_kind: EncryptKind::None,
            fixed_length: 0,
            struct_layout: None,
            unknown: None,
        });
        children.insert(
            (VENDORPEC_CISCO, 1),
            descriptor(1, cisco_vendor_node, ValueKind::String, AttributeFlags::empty(), EncryptKind::None),
        );

        let wimax_vendor_node = Arc::new(AttributeDescriptor {
            id: VENDORPEC_WIMAX,
            parent: Some(root.clone()),
            kind: ValueKind::Vendor,
            flags: AttributeFlags::empty(),
            encrypt_kind: EncryptKind::None,
            fixed_length: 0,
            struct_layout: None,
            unknown: None,
        });
        children.insert(
            (VENDORPEC_WIMAX, 1),
            descriptor(1, wimax_vendor_node, ValueKind::Octets, AttributeFlags::empty(), EncryptKind::None),
        );

        Self { root, children, vendors }
    }
}

impl Default for ReferenceDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for ReferenceDictionary {
    fn root(&self) -> Arc<AttributeDescriptor> {
        self.root.clone()
    }

    fn child_by_num(&self, parent: &Arc<AttributeDescriptor>, id: u32) -> Option<Arc<AttributeDescriptor>> {
        self.children.get(&(parent.id, id)).cloned()
    }

    fn child_by_kind(&self, _parent: &Arc<AttributeDescriptor>, _kind: ValueKind) -> Option<Arc<AttributeDescriptor>> {
        None
    }

    fn vendor_by_num(&self, pen: u32) -> Option<VendorDescriptor> {
        self.vendors.get(&pen).copied()
    }

    fn unknown_from_fields(
        &self,
        parent: &Arc<AttributeDescriptor>,
        vendor_pen: u32,
        id: u32,
    ) -> Arc<AttributeDescriptor> {
        Arc::new(AttributeDescriptor {
            id,
            parent: Some(parent.clone()),
            kind: ValueKind::Octets,
            flags: AttributeFlags::IS_UNKNOWN,
            encrypt_kind: EncryptKind::None,
            fixed_length: 0,
            struct_layout: None,
            unknown: Some(UnknownPath {
                vendor_pen,
                parent_id: parent.id,
                attr_id: id,
            }),
        })
    }
}
