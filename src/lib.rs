// SPDX-License-Identifier: MIT

//! A dictionary-driven decoder for the on-wire attribute payload of a
//! RADIUS packet: it turns a raw attribute buffer into a sequence of
//! typed [`pair::Pair`] values, handling along the way:
//!
//!  * `User-Password` and `Tunnel-Password` de-obfuscation ([`crypto`]);
//!  * reassembly of consecutive same-type attributes (`concat`) and of
//!    fragmented "long extended" attributes ([`decode_pair_value`]);
//!  * Vendor-Specific Attribute expansion, including the WiMAX
//!    sub-format's own cross-attribute fragment reassembly;
//!  * recursive TLV/struct sub-attribute decoding driven by a
//!    caller-supplied runtime [`dict::Dictionary`].
//!
//! This crate decodes; it does not parse `.dictionary` files, validate
//! packet-level authentication, or encode attributes back to wire
//! format — those are external collaborators (see `dict`, `value` and
//! `crypto` traits) supplied by the caller. A small bundled reference
//! dictionary is available under the `testing` feature for exercising
//! this crate's own test suite.
//!
//! Entry points: [`pair::decode_pair`] consumes one RFC-format attribute
//! header plus value from a packet buffer; [`decode_pair_value`] is the
//! recursive dispatcher it calls into, exposed directly for callers
//! that have already stripped a header themselves.

pub mod crypto;
pub mod dict;
pub mod error;
pub mod pair;
pub mod value;

mod buffer;
mod concat;
mod dispatch;
mod extended;
mod tlv;
mod vsa;
mod wimax;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use dispatch::decode_pair_value;
pub use error::{DecodeError, Result};
pub use pair::{decode_pair, DecoderContext, Pair, Vector};
