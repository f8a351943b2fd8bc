// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Error kinds surfaced across the decode boundary.
///
/// These replace the upstream thread-local `fr_strerror` message plus a
/// bare `-1` sentinel with an ordinary, matchable `Result` error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(&'static str),

    #[error("insufficient data: {0}")]
    InsufficientData(&'static str),

    #[error("structural overflow: {0}")]
    StructuralOverflow(&'static str),

    #[error("bad TLV header: {0}")]
    BadTlvHeader(&'static str),

    #[error("bad VSA: {0}")]
    BadVsa(&'static str),

    #[error("bad WiMAX attribute: {0}")]
    BadWimax(&'static str),

    #[error("decrypt failed, shared secret is probably incorrect")]
    DecryptWrongSecret,
}

pub type Result<T> = std::result::Result<T, DecodeError>;
