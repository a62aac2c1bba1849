//! Decode strictness settings.
//!
//! The defaults accept what deployed ONUs actually send: extended-format
//! integrity octets after the trailer, any trailer value, and Get-Response
//! data that runs into the reserved error-mask octets.
//!
//! # Example
//!
//! ```
//! use omci_codec::CodecConfig;
//!
//! let config = CodecConfig::from_json(r#"{ "validate_trailer": true }"#)?;
//! assert!(config.validate_trailer);
//! assert!(config.accept_surplus_octets);
//! # Ok::<(), omci_codec::OmciError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Codec behavior knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Reject frames whose trailer is not `0x00000028`.
    pub validate_trailer: bool,
    /// Ignore octets after the 44th instead of failing with `SurplusOctets`.
    pub accept_surplus_octets: bool,
    /// Accept up to 27 octets of Get-Response data when the result code is
    /// not 9, instead of failing with `MaskMismatch` past 25.
    pub lenient_get_response: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            validate_trailer: false,
            accept_surplus_octets: true,
            lenient_get_response: true,
        }
    }
}

impl CodecConfig {
    /// Reject everything the default tolerates.
    pub fn strict() -> Self {
        Self {
            validate_trailer: true,
            accept_surplus_octets: false,
            lenient_get_response: false,
        }
    }

    /// Parse from JSON. Missing keys keep their default.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
