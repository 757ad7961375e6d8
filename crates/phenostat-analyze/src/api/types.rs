//! API request and response types
//!
//! Matches the gateway's wire structure.

use phenostat_common::types::DataLocation;
use serde::{Deserialize, Serialize};

/// Response from `GET /token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub bearer_token: String,
}

/// One page of the gateway's address listing
///
/// The gateway signals end-of-pagination with an empty body, a JSON `null`,
/// or a body without a usable `url`. Every field is optional so all of those
/// shapes deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientDataAddress {
    /// Where to download the archive; absent or empty means no more data
    #[serde(default)]
    pub url: Option<String>,

    /// Cursor for the next listing request
    #[serde(default)]
    pub offset: Option<u64>,

    /// Expiry of the (presigned) link; carried opaquely, never interpreted
    #[serde(default)]
    pub link_expiration_timestamp_utc: Option<String>,
}

impl PatientDataAddress {
    /// Convert the page into a location, or `None` at end-of-pagination.
    ///
    /// A page without a cursor cannot advance the listing, so it is also
    /// treated as end-of-pagination.
    pub fn into_location(self) -> Option<DataLocation> {
        let url = self.url.filter(|u| !u.is_empty())?;
        let offset = self.offset?;
        Some(DataLocation::new(url, offset))
    }
}
