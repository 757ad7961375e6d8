//! API endpoint URL builders
//!
//! Helper functions to construct gateway endpoint URLs.

/// Build token acquisition URL
pub fn token_url(base_url: &str, email: &str) -> String {
    format!("{}/token?email={}", base_url, email)
}

/// Build paginated address listing URL
pub fn patients_data_address_url(base_url: &str, offset: u64) -> String {
    format!("{}/patients_data_address?offset={}", base_url, offset)
}

/// Build statistics submission URL
pub fn statistics_url(base_url: &str) -> String {
    format!("{}/statistics", base_url)
}
