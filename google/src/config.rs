// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Google Calendar API configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GoogleConfig {
    /// Base URL of the Calendar API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Page size of a baseline listing.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

const fn default_max_results() -> u32 {
    2500
}

const fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("radisync-google/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            max_results: default_max_results(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
