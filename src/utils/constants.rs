//! Shared constants and invariants

pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 30;
pub const DEFAULT_AUTH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_AUTH_SCOPE: &str = "content";
pub const DEFAULT_TRANSLATIONS: &str = "85";
pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

// Outbound content headers
pub const HEADER_CLIENT_ID: &str = "x-client-id";
pub const HEADER_AUTH_TOKEN: &str = "x-auth-token";

pub const API_PREFIX: &str = "/quran-api";
