//! Shared constants for end-to-end tests

// ============================================================================
// Cover Titles
// ============================================================================

pub const TITLE_MINIMAL: &str = "מינימליסטי ומקצועי";
pub const TITLE_COLORFUL: &str = "צבעוני ואנרגטי";
pub const TITLE_ARTISTIC: &str = "אומנותי ויצירתי";
pub const TITLE_GENRE: &str = "מותאם לז'אנר";

/// Base64 of the 1x1 PNG returned for offline covers
pub const PLACEHOLDER_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR4nGNgYAAAAAMAASsJTYQAAAAASUVORK5CYII=";

/// Topic of the offline sample analysis
pub const OFFLINE_TOPIC: &str = "דוגמה: פודקאסט על טכנולוגיה";

// ============================================================================
// Prompt markers
// ============================================================================

/// Substrings that identify each cover prompt, in template order
pub const PROMPT_MARKER_MINIMAL: &str = "minimalistic";
pub const PROMPT_MARKER_COLORFUL: &str = "colorful";
pub const PROMPT_MARKER_ARTISTIC: &str = "artistic";
pub const PROMPT_MARKER_GENRE: &str = "according to genre";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Upload ceiling used by test servers (bytes)
pub const TEST_MAX_UPLOAD_BYTES: u64 = 4 * 1024;

/// Per-call backend timeout used by test servers (milliseconds)
pub const TEST_BACKEND_TIMEOUT_MS: u64 = 2000;
