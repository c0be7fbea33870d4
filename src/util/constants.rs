// ZipDrop - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ZipDrop";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ZipDrop";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Server endpoint
// =============================================================================

/// Base URL of the listing server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8081";

/// Path of the receive endpoint, appended to the server URL.
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";

/// Multipart form field name the server reads file parts from.
pub const DEFAULT_FIELD_NAME: &str = "files";

/// The only HTTP status treated as a successful transfer.
pub const SUCCESS_STATUS: u16 = 200;

// =============================================================================
// Selection
// =============================================================================

/// File name suffix accepted by the selection filter (compared case-insensitively).
pub const DEFAULT_ACCEPTED_SUFFIX: &str = ".zip";

/// Maximum length of a configured suffix, including the leading dot.
pub const MAX_SUFFIX_LENGTH: usize = 16;

// =============================================================================
// Transfer limits
// =============================================================================

/// Default TCP connect timeout (seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Minimum / maximum user-configurable connect timeout (seconds).
pub const MIN_CONNECT_TIMEOUT_SECS: u64 = 1;
pub const MAX_CONNECT_TIMEOUT_SECS: u64 = 300;

/// Default per-operation socket read/write timeout (seconds).
///
/// Applies to each individual socket read or write, not to the whole
/// transfer, so large archives are not cut off.
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 60;

/// Minimum / maximum user-configurable socket I/O timeout (seconds).
pub const MIN_IO_TIMEOUT_SECS: u64 = 1;
pub const MAX_IO_TIMEOUT_SECS: u64 = 3_600;

/// Default cap on bytes read from a response body. Longer failure bodies
/// are truncated before they become a failure reason.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024; // 64 KiB

/// Minimum / maximum user-configurable response body cap.
pub const MIN_MAX_RESPONSE_BYTES: usize = 1024; // 1 KiB
pub const MAX_MAX_RESPONSE_BYTES: usize = 1024 * 1024; // 1 MiB

/// Read buffer size used when streaming a payload into the request body.
pub const PAYLOAD_CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Smallest change in a unit's progress fraction that produces a new
/// progress event. Keeps the channel from flooding on large archives.
pub const PROGRESS_EMIT_STEP: f64 = 0.01;

// =============================================================================
// Per-frame UI message budgets
// =============================================================================

/// Maximum number of upload events processed by the UI update loop per frame.
/// Remaining events stay in the channel for the next frame.
pub const MAX_UPLOAD_EVENTS_PER_FRAME: usize = 500;

/// How long a success status message stays visible (ms).
pub const SUCCESS_STATUS_VISIBLE_MS: u64 = 3_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
