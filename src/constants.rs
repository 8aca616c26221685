//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// LIFECYCLE DEFAULTS
// =============================================================================

/// Default interval between expiry sweeps (one hour)
pub const DEFAULT_EXPIRY_SWEEP_INTERVAL_SECONDS: u64 = 3600;

// =============================================================================
// RATING DEFAULTS
// =============================================================================

/// Lowest accepted score
pub const MIN_SCORE: i64 = 0;

/// Highest accepted score
pub const MAX_SCORE: i64 = 100;

/// Maximum number of decimal places a score may carry
pub const SCORE_DECIMAL_PLACES: u32 = 2;

/// Decimal places kept when reporting averages and weighted scores
pub const REPORT_DECIMAL_PLACES: u32 = 2;

/// Default bound on fetch/insert/update attempts for one rating upsert
pub const DEFAULT_UPSERT_MAX_ATTEMPTS: u32 = 3;

// =============================================================================
// FIELD LIMITS
// =============================================================================

/// Maximum length of rubric, parameter, competition and entry names
pub const MAX_NAME_LENGTH: u64 = 100;

/// Maximum length of competition and entry descriptions
pub const MAX_DESCRIPTION_LENGTH: u64 = 5000;

/// Maximum length of a stored file reference
pub const MAX_FILE_PATH_LENGTH: u64 = 255;

/// Maximum length of a rating note
pub const MAX_NOTE_LENGTH: u64 = 2000;

// =============================================================================
// PRINCIPAL HEADERS
// =============================================================================

/// Header carrying the caller's principal id, set by the upstream gateway
pub const PRINCIPAL_ID_HEADER: &str = "x-principal-id";

/// Header carrying the caller's admin capability flag
pub const PRINCIPAL_ADMIN_HEADER: &str = "x-principal-admin";

// =============================================================================
// PRESET RUBRIC
// =============================================================================

/// Preset rubric created when `SEED_PRESET_RUBRIC` is enabled
pub mod preset {
    /// Rubric name
    pub const NAME: &str = "Mango";

    /// Parameter names and weights in display order
    pub const PARAMETERS: &[(&str, i32)] = &[
        ("Appearance", 10),
        ("Flavor", 24),
        ("Taste", 16),
        ("Texture", 18),
        ("Shape", 22),
        ("Nutrition", 10),
    ];
}
