/// Lookout version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of an error fingerprint after encoding and stripping.
pub const ERROR_ID_LENGTH: usize = 16;

/// Width of the random suffix appended to behavior record ids.
pub const BEHAVIOR_ID_SUFFIX_DIGITS: usize = 6;

/// Number of random base-36 characters in a generated session token.
pub const SESSION_TOKEN_LENGTH: usize = 9;

/// Fallback page url when the host cannot provide one.
pub const UNKNOWN_PAGE_URL: &str = "about:blank";

/// Fallback message for records whose source supplied none.
pub const UNKNOWN_MESSAGE: &str = "unknown";

/// Maximum characters of element text captured from a click target.
pub const MAX_ELEMENT_TEXT_CHARS: usize = 100;

/// Bytes per megabyte, used by the heap heuristics.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Env var consulted for the error report url when none is configured.
pub const ERROR_REPORT_URL_ENV: &str = "LOOKOUT_ERROR_REPORT_URL";

/// Env var consulted for the vitals report url when none is configured.
pub const VITALS_REPORT_URL_ENV: &str = "LOOKOUT_VITALS_REPORT_URL";

/// Env var consulted for the behavior report url when none is configured.
pub const BEHAVIOR_REPORT_URL_ENV: &str = "LOOKOUT_BEHAVIOR_REPORT_URL";
