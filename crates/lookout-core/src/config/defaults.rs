// Single source of truth for all default values.

// --- Shared ---
pub const DEFAULT_ENABLE_CONSOLE_LOG: bool = true;
pub const DEFAULT_ENABLE_REPORT: bool = false;
pub const DEFAULT_SAMPLE_RATE: f64 = 1.0;

// --- Batching ---
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_INTERVAL_MS: u64 = 120_000; // 2 minutes
pub const DEFAULT_ERROR_BATCH_ENABLED: bool = true;
pub const DEFAULT_BEHAVIOR_BATCH_ENABLED: bool = false;
pub const DEFAULT_VITALS_BATCH_ENABLED: bool = false;

// --- Endpoints ---
pub const DEFAULT_ERROR_REPORT_URL: &str = "http://localhost:3000/monitor/errors-batch";
pub const DEFAULT_VITALS_REPORT_URL: &str = "http://localhost:3000/monitor/webvitals";

// --- Errors ---
pub const DEFAULT_MAX_ERRORS: usize = 100;

// --- Behavior ---
pub const DEFAULT_MAX_BEHAVIORS: usize = 1_000;
pub const DEFAULT_CLICK_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_SCROLL_THROTTLE_MS: u64 = 100;
pub const DEFAULT_INPUT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_SESSION_TIMEOUT_MS: u64 = 30 * 60 * 1_000; // 30 minutes
pub const DEFAULT_SESSION_CHECK_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_SENSITIVE_FIELDS: [&str; 5] = ["password", "pwd", "secret", "token", "key"];

// --- Vitals ---
pub const DEFAULT_MAX_VITALS: usize = 500;
pub const DEFAULT_LCP_THRESHOLD_MS: f64 = 2_500.0;
pub const DEFAULT_CLS_THRESHOLD: f64 = 0.1;
pub const DEFAULT_FCP_THRESHOLD_MS: f64 = 1_800.0;
pub const DEFAULT_TTFB_THRESHOLD_MS: f64 = 800.0;
pub const DEFAULT_INP_THRESHOLD_MS: f64 = 200.0;
pub const DEFAULT_FPS_THRESHOLD: f64 = 30.0;
pub const DEFAULT_LONG_TASK_THRESHOLD_MS: f64 = 50.0;

pub const DEFAULT_FPS_DURATION_MS: u64 = 10_000;
pub const DEFAULT_FPS_SAMPLE_INTERVAL_MS: u64 = 100;

pub const DEFAULT_LONG_TASK_MAX_TASKS: usize = 100;

pub const DEFAULT_LEAK_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_LEAK_WARNING_PERCENT: f64 = 80.0;
pub const DEFAULT_LEAK_DANGER_PERCENT: f64 = 90.0;
pub const DEFAULT_LEAK_TREND_WINDOW: usize = 10;
pub const DEFAULT_LEAK_GROWTH_MB_PER_MIN: f64 = 10.0;
pub const DEFAULT_LEAK_MAX_DURATION_MS: u64 = 300_000; // 5 minutes

pub const DEFAULT_MEMORY_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_MEMORY_DURATION_MS: u64 = 60_000;
pub const DEFAULT_MEMORY_GROWTH_MB_PER_SEC: f64 = 1.0;
pub const DEFAULT_MEMORY_USAGE_PERCENT: f64 = 80.0;
pub const DEFAULT_MEMORY_MAX_SAMPLES: usize = 100;
pub const DEFAULT_MEMORY_LEAK_WINDOW: usize = 10;
