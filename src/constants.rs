// Quota constants
pub const BASE_CATCH_LIMIT: usize = 3;
pub const QUOTA_WINDOW_SECONDS: i64 = 60 * 60; // 1 hour sliding window

// Economy constants
pub const STARTING_COINS: u64 = 20;

// Bonus catch constants
pub const BONUS_BASE_RATE: f64 = 0.01;
pub const BONUS_SCORE: u64 = 25;
pub const BONUS_COINS: u64 = 10;

// Sampling precision
pub const WEIGHT_DECIMALS: u32 = 2;
pub const LENGTH_DECIMALS: u32 = 1;

// Save system constants
pub const SAVE_VERSION_MAGIC: u64 = 0x414E474C45520000; // "ANGLER\0\0" in hex
pub const SAVE_WRITE_RETRIES: u32 = 3;
pub const SAVE_RETRY_BACKOFF_MS: u64 = 50;
