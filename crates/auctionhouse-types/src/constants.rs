//! System-wide constants for the AuctionHouse engine.

/// Default anti-snipe window: a bid landing within this many seconds of
/// the end pushes the end out so this much time remains.
pub const DEFAULT_TIME_BUFFER_SECS: u64 = 15 * 60;

/// Default minimum relative increase of a new bid over the standing one.
pub const DEFAULT_MIN_BID_INCREMENT_PERCENTAGE: u8 = 5;

/// Percentages are whole numbers out of this.
pub const PERCENTAGE_SCALE: u8 = 100;

/// Decimals of the native currency (and its wrapped form).
pub const NATIVE_DECIMALS: u32 = 18;

/// Largest decimal scale `rust_decimal` can represent.
pub const MAX_DECIMALS: u32 = 28;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "AuctionHouse";
