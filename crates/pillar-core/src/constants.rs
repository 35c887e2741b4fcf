//! Protocol constants. Weights are in base units (1 ZNN = 10^8 base units).

/// Base units per whole ZNN. Raw pillar weights are divided by this.
pub const WEIGHT_DIVISOR: u64 = 100_000_000;

/// Momentums produced network-wide per day (one every 10 seconds).
pub const MOMENTUMS_PER_DAY: u64 = 8_640;

/// Momentums covered by a single committee allocation.
pub const MOMENTUMS_PER_ALLOCATION: u64 = 30;

/// Allocation slots per day.
///
/// # Examples
///
/// ```
/// use pillar_core::constants::ALLOCATIONS_PER_DAY;
/// assert_eq!(ALLOCATIONS_PER_DAY, 288);
/// ```
pub const ALLOCATIONS_PER_DAY: u64 = MOMENTUMS_PER_DAY / MOMENTUMS_PER_ALLOCATION;

/// Number of highest-weight active pillars forming the top tier.
pub const TOP_TIER_SIZE: usize = 30;

/// Members drawn into each of the two panels per allocation slot.
pub const PANEL_SIZE: usize = 15;

/// Producers credited per allocation slot (two panels).
pub const COMMITTEE_SIZE: usize = 2 * PANEL_SIZE;

/// Share of the daily emission paid out as momentum rewards to pillars.
pub const PILLAR_REWARD_FRACTION: f64 = 0.5;

/// Share of the daily emission paid out as delegation rewards.
pub const DELEGATION_REWARD_FRACTION: f64 = 0.24;

/// Length of one emission period in days.
pub const DAYS_PER_PERIOD: u64 = 30;

/// Daily ZNN emission for each 30-day period since genesis.
///
/// The schedule ends after the last entry; lookups past it fail rather than
/// repeating the final rate.
pub const DAILY_EMISSION_PER_PERIOD: [f64; 12] = [
    14_400.0, 8_640.0, 7_200.0, 10_080.0, 7_200.0, 5_760.0, 10_080.0, 5_760.0, 4_320.0,
    10_080.0, 4_320.0, 4_320.0,
];

/// Alphanet genesis, 2021-11-21 12:00:00 UTC, as Unix seconds.
pub const GENESIS_TIMESTAMP: i64 = 1_637_496_000;

/// Default Monte-Carlo horizon in days.
pub const DEFAULT_SIMULATION_DAYS: f64 = 2.0;

/// Default JSON-RPC endpoint of a public full node.
pub const DEFAULT_RPC_ENDPOINT: &str = "http://127.0.0.1:35997";

/// Records requested per `embedded.pillar.getAll` page.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Default path of the delimited report.
pub const DEFAULT_REPORT_PATH: &str = "pillars_with_delegation_rewards.csv";

/// Balance used when none is given; with 100 ZNN the totals read as percent.
pub const DEFAULT_HOLDER_BALANCE: f64 = 100.0;
