use soroban_sdk::{contracterror, contracttype, Address};

// Storage keys for instance data
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Owner,
    StartTime,
    EndTime,
    EndRefundableTime,
    Wallet,
    Token,
    PayToken,
    MinimumInvest,
    PriorRoundTotal,
    Raised,
    Reserved,
    Finalized,
    Withdrawn,
}

// Storage keys for per-contributor data
#[derive(Clone)]
#[contracttype]
pub enum PersistentKey {
    Contribution(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CrowdSaleError {
    AlreadyInitialized = 1,
    InvalidConfiguration = 2,
    Unauthorized = 3,
    NotYetOpen = 4,
    WindowClosed = 5,
    WindowNotOpen = 6,
    BelowMinimum = 7,
    CapNotReached = 8,
    CapExceeded = 9,
    AlreadyFinalized = 10,
    AlreadyWithdrawn = 11,
    NothingToRefund = 12,
}

/// Smallest-unit scale of one whole token (7 decimals).
pub const TOKEN_UNIT: i128 = 10_000_000;

/// Tokens minted per payment unit.
pub const RATE: i128 = 1;

/// Minimum viable raise. Below it every contributor may take a full refund.
pub const SOFT_CAP: i128 = 1_000 * TOKEN_UNIT;

/// Intended maximum raise. At or above it, the excess is returned pro rata
/// through `refund_part`.
pub const HARD_CAP: i128 = 1_500 * TOKEN_UNIT;

/// Length of the contribution window.
pub const CONTRIBUTION_PERIOD: u64 = 60 * 86400;

/// From the campaign start until the refund/adjustment window closes and
/// the campaign is permanently settled.
pub const REFUNDABLE_PERIOD: u64 = 140 * 86400;
