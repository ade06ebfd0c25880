use soroban_sdk::{contracterror, contracttype, Address};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Owner,
    StartTime,
    EndTime,
    Wallet,
    Token,
    PayToken,
    MinimumInvest,
    Raised,
    Finalized,
    Price,
    Oracle,
    Manager,
    Contribution(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PreSaleError {
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
    NothingToRefund = 11,
    InvalidAmount = 12,
}

/// Smallest-unit scale of one whole token (7 decimals).
pub const TOKEN_UNIT: i128 = 10_000_000;

/// Maximum first-round raise, in payment-asset units.
pub const HARD_CAP: i128 = 1_000 * TOKEN_UNIT;

/// Default cost of one whole token in payment-asset units. The oracle may
/// adjust it while the window is open.
pub const DEFAULT_PRICE: i128 = TOKEN_UNIT;
