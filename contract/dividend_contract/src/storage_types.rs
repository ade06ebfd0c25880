use soroban_sdk::{contracterror, contracttype, Address};

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Token,
    PayToken,
    RoundId,
    RoundPool,
    Pool,
    Claimed(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum DividendError {
    AlreadyInitialized = 1,
    InvalidAmount = 2,
    AlreadyClaimed = 3,
    NothingToClaim = 4,
}
