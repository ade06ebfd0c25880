#![no_std]

mod storage_types;

#[cfg(test)]
mod test;

use soroban_sdk::{
    contract, contractimpl, panic_with_error, symbol_short, token, Address, Env,
};
use token_contract::TokenContractClient;

pub use storage_types::DividendError;
use storage_types::DataKey;

/// Distributes deposited income to token holders pro rata. Each deposit
/// opens a new round; a holder may claim at most once per round, against
/// their balance and the ledger supply at claim time.
#[contract]
pub struct DividendContract;

#[contractimpl]
impl DividendContract {
    pub fn initialize(e: Env, token: Address, pay_token: Address) {
        if e.storage().instance().has(&DataKey::Token) {
            panic_with_error!(&e, DividendError::AlreadyInitialized);
        }

        e.storage().instance().set(&DataKey::Token, &token);
        e.storage().instance().set(&DataKey::PayToken, &pay_token);
        e.storage().instance().set(&DataKey::RoundId, &0u64);
        e.storage().instance().set(&DataKey::RoundPool, &0i128);
        e.storage().instance().set(&DataKey::Pool, &0i128);
    }

    /// Anyone may deposit income for distribution. Whatever remained
    /// unclaimed of the previous pool rolls into the new round.
    pub fn deposit(e: Env, from: Address, amount: i128) {
        from.require_auth();

        if amount <= 0 {
            panic_with_error!(&e, DividendError::InvalidAmount);
        }

        let pay_token: Address = e.storage().instance().get(&DataKey::PayToken).unwrap();
        token::Client::new(&e, &pay_token).transfer(
            &from,
            &e.current_contract_address(),
            &amount,
        );

        let round: u64 = e.storage().instance().get(&DataKey::RoundId).unwrap();
        let remaining: i128 = e.storage().instance().get(&DataKey::Pool).unwrap();

        // The unclaimed remainder of the previous round rolls forward.
        let pool = remaining + amount;
        e.storage().instance().set(&DataKey::RoundId, &(round + 1));
        e.storage().instance().set(&DataKey::RoundPool, &pool);
        e.storage().instance().set(&DataKey::Pool, &pool);

        e.events().publish((symbol_short!("deposit"), from), amount);
    }

    /// Claim the caller's share of the current round. The claim marker and
    /// pool are updated before the payout so a reentrant call cannot pay
    /// twice.
    pub fn get_dividend(e: Env, claimer: Address) {
        claimer.require_auth();

        let round: u64 = e.storage().instance().get(&DataKey::RoundId).unwrap();
        if round == 0 {
            // No deposit has opened a round yet.
            panic_with_error!(&e, DividendError::NothingToClaim);
        }
        let claimed: u64 = read_claimed(&e, &claimer);
        if claimed == round {
            panic_with_error!(&e, DividendError::AlreadyClaimed);
        }

        let share = compute_share(&e, &claimer);
        let remaining: i128 = e.storage().instance().get(&DataKey::Pool).unwrap();
        if share <= 0 || share > remaining {
            panic_with_error!(&e, DividendError::NothingToClaim);
        }

        e.storage()
            .persistent()
            .set(&DataKey::Claimed(claimer.clone()), &round);
        e.storage().instance().set(&DataKey::Pool, &(remaining - share));

        let pay_token: Address = e.storage().instance().get(&DataKey::PayToken).unwrap();
        token::Client::new(&e, &pay_token).transfer(
            &e.current_contract_address(),
            &claimer,
            &share,
        );

        e.events().publish((symbol_short!("claim"), claimer), share);
    }

    /// Non-mutating eligibility probe: the same predicate `get_dividend`
    /// enforces, answered as a boolean.
    pub fn check_dividend(e: Env, claimer: Address) -> bool {
        let round: u64 = e.storage().instance().get(&DataKey::RoundId).unwrap();
        if round == 0 || read_claimed(&e, &claimer) == round {
            return false;
        }
        let share = compute_share(&e, &claimer);
        let remaining: i128 = e.storage().instance().get(&DataKey::Pool).unwrap();
        share > 0 && share <= remaining
    }

    pub fn pool(e: Env) -> i128 {
        e.storage().instance().get(&DataKey::Pool).unwrap_or(0)
    }

    pub fn round(e: Env) -> u64 {
        e.storage().instance().get(&DataKey::RoundId).unwrap_or(0)
    }
}

fn token_client(e: &Env) -> TokenContractClient<'_> {
    let token: Address = e.storage().instance().get(&DataKey::Token).unwrap();
    TokenContractClient::new(e, &token)
}

fn read_claimed(e: &Env, addr: &Address) -> u64 {
    e.storage()
        .persistent()
        .get(&DataKey::Claimed(addr.clone()))
        .unwrap_or(0)
}

// Share of the round's pool proportional to the holder's balance, both
// balance and supply measured at call time, so tokens minted after the
// deposit still participate. The fixed round pool keeps later claimers'
// shares independent of who claimed first; the remaining-pool bound in the
// callers keeps payouts within what is actually left.
fn compute_share(e: &Env, claimer: &Address) -> i128 {
    let token = token_client(e);
    let supply = token.total_supply();
    if supply <= 0 {
        return 0;
    }
    let balance = token.balance(claimer);
    if balance <= 0 {
        return 0;
    }
    let pool: i128 = e.storage().instance().get(&DataKey::RoundPool).unwrap();
    pool * balance / supply
}
