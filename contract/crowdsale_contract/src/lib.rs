#![no_std]

mod storage_types;


use presale_contract::PreSaleContractClient;
use soroban_sdk::{
    contract, contractimpl, panic_with_error, symbol_short, token, Address, Env,
};
use token_contract::TokenContractClient;

pub use storage_types::{
    CrowdSaleError, CONTRIBUTION_PERIOD, HARD_CAP, RATE, REFUNDABLE_PERIOD, SOFT_CAP,
    TOKEN_UNIT,
};
use storage_types::{DataKey, PersistentKey};

/// The main funding round. Contributions are open for
/// `CONTRIBUTION_PERIOD` after `start_time`; from that close until
/// `start_time + REFUNDABLE_PERIOD` the campaign sits in its refundable
/// period, where over-subscribed contributors reclaim their excess
/// (`refund_part`) and the withheld reserve can be recomputed
/// (`update_reserved`). The beneficiary may withdraw the qualified raise as
/// soon as the contribution window closes with the soft cap met; it does
/// not wait for the refundable period to elapse.
#[contract]
pub struct CrowdSaleContract;

#[contractimpl]
impl CrowdSaleContract {
    /// The prior round's cumulative raise is captured from the PreSale at
    /// initialization time.
    pub fn initialize(
        e: Env,
        owner: Address,
        start_time: u64,
        wallet: Address,
        token: Address,
        presale: Address,
        minimum_invest: i128,
        pay_token: Address,
    ) {
        if e.storage().instance().has(&DataKey::Owner) {
            panic_with_error!(&e, CrowdSaleError::AlreadyInitialized);
        }
        if minimum_invest <= 0 {
            panic_with_error!(&e, CrowdSaleError::InvalidConfiguration);
        }

        let prior_round_total = PreSaleContractClient::new(&e, &presale).raised();

        e.storage().instance().set(&DataKey::Owner, &owner);
        e.storage().instance().set(&DataKey::StartTime, &start_time);
        e.storage()
            .instance()
            .set(&DataKey::EndTime, &(start_time + CONTRIBUTION_PERIOD));
        e.storage()
            .instance()
            .set(&DataKey::EndRefundableTime, &(start_time + REFUNDABLE_PERIOD));
        e.storage().instance().set(&DataKey::Wallet, &wallet);
        e.storage().instance().set(&DataKey::Token, &token);
        e.storage().instance().set(&DataKey::PayToken, &pay_token);
        e.storage().instance().set(&DataKey::MinimumInvest, &minimum_invest);
        e.storage()
            .instance()
            .set(&DataKey::PriorRoundTotal, &prior_round_total);
        e.storage().instance().set(&DataKey::Raised, &0i128);
        e.storage().instance().set(&DataKey::Reserved, &0i128);
        e.storage().instance().set(&DataKey::Finalized, &false);
        e.storage().instance().set(&DataKey::Withdrawn, &false);
    }

    pub fn contribute(e: Env, from: Address, amount: i128) {
        from.require_auth();
        check_not_finalized(&e);

        let now = e.ledger().timestamp();
        let start_time: u64 = e.storage().instance().get(&DataKey::StartTime).unwrap();
        let end_time: u64 = e.storage().instance().get(&DataKey::EndTime).unwrap();
        if now < start_time {
            panic_with_error!(&e, CrowdSaleError::NotYetOpen);
        }
        if now >= end_time {
            panic_with_error!(&e, CrowdSaleError::WindowClosed);
        }

        let minimum_invest: i128 =
            e.storage().instance().get(&DataKey::MinimumInvest).unwrap();
        if amount < minimum_invest {
            panic_with_error!(&e, CrowdSaleError::BelowMinimum);
        }

        let pay_token: Address = e.storage().instance().get(&DataKey::PayToken).unwrap();
        token::Client::new(&e, &pay_token).transfer(
            &from,
            &e.current_contract_address(),
            &amount,
        );

        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        e.storage().instance().set(&DataKey::Raised, &(raised + amount));
        let contribution = read_contribution(&e, &from);
        e.storage().persistent().set(
            &PersistentKey::Contribution(from.clone()),
            &(contribution + amount),
        );

        let token_addr: Address = e.storage().instance().get(&DataKey::Token).unwrap();
        TokenContractClient::new(&e, &token_addr).mint(
            &e.current_contract_address(),
            &from,
            &(amount * RATE),
        );

        e.events()
            .publish((symbol_short!("contrib"), from), amount);
    }

    /// Full campaign closure, not mere contribution-window closure: stays
    /// false while any refund or reserve adjustment is still possible.
    pub fn has_ended(e: Env) -> bool {
        let end_refundable: u64 =
            e.storage().instance().get(&DataKey::EndRefundableTime).unwrap();
        e.ledger().timestamp() >= end_refundable
    }

    /// Transfer the qualified raise (minus the withheld reserve) to the
    /// beneficiary. Requires the contribution window to be closed and the
    /// soft cap met; does not require `finish_crowd_sale` first.
    pub fn withdrawal(e: Env, caller: Address) {
        require_owner(&e, &caller);
        check_not_finalized(&e);

        let end_time: u64 = e.storage().instance().get(&DataKey::EndTime).unwrap();
        if e.ledger().timestamp() < end_time {
            panic_with_error!(&e, CrowdSaleError::WindowNotOpen);
        }

        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        if raised < SOFT_CAP {
            panic_with_error!(&e, CrowdSaleError::CapNotReached);
        }

        let withdrawn: bool = e.storage().instance().get(&DataKey::Withdrawn).unwrap();
        if withdrawn {
            panic_with_error!(&e, CrowdSaleError::AlreadyWithdrawn);
        }

        let reserved: i128 = e.storage().instance().get(&DataKey::Reserved).unwrap();
        let payout = raised - reserved;

        e.storage().instance().set(&DataKey::Withdrawn, &true);

        let wallet: Address = e.storage().instance().get(&DataKey::Wallet).unwrap();
        let pay_token: Address = e.storage().instance().get(&DataKey::PayToken).unwrap();
        token::Client::new(&e, &pay_token).transfer(
            &e.current_contract_address(),
            &wallet,
            &payout,
        );

        e.events().publish((symbol_short!("withdraw"),), payout);
    }

    /// Terminal finalize marker, independent of `withdrawal`. Once set, no
    /// state-mutating call succeeds.
    pub fn finish_crowd_sale(e: Env, caller: Address) {
        require_owner(&e, &caller);
        check_not_finalized(&e);

        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        if raised < SOFT_CAP {
            panic_with_error!(&e, CrowdSaleError::CapNotReached);
        }

        e.storage().instance().set(&DataKey::Finalized, &true);

        e.events().publish((symbol_short!("finish"),), raised);
    }

    /// Full refund for the soft-cap-missed outcome.
    pub fn refund(e: Env, from: Address) {
        from.require_auth();
        check_not_finalized(&e);

        let end_time: u64 = e.storage().instance().get(&DataKey::EndTime).unwrap();
        if e.ledger().timestamp() < end_time {
            panic_with_error!(&e, CrowdSaleError::WindowNotOpen);
        }

        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        if raised >= SOFT_CAP {
            panic_with_error!(&e, CrowdSaleError::CapExceeded);
        }

        let contribution = read_contribution(&e, &from);
        if contribution <= 0 {
            panic_with_error!(&e, CrowdSaleError::NothingToRefund);
        }

        e.storage().instance().set(&DataKey::Raised, &(raised - contribution));
        e.storage()
            .persistent()
            .set(&PersistentKey::Contribution(from.clone()), &0i128);

        pay_out(&e, &from, contribution);

        e.events()
            .publish((symbol_short!("refund"), from), contribution);
    }

    /// Pro-rata return of the excess over the caller's fair share of the
    /// hard cap. Only inside the refundable period, and only when the raise
    /// was over-subscribed.
    pub fn refund_part(e: Env, from: Address) {
        from.require_auth();
        check_not_finalized(&e);
        check_refundable_window(&e);

        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        if raised < HARD_CAP {
            panic_with_error!(&e, CrowdSaleError::CapNotReached);
        }

        let contribution = read_contribution(&e, &from);
        if contribution <= 0 {
            panic_with_error!(&e, CrowdSaleError::NothingToRefund);
        }

        let fair_share = contribution * HARD_CAP / raised;
        let excess = contribution - fair_share;
        if excess <= 0 {
            panic_with_error!(&e, CrowdSaleError::NothingToRefund);
        }

        e.storage().instance().set(&DataKey::Raised, &(raised - excess));
        e.storage()
            .persistent()
            .set(&PersistentKey::Contribution(from.clone()), &fair_share);

        pay_out(&e, &from, excess);

        e.events().publish((symbol_short!("refundp"), from), excess);
    }

    /// Recompute the slice of the raise withheld from `withdrawal` to cover
    /// outstanding `refund_part` claims. Any caller may trigger it inside
    /// the refundable period once the soft cap is met.
    pub fn update_reserved(e: Env, caller: Address) {
        caller.require_auth();
        check_not_finalized(&e);
        check_refundable_window(&e);

        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        if raised < SOFT_CAP {
            panic_with_error!(&e, CrowdSaleError::CapNotReached);
        }

        let reserved = if raised > HARD_CAP { raised - HARD_CAP } else { 0 };
        e.storage().instance().set(&DataKey::Reserved, &reserved);

        e.events().publish((symbol_short!("reserve"),), reserved);
    }

    pub fn raised(e: Env) -> i128 {
        e.storage().instance().get(&DataKey::Raised).unwrap_or(0)
    }

    pub fn reserved(e: Env) -> i128 {
        e.storage().instance().get(&DataKey::Reserved).unwrap_or(0)
    }

    pub fn contribution(e: Env, addr: Address) -> i128 {
        read_contribution(&e, &addr)
    }

    pub fn prior_round_total(e: Env) -> i128 {
        e.storage().instance().get(&DataKey::PriorRoundTotal).unwrap()
    }
}

fn require_owner(e: &Env, caller: &Address) {
    caller.require_auth();
    let owner: Address = e.storage().instance().get(&DataKey::Owner).unwrap();
    if owner != *caller {
        panic_with_error!(e, CrowdSaleError::Unauthorized);
    }
}

fn check_not_finalized(e: &Env) {
    let finalized: bool = e.storage().instance().get(&DataKey::Finalized).unwrap();
    if finalized {
        panic_with_error!(e, CrowdSaleError::AlreadyFinalized);
    }
}

// Open from the contribution close until the settlement instant.
fn check_refundable_window(e: &Env) {
    let now = e.ledger().timestamp();
    let end_time: u64 = e.storage().instance().get(&DataKey::EndTime).unwrap();
    if now < end_time {
        panic_with_error!(e, CrowdSaleError::WindowNotOpen);
    }
    let end_refundable: u64 =
        e.storage().instance().get(&DataKey::EndRefundableTime).unwrap();
    if now >= end_refundable {
        panic_with_error!(e, CrowdSaleError::WindowClosed);
    }
}

fn read_contribution(e: &Env, addr: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&PersistentKey::Contribution(addr.clone()))
        .unwrap_or(0)
}

fn pay_out(e: &Env, to: &Address, amount: i128) {
    let pay_token: Address = e.storage().instance().get(&DataKey::PayToken).unwrap();
    token::Client::new(e, &pay_token).transfer(&e.current_contract_address(), to, &amount);
}
