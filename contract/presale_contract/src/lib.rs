#![no_std]

mod storage_types;


use soroban_sdk::{
    contract, contractimpl, panic_with_error, symbol_short, token, Address, Env,
};
use token_contract::TokenContractClient;

pub use storage_types::{PreSaleError, DEFAULT_PRICE, HARD_CAP, TOKEN_UNIT};
use storage_types::DataKey;

#[contract]
pub struct PreSaleContract;

#[contractimpl]
impl PreSaleContract {
    /// Set up the first funding round. `period` is the length of the
    /// contribution window in seconds; `token` is the ledger this campaign
    /// mints on (it must be added to the ledger's admin set), `pay_token`
    /// the asset contributions are paid in.
    pub fn initialize(
        e: Env,
        owner: Address,
        start_time: u64,
        period: u64,
        wallet: Address,
        token: Address,
        minimum_invest: i128,
        pay_token: Address,
    ) {
        if e.storage().instance().has(&DataKey::Owner) {
            panic_with_error!(&e, PreSaleError::AlreadyInitialized);
        }
        if period == 0 || minimum_invest <= 0 {
            panic_with_error!(&e, PreSaleError::InvalidConfiguration);
        }

        e.storage().instance().set(&DataKey::Owner, &owner);
        e.storage().instance().set(&DataKey::StartTime, &start_time);
        e.storage().instance().set(&DataKey::EndTime, &(start_time + period));
        e.storage().instance().set(&DataKey::Wallet, &wallet);
        e.storage().instance().set(&DataKey::Token, &token);
        e.storage().instance().set(&DataKey::PayToken, &pay_token);
        e.storage().instance().set(&DataKey::MinimumInvest, &minimum_invest);
        e.storage().instance().set(&DataKey::Raised, &0i128);
        e.storage().instance().set(&DataKey::Finalized, &false);
        e.storage().instance().set(&DataKey::Price, &DEFAULT_PRICE);
    }

    /// Accept a contribution inside the window, pull the payment and mint
    /// the corresponding token amount to the contributor.
    pub fn contribute(e: Env, from: Address, amount: i128) {
        from.require_auth();
        check_not_finalized(&e);

        let now = e.ledger().timestamp();
        let start_time: u64 = e.storage().instance().get(&DataKey::StartTime).unwrap();
        let end_time: u64 = e.storage().instance().get(&DataKey::EndTime).unwrap();
        if now < start_time {
            panic_with_error!(&e, PreSaleError::NotYetOpen);
        }
        if now >= end_time {
            panic_with_error!(&e, PreSaleError::WindowClosed);
        }

        let minimum_invest: i128 =
            e.storage().instance().get(&DataKey::MinimumInvest).unwrap();
        if amount < minimum_invest {
            panic_with_error!(&e, PreSaleError::BelowMinimum);
        }

        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        if raised + amount > HARD_CAP {
            panic_with_error!(&e, PreSaleError::CapExceeded);
        }

        let pay_token: Address = e.storage().instance().get(&DataKey::PayToken).unwrap();
        token::Client::new(&e, &pay_token).transfer(
            &from,
            &e.current_contract_address(),
            &amount,
        );

        e.storage().instance().set(&DataKey::Raised, &(raised + amount));
        let contribution = read_contribution(&e, &from);
        e.storage()
            .persistent()
            .set(&DataKey::Contribution(from.clone()), &(contribution + amount));

        mint_tokens(&e, &from, tokens_for(&e, amount));

        e.events()
            .publish((symbol_short!("contrib"), from), amount);
    }

    pub fn has_ended(e: Env) -> bool {
        let end_time: u64 = e.storage().instance().get(&DataKey::EndTime).unwrap();
        e.ledger().timestamp() >= end_time
    }

    /// Close the round and forward the raise to the beneficiary wallet.
    /// Allowed once something was raised and either the hard cap is hit or
    /// the window has elapsed. Terminal: refunds fail from here on.
    pub fn finish_pre_sale(e: Env, caller: Address) {
        require_owner(&e, &caller);
        check_not_finalized(&e);

        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        let end_time: u64 = e.storage().instance().get(&DataKey::EndTime).unwrap();
        let now = e.ledger().timestamp();
        if raised <= 0 || (raised < HARD_CAP && now < end_time) {
            panic_with_error!(&e, PreSaleError::CapNotReached);
        }

        e.storage().instance().set(&DataKey::Finalized, &true);

        let wallet: Address = e.storage().instance().get(&DataKey::Wallet).unwrap();
        let pay_token: Address = e.storage().instance().get(&DataKey::PayToken).unwrap();
        token::Client::new(&e, &pay_token).transfer(
            &e.current_contract_address(),
            &wallet,
            &raised,
        );

        e.events().publish((symbol_short!("finish"),), raised);
    }

    /// Return a contributor's full payment once the window has elapsed
    /// without the round being finalized.
    pub fn refund(e: Env, from: Address) {
        from.require_auth();
        check_not_finalized(&e);

        let end_time: u64 = e.storage().instance().get(&DataKey::EndTime).unwrap();
        if e.ledger().timestamp() < end_time {
            panic_with_error!(&e, PreSaleError::WindowNotOpen);
        }

        let contribution = read_contribution(&e, &from);
        if contribution <= 0 {
            panic_with_error!(&e, PreSaleError::NothingToRefund);
        }

        // Bookkeeping strictly before the outbound transfer.
        let raised: i128 = e.storage().instance().get(&DataKey::Raised).unwrap();
        e.storage().instance().set(&DataKey::Raised, &(raised - contribution));
        e.storage()
            .persistent()
            .set(&DataKey::Contribution(from.clone()), &0i128);

        let pay_token: Address = e.storage().instance().get(&DataKey::PayToken).unwrap();
        token::Client::new(&e, &pay_token).transfer(
            &e.current_contract_address(),
            &from,
            &contribution,
        );

        e.events()
            .publish((symbol_short!("refund"), from), contribution);
    }

    /// Owner designates the price oracle.
    pub fn set_oracle(e: Env, caller: Address, oracle: Address) {
        require_owner(&e, &caller);
        e.storage().instance().set(&DataKey::Oracle, &oracle);
    }

    /// Oracle-only price adjustment, in payment units per whole token.
    pub fn change_price(e: Env, caller: Address, new_price: i128) {
        caller.require_auth();
        let oracle: Option<Address> = e.storage().instance().get(&DataKey::Oracle);
        if oracle != Some(caller) {
            panic_with_error!(&e, PreSaleError::Unauthorized);
        }
        if new_price <= 0 {
            panic_with_error!(&e, PreSaleError::InvalidAmount);
        }
        e.storage().instance().set(&DataKey::Price, &new_price);
    }

    /// Owner designates a manager allowed to hand out tokens manually.
    pub fn set_manager(e: Env, caller: Address, manager: Address) {
        require_owner(&e, &caller);
        e.storage().instance().set(&DataKey::Manager, &manager);
    }

    /// Mint tokens without payment, for off-ledger settled deals. Owner or
    /// manager only.
    pub fn manual_transfer(e: Env, caller: Address, to: Address, tokens: i128) {
        caller.require_auth();

        let owner: Address = e.storage().instance().get(&DataKey::Owner).unwrap();
        let manager: Option<Address> = e.storage().instance().get(&DataKey::Manager);
        if caller != owner && manager != Some(caller) {
            panic_with_error!(&e, PreSaleError::Unauthorized);
        }
        if tokens <= 0 {
            panic_with_error!(&e, PreSaleError::InvalidAmount);
        }

        mint_tokens(&e, &to, tokens);
    }

    pub fn raised(e: Env) -> i128 {
        e.storage().instance().get(&DataKey::Raised).unwrap_or(0)
    }

    pub fn contribution(e: Env, addr: Address) -> i128 {
        read_contribution(&e, &addr)
    }

    pub fn price(e: Env) -> i128 {
        e.storage().instance().get(&DataKey::Price).unwrap()
    }
}

fn require_owner(e: &Env, caller: &Address) {
    caller.require_auth();
    let owner: Address = e.storage().instance().get(&DataKey::Owner).unwrap();
    if owner != *caller {
        panic_with_error!(e, PreSaleError::Unauthorized);
    }
}

fn check_not_finalized(e: &Env) {
    let finalized: bool = e.storage().instance().get(&DataKey::Finalized).unwrap();
    if finalized {
        panic_with_error!(e, PreSaleError::AlreadyFinalized);
    }
}

fn read_contribution(e: &Env, addr: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&DataKey::Contribution(addr.clone()))
        .unwrap_or(0)
}

fn tokens_for(e: &Env, amount: i128) -> i128 {
    let price: i128 = e.storage().instance().get(&DataKey::Price).unwrap();
    amount * TOKEN_UNIT / price
}

fn mint_tokens(e: &Env, to: &Address, tokens: i128) {
    let token: Address = e.storage().instance().get(&DataKey::Token).unwrap();
    TokenContractClient::new(e, &token).mint(&e.current_contract_address(), to, &tokens);
}
