#![no_std]

mod storage_types;


use soroban_sdk::{contract, contractimpl, panic_with_error, Address, Env};

pub use storage_types::TokenError;
use storage_types::{DataKey, PersistentKey};

#[contract]
pub struct TokenContract;

#[contractimpl]
impl TokenContract {
    pub fn initialize(e: Env, owner: Address) {
        if e.storage().instance().has(&DataKey::Owner) {
            panic_with_error!(&e, TokenError::AlreadyInitialized);
        }

        e.storage().instance().set(&DataKey::Owner, &owner);
        e.storage().instance().set(&DataKey::TotalSupply, &0i128);
    }

    /// Grant an address the right to mint balances. Campaign contracts are
    /// added here so their accepted contributions can be converted into
    /// token balances.
    pub fn add_admin(e: Env, caller: Address, addr: Address) {
        require_owner(&e, &caller);
        e.storage().persistent().set(&PersistentKey::Admin(addr), &true);
    }

    pub fn remove_admin(e: Env, caller: Address, addr: Address) {
        require_owner(&e, &caller);
        e.storage().persistent().remove(&PersistentKey::Admin(addr));
    }

    pub fn is_admin(e: Env, addr: Address) -> bool {
        e.storage()
            .persistent()
            .get(&PersistentKey::Admin(addr))
            .unwrap_or(false)
    }

    /// Admin-only mint. The minter authorizes the call; when the minter is a
    /// campaign contract the invocation itself carries the authorization.
    pub fn mint(e: Env, minter: Address, to: Address, amount: i128) {
        minter.require_auth();

        if amount <= 0 {
            panic_with_error!(&e, TokenError::InvalidAmount);
        }
        if !Self::is_admin(e.clone(), minter) {
            panic_with_error!(&e, TokenError::Unauthorized);
        }

        let balance = read_balance(&e, &to);
        e.storage()
            .persistent()
            .set(&PersistentKey::Balance(to), &(balance + amount));

        let supply: i128 = e.storage().instance().get(&DataKey::TotalSupply).unwrap();
        e.storage().instance().set(&DataKey::TotalSupply, &(supply + amount));
    }

    pub fn transfer(e: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();

        if amount <= 0 {
            panic_with_error!(&e, TokenError::InvalidAmount);
        }

        let from_balance = read_balance(&e, &from);
        if from_balance < amount {
            panic_with_error!(&e, TokenError::InsufficientBalance);
        }

        e.storage()
            .persistent()
            .set(&PersistentKey::Balance(from), &(from_balance - amount));

        let to_balance = read_balance(&e, &to);
        e.storage()
            .persistent()
            .set(&PersistentKey::Balance(to), &(to_balance + amount));
    }

    pub fn balance(e: Env, addr: Address) -> i128 {
        read_balance(&e, &addr)
    }

    pub fn total_supply(e: Env) -> i128 {
        e.storage().instance().get(&DataKey::TotalSupply).unwrap_or(0)
    }

    /// One-step ownership handoff.
    pub fn transfer_ownership(e: Env, caller: Address, new_owner: Address) {
        require_owner(&e, &caller);
        e.storage().instance().set(&DataKey::Owner, &new_owner);
    }

    pub fn owner(e: Env) -> Address {
        e.storage().instance().get(&DataKey::Owner).unwrap()
    }
}

fn require_owner(e: &Env, caller: &Address) {
    caller.require_auth();
    let owner: Address = e.storage().instance().get(&DataKey::Owner).unwrap();
    if owner != *caller {
        panic_with_error!(e, TokenError::Unauthorized);
    }
}

fn read_balance(e: &Env, addr: &Address) -> i128 {
    e.storage()
        .persistent()
        .get(&PersistentKey::Balance(addr.clone()))
        .unwrap_or(0)
}
