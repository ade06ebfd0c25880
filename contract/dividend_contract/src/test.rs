#![cfg(test)]

use super::*;
use soroban_sdk::{testutils::Address as _, token::StellarAssetClient, Address, Env};
use token_contract::{TokenContract, TokenContractClient};

struct Setup<'a> {
    env: Env,
    owner: Address,
    token: TokenContractClient<'a>,
    pay: StellarAssetClient<'a>,
    dividend: DividendContractClient<'a>,
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let pay_admin = Address::generate(&env);

    let token = TokenContractClient::new(&env, &env.register(TokenContract, ()));
    token.initialize(&owner);
    // The owner mints holder balances directly in these tests.
    token.add_admin(&owner, &owner);

    let pay = StellarAssetClient::new(
        &env,
        &env.register_stellar_asset_contract_v2(pay_admin).address(),
    );

    let dividend = DividendContractClient::new(&env, &env.register(DividendContract, ()));
    dividend.initialize(&token.address, &pay.address);

    Setup {
        env,
        owner,
        token,
        pay,
        dividend,
    }
}

fn deposit(s: &Setup, amount: i128) {
    let depositor = Address::generate(&s.env);
    s.pay.mint(&depositor, &amount);
    s.dividend.deposit(&depositor, &amount);
}

fn mint_tokens(s: &Setup, holder: &Address, amount: i128) {
    s.token.mint(&s.owner, holder, &amount);
}

fn pay_balance(s: &Setup, addr: &Address) -> i128 {
    soroban_sdk::token::Client::new(&s.env, &s.pay.address).balance(addr)
}

#[test]
fn test_deposit_opens_new_round() {
    let s = setup();
    let holder = Address::generate(&s.env);
    mint_tokens(&s, &holder, 100);

    assert_eq!(s.dividend.round(), 0);

    deposit(&s, 1_000);
    assert_eq!(s.dividend.round(), 1);
    assert_eq!(s.dividend.pool(), 1_000);

    deposit(&s, 500);
    assert_eq!(s.dividend.round(), 2);
    assert_eq!(s.dividend.pool(), 1_500);
}

#[test]
#[should_panic(expected = "Error(Contract, #2)")]
fn test_deposit_rejects_zero_amount() {
    let s = setup();
    let depositor = Address::generate(&s.env);

    s.dividend.deposit(&depositor, &0);
}

#[test]
fn test_sole_holder_claims_entire_pool() {
    let s = setup();
    let holder = Address::generate(&s.env);
    let later_holder = Address::generate(&s.env);
    mint_tokens(&s, &holder, 100);

    deposit(&s, 1_000);

    assert!(s.dividend.check_dividend(&holder));
    s.dividend.get_dividend(&holder);
    assert_eq!(pay_balance(&s, &holder), 1_000);
    assert_eq!(s.dividend.pool(), 0);

    // Tokens passed on after the pool was drained confer nothing this
    // round.
    s.token.transfer(&holder, &later_holder, &100);
    assert!(!s.dividend.check_dividend(&later_holder));
}

#[test]
fn test_transfer_before_claim_moves_eligibility() {
    let s = setup();
    let holder = Address::generate(&s.env);
    let recipient = Address::generate(&s.env);
    mint_tokens(&s, &holder, 100);

    deposit(&s, 1_000);

    s.token.transfer(&holder, &recipient, &100);

    // Share follows the balance at claim time, not a per-holder snapshot.
    assert!(!s.dividend.check_dividend(&holder));
    assert!(s.dividend.check_dividend(&recipient));

    s.dividend.get_dividend(&recipient);
    assert_eq!(pay_balance(&s, &recipient), 1_000);
}

#[test]
fn test_claims_are_proportional() {
    let s = setup();
    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    mint_tokens(&s, &a, 100);
    mint_tokens(&s, &b, 200);

    deposit(&s, 900);

    s.dividend.get_dividend(&a);
    s.dividend.get_dividend(&b);

    assert_eq!(pay_balance(&s, &a), 300);
    assert_eq!(pay_balance(&s, &b), 600);
    assert_eq!(s.dividend.pool(), 0);
}

#[test]
fn test_later_claimer_share_unaffected_by_earlier_claims() {
    let s = setup();
    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    mint_tokens(&s, &a, 100);
    mint_tokens(&s, &b, 300);

    deposit(&s, 1_000);

    // a takes 1000 * 100/400 = 250 first; b's 750 must not shrink.
    s.dividend.get_dividend(&a);
    assert!(s.dividend.check_dividend(&b));
    s.dividend.get_dividend(&b);
    assert_eq!(pay_balance(&s, &b), 750);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_cannot_claim_twice_in_one_round() {
    let s = setup();
    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    mint_tokens(&s, &a, 100);
    mint_tokens(&s, &b, 100);

    deposit(&s, 1_000);

    s.dividend.get_dividend(&a);
    s.dividend.get_dividend(&a);
}

#[test]
fn test_new_deposit_reopens_eligibility() {
    let s = setup();
    let holder = Address::generate(&s.env);
    mint_tokens(&s, &holder, 100);

    deposit(&s, 1_000);
    s.dividend.get_dividend(&holder);
    assert!(!s.dividend.check_dividend(&holder));

    deposit(&s, 400);
    assert!(s.dividend.check_dividend(&holder));
    s.dividend.get_dividend(&holder);
    assert_eq!(pay_balance(&s, &holder), 1_400);
}

#[test]
fn test_unclaimed_remainder_rolls_into_next_round() {
    let s = setup();
    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    mint_tokens(&s, &a, 100);
    mint_tokens(&s, &b, 100);

    deposit(&s, 1_000);
    s.dividend.get_dividend(&a);

    // b never claims round 1; their half rolls into round 2's pool.
    deposit(&s, 500);
    assert_eq!(s.dividend.pool(), 1_000);

    s.dividend.get_dividend(&b);
    assert_eq!(pay_balance(&s, &b), 500);
}

#[test]
fn test_tokens_minted_after_deposit_share_in_round() {
    let s = setup();
    let early = Address::generate(&s.env);
    let late = Address::generate(&s.env);
    mint_tokens(&s, &early, 100);

    deposit(&s, 1_000);
    mint_tokens(&s, &late, 300);

    // Supply is read at claim time, so the late mint dilutes early and
    // entitles late to 3/4 of the pool.
    s.dividend.get_dividend(&late);
    assert_eq!(pay_balance(&s, &late), 750);

    s.dividend.get_dividend(&early);
    assert_eq!(pay_balance(&s, &early), 250);
    assert_eq!(s.dividend.pool(), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #4)")]
fn test_claim_before_first_deposit_fails() {
    let s = setup();
    let holder = Address::generate(&s.env);
    mint_tokens(&s, &holder, 100);

    assert!(!s.dividend.check_dividend(&holder));
    s.dividend.get_dividend(&holder);
}

#[test]
fn test_zero_balance_holder_is_ineligible() {
    let s = setup();
    let holder = Address::generate(&s.env);
    let outsider = Address::generate(&s.env);
    mint_tokens(&s, &holder, 100);

    deposit(&s, 1_000);

    assert!(!s.dividend.check_dividend(&outsider));
}

#[test]
#[should_panic(expected = "Error(Contract, #4)")]
fn test_claim_with_zero_balance_fails() {
    let s = setup();
    let holder = Address::generate(&s.env);
    let outsider = Address::generate(&s.env);
    mint_tokens(&s, &holder, 100);

    deposit(&s, 1_000);

    s.dividend.get_dividend(&outsider);
}

#[test]
#[should_panic(expected = "Error(Contract, #1)")]
fn test_cannot_initialize_twice() {
    let s = setup();
    s.dividend.initialize(&s.token.address, &s.pay.address);
}
