// End-to-end token scenarios: genesis, governed minting, holder registry,
// pausing and the 256-bit input boundary.

use maskin_common::{
    amount::{parse_wrapping, tokens, U256},
    config::TokenConfig,
    crypto::Address,
    error::LedgerError,
    event::LedgerEvent,
};
use maskin_ledger::Token;

struct Actors {
    owner: Address,
    admin: Address,
    operator: Address,
    writer: Address,
    wallet: Address,
    deputation: Address,
    purchaser: Address,
}

fn actors() -> Actors {
    let owner = Address::from_index(1);
    Actors {
        owner,
        admin: Address::from_index(2),
        operator: Address::from_index(3),
        writer: Address::from_index(4),
        wallet: Address::from_index(5),
        deputation: Address::derive(&owner, "deputation"),
        purchaser: Address::from_index(6),
    }
}

fn deploy(a: &Actors) -> Token {
    let config = TokenConfig::new(a.owner, a.wallet);
    let mut token = Token::new(&config).expect("valid config");
    token.add_admin(&a.owner, &a.admin).expect("owner adds admin");
    token
        .add_operator(&a.owner, &a.operator)
        .expect("owner adds operator");
    token.pre_mint(&a.owner).expect("genesis");
    token
}

#[test]
fn test_defaults_match_deployment() {
    let a = actors();
    let token = deploy(&a);
    let rates = token.paid_rates().unwrap();
    assert_eq!((rates.system(), rates.writer(), rates.holders()), (10, 70, 20));
    assert_eq!(token.balance_of(&a.owner), tokens(500_000_000));
    assert_eq!(token.total_supply(), tokens(500_000_000));
    assert_eq!(token.deputation(), Ok(a.deputation));
    assert_eq!(token.wallet(), Ok(a.wallet));
}

#[test]
fn test_governed_mint_of_ten_thousand_tokens() {
    let a = actors();
    let mut token = deploy(&a);
    let supply_before = token.total_supply();

    let id = token
        .submit_mint_request(&a.operator, &a.writer, tokens(10_000))
        .unwrap();
    token.confirm_mint_request(&a.admin, id).unwrap();

    assert_eq!(token.balance_of(&a.writer), tokens(7_000));
    assert_eq!(token.balance_of(&a.deputation), tokens(2_000));
    assert_eq!(token.balance_of(&a.wallet), tokens(1_000));
    assert_eq!(token.total_supply(), supply_before + tokens(10_000));

    // Second confirmation fails and credits nobody
    assert_eq!(
        token.confirm_mint_request(&a.admin, id),
        Err(LedgerError::AlreadyExecuted(id))
    );
    assert_eq!(token.balance_of(&a.writer), tokens(7_000));
    assert_eq!(token.total_supply(), supply_before + tokens(10_000));
}

#[test]
fn test_holder_order_follows_first_credit() {
    let a = actors();
    let mut token = deploy(&a);
    token.mint(&a.admin, &a.writer, tokens(100)).unwrap();

    assert_eq!(token.holder_count(&a.owner), Ok(4));
    let holders: Vec<_> = (0..4)
        .map(|i| token.holder(&a.admin, i).unwrap())
        .collect();
    assert_eq!(holders, vec![a.owner, a.writer, a.wallet, a.deputation]);
    assert_eq!(
        token.holder(&a.owner, 4),
        Err(LedgerError::IndexOutOfRange { index: 4, count: 4 })
    );
    assert_eq!(
        token.holder_count(&a.purchaser),
        Err(LedgerError::Unauthorized)
    );
}

#[test]
fn test_mint_request_events() {
    let a = actors();
    let mut token = deploy(&a);
    token.drain_events();

    token
        .submit_mint_request(&a.operator, &a.writer, tokens(1))
        .unwrap();
    assert_eq!(
        token.events()[0].event,
        LedgerEvent::MintSubmission {
            mint_request_id: 0,
            sender: a.writer,
            amount: tokens(1),
        }
    );
    token.confirm_mint_request(&a.admin, 0).unwrap();
    assert_eq!(
        token.events().last().map(|e| e.event.clone()),
        Some(LedgerEvent::ConfirmMintRequest {
            mint_request_id: 0,
            addr: a.writer,
            value: tokens(1),
        })
    );
}

#[test]
fn test_pause_blocks_value_movement_but_not_governance() {
    let a = actors();
    let mut token = deploy(&a);
    token.transfer(&a.owner, &a.purchaser, tokens(10)).unwrap();
    token.approve(&a.purchaser, &a.writer, tokens(5)).unwrap();
    token.pause(&a.owner).unwrap();

    let paused = Err(LedgerError::ContractPaused);
    assert_eq!(token.transfer(&a.purchaser, &a.writer, tokens(1)), paused);
    assert_eq!(token.approve(&a.purchaser, &a.writer, tokens(1)), paused);
    assert_eq!(
        token.transfer_from(&a.writer, &a.purchaser, &a.writer, tokens(1)),
        paused
    );
    assert_eq!(token.burn(&a.purchaser, tokens(1), "burn when pause"), paused);

    token.mint(&a.admin, &a.writer, tokens(100)).unwrap();
    token
        .submit_mint_request(&a.operator, &a.writer, tokens(100))
        .unwrap();
    token.confirm_mint_request(&a.admin, 0).unwrap();
    token.change_paid_rates(&a.admin, 20, 60).unwrap();
    token.add_admin(&a.owner, &a.purchaser).unwrap();
    assert_eq!(token.balance_of(&a.writer), tokens(140));

    token.unpause(&a.owner).unwrap();
    token
        .burn(&a.purchaser, tokens(10), "burn when unpause")
        .unwrap();
    assert_eq!(token.balance_of(&a.purchaser), U256::zero());
}

#[test]
fn test_transfer_to_null_is_self_service_withdrawal() {
    let a = actors();
    let mut token = deploy(&a);
    token.transfer(&a.owner, &a.purchaser, tokens(10)).unwrap();
    let supply = token.total_supply();

    token
        .transfer(&a.purchaser, &Address::null(), tokens(4))
        .unwrap();
    assert_eq!(token.balance_of(&a.purchaser), tokens(6));
    assert_eq!(token.total_supply(), supply - tokens(4));
    // The null address never becomes a holder
    assert_eq!(token.is_holder(&Address::null()), Ok(false));
}

#[test]
fn test_amounts_past_256_bits_wrap_at_decoding() {
    let a = actors();
    let mut token = deploy(&a);
    let max = U256::MAX.to_string();
    // max + 1 and max + 1 + 7, spelled out in decimal
    let over = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
    let over_plus_seven =
        "115792089237316195423570985008687907853269984665640564039457584007913129639943";

    token
        .approve(&a.owner, &a.purchaser, parse_wrapping(&max).unwrap())
        .unwrap();
    assert_eq!(token.allowance(&a.owner, &a.purchaser), U256::MAX);

    token
        .approve(&a.owner, &a.purchaser, parse_wrapping(over).unwrap())
        .unwrap();
    assert_eq!(token.allowance(&a.owner, &a.purchaser), U256::zero());

    // A wrapped transfer moves nothing and succeeds
    let before = token.balance_of(&a.owner);
    token
        .transfer(&a.owner, &a.purchaser, parse_wrapping(over).unwrap())
        .unwrap();
    assert_eq!(token.balance_of(&a.owner), before);

    token
        .transfer(&a.owner, &a.purchaser, parse_wrapping(over_plus_seven).unwrap())
        .unwrap();
    assert_eq!(token.balance_of(&a.purchaser), U256::from(7u64));
}

#[test]
fn test_rejected_calls_leave_no_events() {
    let a = actors();
    let mut token = deploy(&a);
    token.drain_events();

    assert!(token.transfer(&a.purchaser, &a.writer, tokens(1)).is_err());
    assert!(token.confirm_mint_request(&a.admin, 0).is_err());
    assert!(token.pause(&a.admin).is_err());
    assert!(token.events().is_empty());
}
