//! Property-based tests for the engine's core laws.
//!
//! 1. **Round trip** — deposit immediately followed by a full withdrawal
//!    returns exactly the deposited amounts and empties the pool.
//! 2. **Invariant preservation** — the reserve product never decreases
//!    across any swap sequence.
//! 3. **Output monotonicity** — a larger input buys strictly more output.
//! 4. **Fee bite** — the fee-reduced output is strictly below the no-fee
//!    constant-product output.
//! 5. **Limiting ratio** — a second deposit never mints more than either
//!    side's proportional contribution.

use proptest::prelude::*;

use crate::config::PoolConfig;
use crate::curve::{ConstantProductCurve, PricingStrategy};
use crate::domain::{Address, Amount, BasisPoints, Decimals, Rounding, Shares};
use crate::ledger::{FungibleLedger, TokenLedger};
use crate::math;
use crate::pool::Pool;

const CHAIN_ID: u64 = 31_337;

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

fn caller() -> Address {
    addr(0xA1)
}

fn d18() -> Decimals {
    Decimals::COMMON
}

fn empty_pool() -> (Pool<ConstantProductCurve>, TokenLedger, TokenLedger) {
    let weth = TokenLedger::new(addr(0x11), "Wrapped Ether", "WETH", d18(), CHAIN_ID);
    let usdc = TokenLedger::new(addr(0x12), "USD Coin", "USDC", d18(), CHAIN_ID);
    let shares = TokenLedger::new(
        addr(0xF0),
        "WETH/USDC Liquidity Pool Token",
        "WETH/USDC-LP",
        d18(),
        CHAIN_ID,
    );
    let config = PoolConfig::standard(weth.address(), usdc.address())
        .expect("distinct assets and standard fee are valid");
    let pool = Pool::new(addr(0xF0), &config, d18(), d18(), shares, ConstantProductCurve)
        .expect("fresh share ledger is valid");
    (pool, weth, usdc)
}

fn fund(ledger: &mut TokenLedger, account: Address, pool: Address, amount: u128) {
    ledger
        .mint(account, Amount::new(amount))
        .expect("test amounts fit the supply");
    ledger.approve(account, pool, Amount::new(amount));
}

/// A pool seeded with the given reserves by a separate provider account.
fn funded_pool(
    reserve_a: u128,
    reserve_b: u128,
) -> (Pool<ConstantProductCurve>, TokenLedger, TokenLedger) {
    let (mut pool, mut weth, mut usdc) = empty_pool();
    let provider = addr(0x01);
    fund(&mut weth, provider, pool.address(), reserve_a);
    fund(&mut usdc, provider, pool.address(), reserve_b);
    pool.deposit(
        &mut weth,
        &mut usdc,
        provider,
        Amount::new(reserve_a),
        Amount::new(reserve_b),
    )
    .expect("seed deposit is well-formed");
    (pool, weth, usdc)
}

proptest! {
    #[test]
    fn round_trip_returns_exact_deposit(
        amount_a in 1_000u128..1_000_000_000_000,
        amount_b in 1_000u128..1_000_000_000_000,
    ) {
        let (mut pool, mut weth, mut usdc) = empty_pool();
        fund(&mut weth, caller(), pool.address(), amount_a);
        fund(&mut usdc, caller(), pool.address(), amount_b);

        let minted = pool
            .deposit(&mut weth, &mut usdc, caller(), Amount::new(amount_a), Amount::new(amount_b))
            .expect("deposit is well-formed");
        let (out_a, out_b) = pool
            .withdraw(&mut weth, &mut usdc, caller(), minted)
            .expect("full withdrawal is well-formed");

        prop_assert_eq!(out_a, Amount::new(amount_a));
        prop_assert_eq!(out_b, Amount::new(amount_b));
        prop_assert_eq!(weth.balance_of(caller()), Amount::new(amount_a));
        prop_assert_eq!(usdc.balance_of(caller()), Amount::new(amount_b));
        prop_assert!(pool.is_empty());
        prop_assert_eq!(pool.reserve_a(), Amount::ZERO);
        prop_assert_eq!(pool.reserve_b(), Amount::ZERO);
    }

    #[test]
    fn reserve_product_never_decreases(
        reserve_a in 10_000_000_000u128..1_000_000_000_000,
        reserve_b in 10_000_000_000u128..1_000_000_000_000,
        trades in proptest::collection::vec(
            (any::<bool>(), 1_000_000u128..1_000_000_000),
            1..12,
        ),
    ) {
        let (mut pool, mut weth, mut usdc) = funded_pool(reserve_a, reserve_b);
        let trader = addr(0xB2);
        let budget = 20_000_000_000u128;
        fund(&mut weth, trader, pool.address(), budget);
        fund(&mut usdc, trader, pool.address(), budget);

        let mut product = pool.reserve_a().get() * pool.reserve_b().get();
        for (sell_a, amount) in trades {
            let asset = if sell_a { addr(0x11) } else { addr(0x12) };
            let swapped = pool.swap(&mut weth, &mut usdc, trader, asset, Amount::new(amount));
            // Tiny trades against huge reserves can be rejected outright;
            // rejection leaves the product untouched.
            if swapped.is_ok() {
                let next = pool.reserve_a().get() * pool.reserve_b().get();
                prop_assert!(next >= product, "product decreased: {} -> {}", product, next);
                product = next;
            }
        }
    }

    #[test]
    fn larger_input_buys_strictly_more(
        amount in 1_000_000u128..1_000_000_000,
    ) {
        let (mut small_pool, mut weth_s, mut usdc_s) = funded_pool(
            1_000_000_000_000,
            3_000_000_000_000,
        );
        let (mut big_pool, mut weth_b, mut usdc_b) = funded_pool(
            1_000_000_000_000,
            3_000_000_000_000,
        );
        let trader = addr(0xB2);
        fund(&mut weth_s, trader, small_pool.address(), amount);
        fund(&mut weth_b, trader, big_pool.address(), 2 * amount);

        let small = small_pool
            .swap(&mut weth_s, &mut usdc_s, trader, addr(0x11), Amount::new(amount))
            .expect("trade is well-formed");
        let big = big_pool
            .swap(&mut weth_b, &mut usdc_b, trader, addr(0x11), Amount::new(2 * amount))
            .expect("trade is well-formed");
        prop_assert!(big > small, "2x input bought {big} <= {small}");
    }

    #[test]
    fn fee_strictly_reduces_output(
        amount in 1_000_000u128..1_000_000_000,
    ) {
        let reserve_in = Amount::new(1_000_000_000_000);
        let reserve_out = Amount::new(3_000_000_000_000);
        let (net, fee) = BasisPoints::new(30)
            .deduct_from(Amount::new(amount))
            .expect("fee fits");
        prop_assert!(!fee.is_zero());

        let curve = ConstantProductCurve;
        let with_fee = curve
            .compute_output(reserve_in, reserve_out, net)
            .expect("priced");
        let without_fee = curve
            .compute_output(reserve_in, reserve_out, Amount::new(amount))
            .expect("priced");
        prop_assert!(with_fee < without_fee);
    }

    #[test]
    fn second_deposit_bounded_by_both_ratios(
        seed_a in 1_000_000u128..1_000_000_000_000,
        seed_b in 1_000_000u128..1_000_000_000_000,
        add_a in 1_000u128..1_000_000_000,
        add_b in 1_000u128..1_000_000_000,
    ) {
        let (mut pool, mut weth, mut usdc) = funded_pool(seed_a, seed_b);
        fund(&mut weth, caller(), pool.address(), add_a);
        fund(&mut usdc, caller(), pool.address(), add_b);

        let supply = pool.total_shares();
        let by_a = math::mul_div(
            Amount::new(add_a),
            supply.as_amount(),
            Amount::new(seed_a),
            Rounding::Down,
        )
        .expect("fits");
        let by_b = math::mul_div(
            Amount::new(add_b),
            supply.as_amount(),
            Amount::new(seed_b),
            Rounding::Down,
        )
        .expect("fits");

        match pool.deposit(
            &mut weth,
            &mut usdc,
            caller(),
            Amount::new(add_a),
            Amount::new(add_b),
        ) {
            Ok(minted) => {
                prop_assert!(minted.as_amount() <= by_a);
                prop_assert!(minted.as_amount() <= by_b);
                prop_assert_eq!(pool.reserve_a(), Amount::new(seed_a + add_a));
                prop_assert_eq!(pool.reserve_b(), Amount::new(seed_b + add_b));
                prop_assert_eq!(
                    pool.total_shares(),
                    Shares::new(supply.get() + minted.get())
                );
            }
            // A dust deposit against deep reserves can round to zero
            // shares, which the pool refuses.
            Err(e) => prop_assert_eq!(
                e,
                crate::error::EngineError::InvalidAmount("deposit too small to mint shares")
            ),
        }
    }
}
