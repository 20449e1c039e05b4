#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use verdant::game::SunBank;

/// One operation on the bank.
#[derive(Arbitrary, Debug)]
enum BankOp {
    /// Deposit any amount, including NaN and infinities.
    Add(f64),
    /// Try to spend.
    Spend(u32),
    /// Overwrite the balance.
    Reset(u32),
}

/// Structured input for economy fuzzing.
#[derive(Arbitrary, Debug)]
struct EconomyInput {
    /// Starting balance.
    initial: u32,
    /// Operations, applied in order.
    ops: Vec<BankOp>,
}

fuzz_target!(|input: EconomyInput| {
    let mut bank = SunBank::new(input.initial);

    for op in input.ops.into_iter().take(1000) {
        let before = bank.value();
        match op {
            BankOp::Add(amount) => {
                let accepted = bank.add(amount);
                if !amount.is_finite() || amount <= 0.0 {
                    assert!(!accepted, "deposit of {amount} accepted");
                    assert_eq!(bank.value(), before);
                } else {
                    assert!(bank.value() >= before, "deposit lowered the balance");
                }
            }
            BankOp::Spend(cost) => {
                let ok = bank.spend(cost);
                if ok {
                    assert_eq!(bank.value(), before - cost);
                } else {
                    assert!(cost > before, "affordable spend of {cost} refused at {before}");
                    assert_eq!(bank.value(), before);
                }
            }
            BankOp::Reset(value) => {
                bank.reset(value);
                assert_eq!(bank.value(), value);
            }
        }
    }
});
