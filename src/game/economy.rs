//! Sun economy: a single non-negative counter with change listeners.
//!
//! # Rules
//!
//! - Deposits of non-finite or non-positive amounts are ignored.
//! - The balance is floored to a whole number and clamped to `[0, u32::MAX]`.
//! - A spend either debits the full cost or changes nothing.
//! - Listeners see the balance once on subscribe and after every change.
//!   A failing listener is logged and skipped; it never blocks the others.

use std::fmt;

use crate::error::ListenerError;

/// Callback invoked with the balance after every change.
pub type SunListener = Box<dyn FnMut(u32) -> Result<(), ListenerError> + Send>;

/// Handle returned by [`SunBank::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The player's sun balance.
pub struct SunBank {
    /// Current balance.
    value: u32,
    /// Registered listeners in subscription order.
    listeners: Vec<(SubscriptionId, SunListener)>,
    /// Next subscription id.
    next_id: u64,
}

impl fmt::Debug for SunBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SunBank")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Floor and clamp a raw balance.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_sun(raw: f64) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}

impl SunBank {
    /// Create a bank holding `initial` sun.
    #[must_use]
    pub fn new(initial: u32) -> Self {
        Self {
            value: initial,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current balance.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Check if the balance covers `cost`.
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.value >= cost
    }

    /// Deposit sun. Non-finite and non-positive amounts are ignored.
    ///
    /// Returns `true` if the deposit was accepted.
    pub fn add(&mut self, amount: f64) -> bool {
        if !amount.is_finite() || amount <= 0.0 {
            return false;
        }

        self.value = clamp_sun(f64::from(self.value) + amount);
        self.notify();
        true
    }

    /// Debit `cost` if affordable.
    ///
    /// Returns `false` and leaves the balance unchanged otherwise.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }

        self.value -= cost;
        self.notify();
        true
    }

    /// Overwrite the balance (level reset).
    pub fn reset(&mut self, value: u32) {
        self.value = value;
        self.notify();
    }

    /// Register a listener. It is called immediately with the current
    /// balance, then after every change.
    pub fn subscribe(&mut self, mut listener: SunListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        if let Err(e) = listener(self.value) {
            tracing::warn!(subscription = id.0, "{e}");
        }
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        let value = self.value;
        for (id, listener) in &mut self.listeners {
            if let Err(e) = listener(value) {
                tracing::warn!(subscription = id.0, "{e}");
            }
        }
    }
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// A spend never underflows and never changes the balance on failure.
    #[kani::proof]
    fn prove_spend_never_underflows() {
        let initial: u32 = kani::any();
        let cost: u32 = kani::any();
        let mut bank = SunBank::new(initial);

        let ok = bank.spend(cost);
        if ok {
            assert!(bank.value() == initial - cost);
        } else {
            assert!(bank.value() == initial);
        }
    }
}
