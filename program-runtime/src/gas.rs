//! Gas metering
//!
//! Gas and prices are arbitrary-precision unsigned integers so that budget
//! arithmetic can never wrap. [`GasMeter`] is the per-frame counter pair;
//! [`GasSchedule`] holds the costs an interpreter charges against it.

use crate::error::{Result, VmError};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Amount of gas, or price per unit of gas
pub type Gas = BigUint;

/// Remaining and used gas of a single frame
///
/// `remaining + used` always equals the budget the meter was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    remaining: Gas,
    used: Gas,
}

impl GasMeter {
    /// Takes ownership of `budget` as the frame's remaining gas
    pub fn new(budget: Gas) -> Self {
        Self {
            remaining: budget,
            used: Gas::zero(),
        }
    }

    /// Gas still available to the frame
    pub fn remaining(&self) -> &Gas {
        &self.remaining
    }

    /// Gas consumed so far
    pub fn used(&self) -> &Gas {
        &self.used
    }

    /// Budget the meter was created with
    pub fn granted(&self) -> Gas {
        &self.remaining + &self.used
    }

    /// Debit `amount`
    ///
    /// Leaves both counters untouched when the budget is insufficient.
    pub fn debit(&mut self, amount: &Gas) -> Result<()> {
        if self.remaining < *amount {
            return Err(VmError::OutOfGas {
                required: amount.clone(),
                remaining: self.remaining.clone(),
            });
        }
        self.remaining -= amount;
        self.used += amount;
        Ok(())
    }

    /// Credit `amount` back to the remaining budget
    pub fn credit(&mut self, amount: &Gas) -> Result<()> {
        if self.used < *amount {
            log::error!(
                "gas accounting violation: refund {} exceeds used {}",
                amount,
                self.used
            );
            return Err(VmError::GasAccounting {
                refund: amount.clone(),
                used: self.used.clone(),
            });
        }
        self.used -= amount;
        self.remaining += amount;
        Ok(())
    }

    /// Move all remaining gas into the used counter
    pub fn forfeit(&mut self) -> Gas {
        let forfeited = std::mem::take(&mut self.remaining);
        self.used += &forfeited;
        forfeited
    }
}

/// Gas costs charged by an interpreter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSchedule {
    /// Base cost of every instruction
    pub step: u64,
    /// Extra cost of a message call
    pub call: u64,
    /// Extra cost of a contract creation
    pub create: u64,
    /// Cost per byte of code deposited by a creation frame
    pub create_data_per_byte: u64,
    /// Linear cost per 32-byte memory word
    pub memory_word: u64,
    /// Divisor of the quadratic memory term
    pub memory_quad_divisor: u64,
    /// Gas granted back when a storage slot is cleared
    pub storage_clear_refund: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            step: 1,
            call: 20,
            create: 100,
            create_data_per_byte: 5,
            memory_word: 3,
            memory_quad_divisor: 512,
            storage_clear_refund: 100,
        }
    }
}

/// Size of a memory word in bytes
pub const WORD_SIZE: u64 = 32;

/// Number of words needed to hold `bytes` bytes, rounded up
pub fn words_for(bytes: u64) -> u64 {
    bytes.div_ceil(WORD_SIZE)
}

impl GasSchedule {
    /// Total cost of a memory of `words` words
    pub fn memory_cost(&self, words: u64) -> Gas {
        let words = Gas::from(words);
        let linear = &words * self.memory_word;
        let quadratic = if self.memory_quad_divisor == 0 {
            Gas::zero()
        } else {
            (&words * &words) / self.memory_quad_divisor
        };
        linear + quadratic
    }

    /// Cost of growing memory from `current_words` to `new_words`
    ///
    /// Shrinking or staying the same size is free.
    pub fn memory_expansion_cost(&self, current_words: u64, new_words: u64) -> Gas {
        if new_words <= current_words {
            return Gas::zero();
        }
        self.memory_cost(new_words) - self.memory_cost(current_words)
    }

    /// Cost of depositing `len` bytes of code at the end of a creation
    pub fn code_deposit_cost(&self, len: usize) -> Gas {
        Gas::from(len) * self.create_data_per_byte
    }
}
