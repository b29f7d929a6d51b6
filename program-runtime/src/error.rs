//! Error types for the GVM program runtime

use crate::{execution_context::FrameState, frame_ref::Address, gas::Gas};
use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, VmError>;

/// Errors that can occur while a frame executes
///
/// Out-of-gas is the only error an interpreter is expected to hit during
/// normal operation. `GasAccounting` signals a bug in whoever issued the
/// refund and must never be swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VmError {
    /// Debit larger than the remaining budget
    #[error("Out of gas: required {required}, remaining {remaining}")]
    OutOfGas {
        /// Amount the debit asked for
        required: Gas,
        /// Budget left in the frame at the time of the debit
        remaining: Gas,
    },

    /// A refund would drive the used gas counter below zero
    #[error("Gas accounting violation: refund of {refund} exceeds used gas {used}")]
    GasAccounting {
        /// Amount that was credited back
        refund: Gas,
        /// Gas used by the frame at the time of the refund
        used: Gas,
    },

    /// Account cannot pay for the gas it asked for
    #[error("Insufficient balance: required {required}, balance {balance}")]
    InsufficientBalance {
        /// Amount to be charged
        required: Gas,
        /// Balance of the account
        balance: Gas,
    },

    /// The frame already returned or aborted
    #[error("Frame already terminated")]
    FrameTerminated,

    /// Code can only be installed by a frame that returned
    #[error("Frame has not returned (state {state:?})")]
    FrameNotReturned {
        /// State the frame was in
        state: FrameState,
    },

    /// Attempt to install code on an entity that cannot hold code
    #[error("Account {} cannot hold code", hex_address(.address))]
    CodeInstallRejected {
        /// Address of the rejecting account
        address: Address,
    },

    /// Code may only be installed once, at creation
    #[error("Account {} already has code installed", hex_address(.address))]
    CodeAlreadyInstalled {
        /// Address of the contract
        address: Address,
    },

    /// Nested call would exceed the configured depth
    #[error("Call depth {depth} exceeds maximum {max}")]
    CallDepthExceeded {
        /// Depth the new frame would run at
        depth: usize,
        /// Configured limit
        max: usize,
    },

    /// Produced code is larger than the configured limit
    #[error("Code size {size} exceeds maximum {max}")]
    CodeSizeExceeded {
        /// Size of the produced code
        size: usize,
        /// Configured limit
        max: usize,
    },

    /// Receipt serialization failed
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl From<bincode::Error> for VmError {
    fn from(err: bincode::Error) -> Self {
        VmError::Encoding(err.to_string())
    }
}

fn hex_address(address: &Address) -> String {
    address.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = VmError::OutOfGas {
            required: Gas::from(100u32),
            remaining: Gas::from(50u32),
        };
        assert_eq!(err.to_string(), "Out of gas: required 100, remaining 50");

        let mut address = [0u8; 20];
        address[19] = 0xab;
        let err = VmError::CodeInstallRejected { address };
        assert_eq!(
            err.to_string(),
            "Account 00000000000000000000000000000000000000ab cannot hold code"
        );
    }
}
