//! GVM Program Runtime
//!
//! This crate provides the per-frame execution context of the GVM bytecode
//! interpreter: bounds-safe access to a frame's code and exact gas
//! accounting, including handing unspent gas back to the caller when the
//! frame ends.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Interpreter / dispatch loop      │
//! │   (decodes opcodes, runs instructions)  │
//! └────────────────┬────────────────────────┘
//!                  │
//!                  │ create ExecutionContext per call
//!                  │ get_op / get_range / use_gas
//!                  │ return_data or abort
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │    gvm-program-runtime (this crate)     │
//! │  ┌─────────────────────────────────┐    │
//! │  │    ExecutionContext             │    │
//! │  │  - Code access (zero filled)    │    │
//! │  │  - GasMeter (debit / credit)    │    │
//! │  │  (implements FrameRef)          │    │
//! │  └─────────────────────────────────┘    │
//! │  ┌─────────────────────────────────┐    │
//! │  │    FrameRef                     │    │
//! │  │  - ExternalAccount              │    │
//! │  │  - ContractAccount              │    │
//! │  └─────────────────────────────────┘    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use gvm_program_runtime::{ContractAccount, ExecutionContext, ExternalAccount, Gas};
//!
//! let sender = ExternalAccount::new([1u8; 20], Gas::from(0u32));
//! let contract = ContractAccount::new([2u8; 20], vec![0x60, 0x01, 0x00]);
//!
//! let context = ExecutionContext::new(
//!     &sender,
//!     &contract,
//!     contract.code(),
//!     Gas::from(1000u32),
//!     &Gas::from(1u32),
//! );
//! assert_eq!(context.get_byte(0), 0x60);
//!
//! context.use_gas_u64(400).unwrap();
//! let output = context.return_data(vec![0x2a]).unwrap();
//!
//! assert_eq!(output, vec![0x2a]);
//! assert_eq!(sender.refunded_gas(), Gas::from(600u32));
//! ```

#![warn(missing_docs)]
#![deny(clippy::arithmetic_side_effects)]

pub mod accounts;
pub mod config;
pub mod error;
pub mod execution_context;
pub mod frame_ref;
pub mod gas;
pub mod opcode;
pub mod receipt;

// Re-export main types
pub use accounts::{ContractAccount, ExternalAccount};
pub use config::RuntimeConfig;
pub use error::{Result, VmError};
pub use execution_context::{ExecutionContext, FrameState, Padding};
pub use frame_ref::{Address, FrameRef};
pub use gas::{Gas, GasMeter, GasSchedule};
pub use opcode::OpCode;
pub use receipt::FrameReceipt;
