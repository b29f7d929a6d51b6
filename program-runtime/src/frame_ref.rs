//! The capability a frame needs from its caller and owner

use crate::{error::Result, gas::Gas};

/// Size of an address in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// Identifying address of an account
pub type Address = [u8; ADDRESS_LENGTH];

/// Anything an execution context can call back into
///
/// A frame's caller receives its unspent gas through [`FrameRef::return_gas`];
/// its owner supplies the frame's address and, for creation frames, receives
/// the produced code through [`FrameRef::set_code`].
///
/// Methods take `&self`. A caller is typically still borrowed by the frames
/// above it on the call stack, so implementors keep their mutable state
/// behind `RefCell`.
pub trait FrameRef {
    /// Accept `gas` unspent by a callee, charged at `price` per unit
    fn return_gas(&self, gas: &Gas, price: &Gas) -> Result<()>;

    /// Address of this entity
    fn address(&self) -> Address;

    /// Replace this entity's program with `code`
    fn set_code(&self, code: Vec<u8>) -> Result<()>;
}
