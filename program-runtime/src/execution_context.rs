//! Execution context of a single call frame
//!
//! An [`ExecutionContext`] is created by the interpreter right before it
//! runs one call, whether that is the outermost call of a transaction, a
//! nested message call or a contract creation. The interpreter reads code
//! through it, debits gas through it for every instruction and ends it
//! exactly once, with [`ExecutionContext::return_data`] on success or
//! [`ExecutionContext::abort`] on failure.

use crate::{
    error::{Result, VmError},
    frame_ref::{Address, FrameRef},
    gas::{Gas, GasMeter},
    opcode::OpCode,
    receipt::FrameReceipt,
};
use serde::{Deserialize, Serialize};
use std::{
    cell::{Cell, RefCell},
    fmt,
    sync::Arc,
};

/// Side on which a short byte range is filled with zeroes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Zeroes before the data, keeping it right aligned
    Left,
    /// Zeroes after the data, keeping it left aligned
    Right,
}

/// Lifecycle state of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameState {
    /// Executing instructions
    Running,
    /// Ended through `return_data`; unspent gas went back to the caller
    Returned,
    /// Ended through `abort`; unspent gas was forfeited
    Aborted,
}

/// One activation of bytecode execution
pub struct ExecutionContext<'a> {
    caller: &'a dyn FrameRef,
    owner: &'a dyn FrameRef,
    code: Arc<[u8]>,
    args: Vec<u8>,
    meter: RefCell<GasMeter>,
    price: Gas,
    depth: usize,
    state: Cell<FrameState>,
}

impl<'a> ExecutionContext<'a> {
    /// Creates a context for one call
    ///
    /// # Arguments
    /// * `caller` - Frame or account that receives unspent gas on return
    /// * `owner` - Entity this frame executes as
    /// * `code` - Program to run
    /// * `gas` - Budget, owned by the context from here on
    /// * `price` - Price per unit of gas, copied into the frame
    ///
    /// # Returns
    /// A running context at depth zero with no input data
    pub fn new(
        caller: &'a dyn FrameRef,
        owner: &'a dyn FrameRef,
        code: impl Into<Arc<[u8]>>,
        gas: Gas,
        price: &Gas,
    ) -> Self {
        Self {
            caller,
            owner,
            code: code.into(),
            args: Vec::new(),
            meter: RefCell::new(GasMeter::new(gas)),
            price: price.clone(),
            depth: 0,
            state: Cell::new(FrameState::Running),
        }
    }

    /// Sets the input data of this invocation
    pub fn with_args(mut self, args: Vec<u8>) -> Self {
        self.args = args;
        self
    }

    /// Sets the call depth of this frame
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// The code being executed
    pub fn code(&self) -> &Arc<[u8]> {
        &self.code
    }

    /// Input data of this invocation
    pub fn args(&self) -> &[u8] {
        &self.args
    }

    /// Price per unit of gas for this frame
    pub fn price(&self) -> &Gas {
        &self.price
    }

    /// Call depth, zero for the outermost frame
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Current lifecycle state
    pub fn state(&self) -> FrameState {
        self.state.get()
    }

    /// Gas still available
    pub fn gas_remaining(&self) -> Gas {
        self.meter.borrow().remaining().clone()
    }

    /// Gas consumed so far
    pub fn gas_used(&self) -> Gas {
        self.meter.borrow().used().clone()
    }

    /// Address of the entity this frame runs as
    pub fn address(&self) -> Address {
        self.owner.address()
    }

    /// Address of the entity that invoked this frame
    pub fn caller_address(&self) -> Address {
        self.caller.address()
    }

    /// Byte of code at `n`, zero past the end
    pub fn get_byte(&self, n: u64) -> u8 {
        usize::try_from(n)
            .ok()
            .and_then(|n| self.code.get(n))
            .copied()
            .unwrap_or(0)
    }

    /// Instruction at `n`
    pub fn get_op(&self, n: u64) -> OpCode {
        OpCode(self.get_byte(n))
    }

    /// `size` bytes of code starting at `start`
    ///
    /// Only the part of the range that overlaps the code is read; the rest
    /// is zero filled on the side given by `padding`. Never fails, whatever
    /// `start` and `size` are.
    pub fn get_range(&self, start: u64, size: usize, padding: Padding) -> Vec<u8> {
        let len = self.code.len();
        let from = usize::try_from(start).map_or(len, |start| start.min(len));
        let to = from.saturating_add(size.min(len.saturating_sub(from)));
        let data = &self.code[from..to];

        match padding {
            Padding::Left => left_pad_bytes(data, size),
            Padding::Right => right_pad_bytes(data, size),
        }
    }

    /// Left padded range, for values read as big-endian numbers
    pub fn get_range_value(&self, start: u64, size: usize) -> Vec<u8> {
        self.get_range(start, size, Padding::Left)
    }

    /// Right padded range, for copying code regions
    pub fn get_code(&self, start: u64, size: usize) -> Vec<u8> {
        self.get_range(start, size, Padding::Right)
    }

    /// Debit `amount` gas
    ///
    /// On [`VmError::OutOfGas`] the frame is unchanged and the interpreter
    /// must stop executing it.
    pub fn use_gas(&self, amount: &Gas) -> Result<()> {
        self.ensure_running()?;
        let result = self.meter.borrow_mut().debit(amount);
        match &result {
            Ok(()) => log::trace!("frame depth {} used {} gas", self.depth, amount),
            Err(err) => log::warn!("frame depth {}: {}", self.depth, err),
        }
        result
    }

    /// Debit a small constant amount of gas
    pub fn use_gas_u64(&self, amount: u64) -> Result<()> {
        self.use_gas(&Gas::from(amount))
    }

    /// Credit `amount` gas back to this frame
    ///
    /// Used for policy refunds such as storage clears. Refunds from callees
    /// arrive through [`FrameRef::return_gas`].
    pub fn refund_gas(&self, amount: &Gas) -> Result<()> {
        self.ensure_running()?;
        self.meter.borrow_mut().credit(amount)
    }

    /// End the frame successfully
    ///
    /// All remaining gas goes back to the caller at this frame's price and
    /// `output` is handed back as the frame's result. If the caller refuses
    /// the refund the frame stays [`FrameState::Running`] and can still be
    /// aborted.
    pub fn return_data(&self, output: Vec<u8>) -> Result<Vec<u8>> {
        self.ensure_running()?;

        let remaining = self.gas_remaining();
        if let Err(err) = self.caller.return_gas(&remaining, &self.price) {
            log::error!(
                "frame depth {}: caller refused {} gas: {}",
                self.depth,
                remaining,
                err
            );
            return Err(err);
        }
        self.state.set(FrameState::Returned);

        log::debug!(
            "frame depth {} returned {} bytes, refunded {} gas",
            self.depth,
            output.len(),
            remaining
        );
        Ok(output)
    }

    /// End the frame after a failure
    ///
    /// Remaining gas is forfeited and nothing goes back to the caller.
    /// Returns the forfeited amount.
    pub fn abort(&self) -> Result<Gas> {
        self.ensure_running()?;
        self.state.set(FrameState::Aborted);

        let forfeited = self.meter.borrow_mut().forfeit();
        log::warn!(
            "frame depth {} aborted, {} gas forfeited",
            self.depth,
            forfeited
        );
        Ok(forfeited)
    }

    /// Install `code` as the owner's program
    ///
    /// This is the explicit step that finishes a contract creation; ending
    /// the frame never installs code by itself. Only a frame that returned
    /// may install code.
    pub fn install_code(&self, code: Vec<u8>) -> Result<()> {
        match self.state.get() {
            FrameState::Returned => self.owner.set_code(code),
            state => Err(VmError::FrameNotReturned { state }),
        }
    }

    /// Summary of the frame for logging and persistence
    pub fn receipt(&self, output: &[u8]) -> FrameReceipt {
        let meter = self.meter.borrow();
        FrameReceipt {
            address: self.address(),
            depth: self.depth,
            status: self.state(),
            gas_used: meter.used().clone(),
            gas_remaining: meter.remaining().clone(),
            output: output.to_vec(),
        }
    }

    fn ensure_running(&self) -> Result<()> {
        match self.state.get() {
            FrameState::Running => Ok(()),
            FrameState::Returned | FrameState::Aborted => Err(VmError::FrameTerminated),
        }
    }
}

/// A context is the caller of the frames it spawns.
impl FrameRef for ExecutionContext<'_> {
    fn return_gas(&self, gas: &Gas, _price: &Gas) -> Result<()> {
        self.ensure_running()?;
        log::debug!("frame depth {} got {} gas back", self.depth, gas);
        self.meter.borrow_mut().credit(gas)
    }

    fn address(&self) -> Address {
        self.owner.address()
    }

    fn set_code(&self, code: Vec<u8>) -> Result<()> {
        self.owner.set_code(code)
    }
}

impl fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("address", &self.address())
            .field("depth", &self.depth)
            .field("state", &self.state.get())
            .field("code_len", &self.code.len())
            .field("meter", &*self.meter.borrow())
            .field("price", &self.price)
            .finish()
    }
}

/// Prepend zeroes to `data` up to `len` bytes
pub fn left_pad_bytes(data: &[u8], len: usize) -> Vec<u8> {
    if data.len() >= len {
        return data.to_vec();
    }
    let mut padded = vec![0u8; len];
    padded[len.saturating_sub(data.len())..].copy_from_slice(data);
    padded
}

/// Append zeroes to `data` up to `len` bytes
pub fn right_pad_bytes(data: &[u8], len: usize) -> Vec<u8> {
    if data.len() >= len {
        return data.to_vec();
    }
    let mut padded = vec![0u8; len];
    padded[..data.len()].copy_from_slice(data);
    padded
}
