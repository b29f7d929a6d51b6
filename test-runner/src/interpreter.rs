//! Minimal dispatch loop over execution contexts
//!
//! Just enough of an instruction set to drive frames through the paths that
//! matter for metering: per-instruction debits, memory growth, nested calls
//! that lend gas to the callee, and creations whose output becomes the new
//! contract's code.

use crate::world::World;
use gvm_program_runtime::{
    config::MAX_GAS_LIMIT,
    gas::{words_for, WORD_SIZE},
    Address, ContractAccount, ExecutionContext, ExternalAccount, FrameReceipt, FrameRef,
    FrameState, Gas, OpCode, RuntimeConfig, VmError,
};
use num_traits::{One, ToPrimitive, Zero};
use std::rc::Rc;
use thiserror::Error;

/// Instruction tags understood by the interpreter
pub mod op {
    /// Halt, returning nothing
    pub const STOP: u8 = 0x00;
    /// Add the two top words, modulo 2^256
    pub const ADD: u8 = 0x01;
    /// Push the frame's own address
    pub const ADDRESS: u8 = 0x30;
    /// Push the caller's address
    pub const CALLER: u8 = 0x33;
    /// Copy code into memory: dest, offset, size
    pub const CODECOPY: u8 = 0x39;
    /// Drop the top word
    pub const POP: u8 = 0x50;
    /// Store one byte: offset, value
    pub const MSTORE8: u8 = 0x53;
    /// Push the remaining gas
    pub const GAS: u8 = 0x5a;
    /// Push the next byte
    pub const PUSH1: u8 = 0x60;
    /// Push the next two bytes
    pub const PUSH2: u8 = 0x61;
    /// Push the next twenty bytes
    pub const PUSH20: u8 = 0x73;
    /// Push the next thirty-two bytes
    pub const PUSH32: u8 = 0x7f;
    /// Create a contract from memory: offset, size
    pub const CREATE: u8 = 0xf0;
    /// Call a contract: gas, address
    pub const CALL: u8 = 0xf1;
    /// Halt, returning memory: offset, size
    pub const RETURN: u8 = 0xf3;
}

/// Maximum number of words on the stack
pub const STACK_LIMIT: usize = 1024;

/// Why a frame stopped early
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecError {
    /// Error raised by the execution context
    #[error(transparent)]
    Vm(#[from] VmError),

    /// Instruction needed more operands than the stack holds
    #[error("stack underflow at pc {0}")]
    StackUnderflow(u64),

    /// Push beyond [`STACK_LIMIT`]
    #[error("stack overflow at pc {0}")]
    StackOverflow(u64),

    /// Tag with no instruction behind it
    #[error("invalid opcode {op} at pc {pc}")]
    InvalidOpcode {
        /// The tag
        op: OpCode,
        /// Where it was found
        pc: u64,
    },

    /// Operand too large to be an offset or size
    #[error("operand out of range at pc {0}")]
    OperandOutOfRange(u64),

    /// Transaction asked for more gas than any transaction may
    #[error("gas limit {limit} exceeds maximum {max}")]
    GasLimitTooHigh {
        /// Requested limit
        limit: u64,
        /// Allowed maximum
        max: u64,
    },
}

impl ExecError {
    /// Whether the error points at broken gas bookkeeping rather than at the
    /// program being run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExecError::Vm(
                VmError::GasAccounting { .. }
                    | VmError::FrameTerminated
                    | VmError::FrameNotReturned { .. }
            )
        )
    }
}

/// Result type of the interpreter
pub type ExecResult<T> = std::result::Result<T, ExecError>;

/// What a top-level transaction left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    /// Receipt of the outermost frame
    pub receipt: FrameReceipt,
    /// Address of the contract a creation transaction produced
    pub created: Option<Address>,
}

/// Runs frames against a [`World`]
pub struct Interpreter<'w> {
    config: RuntimeConfig,
    world: &'w World,
}

impl<'w> Interpreter<'w> {
    /// Interpreter over `world` with the limits and costs from `config`
    pub fn new(config: RuntimeConfig, world: &'w World) -> Self {
        Self { config, world }
    }

    /// Limits and costs in use
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Message call from `sender` to the contract at `to`
    ///
    /// # Arguments
    /// * `sender` - Account paying `gas_limit * price` up front
    /// * `to` - Address of the called contract; unknown addresses run no code
    /// * `args` - Input data of the call
    /// * `gas_limit` - Budget of the outermost frame
    /// * `price` - Price per unit of gas
    ///
    /// # Returns
    /// The outermost frame's receipt. A failing program still yields a
    /// receipt with [`FrameState::Aborted`]; only a failed purchase of gas or
    /// broken gas bookkeeping is an error.
    pub fn call(
        &self,
        sender: &ExternalAccount,
        to: Address,
        args: Vec<u8>,
        gas_limit: u64,
        price: &Gas,
    ) -> ExecResult<TxOutcome> {
        self.buy_gas(sender, gas_limit, price)?;

        let contract = self.world.get_or_empty(&to);
        let context = ExecutionContext::new(
            sender,
            &*contract,
            contract.code(),
            Gas::from(gas_limit),
            price,
        )
        .with_args(args);

        let output = self.run_frame(&context, false)?.unwrap_or_default();
        Ok(TxOutcome {
            receipt: context.receipt(&output),
            created: None,
        })
    }

    /// Contract creation from `sender` running `init_code`
    ///
    /// # Arguments
    /// * `sender` - Account paying `gas_limit * price` up front
    /// * `init_code` - Program whose output becomes the new contract's code
    /// * `gas_limit` - Budget of the creation frame
    /// * `price` - Price per unit of gas
    ///
    /// # Returns
    /// The creation frame's receipt, with the new contract's address when
    /// the init code returned and its output was installed.
    pub fn create(
        &self,
        sender: &ExternalAccount,
        init_code: Vec<u8>,
        gas_limit: u64,
        price: &Gas,
    ) -> ExecResult<TxOutcome> {
        self.buy_gas(sender, gas_limit, price)?;

        let account = Rc::new(ContractAccount::pending(self.world.next_address()));
        let context =
            ExecutionContext::new(sender, &*account, init_code, Gas::from(gas_limit), price);

        let (output, created) = match self.run_frame(&context, true)? {
            Some(code) => {
                context.install_code(code.clone())?;
                self.world.insert(Rc::clone(&account));
                (code, Some(account.address()))
            }
            None => (Vec::new(), None),
        };
        Ok(TxOutcome {
            receipt: context.receipt(&output),
            created,
        })
    }

    fn buy_gas(&self, sender: &ExternalAccount, gas_limit: u64, price: &Gas) -> ExecResult<()> {
        if gas_limit > MAX_GAS_LIMIT {
            return Err(ExecError::GasLimitTooHigh {
                limit: gas_limit,
                max: MAX_GAS_LIMIT,
            });
        }
        sender.charge(&(Gas::from(gas_limit) * price))?;
        Ok(())
    }

    /// Run a frame to completion
    ///
    /// `Ok(None)` means the frame failed and was aborted. Only errors that
    /// break gas bookkeeping escape as `Err`; the frame is aborted first if
    /// it is still running.
    fn run_frame(
        &self,
        context: &ExecutionContext<'_>,
        creation: bool,
    ) -> ExecResult<Option<Vec<u8>>> {
        match self.execute(context, creation) {
            Ok(output) => Ok(Some(output)),
            Err(err) => {
                if context.state() == FrameState::Running {
                    context.abort()?;
                }
                if err.is_fatal() {
                    return Err(err);
                }
                log::warn!("frame at depth {} failed: {}", context.depth(), err);
                Ok(None)
            }
        }
    }

    fn execute(&self, context: &ExecutionContext<'_>, creation: bool) -> ExecResult<Vec<u8>> {
        let schedule = &self.config.gas_schedule;
        let mut stack: Vec<Gas> = Vec::new();
        let mut memory: Vec<u8> = Vec::new();
        let mut pc: u64 = 0;

        loop {
            let opcode = context.get_op(pc);
            context.use_gas_u64(schedule.step)?;

            match opcode.byte() {
                op::STOP => return Ok(context.return_data(Vec::new())?),
                op::ADD => {
                    let a = pop(&mut stack, pc)?;
                    let b = pop(&mut stack, pc)?;
                    push(&mut stack, (a + b) % word_modulus(), pc)?;
                }
                op::ADDRESS => push(&mut stack, address_to_word(&context.address()), pc)?,
                op::CALLER => push(&mut stack, address_to_word(&context.caller_address()), pc)?,
                op::CODECOPY => {
                    let dest = pop_u64(&mut stack, pc)?;
                    // Offsets past the end of the code read as zeroes.
                    let offset = pop(&mut stack, pc)?.to_u64().unwrap_or(u64::MAX);
                    let size = pop_u64(&mut stack, pc)?;
                    self.expand_memory(context, &mut memory, dest, size, pc)?;

                    let bytes = context.get_code(offset, to_usize(size, pc)?);
                    memory_slice_mut(&mut memory, dest, size, pc)?.copy_from_slice(&bytes);
                }
                op::POP => {
                    pop(&mut stack, pc)?;
                }
                op::MSTORE8 => {
                    let offset = pop_u64(&mut stack, pc)?;
                    let value = pop(&mut stack, pc)?;
                    self.expand_memory(context, &mut memory, offset, 1, pc)?;
                    memory_slice_mut(&mut memory, offset, 1, pc)?[0] = value.to_bytes_le()[0];
                }
                op::GAS => push(&mut stack, context.gas_remaining(), pc)?,
                op::PUSH1..=op::PUSH32 => {
                    let n = opcode.byte().saturating_sub(op::PUSH1).saturating_add(1);
                    let bytes = context.get_range_value(pc.saturating_add(1), usize::from(n));
                    push(&mut stack, Gas::from_bytes_be(&bytes), pc)?;
                    pc = pc.saturating_add(u64::from(n));
                }
                op::CREATE => {
                    let offset = pop_u64(&mut stack, pc)?;
                    let size = pop_u64(&mut stack, pc)?;
                    self.expand_memory(context, &mut memory, offset, size, pc)?;
                    let init_code = memory_slice_mut(&mut memory, offset, size, pc)?.to_vec();

                    context.use_gas_u64(schedule.create)?;
                    let created = self.create_contract(context, init_code)?;
                    let word = created.map_or_else(Gas::zero, |a| address_to_word(&a));
                    push(&mut stack, word, pc)?;
                }
                op::CALL => {
                    let gas = pop(&mut stack, pc)?;
                    let to = word_to_address(&pop(&mut stack, pc)?);

                    context.use_gas_u64(schedule.call)?;
                    let success = self.call_contract(context, &to, gas)?;
                    push(&mut stack, Gas::from(u8::from(success)), pc)?;
                }
                op::RETURN => {
                    let offset = pop_u64(&mut stack, pc)?;
                    let size = pop_u64(&mut stack, pc)?;
                    self.expand_memory(context, &mut memory, offset, size, pc)?;
                    let output = memory_slice_mut(&mut memory, offset, size, pc)?.to_vec();

                    if creation {
                        if output.len() > self.config.max_code_size {
                            return Err(VmError::CodeSizeExceeded {
                                size: output.len(),
                                max: self.config.max_code_size,
                            }
                            .into());
                        }
                        context.use_gas(&schedule.code_deposit_cost(output.len()))?;
                    }
                    return Ok(context.return_data(output)?);
                }
                _ => return Err(ExecError::InvalidOpcode { op: opcode, pc }),
            }

            pc = pc.saturating_add(1);
        }
    }

    /// Lend up to `requested` gas to a call of `to`
    ///
    /// Returns whether the callee finished successfully.
    fn call_contract(
        &self,
        parent: &ExecutionContext<'_>,
        to: &Address,
        requested: Gas,
    ) -> ExecResult<bool> {
        let Some(depth) = self.child_depth(parent) else {
            return Ok(false);
        };

        let gas = std::cmp::min(requested, parent.gas_remaining());
        parent.use_gas(&gas)?;

        let callee = self.world.get_or_empty(to);
        let child = ExecutionContext::new(parent, &*callee, callee.code(), gas, parent.price())
            .with_depth(depth);

        Ok(self.run_frame(&child, false)?.is_some())
    }

    /// Run `init_code` with all of the parent's remaining gas
    ///
    /// On success the output is installed as the new contract's code.
    fn create_contract(
        &self,
        parent: &ExecutionContext<'_>,
        init_code: Vec<u8>,
    ) -> ExecResult<Option<Address>> {
        let Some(depth) = self.child_depth(parent) else {
            return Ok(None);
        };

        let gas = parent.gas_remaining();
        parent.use_gas(&gas)?;

        let account = Rc::new(ContractAccount::pending(self.world.next_address()));
        let child = ExecutionContext::new(parent, &*account, init_code, gas, parent.price())
            .with_depth(depth);

        match self.run_frame(&child, true)? {
            Some(code) => {
                child.install_code(code)?;
                self.world.insert(Rc::clone(&account));
                Ok(Some(account.address()))
            }
            None => Ok(None),
        }
    }

    fn child_depth(&self, parent: &ExecutionContext<'_>) -> Option<usize> {
        let depth = parent.depth().saturating_add(1);
        let max = self.config.max_call_depth;
        if depth > max {
            log::warn!("{}", VmError::CallDepthExceeded { depth, max });
            return None;
        }
        Some(depth)
    }

    fn expand_memory(
        &self,
        context: &ExecutionContext<'_>,
        memory: &mut Vec<u8>,
        offset: u64,
        size: u64,
        pc: u64,
    ) -> ExecResult<()> {
        if size == 0 {
            return Ok(());
        }
        let end = offset
            .checked_add(size)
            .ok_or(ExecError::OperandOutOfRange(pc))?;
        let len = u64::try_from(memory.len()).map_err(|_| ExecError::OperandOutOfRange(pc))?;
        let current = words_for(len);
        let words = words_for(end);
        if words <= current {
            return Ok(());
        }

        let cost = self.config.gas_schedule.memory_expansion_cost(current, words);
        context.use_gas(&cost)?;

        let new_len = words
            .checked_mul(WORD_SIZE)
            .ok_or(ExecError::OperandOutOfRange(pc))?;
        memory.resize(to_usize(new_len, pc)?, 0);
        Ok(())
    }
}

fn pop(stack: &mut Vec<Gas>, pc: u64) -> ExecResult<Gas> {
    stack.pop().ok_or(ExecError::StackUnderflow(pc))
}

fn pop_u64(stack: &mut Vec<Gas>, pc: u64) -> ExecResult<u64> {
    pop(stack, pc)?
        .to_u64()
        .ok_or(ExecError::OperandOutOfRange(pc))
}

fn push(stack: &mut Vec<Gas>, word: Gas, pc: u64) -> ExecResult<()> {
    if stack.len() >= STACK_LIMIT {
        return Err(ExecError::StackOverflow(pc));
    }
    stack.push(word);
    Ok(())
}

fn to_usize(value: u64, pc: u64) -> ExecResult<usize> {
    usize::try_from(value).map_err(|_| ExecError::OperandOutOfRange(pc))
}

/// Memory window that `expand_memory` already made room for
fn memory_slice_mut(memory: &mut [u8], offset: u64, size: u64, pc: u64) -> ExecResult<&mut [u8]> {
    if size == 0 {
        return Ok(&mut []);
    }
    let start = to_usize(offset, pc)?;
    let end = to_usize(size, pc)?
        .checked_add(start)
        .ok_or(ExecError::OperandOutOfRange(pc))?;
    memory
        .get_mut(start..end)
        .ok_or(ExecError::OperandOutOfRange(pc))
}

fn word_modulus() -> Gas {
    Gas::one() << 256u32
}

fn address_to_word(address: &Address) -> Gas {
    Gas::from_bytes_be(address)
}

fn word_to_address(word: &Gas) -> Address {
    let bytes = word.to_bytes_be();
    let n = bytes.len().min(20);
    let mut address = [0u8; 20];
    let skip = bytes.len().saturating_sub(n);
    address[20usize.saturating_sub(n)..].copy_from_slice(&bytes[skip..]);
    address
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{adder, answer_runtime, caller_of, deployer, factory};

    const ADDER: Address = [0xad; 20];
    const CALLER: Address = [0xca; 20];

    fn gas(n: u64) -> Gas {
        Gas::from(n)
    }

    fn sender() -> ExternalAccount {
        ExternalAccount::new([0xee; 20], gas(1_000_000))
    }

    fn world() -> World {
        let world = World::new();
        world.deploy(ADDER, adder());
        world.deploy(CALLER, caller_of(ADDER, 1000));
        world
    }

    fn assert_refund_matches(sender: &ExternalAccount, limit: u64, outcome: &TxOutcome) {
        let expected = match outcome.receipt.status {
            FrameState::Returned => gas(limit) - &outcome.receipt.gas_used,
            _ => Gas::zero(),
        };
        assert_eq!(sender.refunded_gas(), expected);
    }

    #[test]
    fn test_simple_call() {
        let _ = env_logger::builder().is_test(true).try_init();
        let world = world();
        let sender = sender();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);

        let outcome = interpreter
            .call(&sender, ADDER, vec![], 10_000, &gas(2))
            .unwrap();

        assert_eq!(outcome.receipt.status, FrameState::Returned);
        assert_eq!(outcome.receipt.output, vec![5]);
        // 8 steps plus one word of memory
        assert_eq!(outcome.receipt.gas_used, gas(11));
        assert_eq!(sender.refunded_gas(), gas(9_989));
        assert_eq!(sender.balance(), gas(1_000_000 - 22));
    }

    #[test]
    fn test_nested_call_returns_unspent_gas() {
        let world = world();
        let sender = sender();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);

        let outcome = interpreter
            .call(&sender, CALLER, vec![], 10_000, &gas(1))
            .unwrap();

        // PUSH20, PUSH2, CALL (step + call cost), STOP, plus the callee's 11
        assert_eq!(outcome.receipt.gas_used, gas(1 + 1 + 1 + 20 + 1 + 11));
        assert_refund_matches(&sender, 10_000, &outcome);
    }

    #[test]
    fn test_failed_callee_forfeits_lent_gas() {
        let world = world();
        world.deploy([0x01; 20], caller_of(ADDER, 5));
        let sender = sender();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);

        let outcome = interpreter
            .call(&sender, [0x01; 20], vec![], 10_000, &gas(1))
            .unwrap();

        assert_eq!(outcome.receipt.status, FrameState::Returned);
        assert_eq!(outcome.receipt.gas_used, gas(1 + 1 + 1 + 20 + 5 + 1));
        assert_refund_matches(&sender, 10_000, &outcome);
    }

    #[test]
    fn test_call_depth_limit() {
        let world = world();
        let sender = sender();
        let config = RuntimeConfig {
            max_call_depth: 0,
            ..RuntimeConfig::default()
        };
        let interpreter = Interpreter::new(config, &world);

        let outcome = interpreter
            .call(&sender, CALLER, vec![], 10_000, &gas(1))
            .unwrap();

        assert_eq!(outcome.receipt.status, FrameState::Returned);
        assert_eq!(outcome.receipt.gas_used, gas(1 + 1 + 1 + 20 + 1));
    }

    #[test]
    fn test_out_of_gas_aborts_top_frame() {
        let world = world();
        let sender = sender();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);

        let outcome = interpreter.call(&sender, ADDER, vec![], 5, &gas(1)).unwrap();

        assert_eq!(outcome.receipt.status, FrameState::Aborted);
        assert!(outcome.receipt.output.is_empty());
        assert_eq!(outcome.receipt.gas_used, gas(5));
        assert!(sender.refunded_gas().is_zero());
        assert_eq!(sender.balance(), gas(1_000_000 - 5));
    }

    #[test]
    fn test_call_to_empty_account_stops_immediately() {
        let world = World::new();
        let sender = sender();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);

        let outcome = interpreter
            .call(&sender, [0x42; 20], vec![1, 2], 100, &gas(1))
            .unwrap();

        assert_eq!(outcome.receipt.status, FrameState::Returned);
        assert_eq!(outcome.receipt.gas_used, gas(1));
    }

    #[test]
    fn test_invalid_programs_abort() {
        let world = World::new();
        world.deploy([0x10; 20], vec![0xfe]);
        world.deploy([0x11; 20], vec![op::ADD]);
        world.deploy([0x12; 20], vec![op::PUSH1, 0x00, op::PUSH1, 0x00, op::RETURN - 0x01]);
        let sender = sender();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);

        for address in [[0x10; 20], [0x11; 20], [0x12; 20]] {
            let outcome = interpreter
                .call(&sender, address, vec![], 1_000, &gas(1))
                .unwrap();
            assert_eq!(outcome.receipt.status, FrameState::Aborted);
            assert_eq!(outcome.receipt.gas_used, gas(1_000));
        }
        assert!(sender.refunded_gas().is_zero());
    }

    #[test]
    fn test_create_installs_code() {
        let world = World::new();
        let sender = sender();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);

        let outcome = interpreter
            .create(&sender, deployer(&answer_runtime()).unwrap(), 10_000, &gas(1))
            .unwrap();

        let address = outcome.created.unwrap();
        assert_eq!(outcome.receipt.output, answer_runtime());
        // 7 steps, one memory word, 10 bytes of deposited code
        assert_eq!(outcome.receipt.gas_used, gas(7 + 3 + 50));
        assert_refund_matches(&sender, 10_000, &outcome);
        assert_eq!(&*world.get(&address).unwrap().code(), &answer_runtime()[..]);

        let outcome = interpreter
            .call(&sender, address, vec![], 10_000, &gas(1))
            .unwrap();
        assert_eq!(outcome.receipt.output, vec![0x2a]);
        assert_eq!(outcome.receipt.gas_used, gas(9));
    }

    #[test]
    fn test_create_respects_code_size_limit() {
        let world = World::new();
        let sender = sender();
        let config = RuntimeConfig {
            max_code_size: 4,
            ..RuntimeConfig::default()
        };
        let interpreter = Interpreter::new(config, &world);

        let outcome = interpreter
            .create(&sender, deployer(&answer_runtime()).unwrap(), 10_000, &gas(1))
            .unwrap();

        assert!(outcome.created.is_none());
        assert_eq!(outcome.receipt.status, FrameState::Aborted);
        assert!(world.is_empty());
        assert!(sender.refunded_gas().is_zero());
    }

    #[test]
    fn test_create_opcode() {
        let world = World::new();
        world.deploy([0xfa; 20], factory(&deployer(&answer_runtime()).unwrap()).unwrap());
        let sender = sender();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);

        let outcome = interpreter
            .call(&sender, [0xfa; 20], vec![], 100_000, &gas(1))
            .unwrap();

        assert_eq!(outcome.receipt.status, FrameState::Returned);
        assert_eq!(world.len(), 2);
        assert_refund_matches(&sender, 100_000, &outcome);

        let created = world.get(&[0xc0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&*created.unwrap().code(), &answer_runtime()[..]);
    }

    #[test]
    fn test_transaction_checks() {
        let world = World::new();
        let interpreter = Interpreter::new(RuntimeConfig::default(), &world);
        let poor = ExternalAccount::new([0x01; 20], gas(10));

        assert!(matches!(
            interpreter.call(&poor, ADDER, vec![], 100, &gas(1)),
            Err(ExecError::Vm(VmError::InsufficientBalance { .. }))
        ));
        assert_eq!(
            interpreter.call(&poor, ADDER, vec![], MAX_GAS_LIMIT + 1, &gas(0)),
            Err(ExecError::GasLimitTooHigh {
                limit: MAX_GAS_LIMIT + 1,
                max: MAX_GAS_LIMIT
            })
        );
        assert_eq!(poor.balance(), gas(10));
    }

    #[test]
    fn test_fatal_errors() {
        assert!(ExecError::Vm(VmError::FrameTerminated).is_fatal());
        assert!(ExecError::Vm(VmError::GasAccounting {
            refund: gas(2),
            used: gas(1)
        })
        .is_fatal());
        assert!(ExecError::Vm(VmError::FrameNotReturned {
            state: FrameState::Aborted
        })
        .is_fatal());
        assert!(!ExecError::StackUnderflow(0).is_fatal());
        assert!(!ExecError::Vm(VmError::OutOfGas {
            required: gas(2),
            remaining: gas(1)
        })
        .is_fatal());
    }

    #[test]
    fn test_word_address_conversion() {
        let address = [0xab; 20];
        assert_eq!(word_to_address(&address_to_word(&address)), address);
        assert_eq!(word_to_address(&Gas::zero()), [0u8; 20]);

        let wide = (Gas::one() << 200u32) + address_to_word(&address);
        assert_eq!(word_to_address(&wide), address);
    }
}
