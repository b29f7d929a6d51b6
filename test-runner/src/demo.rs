//! Sample programs and the scenario the runner walks through

use crate::{
    interpreter::{op, Interpreter, TxOutcome},
    world::World,
};
use anyhow::{Context, Result};
use gvm_program_runtime::{config::DEFAULT_GAS_LIMIT, Address, ExternalAccount, Gas, RuntimeConfig};

const SENDER: Address = [0xee; 20];
const ADDER: Address = [0xad; 20];
const CALLER: Address = [0xca; 20];

/// Returns the single byte `2 + 3`
#[rustfmt::skip]
pub fn adder() -> Vec<u8> {
    vec![
        op::PUSH1, 0x02,
        op::PUSH1, 0x03,
        op::ADD,
        op::PUSH1, 0x00,
        op::MSTORE8,
        op::PUSH1, 0x01,
        op::PUSH1, 0x00,
        op::RETURN,
    ]
}

/// Returns the single byte `0x2a`
#[rustfmt::skip]
pub fn answer_runtime() -> Vec<u8> {
    vec![
        op::PUSH1, 0x2a,
        op::PUSH1, 0x00,
        op::MSTORE8,
        op::PUSH1, 0x01,
        op::PUSH1, 0x00,
        op::RETURN,
    ]
}

/// Calls `target` lending it at most `gas`, then stops
pub fn caller_of(target: Address, gas: u16) -> Vec<u8> {
    let mut code = vec![op::PUSH20];
    code.extend_from_slice(&target);
    code.extend_from_slice(&push2(gas));
    code.extend_from_slice(&[op::CALL, op::STOP]);
    code
}

/// Init code that returns `runtime`, so a creation installs it
pub fn deployer(runtime: &[u8]) -> Result<Vec<u8>> {
    let len = code_len(runtime)?;
    let mut code = Vec::new();
    code.extend_from_slice(&push2(len));
    code.extend_from_slice(&push2(0));
    code.extend_from_slice(&[op::PUSH1, 0x00, op::CODECOPY]);
    code.extend_from_slice(&push2(len));
    code.extend_from_slice(&[op::PUSH1, 0x00, op::RETURN]);

    let offset = code_len(&code)?;
    code[4..6].copy_from_slice(&offset.to_be_bytes());
    code.extend_from_slice(runtime);
    Ok(code)
}

/// Creates a contract from `init_code` and discards its address
pub fn factory(init_code: &[u8]) -> Result<Vec<u8>> {
    let len = code_len(init_code)?;
    let mut code = Vec::new();
    code.extend_from_slice(&push2(len));
    code.extend_from_slice(&push2(0));
    code.extend_from_slice(&[op::PUSH1, 0x00, op::CODECOPY]);
    code.extend_from_slice(&push2(len));
    code.extend_from_slice(&[op::PUSH1, 0x00, op::CREATE, op::POP, op::STOP]);

    let offset = code_len(&code)?;
    code[4..6].copy_from_slice(&offset.to_be_bytes());
    code.extend_from_slice(init_code);
    Ok(code)
}

fn push2(value: u16) -> [u8; 3] {
    let [hi, lo] = value.to_be_bytes();
    [op::PUSH2, hi, lo]
}

fn code_len(code: &[u8]) -> Result<u16> {
    u16::try_from(code.len()).with_context(|| format!("program of {} bytes is too long", code.len()))
}

/// Deploy the sample contracts and run a call and a creation against them
pub fn run(config: RuntimeConfig) -> Result<()> {
    println!("1. Deploying sample contracts...");
    let world = World::new();
    world.deploy(ADDER, adder());
    world.deploy(CALLER, caller_of(ADDER, 1_000));
    println!("   ✓ {} contracts deployed\n", world.len());

    let price = config.gas_price();
    let sender = ExternalAccount::new(SENDER, Gas::from(10_000_000u64));
    let starting_balance = sender.balance();
    let interpreter = Interpreter::new(config, &world);

    println!("2. Calling a contract that calls the adder...");
    let outcome = interpreter.call(&sender, CALLER, Vec::new(), DEFAULT_GAS_LIMIT, &price)?;
    report(&outcome)?;

    println!("3. Creating a contract...");
    let outcome = interpreter.create(
        &sender,
        deployer(&answer_runtime())?,
        DEFAULT_GAS_LIMIT,
        &price,
    )?;
    report(&outcome)?;
    let created = outcome.created.context("contract creation failed")?;
    let installed = world.get(&created).map_or(0, |account| account.code().len());
    println!(
        "   ✓ Created contract at {} ({} bytes of code)\n",
        format_bytes(&created),
        installed
    );

    println!("4. Calling the created contract...");
    let outcome = interpreter.call(&sender, created, Vec::new(), DEFAULT_GAS_LIMIT, &price)?;
    report(&outcome)?;

    println!("=== Summary ===");
    println!("   Gas price:       {}", price);
    println!("   Max call depth:  {}", interpreter.config().max_call_depth);
    println!("   Balance spent:   {}", starting_balance - sender.balance());
    println!("   Gas refunded:    {}", sender.refunded_gas());
    println!("   Contracts:       {}", world.len());
    Ok(())
}

fn report(outcome: &TxOutcome) -> Result<()> {
    let receipt = &outcome.receipt;
    let encoded = receipt.encode()?;
    println!("   Status:          {:?}", receipt.status);
    println!("   Gas used:        {}", receipt.gas_used);
    println!("   Gas remaining:   {}", receipt.gas_remaining);
    println!("   Output:          {}", format_bytes(&receipt.output));
    println!("   Receipt:         {} bytes encoded\n", encoded.len());
    Ok(())
}

fn format_bytes(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("0x{}", hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployer_layout() {
        let runtime = answer_runtime();
        let code = deployer(&runtime).unwrap();

        assert_eq!(code.len(), 15 + runtime.len());
        assert_eq!(&code[4..6], &[0x00, 0x0f]);
        assert_eq!(&code[15..], &runtime[..]);
    }

    #[test]
    fn test_caller_layout() {
        let code = caller_of([0x11; 20], 0x0102);
        assert_eq!(code[0], op::PUSH20);
        assert_eq!(&code[21..], &[op::PUSH2, 0x01, 0x02, op::CALL, op::STOP]);
    }

    #[test]
    fn test_oversized_program_is_rejected() {
        assert!(deployer(&vec![0u8; 70_000]).is_err());
    }

    #[test]
    fn test_scenario_runs() {
        let _ = env_logger::builder().is_test(true).try_init();
        run(RuntimeConfig::default()).unwrap();
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(&[0x0a, 0xff]), "0x0aff");
        assert_eq!(format_bytes(&[]), "0x");
    }
}
