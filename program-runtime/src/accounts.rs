//! Account types that can act as a frame's caller or owner
//!
//! Two kinds of account take part in execution:
//!
//! - [`ExternalAccount`]: controlled by a key holder, never has code. The
//!   outermost frame of every transaction is called by one.
//! - [`ContractAccount`]: has code. A contract created during execution
//!   starts out empty and receives its code exactly once.
//!
//! Both credit refunded gas to their balance at the price it was bought at.

use crate::{
    error::{Result, VmError},
    frame_ref::{Address, FrameRef},
    gas::Gas,
};
use num_traits::Zero;
use std::{cell::RefCell, sync::Arc};

/// Account controlled by a key holder
#[derive(Debug)]
pub struct ExternalAccount {
    address: Address,
    balance: RefCell<Gas>,
    refunded_gas: RefCell<Gas>,
}

impl ExternalAccount {
    /// Creates an account holding `balance`
    pub fn new(address: Address, balance: Gas) -> Self {
        Self {
            address,
            balance: RefCell::new(balance),
            refunded_gas: RefCell::new(Gas::zero()),
        }
    }

    /// Current balance
    pub fn balance(&self) -> Gas {
        self.balance.borrow().clone()
    }

    /// Deduct `amount` from the balance, typically `gas_limit * price`
    /// bought up front by a transaction
    pub fn charge(&self, amount: &Gas) -> Result<()> {
        let mut balance = self.balance.borrow_mut();
        if *balance < *amount {
            return Err(VmError::InsufficientBalance {
                required: amount.clone(),
                balance: balance.clone(),
            });
        }
        *balance -= amount;
        Ok(())
    }

    /// Total gas returned to this account by the frames it called
    pub fn refunded_gas(&self) -> Gas {
        self.refunded_gas.borrow().clone()
    }
}

impl FrameRef for ExternalAccount {
    fn return_gas(&self, gas: &Gas, price: &Gas) -> Result<()> {
        *self.balance.borrow_mut() += gas * price;
        *self.refunded_gas.borrow_mut() += gas;
        Ok(())
    }

    fn address(&self) -> Address {
        self.address
    }

    fn set_code(&self, _code: Vec<u8>) -> Result<()> {
        Err(VmError::CodeInstallRejected {
            address: self.address,
        })
    }
}

/// Account holding a program
#[derive(Debug)]
pub struct ContractAccount {
    address: Address,
    code: RefCell<Option<Arc<[u8]>>>,
    balance: RefCell<Gas>,
}

impl ContractAccount {
    /// Creates a contract that already holds `code`
    pub fn new(address: Address, code: impl Into<Arc<[u8]>>) -> Self {
        Self {
            address,
            code: RefCell::new(Some(code.into())),
            balance: RefCell::new(Gas::zero()),
        }
    }

    /// Creates the target of a contract creation, with no code yet
    pub fn pending(address: Address) -> Self {
        Self {
            address,
            code: RefCell::new(None),
            balance: RefCell::new(Gas::zero()),
        }
    }

    /// The contract's code, empty when none has been installed
    pub fn code(&self) -> Arc<[u8]> {
        self.code
            .borrow()
            .clone()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Whether code has been installed
    pub fn has_code(&self) -> bool {
        self.code.borrow().is_some()
    }

    /// Current balance
    pub fn balance(&self) -> Gas {
        self.balance.borrow().clone()
    }
}

impl FrameRef for ContractAccount {
    fn return_gas(&self, gas: &Gas, price: &Gas) -> Result<()> {
        *self.balance.borrow_mut() += gas * price;
        Ok(())
    }

    fn address(&self) -> Address {
        self.address
    }

    fn set_code(&self, code: Vec<u8>) -> Result<()> {
        let mut slot = self.code.borrow_mut();
        if slot.is_some() {
            return Err(VmError::CodeAlreadyInstalled {
                address: self.address,
            });
        }
        log::debug!("installing {} bytes of code", code.len());
        *slot = Some(Arc::from(code));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_account_refund() {
        let account = ExternalAccount::new([1u8; 20], Gas::from(10u32));

        account.return_gas(&Gas::from(600u32), &Gas::from(2u32)).unwrap();
        assert_eq!(account.balance(), Gas::from(1210u32));
        assert_eq!(account.refunded_gas(), Gas::from(600u32));

        account.return_gas(&Gas::from(5u32), &Gas::from(1u32)).unwrap();
        assert_eq!(account.refunded_gas(), Gas::from(605u32));
    }

    #[test]
    fn test_external_account_charge() {
        let account = ExternalAccount::new([1u8; 20], Gas::from(100u32));
        account.charge(&Gas::from(60u32)).unwrap();
        assert_eq!(account.balance(), Gas::from(40u32));

        let err = account.charge(&Gas::from(41u32)).unwrap_err();
        assert!(matches!(err, VmError::InsufficientBalance { .. }));
        assert_eq!(account.balance(), Gas::from(40u32));
    }

    #[test]
    fn test_external_account_rejects_code() {
        let account = ExternalAccount::new([1u8; 20], Gas::zero());
        assert_eq!(
            account.set_code(vec![0x00]),
            Err(VmError::CodeInstallRejected { address: [1u8; 20] })
        );
        assert_eq!(account.address(), [1u8; 20]);
    }

    #[test]
    fn test_pending_contract_installs_once() {
        let contract = ContractAccount::pending([2u8; 20]);
        assert!(!contract.has_code());
        assert!(contract.code().is_empty());

        contract.set_code(vec![0x60, 0x01]).unwrap();
        assert!(contract.has_code());
        assert_eq!(&*contract.code(), &[0x60, 0x01]);

        assert_eq!(
            contract.set_code(vec![0xff]),
            Err(VmError::CodeAlreadyInstalled { address: [2u8; 20] })
        );
        assert_eq!(&*contract.code(), &[0x60, 0x01]);
    }

    #[test]
    fn test_existing_contract_rejects_new_code() {
        let contract = ContractAccount::new([3u8; 20], vec![0x00]);
        assert!(contract.set_code(vec![0x01]).is_err());
    }

    #[test]
    fn test_contract_refund_credits_balance() {
        let contract = ContractAccount::new([3u8; 20], vec![0x00]);
        contract.return_gas(&Gas::from(7u32), &Gas::from(3u32)).unwrap();
        assert_eq!(contract.balance(), Gas::from(21u32));
    }
}
