//! In-memory account set used by the interpreter

use gvm_program_runtime::{Address, ContractAccount, FrameRef};
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

/// Prefix byte of addresses handed out to created contracts
const CREATED_ADDRESS_PREFIX: u8 = 0xc0;

/// Contracts known to the interpreter
///
/// Frames hold `Rc` handles to the accounts they run as, so the set can
/// grow while frames further up the call stack are still alive.
#[derive(Debug, Default)]
pub struct World {
    accounts: RefCell<HashMap<Address, Rc<ContractAccount>>>,
    created: Cell<u64>,
}

impl World {
    /// Empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `account`, replacing any account at the same address
    pub fn insert(&self, account: Rc<ContractAccount>) {
        self.accounts
            .borrow_mut()
            .insert(account.address(), account);
    }

    /// Deploy `code` at `address`
    pub fn deploy(&self, address: Address, code: Vec<u8>) -> Rc<ContractAccount> {
        let account = Rc::new(ContractAccount::new(address, code));
        self.insert(account.clone());
        account
    }

    /// Account at `address`, if any
    pub fn get(&self, address: &Address) -> Option<Rc<ContractAccount>> {
        self.accounts.borrow().get(address).cloned()
    }

    /// Account at `address`, or a codeless stand-in when there is none
    pub fn get_or_empty(&self, address: &Address) -> Rc<ContractAccount> {
        self.get(address)
            .unwrap_or_else(|| Rc::new(ContractAccount::new(*address, Vec::new())))
    }

    /// Fresh address for a contract about to be created
    pub fn next_address(&self) -> Address {
        let n = self.created.get();
        self.created.set(n.wrapping_add(1));

        let mut address = [0u8; 20];
        address[0] = CREATED_ADDRESS_PREFIX;
        address[12..].copy_from_slice(&n.to_be_bytes());
        address
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.borrow().len()
    }

    /// Whether the world holds no accounts
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
