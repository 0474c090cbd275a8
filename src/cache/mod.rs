//! Per-pass ABI cache
//!
//! ABIs installed by `setabi` actions earlier in a transaction are kept here,
//! keyed by the account they were installed for, so later actions of that
//! account can be decoded. The cache lives exactly as long as one analysis
//! pass; nothing is persisted.

use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::abi::Abi;
use crate::models::name::Name;

/// ABIs installed during the current pass
#[derive(Debug, Default)]
pub struct AbiCache {
    abis: HashMap<Name, Rc<Abi>>,
}

impl AbiCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// ABI installed for `account`, if any
    pub fn get(&self, account: Name) -> Option<Rc<Abi>> {
        self.abis.get(&account).cloned()
    }

    /// Install an ABI for `account`, replacing any earlier one.
    pub fn insert(&mut self, account: Name, abi: Abi) -> Rc<Abi> {
        let abi = Rc::new(abi);
        if self.abis.insert(account, Rc::clone(&abi)).is_some() {
            debug!("Replaced cached ABI for {}", account);
        } else {
            debug!("Cached ABI for {}", account);
        }
        abi
    }

    pub fn len(&self) -> usize {
        self.abis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abis.is_empty()
    }
}
