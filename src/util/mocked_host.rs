use crate::{access_list::AccessList, common::*, host::*};
use bytes::Bytes;
use ethereum_types::{Address, H256, U256};
use parking_lot::Mutex;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;

/// Storage slot with its transaction-start value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StorageSlot {
    pub value: H256,
    pub original: H256,
}

/// Account state of the mocked host.
#[derive(Clone, Debug, Default)]
pub struct Account {
    pub nonce: u64,
    pub balance: U256,
    pub code: Bytes,
    pub storage: HashMap<H256, StorageSlot>,
    pub transient_storage: HashMap<H256, H256>,
}

impl Account {
    pub fn with_storage(key: impl Into<H256>, value: impl Into<H256>) -> Self {
        let mut account = Self::default();
        let value = value.into();
        account.storage.insert(
            key.into(),
            StorageSlot {
                value,
                original: value,
            },
        );
        account
    }
}

/// An emitted log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
    pub creator: Address,
    pub data: Bytes,
    pub topics: Vec<H256>,
}

/// A SELFDESTRUCT the host was asked to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelfdestructRecord {
    pub selfdestructed: Address,
    pub beneficiary: Address,
}

/// Everything the host observed, for inspection by tests.
#[derive(Clone, Debug, Default)]
pub struct Records {
    pub calls: Vec<Message>,
    pub account_accesses: Vec<Address>,
    pub logs: Vec<LogRecord>,
    pub selfdestructs: Vec<SelfdestructRecord>,
}

#[derive(Clone, Debug)]
enum JournalEntry {
    Storage {
        address: Address,
        key: H256,
        prev: Option<StorageSlot>,
    },
    TransientStorage {
        address: Address,
        key: H256,
        prev: Option<H256>,
    },
    Log,
    Selfdestruct,
}

/// In-memory [`Host`] for tests.
///
/// Nested calls are not re-executed: `call` records the message and returns
/// the preconfigured [`MockedHost::call_result`].
#[derive(Debug)]
pub struct MockedHost {
    pub accounts: HashMap<Address, Account>,
    pub tx_context: TxContext,
    pub block_hash: H256,
    pub call_result: Output,
    pub access_list: AccessList,
    pub recorded: Mutex<Records>,
    journal: Vec<JournalEntry>,
}

impl Default for MockedHost {
    fn default() -> Self {
        Self {
            accounts: Default::default(),
            tx_context: TxContext {
                tx_gas_price: U256::zero(),
                tx_origin: Address::zero(),
                block_coinbase: Address::zero(),
                block_number: 0,
                block_timestamp: 0,
                block_gas_limit: 0,
                block_difficulty: U256::zero(),
                chain_id: U256::zero(),
                block_base_fee: U256::zero(),
                blob_base_fee: U256::zero(),
                blob_hashes: vec![],
            },
            block_hash: H256::zero(),
            call_result: Output {
                status_code: StatusCode::Success,
                gas_left: 0,
                output_data: Bytes::new(),
                create_address: None,
            },
            access_list: Default::default(),
            recorded: Default::default(),
            journal: vec![],
        }
    }
}

impl Clone for MockedHost {
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            tx_context: self.tx_context.clone(),
            block_hash: self.block_hash,
            call_result: self.call_result.clone(),
            access_list: self.access_list.clone(),
            recorded: Mutex::new(self.recorded.lock().clone()),
            journal: self.journal.clone(),
        }
    }
}

impl Host for MockedHost {
    fn account_exists(&self, address: Address) -> anyhow::Result<bool> {
        Ok(self.accounts.contains_key(&address))
    }

    fn get_storage(&self, address: Address, key: H256) -> anyhow::Result<H256> {
        Ok(self
            .accounts
            .get(&address)
            .and_then(|account| account.storage.get(&key))
            .map(|slot| slot.value)
            .unwrap_or_default())
    }

    fn set_storage(
        &mut self,
        address: Address,
        key: H256,
        value: H256,
    ) -> anyhow::Result<StorageStatus> {
        let account = self.accounts.entry(address).or_default();
        let prev = account.storage.get(&key).copied();
        let slot = account.storage.entry(key).or_default();

        let current = slot.value;
        let original = slot.original;

        let status = if current == value {
            StorageStatus::Unchanged
        } else if original == current {
            if original == H256::zero() {
                StorageStatus::Added
            } else if value == H256::zero() {
                StorageStatus::Deleted
            } else {
                StorageStatus::Modified
            }
        } else {
            StorageStatus::ModifiedAgain
        };

        slot.value = value;
        self.journal.push(JournalEntry::Storage { address, key, prev });

        Ok(status)
    }

    fn get_original_storage(&self, address: Address, key: H256) -> anyhow::Result<Option<H256>> {
        Ok(self
            .accounts
            .get(&address)
            .map(|account| {
                account
                    .storage
                    .get(&key)
                    .map(|slot| slot.original)
                    .unwrap_or_default()
            }))
    }

    fn get_transient_storage(&self, address: Address, key: H256) -> anyhow::Result<H256> {
        Ok(self
            .accounts
            .get(&address)
            .and_then(|account| account.transient_storage.get(&key))
            .copied()
            .unwrap_or_default())
    }

    fn set_transient_storage(
        &mut self,
        address: Address,
        key: H256,
        value: H256,
    ) -> anyhow::Result<()> {
        let account = self.accounts.entry(address).or_default();
        let prev = account.transient_storage.insert(key, value);
        self.journal
            .push(JournalEntry::TransientStorage { address, key, prev });
        Ok(())
    }

    fn get_balance(&self, address: Address) -> anyhow::Result<U256> {
        Ok(self
            .accounts
            .get(&address)
            .map(|account| account.balance)
            .unwrap_or_default())
    }

    fn get_code_size(&self, address: Address) -> anyhow::Result<U256> {
        Ok(self
            .accounts
            .get(&address)
            .map(|account| account.code.len().into())
            .unwrap_or_default())
    }

    fn get_code_hash(&self, address: Address) -> anyhow::Result<H256> {
        Ok(self
            .accounts
            .get(&address)
            .map(|account| H256::from_slice(&Keccak256::digest(&account.code)))
            .unwrap_or_default())
    }

    fn copy_code(
        &self,
        address: Address,
        offset: usize,
        buffer: &mut [u8],
    ) -> anyhow::Result<usize> {
        let code = self
            .accounts
            .get(&address)
            .map(|account| &account.code[..])
            .unwrap_or_default();

        if offset >= code.len() {
            return Ok(0);
        }

        let n = core::cmp::min(buffer.len(), code.len() - offset);
        buffer[..n].copy_from_slice(&code[offset..offset + n]);
        Ok(n)
    }

    fn selfdestruct(&mut self, address: Address, beneficiary: Address) -> anyhow::Result<()> {
        self.recorded.lock().selfdestructs.push(SelfdestructRecord {
            selfdestructed: address,
            beneficiary,
        });
        self.journal.push(JournalEntry::Selfdestruct);
        Ok(())
    }

    fn call(&mut self, msg: &Message) -> anyhow::Result<Output> {
        self.recorded.lock().calls.push(msg.clone());
        Ok(self.call_result.clone())
    }

    fn get_tx_context(&self) -> anyhow::Result<TxContext> {
        Ok(self.tx_context.clone())
    }

    fn get_block_hash(&self, _: u64) -> anyhow::Result<H256> {
        Ok(self.block_hash)
    }

    fn emit_log(&mut self, address: Address, data: &[u8], topics: &[H256]) -> anyhow::Result<()> {
        self.recorded.lock().logs.push(LogRecord {
            creator: address,
            data: Bytes::copy_from_slice(data),
            topics: topics.to_vec(),
        });
        self.journal.push(JournalEntry::Log);
        Ok(())
    }

    fn access_account(&mut self, address: Address) -> anyhow::Result<AccessStatus> {
        self.recorded.lock().account_accesses.push(address);
        Ok(self.access_list.add_account(address))
    }

    fn access_storage(&mut self, address: Address, key: H256) -> anyhow::Result<AccessStatus> {
        Ok(self.access_list.add_storage(address, key))
    }

    fn snapshot(&mut self) -> anyhow::Result<usize> {
        Ok(self.journal.len())
    }

    fn revert_to(&mut self, snapshot: usize) -> anyhow::Result<()> {
        while self.journal.len() > snapshot {
            match self.journal.pop().unwrap() {
                JournalEntry::Storage { address, key, prev } => {
                    let account = self.accounts.entry(address).or_default();
                    match prev {
                        Some(slot) => {
                            account.storage.insert(key, slot);
                        }
                        None => {
                            account.storage.remove(&key);
                        }
                    }
                }
                JournalEntry::TransientStorage { address, key, prev } => {
                    let account = self.accounts.entry(address).or_default();
                    match prev {
                        Some(value) => {
                            account.transient_storage.insert(key, value);
                        }
                        None => {
                            account.transient_storage.remove(&key);
                        }
                    }
                }
                JournalEntry::Log => {
                    self.recorded.lock().logs.pop();
                }
                JournalEntry::Selfdestruct => {
                    self.recorded.lock().selfdestructs.pop();
                }
            }
        }
        Ok(())
    }
}
