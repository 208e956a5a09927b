use crate::{common::Revision, host::AccessStatus};
use ethereum_types::{Address, H256};
use std::collections::HashSet;

/// Transaction-scoped warm/cold tracking of accounts and storage slots
/// (EIP-2929, EIP-2930).
///
/// Insertion is unconditional and idempotent; once an entry is warm it stays
/// warm for the remainder of the transaction.
#[derive(Clone, Debug, Default)]
pub struct AccessList {
    addresses: HashSet<Address>,
    slots: HashSet<(Address, H256)>,
}

impl AccessList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access list at transaction start: the sender, the call destination,
    /// the precompile addresses, and the block coinbase from the Shanghai
    /// revision on (EIP-3651) start out warm.
    pub fn with_prewarm(
        revision: Revision,
        sender: Address,
        destination: Address,
        coinbase: Address,
    ) -> Self {
        let mut list = Self::new();
        list.prewarm(revision, sender, destination, coinbase);
        list
    }

    /// Add the transaction-start entries to an existing list.
    pub fn prewarm(
        &mut self,
        revision: Revision,
        sender: Address,
        destination: Address,
        coinbase: Address,
    ) {
        self.addresses.insert(sender);
        self.addresses.insert(destination);
        for precompile in 1_u8..=9 {
            let mut address = Address::zero();
            address.0[19] = precompile;
            self.addresses.insert(address);
        }
        if revision >= Revision::Shanghai {
            self.addresses.insert(coinbase);
        }
    }

    /// Add the entries of an EIP-2930 transaction access list.
    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Address, S)>,
        S: IntoIterator<Item = H256>,
    {
        for (address, keys) in entries {
            self.addresses.insert(address);
            for key in keys {
                self.slots.insert((address, key));
            }
        }
    }

    /// Mark the account warm, returning its previous status.
    pub fn add_account(&mut self, address: Address) -> AccessStatus {
        if self.addresses.insert(address) {
            AccessStatus::Cold
        } else {
            AccessStatus::Warm
        }
    }

    /// Mark the storage slot warm, returning its previous status.
    pub fn add_storage(&mut self, address: Address, key: H256) -> AccessStatus {
        if self.slots.insert((address, key)) {
            AccessStatus::Cold
        } else {
            AccessStatus::Warm
        }
    }

    pub fn account_is_warm(&self, address: Address) -> bool {
        self.addresses.contains(&address)
    }

    pub fn storage_is_warm(&self, address: Address, key: H256) -> bool {
        self.slots.contains(&(address, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_stays_warm() {
        let mut list = AccessList::new();
        let address = Address::repeat_byte(0x11);

        assert_eq!(list.add_account(address), AccessStatus::Cold);
        for _ in 0..3 {
            assert_eq!(list.add_account(address), AccessStatus::Warm);
        }

        let key = H256::repeat_byte(0x22);
        assert_eq!(list.add_storage(address, key), AccessStatus::Cold);
        assert_eq!(list.add_storage(address, key), AccessStatus::Warm);

        // A different slot of the same account is still cold.
        assert_eq!(
            list.add_storage(address, H256::repeat_byte(0x23)),
            AccessStatus::Cold
        );
    }

    #[test]
    fn prewarmed_entries() {
        let sender = Address::repeat_byte(0x01);
        let destination = Address::repeat_byte(0x02);
        let coinbase = Address::repeat_byte(0x03);

        let list = AccessList::with_prewarm(Revision::Berlin, sender, destination, coinbase);
        assert!(list.account_is_warm(sender));
        assert!(list.account_is_warm(destination));
        assert!(!list.account_is_warm(coinbase));

        let mut ecrecover = Address::zero();
        ecrecover.0[19] = 1;
        assert!(list.account_is_warm(ecrecover));

        let list = AccessList::with_prewarm(Revision::Shanghai, sender, destination, coinbase);
        assert!(list.account_is_warm(coinbase));
    }

    #[test]
    fn declared_entries() {
        let address = Address::repeat_byte(0x42);
        let key = H256::repeat_byte(0x07);

        let mut list = AccessList::new();
        list.extend([(address, vec![key])]);

        assert!(list.account_is_warm(address));
        assert!(list.storage_is_warm(address, key));
        assert_eq!(list.add_storage(address, key), AccessStatus::Warm);
    }
}
