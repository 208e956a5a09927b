use crate::{
    analysis::{AnalysisError, AnalyzedCode},
    common::Revision,
};
use ethereum_types::H256;
use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use std::{collections::HashMap, sync::Arc};

/// Concurrent cache of analysis artifacts.
///
/// Entries are content-addressed by code hash; the revision is part of the
/// key because the artifact depends on the active rule set. Readers share
/// the lock, a writer inserts at most once per key.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: RwLock<HashMap<(H256, Revision), Arc<AnalyzedCode>>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached artifact for this code, analyzing and inserting on miss.
    pub fn get_or_analyze(
        &self,
        code: &[u8],
        revision: Revision,
    ) -> Result<Arc<AnalyzedCode>, AnalysisError> {
        let key = (H256::from_slice(&Keccak256::digest(code)), revision);

        if let Some(analysis) = self.entries.read().get(&key) {
            return Ok(analysis.clone());
        }

        let analysis = Arc::new(AnalyzedCode::analyze(code, revision)?);
        Ok(self
            .entries
            .write()
            .entry(key)
            .or_insert(analysis)
            .clone())
    }

    pub fn evict(&self, code_hash: H256, revision: Revision) {
        self.entries.write().remove(&(code_hash, revision));
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn entries_are_shared_and_keyed_by_revision() {
        let cache = AnalysisCache::new();
        let code = hex!("6001600101");

        let a = cache.get_or_analyze(&code, Revision::London).unwrap();
        let b = cache.get_or_analyze(&code, Revision::London).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        let c = cache.get_or_analyze(&code, Revision::Cancun).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);

        cache.evict(a.code_hash(), Revision::London);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_readers() {
        let cache = Arc::new(AnalysisCache::new());
        let code = hex!("60ff60005260206000f3");

        let handles = (0..4)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    cache.get_or_analyze(&code, Revision::latest()).unwrap();
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 1);
    }
}
