// Copyright (c) 2026 Vouch Foundation

use lmdb::{Database, DatabaseFlags, Environment, EnvironmentFlags, Transaction, WriteFlags};
use std::{fs, path::Path};
use tracing::debug;

use super::{MerkleDbError, TxReceiptMerkleTree};

/// LMDB-backed store of receipt merkle trees, one per block number.
pub struct MerkleTreeDb {
    env: Environment,
    /// trees: block number (8 bytes LE) -> encoded tree
    trees_db: Database,
}

fn block_key(number: u64) -> [u8; 8] {
    number.to_le_bytes()
}

impl MerkleTreeDb {
    /// Open or create the store under `path`.
    pub fn open(path: &Path) -> Result<Self, MerkleDbError> {
        fs::create_dir_all(path).map_err(|e| MerkleDbError::Io(e.to_string()))?;

        let env = Environment::new()
            .set_flags(EnvironmentFlags::NO_SUB_DIR)
            .set_max_dbs(1)
            .set_map_size(256 * 1024 * 1024)
            .open(path.join("txr_merkle.mdb").as_ref())?;
        let trees_db = env.create_db(Some("txr_merkle_trees"), DatabaseFlags::empty())?;

        Ok(Self { env, trees_db })
    }

    pub fn put(&self, tree: &TxReceiptMerkleTree, block_number: u64) -> Result<(), MerkleDbError> {
        let bytes = tree.encode()?;
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(
            self.trees_db,
            &block_key(block_number),
            &bytes,
            WriteFlags::empty(),
        )?;
        txn.commit()?;

        debug!(block_number, size = bytes.len(), "Stored receipt merkle tree");
        Ok(())
    }

    pub fn get(&self, block_number: u64) -> Result<TxReceiptMerkleTree, MerkleDbError> {
        let txn = self.env.begin_ro_txn()?;
        let bytes = match txn.get(self.trees_db, &block_key(block_number)) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) | Err(lmdb::Error::NotFound) => {
                return Err(MerkleDbError::NotFound(block_number))
            }
            Err(e) => return Err(e.into()),
        };
        TxReceiptMerkleTree::decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Status, TxReceipt};
    use tempfile::tempdir;

    fn tree(n: u8) -> TxReceiptMerkleTree {
        TxReceiptMerkleTree::build(&[TxReceipt {
            tx_hash: [n; 32],
            gas_usage: 1,
            status: Status::success(),
            success_action_count: 0,
            receipts: Vec::new(),
        }])
    }

    #[test]
    fn test_put_get() {
        let dir = tempdir().unwrap();
        let db = MerkleTreeDb::open(dir.path()).unwrap();

        db.put(&tree(1), 7).unwrap();
        db.put(&tree(2), 8).unwrap();

        assert_eq!(db.get(7).unwrap(), tree(1));
        assert_eq!(db.get(8).unwrap().root_hash(), tree(2).root_hash());
    }

    #[test]
    fn test_missing_block() {
        let dir = tempdir().unwrap();
        let db = MerkleTreeDb::open(dir.path()).unwrap();

        assert!(matches!(db.get(42), Err(MerkleDbError::NotFound(42))));
    }

    #[test]
    fn test_reopen_keeps_trees() {
        let dir = tempdir().unwrap();
        {
            let db = MerkleTreeDb::open(dir.path()).unwrap();
            db.put(&tree(3), 1).unwrap();
        }
        let db = MerkleTreeDb::open(dir.path()).unwrap();
        assert_eq!(db.get(1).unwrap(), tree(3));
    }

    #[test]
    fn test_corrupt_entry_is_reported() {
        let dir = tempdir().unwrap();
        let db = MerkleTreeDb::open(dir.path()).unwrap();
        {
            let mut txn = db.env.begin_rw_txn().unwrap();
            txn.put(db.trees_db, &block_key(5), &[0xffu8, 0xff], WriteFlags::empty())
                .unwrap();
            txn.commit().unwrap();
        }

        assert!(matches!(db.get(5), Err(MerkleDbError::Decode(_))));
    }
}
