use ledger::{KVStore, LedgerDB, Output, Overlay, Sha256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dispatch::{invoke, Response};
use crate::stub::LedgerStub;

/// One function call as submitted to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(function: impl Into<String>, args: &[&str]) -> Self {
        Self {
            function: function.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

#[derive(Debug)]
pub struct BlockResult {
    pub version: u64,
    pub app_hash: Output<Sha256>,
    pub responses: Vec<Response>,
}

// execute runs one invocation against a snapshot of `kv`; the writes only
// reach `kv` when the response is a success.
pub fn execute(kv: &mut impl KVStore, invocation: &Invocation) -> Response {
    let mut snapshot = Overlay::new(kv);
    let response = invoke(
        &mut LedgerStub::new(&mut snapshot),
        &invocation.function,
        invocation.args.as_slice(),
    );

    if response.is_ok() {
        snapshot.flush();
    } else if snapshot.is_dirty() {
        debug!(function = %invocation.function, "discarding writes of failed invocation");
    }
    response
}

// execute_block runs the invocations in order and commits them as one ledger
// version, failed invocations included.
pub fn execute_block(db: &mut LedgerDB, invocations: &[Invocation]) -> BlockResult {
    let responses = invocations
        .iter()
        .map(|invocation| execute(db, invocation))
        .collect::<Vec<_>>();
    let app_hash = db.commit();

    let failed = responses.iter().filter(|res| !res.is_ok()).count();
    info!(
        version = db.version(),
        txs = responses.len(),
        failed,
        "block executed"
    );

    BlockResult {
        version: db.version(),
        app_hash,
        responses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::seed_key;
    use crate::record::HashRecord;
    use ledger::MemStore;

    #[test]
    fn test_execute_commits_success() {
        let mut kv = MemStore::new();
        let res = execute(&mut kv, &Invocation::new("addHash", &["k", "01", "h"]));
        assert!(res.is_ok());
        assert_eq!(
            kv.get(b"k").map(HashRecord::decode),
            Some(HashRecord::new("01", "h"))
        );
    }

    #[test]
    fn test_execute_rejects_empty_key() {
        let mut kv = MemStore::new();
        let res = execute(&mut kv, &Invocation::new("addHash", &["", "01", "h"]));
        assert_eq!(res, Response::error("key must not be an empty string"));
        assert!(kv.is_empty());
    }

    #[test]
    fn test_execute_block() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = LedgerDB::open(dir.path().to_str().unwrap()).unwrap();

        let block = execute_block(
            &mut db,
            &[
                Invocation::new("initLedger", &[]),
                Invocation::new("changeHash", &[seed_key(2).as_str(), "99"]),
                Invocation::new("addHash", &["only-two-args", "01"]),
            ],
        );
        assert_eq!(block.version, 1);
        assert_eq!(&block.app_hash, db.app_hash());
        assert_eq!(
            block.responses.iter().map(Response::is_ok).collect::<Vec<_>>(),
            vec![true, true, false]
        );
        drop(db);

        let mut db = LedgerDB::open(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(db.version(), 1);
        assert_eq!(
            db.get(seed_key(2).as_bytes()).map(HashRecord::decode),
            Some(HashRecord::new("99", "0cc175b9c0f1b6a831c399e269772661"))
        );

        let res = execute(&mut db, &Invocation::new("queryAllHashes", &[]));
        let listing: serde_json::Value = serde_json::from_slice(&res.payload).unwrap();
        assert_eq!(listing.as_array().map(Vec::len), Some(6));
    }
}
