//! Store operations of the hash registry.
//!
//! Every operation talks to the ledger only through a [`ChaincodeStub`];
//! argument counts are checked by the dispatcher before any of these run.

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::error::ContractError;
use crate::record::HashRecord;
use crate::stub::ChaincodeStub;

pub const KEY_PREFIX: &str = "R_Hash";

/// Bounds of the listing scan. Lexicographic, so only indices up to three
/// digits fall inside.
pub const RANGE_START: &str = "R_Hash0";
pub const RANGE_END: &str = "R_Hash999";

/// (district, hash) pairs written by [`seed`], in key order.
pub const SEED_RECORDS: [(&str, &str); 6] = [
    ("01", "7cb6fa91c124913f7a75e3153339234f"),
    ("02", "a2a551a6458a8de22446cc76d639a9e9"),
    ("03", "0cc175b9c0f1b6a831c399e269772661"),
    ("04", "f016441d00c16c9b912d05e9d81d894d"),
    ("05", "755f85c2723bb39381c7379a604160d8"),
    ("06", "1a699ad5e06aa8a6db3bcf9cfb2f00f2"),
];

pub fn seed_key(index: usize) -> String {
    format!("{KEY_PREFIX}{index}")
}

/// Element of the listing payload.
#[derive(Serialize)]
struct QueryResult<'a> {
    #[serde(rename = "Key")]
    key: &'a str,
    #[serde(rename = "Record")]
    record: &'a RawValue,
}

/// Writes the seed records, overwriting whatever is stored at their keys.
pub fn seed(stub: &mut impl ChaincodeStub) -> Result<(), ContractError> {
    for (index, (district, hash)) in SEED_RECORDS.iter().enumerate() {
        let key = seed_key(index);
        let record = HashRecord::new(*district, *hash);
        stub.put_state(&key, record.encode()?)?;
        debug!(%key, ?record, "seed record added");
    }
    Ok(())
}

/// Raw stored bytes for `key`, empty when the key is absent.
pub fn fetch(stub: &impl ChaincodeStub, key: &str) -> Result<Vec<u8>, ContractError> {
    Ok(stub.get_state(key)?.unwrap_or_default())
}

pub fn create(
    stub: &mut impl ChaincodeStub,
    key: &str,
    district: &str,
    hash: &str,
) -> Result<(), ContractError> {
    let record = HashRecord::new(district, hash);
    stub.put_state(key, record.encode()?)?;
    Ok(())
}

/// Replaces the district of the record at `key`, keeping its hash.
///
/// A missing or unreadable record is treated as empty, so this also creates
/// records.
pub fn update(
    stub: &mut impl ChaincodeStub,
    key: &str,
    district: &str,
) -> Result<(), ContractError> {
    let existing = stub.get_state(key)?.unwrap_or_default();
    let mut record = HashRecord::decode(&existing);
    record.district = district.to_string();
    stub.put_state(key, record.encode()?)?;
    Ok(())
}

/// Lists every record between [`RANGE_START`] and [`RANGE_END`] as a JSON
/// array of `{"Key": .., "Record": ..}` objects, in key order.
pub fn list_range(stub: &impl ChaincodeStub) -> Result<Vec<u8>, ContractError> {
    let iter = stub.get_state_by_range(RANGE_START, RANGE_END)?;

    let mut buf = Vec::new();
    {
        let mut ser = serde_json::Serializer::new(&mut buf);
        let mut seq = (&mut ser).serialize_seq(None)?;
        for item in iter {
            let (key, value) = item?;
            let record = raw_record(&key, &value)?;
            seq.serialize_element(&QueryResult {
                key: &key,
                record: &record,
            })?;
        }
        seq.end()?;
    }

    debug!(bytes = buf.len(), "listed records");
    Ok(buf)
}

// Stored values are spliced in verbatim; anything that is not JSON is
// embedded as a string so the array stays well-formed.
fn raw_record(key: &str, value: &[u8]) -> Result<Box<RawValue>, serde_json::Error> {
    match serde_json::from_slice::<Box<RawValue>>(value) {
        Ok(raw) => Ok(raw),
        Err(err) => {
            warn!(%key, %err, "stored value is not valid JSON");
            serde_json::value::to_raw_value(&String::from_utf8_lossy(value))
        }
    }
}
