//! Routes a named function call to one of the registry operations.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::contract;
use crate::error::ContractError;
use crate::stub::ChaincodeStub;

pub const OK: i32 = 200;
pub const ERROR: i32 = 500;

/// Uniform outcome of an invocation. Errors carry a message and no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Seed the ledger with the fixed sample records.
    InitLedger,
    /// Fetch one record by key.
    QueryHash,
    /// Create or overwrite a record.
    AddHash,
    /// List every record in the seeded key range.
    QueryAllHashes,
    /// Change the district of a record.
    ChangeHash,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::InitLedger,
        Operation::QueryHash,
        Operation::AddHash,
        Operation::QueryAllHashes,
        Operation::ChangeHash,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::InitLedger => "initLedger",
            Operation::QueryHash => "queryHash",
            Operation::AddHash => "addHash",
            Operation::QueryAllHashes => "queryAllHashes",
            Operation::ChangeHash => "changeHash",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Operation::InitLedger => 0,
            Operation::QueryHash => 1,
            Operation::AddHash => 3,
            Operation::QueryAllHashes => 0,
            Operation::ChangeHash => 2,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ContractError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| ContractError::UnknownFunction(name.to_string()))
    }
}

/// Runs `op` after checking its argument count. No store call happens when
/// the count is wrong.
pub fn dispatch<S, A>(stub: &mut S, op: Operation, args: &[A]) -> Result<Vec<u8>, ContractError>
where
    S: ChaincodeStub,
    A: AsRef<str>,
{
    if args.len() != op.arity() {
        return Err(ContractError::Arity {
            expected: op.arity(),
        });
    }
    let arg = args.iter().map(|a| a.as_ref()).collect::<Vec<&str>>();

    match op {
        Operation::InitLedger => contract::seed(stub).map(|()| Vec::new()),
        Operation::QueryHash => contract::fetch(&*stub, arg[0]),
        Operation::AddHash => contract::create(stub, arg[0], arg[1], arg[2]).map(|()| Vec::new()),
        Operation::QueryAllHashes => contract::list_range(&*stub),
        Operation::ChangeHash => contract::update(stub, arg[0], arg[1]).map(|()| Vec::new()),
    }
}

/// Entry point for a function call: parses the name, dispatches, and folds
/// the outcome into a [`Response`].
pub fn invoke<S, A>(stub: &mut S, function: &str, args: &[A]) -> Response
where
    S: ChaincodeStub,
    A: AsRef<str>,
{
    let result = function
        .parse::<Operation>()
        .and_then(|op| dispatch(stub, op, args));

    match result {
        Ok(payload) => {
            debug!(function, args = args.len(), payload = payload.len(), "invocation succeeded");
            Response::success(payload)
        }
        Err(err) => {
            warn!(function, code = err.code(), %err, "invocation failed");
            Response::error(err.to_string())
        }
    }
}

/// Lifecycle hook run once when the contract is deployed. Seeding is left to
/// an explicit `initLedger` call.
pub fn instantiate<S: ChaincodeStub>(_stub: &mut S) -> Response {
    Response::success(Vec::new())
}
