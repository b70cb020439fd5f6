pub mod contract;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod record;
pub mod stub;

pub use dispatch::{dispatch, instantiate, invoke, Operation, Response};
pub use error::ContractError;
pub use host::{execute, execute_block, BlockResult, Invocation};
pub use record::HashRecord;
pub use stub::{ChaincodeStub, LedgerStub, StoreError};
