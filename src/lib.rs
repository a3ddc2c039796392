pub mod config;
pub mod error;
pub mod executor;
pub mod failure;
pub mod outcome;
pub mod telemetry;
pub mod transport;
pub mod use_case;

pub use config::{load_config, DispatchConfig, UnconsumedResultPolicy};
pub use error::{code, DispatchError, Result};
pub use executor::RequestExecutor;
pub use failure::{classify, classify_raw, ErrorBody, ErrorKind, RawErrorPayload};
pub use outcome::Outcome;
pub use transport::{
    ConnectivityProbe, NetworkFlag, RemoteCall, TransportError, TransportResponse,
};
pub use use_case::{
    CancellableUseCase, ExecutionContexts, ForegroundContext, InvocationId, InvocationScope,
    Operation, SerialDispatcher,
};
