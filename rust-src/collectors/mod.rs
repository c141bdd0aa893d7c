//! Best-effort dataset collection from local and remote storage roots.

pub mod local;
pub mod remote;

#[allow(unused_imports)]
pub use local::LocalDataset;
#[allow(unused_imports)]
pub use remote::{HostProgress, RemoteDataset, RemoteError};
