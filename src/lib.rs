pub mod cli;
pub mod core;
pub mod error;
pub mod frame;
pub mod host;
pub mod traits;
pub mod worker;

pub use error::{HostError, LockError};
pub use host::{FrameHost, HostConfig, RenderMode};
