use std::path::PathBuf;

/// Everything that can end a session.
///
/// None of these are retried: they are logged once where the session is
/// driven from and the frame loop stops.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to read compute module {path}: {source}")]
    Fetch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile compute module: {0}")]
    Compile(#[from] wasmer::CompileError),

    #[error("failed to link compute module: {0}")]
    Link(#[from] wasmer::InstantiationError),

    #[error("compute module export: {0}")]
    Export(#[from] wasmer::ExportError),

    #[error("failed to create module memory: {0}")]
    Memory(#[from] wasmer::MemoryError),

    #[error("export `{name}` is not an i32 global")]
    OffsetType { name: &'static str },

    #[error("compute module reported an invalid surface of {width}x{height}")]
    InvalidSurface { width: i32, height: i32 },

    #[error("surface of {width}x{height} exceeds the GPU texture limit of {max}")]
    SurfaceTooLarge { width: u32, height: u32, max: u32 },

    #[error("pixel buffer {offset:#x}+{len} lies outside module memory of {memory} bytes")]
    PixelBufferOutOfBounds { offset: u64, len: u64, memory: u64 },

    #[error("compute module trapped: {0}")]
    Trap(#[from] wasmer::RuntimeError),

    #[error("display: {0}")]
    Display(String),

    #[error("render worker never received its hand-off")]
    Handoff,
}

impl HostError {
    pub fn display(err: impl std::fmt::Display) -> Self {
        Self::Display(err.to_string())
    }
}

/// A pointer-lock request that could not be satisfied. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pointer lock unavailable: {0}")]
pub struct LockError(pub String);

pub type Result<T> = std::result::Result<T, HostError>;
