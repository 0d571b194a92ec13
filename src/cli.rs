// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::core::abi::DEFAULT_MEMORY_PAGES;
use crate::core::ModuleConfig;
use crate::host::{HostConfig, RenderMode};

#[derive(Parser, Debug, Clone)]
#[command(name = "frame-host")]
#[command(about = "Runs a WebAssembly compute module and shows its pixel buffer", long_about = None)]
pub struct Cli {
    /// Compute module to load
    #[arg(default_value = "emc.wasm")]
    pub module: PathBuf,

    /// Initial pages of the memory offered to the module as `env.memory`
    #[arg(long, default_value_t = DEFAULT_MEMORY_PAGES)]
    pub memory_pages: u32,

    /// Run the module and renderer on a background thread (no input relay)
    #[arg(long)]
    pub worker: bool,

    /// Window title
    #[arg(long, default_value = "Frame Host")]
    pub title: String,

    /// Disable the once-per-second FPS log line
    #[arg(long = "no-stats", default_value = "false")]
    pub no_stats: bool,
}

impl Cli {
    pub fn host_config(&self) -> HostConfig {
        HostConfig {
            module: ModuleConfig {
                path: self.module.clone(),
                memory_pages: self.memory_pages,
            },
            mode: if self.worker {
                RenderMode::Worker
            } else {
                RenderMode::Inline
            },
            title: self.title.clone(),
            stats: !self.no_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["frame-host"]);
        assert_eq!(cli.module, PathBuf::from("emc.wasm"));
        assert_eq!(cli.memory_pages, 256);
        assert!(!cli.worker);

        let config = cli.host_config();
        assert_eq!(config.mode, RenderMode::Inline);
        assert!(config.stats);
        assert_eq!(config.title, "Frame Host");
    }

    #[test]
    fn test_worker_mode() {
        let cli = Cli::parse_from([
            "frame-host",
            "demo.wasm",
            "--worker",
            "--memory-pages",
            "512",
            "--no-stats",
        ]);
        let config = cli.host_config();

        assert_eq!(config.mode, RenderMode::Worker);
        assert_eq!(config.module.path, PathBuf::from("demo.wasm"));
        assert_eq!(config.module.memory_pages, 512);
        assert!(!config.stats);
    }
}
