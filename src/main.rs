use anyhow::{Context, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use frame_host::cli::Cli;
use frame_host::FrameHost;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut host = FrameHost::new(cli.host_config());

    log::info!("Frame Host - click to lock the pointer, Escape to release or quit");
    event_loop.run_app(&mut host).context("running event loop")?;

    // Already logged where it happened
    if host.error().is_some() {
        std::process::exit(1);
    }
    Ok(())
}
