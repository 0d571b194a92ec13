pub mod abi;
pub mod compute_module;
pub mod frame_pump;
pub mod input_adapter;
pub mod input_relay;
pub mod layout;
pub mod pixel_view;
pub mod pointer_lock;
pub mod surface_renderer;

pub use abi::FrameInput;
pub use compute_module::{ComputeModule, ModuleConfig};
pub use frame_pump::FramePump;
pub use input_adapter::{InputAccumulator, Relay};
pub use input_relay::InputRelay;
pub use layout::{DisplayRect, Fit, Layout};
pub use pixel_view::PixelView;
pub use pointer_lock::PointerLock;
pub use surface_renderer::SurfaceRenderer;
