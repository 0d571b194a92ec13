use std::path::PathBuf;

use wasmer::{imports, Instance, Memory, MemoryType, Module, Store, TypedFunction, Value};

use crate::error::{HostError, Result};

use super::abi::{self, FrameInput, TickParams};
use super::pixel_view::PixelView;

/// Where to find a compute module and how much memory to offer it
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    pub path: PathBuf,
    pub memory_pages: u32,
}

impl ModuleConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            memory_pages: abi::DEFAULT_MEMORY_PAGES,
        }
    }
}

/// An instantiated compute module and its pixel buffer.
///
/// Owns the wasm store, so every call into the module and every borrow of
/// its memory goes through here.
pub struct ComputeModule {
    store: Store,
    memory: Memory,
    setup: TypedFunction<(), ()>,
    tick: TypedFunction<TickParams, ()>,
    view: PixelView,
}

impl ComputeModule {
    /// Read the module from disk and instantiate it.
    pub fn load(config: &ModuleConfig) -> Result<Self> {
        let bytes = std::fs::read(&config.path).map_err(|source| HostError::Fetch {
            path: config.path.clone(),
            source,
        })?;
        log::info!("Loaded {} ({} bytes)", config.path.display(), bytes.len());
        Self::from_bytes(&bytes, config.memory_pages)
    }

    /// Compile and instantiate a module from binary (or text) wasm.
    pub fn from_bytes(bytes: impl AsRef<[u8]>, memory_pages: u32) -> Result<Self> {
        let mut store = Store::default();
        let module = Module::new(&store, bytes)?;

        let env_memory = Memory::new(&mut store, MemoryType::new(memory_pages, None, false))?;
        let import_object = imports! {
            abi::IMPORT_MODULE => {
                abi::IMPORT_MEMORY => env_memory.clone(),
            }
        };
        let instance = Instance::new(&mut store, &module, &import_object)?;

        // A module that imports `env.memory` without re-exporting it writes
        // into the host memory.
        let memory = instance
            .exports
            .get_memory(abi::EXPORT_MEMORY)
            .cloned()
            .unwrap_or(env_memory);

        let width_fn: TypedFunction<(), i32> =
            instance.exports.get_typed_function(&store, abi::EXPORT_WIDTH)?;
        let height_fn: TypedFunction<(), i32> =
            instance.exports.get_typed_function(&store, abi::EXPORT_HEIGHT)?;
        let setup = instance.exports.get_typed_function(&store, abi::EXPORT_SETUP)?;
        let tick = instance.exports.get_typed_function(&store, abi::EXPORT_TICK)?;

        let width = width_fn.call(&mut store)?;
        let height = height_fn.call(&mut store)?;

        let offset = match instance.exports.get_global(abi::EXPORT_PIXELS)?.get(&mut store) {
            Value::I32(offset) => offset as u32,
            _ => {
                return Err(HostError::OffsetType {
                    name: abi::EXPORT_PIXELS,
                })
            }
        };

        let view = PixelView::new(offset, width, height)?;
        let module = Self {
            store,
            memory,
            setup,
            tick,
            view,
        };
        // Fail before the first frame rather than on it
        module.with_pixels(|_| ())?;

        log::info!(
            "Compute module ready: {}x{} surface at {:#x}",
            width,
            height,
            offset
        );
        Ok(module)
    }

    /// Run the module's one-time setup routine.
    pub fn setup(&mut self) -> Result<()> {
        self.setup.call(&mut self.store)?;
        Ok(())
    }

    /// Run one frame of the module.
    pub fn tick(&mut self, input: &FrameInput) -> Result<()> {
        let (timestamp, locked, mx, my, rx, ry, scale, down, up) = input.to_params();
        self.tick
            .call(&mut self.store, timestamp, locked, mx, my, rx, ry, scale, down, up)?;
        Ok(())
    }

    /// Surface dimensions reported by the module.
    pub fn dimensions(&self) -> (u32, u32) {
        self.view.dimensions()
    }

    pub fn pixel_view(&self) -> &PixelView {
        &self.view
    }

    /// Run `f` over the surface bytes, borrowed straight out of module memory.
    pub fn with_pixels<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let view = self.memory.view(&self.store);
        if view.data_size() == 0 {
            return Ok(f(self.view.slice(&[])?));
        }
        // SAFETY: `f` runs while `self` is borrowed, so no module code can
        // grow or write the memory under it. The view is re-taken on every
        // call, so growth between frames is picked up.
        let memory = unsafe { view.data_unchecked() };
        Ok(f(self.view.slice(memory)?))
    }

    /// Size of module memory in bytes.
    pub fn memory_size(&self) -> u64 {
        self.memory.view(&self.store).data_size()
    }
}

impl std::fmt::Debug for ComputeModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeModule")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
