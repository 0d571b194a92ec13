use frame_host::core::{ComputeModule, FrameInput, ModuleConfig};
use frame_host::HostError;

const PROBE: &str = include_str!("fixtures/probe.wat");
const GROWER: &str = include_str!("fixtures/grower.wat");

/// Copy of the module's current pixel buffer
fn snapshot(module: &ComputeModule) -> Vec<u8> {
    module.with_pixels(|pixels| pixels.to_vec()).unwrap()
}

/// Minimal module with the given `p` global and `t` body
fn module_with(pixels_global: &str, tick_body: &str) -> String {
    format!(
        r#"(module
            (memory (export "memory") 1)
            {}
            (func (export "w") (result i32) (i32.const 2))
            (func (export "h") (result i32) (i32.const 2))
            (func (export "i"))
            (func (export "t") (param i32 i32 f32 f32 f32 f32 f32 i32 i32) {}))"#,
        pixels_global, tick_body
    )
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn test_probe_reports_surface() {
    let module = ComputeModule::from_bytes(PROBE, 256).unwrap();

    assert_eq!(module.dimensions(), (4, 3));
    assert_eq!(module.pixel_view().offset(), 1024);
    assert_eq!(module.pixel_view().len(), 4 * 3 * 4);
    assert_eq!(snapshot(&module).len(), 48);
}

#[test]
fn test_imported_memory_uses_requested_pages() {
    let module = ComputeModule::from_bytes(PROBE, 300).unwrap();
    assert_eq!(module.memory_size(), 300 * 65536);
}

#[test]
fn test_setup_runs_on_request() {
    let mut module = ComputeModule::from_bytes(PROBE, 256).unwrap();
    assert!(snapshot(&module).iter().all(|&b| b == 0));

    module.setup().unwrap();
    assert!(snapshot(&module).iter().all(|&b| b == 0xff));
}

#[test]
fn test_tick_arguments_reach_module() {
    let mut module = ComputeModule::from_bytes(PROBE, 256).unwrap();
    module.setup().unwrap();

    let input = FrameInput {
        timestamp: 1500.7,
        locked: true,
        mx: 12.5,
        my: -3.0,
        rx: 7.0,
        ry: 8.0,
        scale: 0.5,
        mouse_down: false,
        mouse_up: true,
    };
    module.tick(&input).unwrap();

    let pixels = snapshot(&module);
    let word = |at: usize| i32::from_le_bytes(pixels[at..at + 4].try_into().unwrap());
    let float = |at: usize| f32::from_le_bytes(pixels[at..at + 4].try_into().unwrap());

    assert_eq!(word(0), 1500);
    assert_eq!(word(4), 1);
    assert_eq!((float(8), float(12)), (12.5, -3.0));
    assert_eq!((float(16), float(20)), (7.0, 8.0));
    assert_eq!(float(24), 0.5);
    assert_eq!((word(28), word(32)), (0, 1));
    assert_eq!(word(36), 1);
}

#[test]
fn test_own_memory_ignores_env_memory() {
    let module = ComputeModule::from_bytes(GROWER, 256).unwrap();
    assert_eq!(module.memory_size(), 65536);
    assert_eq!(module.dimensions(), (2, 2));
}

#[test]
fn test_view_survives_memory_growth() {
    let mut module = ComputeModule::from_bytes(GROWER, 256).unwrap();
    module.setup().unwrap();

    for frame in 0..5 {
        let input = FrameInput {
            timestamp: frame as f64,
            ..Default::default()
        };
        module.tick(&input).unwrap();

        let pixels = snapshot(&module);
        assert_eq!(pixels.len(), 16);
        assert_eq!(i32::from_le_bytes(pixels[0..4].try_into().unwrap()), frame + 1);
        assert_eq!(i32::from_le_bytes(pixels[12..16].try_into().unwrap()), 0x11223344);
    }

    assert_eq!(module.memory_size(), 6 * 65536);
    assert_eq!(module.pixel_view().len(), 16);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_file_is_fetch_error() {
    let config = ModuleConfig::new("does/not/exist.wasm");
    match ComputeModule::load(&config) {
        Err(HostError::Fetch { path, .. }) => assert_eq!(path, config.path),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[test]
fn test_garbage_is_compile_error() {
    let result = ComputeModule::from_bytes([0x00, 0x61, 0x73, 0x6d, 0xde, 0xad], 256);
    assert!(matches!(result, Err(HostError::Compile(_))));
}

#[test]
fn test_unresolved_import_is_link_error() {
    let wat = r#"(module
        (import "env" "cos" (func (param f64) (result f64)))
        (memory (export "memory") 1)
        (global (export "p") i32 (i32.const 0))
        (func (export "w") (result i32) (i32.const 1))
        (func (export "h") (result i32) (i32.const 1))
        (func (export "i"))
        (func (export "t") (param i32 i32 f32 f32 f32 f32 f32 i32 i32)))"#;

    assert!(matches!(
        ComputeModule::from_bytes(wat, 256),
        Err(HostError::Link(_))
    ));
}

#[test]
fn test_missing_tick_is_export_error() {
    let wat = r#"(module
        (memory (export "memory") 1)
        (global (export "p") i32 (i32.const 0))
        (func (export "w") (result i32) (i32.const 1))
        (func (export "h") (result i32) (i32.const 1))
        (func (export "i")))"#;

    assert!(matches!(
        ComputeModule::from_bytes(wat, 256),
        Err(HostError::Export(_))
    ));
}

#[test]
fn test_offset_accessor_function_is_rejected() {
    // Modules that expose the offset as a function instead of a global
    let wat = module_with(r#"(func (export "p") (result i32) (i32.const 0))"#, "");
    assert!(matches!(
        ComputeModule::from_bytes(wat, 256),
        Err(HostError::Export(_))
    ));
}

#[test]
fn test_float_offset_is_rejected() {
    let wat = module_with(r#"(global (export "p") f32 (f32.const 0))"#, "");
    assert!(matches!(
        ComputeModule::from_bytes(wat, 256),
        Err(HostError::OffsetType { name: "p" })
    ));
}

#[test]
fn test_zero_width_is_invalid_surface() {
    let wat = r#"(module
        (memory (export "memory") 1)
        (global (export "p") i32 (i32.const 0))
        (func (export "w") (result i32) (i32.const 0))
        (func (export "h") (result i32) (i32.const 16))
        (func (export "i"))
        (func (export "t") (param i32 i32 f32 f32 f32 f32 f32 i32 i32)))"#;

    assert!(matches!(
        ComputeModule::from_bytes(wat, 256),
        Err(HostError::InvalidSurface { width: 0, height: 16 })
    ));
}

#[test]
fn test_pixel_buffer_past_memory_end() {
    let wat = module_with(r#"(global (export "p") i32 (i32.const 65528))"#, "");
    match ComputeModule::from_bytes(wat, 256) {
        Err(HostError::PixelBufferOutOfBounds { offset, len, memory }) => {
            assert_eq!((offset, len, memory), (65528, 16, 65536));
        }
        other => panic!("expected out of bounds, got {:?}", other),
    }
}

#[test]
fn test_trap_in_tick() {
    let wat = module_with(r#"(global (export "p") i32 (i32.const 0))"#, "unreachable");
    let mut module = ComputeModule::from_bytes(wat, 256).unwrap();
    module.setup().unwrap();

    assert!(matches!(
        module.tick(&FrameInput::default()),
        Err(HostError::Trap(_))
    ));
}
