//! Integration tests for the attach lifecycle and per-frame dispatch

use overlay_bridge::memory::{MemoryImage, ProcessMemory};
use overlay_bridge::overlay::RecordingOverlay;
use overlay_bridge::{
    Address, BridgeOptions, BridgeState, Color, DrawCommand, FrameBridge, Matrix4x4,
    MemoryAccessor, MemoryError, MemoryResult, OverlayFlags, ProcessId, ProcessInfo,
    ProcessLocator, Projector, Vector3, WindowHandle, WriteStrategy,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

const MATRIX_AT: Address = Address::new(0x4000);
const POINT_AT: Address = Address::new(0x5000);

/// Locator over a fixed process table
struct FakeLocator {
    processes: Vec<ProcessInfo>,
    window: Option<WindowHandle>,
    image: MemoryImage,
    deny_open: bool,
}

impl FakeLocator {
    fn new(pids: &[ProcessId]) -> Self {
        FakeLocator {
            processes: pids
                .iter()
                .map(|&pid| ProcessInfo::new(pid, "game.exe"))
                .collect(),
            window: Some(WindowHandle(0x1234)),
            image: scene(pids.first().copied().unwrap_or(0)),
            deny_open: false,
        }
    }
}

impl ProcessLocator for FakeLocator {
    fn find_processes(&self, name: &str) -> MemoryResult<Vec<ProcessInfo>> {
        Ok(self
            .processes
            .iter()
            .filter(|p| p.name_matches(name))
            .cloned()
            .collect())
    }

    fn main_window(&self, _pid: ProcessId) -> MemoryResult<Option<WindowHandle>> {
        Ok(self.window)
    }

    fn open_memory(&self, pid: ProcessId) -> MemoryResult<Box<dyn ProcessMemory>> {
        if self.deny_open {
            return Err(MemoryError::access_denied(pid, "OpenProcess"));
        }
        Ok(Box::new(self.image.clone()))
    }
}

/// Identity view matrix and one point at the origin
fn scene(pid: ProcessId) -> MemoryImage {
    let matrix = bytemuck::bytes_of(&Matrix4x4::IDENTITY).to_vec();
    let point = bytemuck::bytes_of(&Vector3::new(0.0, 0.0, 0.0)).to_vec();
    MemoryImage::new(pid)
        .with_region(MATRIX_AT, matrix)
        .with_region(POINT_AT, point)
}

fn bridge(locator: FakeLocator) -> (FrameBridge, RecordingOverlay) {
    let backend = RecordingOverlay::new();
    let bridge = FrameBridge::new(Arc::new(backend.clone()), locator);
    (bridge, backend)
}

fn noop(_: &MemoryAccessor, _: &mut Projector, _: i32, _: i32) {}

#[test]
fn test_missing_process_leaves_bridge_idle() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[]));

    let err = bridge.attach("game", noop).unwrap_err();
    assert!(matches!(err, MemoryError::ProcessNotFound(ref name) if name == "game"));
    assert_eq!(bridge.state(), BridgeState::Idle);
    assert_eq!(backend.registrations(), 0);
}

#[test]
fn test_duplicate_process_is_ambiguous() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10, 11]));

    let err = bridge.attach("game.exe", noop).unwrap_err();
    assert!(matches!(err, MemoryError::AmbiguousProcess { count: 2, .. }));
    assert_eq!(bridge.state(), BridgeState::Idle);
    assert!(!backend.is_registered());
}

#[test]
fn test_windowless_process_fails() {
    let mut locator = FakeLocator::new(&[10]);
    locator.window = None;
    let (mut bridge, backend) = bridge(locator);

    let err = bridge.attach("game", noop).unwrap_err();
    assert!(matches!(err, MemoryError::NoWindow { pid: 10 }));
    assert!(bridge.target().is_none());
    assert!(!backend.is_registered());
}

#[test]
fn test_open_failure_is_reported() {
    let mut locator = FakeLocator::new(&[10]);
    locator.deny_open = true;
    let (mut bridge, _) = bridge(locator);

    let err = bridge.attach("game", noop).unwrap_err();
    assert!(matches!(err, MemoryError::AccessDenied { pid: 10, .. }));
    assert!(err.is_handle_fault());
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn test_failed_reattach_keeps_detached_state() {
    let (mut bridge, _) = bridge(FakeLocator::new(&[10]));
    bridge.attach("game", noop).unwrap();
    bridge.detach();

    assert!(bridge.attach("other", noop).is_err());
    assert_eq!(bridge.state(), BridgeState::Detached);
}

#[test]
fn test_attach_binds_process_and_window() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));
    bridge.attach("GAME", noop).unwrap();

    let target = bridge.target().unwrap();
    assert_eq!(target.process.pid, 10);
    assert_eq!(target.window, WindowHandle(0x1234));
    assert_eq!(backend.window(), Some(WindowHandle(0x1234)));
}

#[test]
fn test_viewport_is_set_before_callback() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    bridge
        .attach(
            "game",
            move |_: &MemoryAccessor, projector: &mut Projector, width: i32, height: i32| {
                sink.lock().unwrap().push((projector.viewport(), (width, height)));
            },
        )
        .unwrap();

    backend.fire_frame(1920, 1080);
    backend.fire_frame(640, 480);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![((1920, 1080), (1920, 1080)), ((640, 480), (640, 480))]
    );
}

#[test]
fn test_frame_reads_projects_and_draws() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));
    let painter = bridge.painter();

    bridge
        .attach(
            "game",
            move |memory: &MemoryAccessor, projector: &mut Projector, _: i32, _: i32| {
                projector.set_projection(memory.read_matrix(MATRIX_AT).unwrap());
                let point = memory.read_vector3(POINT_AT).unwrap();
                if let Some(screen) = projector.world_to_screen(point) {
                    painter.draw_circle(screen.x, screen.y, 5.0, 1.0, Color::RED, false);
                }
            },
        )
        .unwrap();

    assert!(backend.fire_frame(800, 600));
    assert_eq!(
        backend.take_commands(),
        vec![DrawCommand::Circle {
            x: 400.0,
            y: 300.0,
            radius: 5.0,
            thickness: 1.0,
            color: Color::RED,
            filled: false,
        }]
    );
}

#[test]
fn test_fast_write_never_reaches_backend() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));

    let options = BridgeOptions::from_bits(BridgeOptions::FAST_WRITE_BIT | OverlayFlags::VSYNC.bits());
    bridge.set_options(options);

    assert!(bridge.options().fast_write);
    assert_eq!(backend.options_sent(), vec![OverlayFlags::VSYNC]);
}

#[test]
fn test_fast_write_alone_sends_no_backend_mask() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));

    bridge.set_options(BridgeOptions::from_bits(BridgeOptions::FAST_WRITE_BIT));

    assert!(bridge.options().fast_write);
    assert!(backend.options_sent().is_empty());
}

#[test]
fn test_toggling_fast_write_keeps_earlier_backend_mask() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));
    let vsync = BridgeOptions::from_bits(OverlayFlags::VSYNC.bits());
    bridge.set_options(vsync);

    bridge.set_options(BridgeOptions::from_bits(
        BridgeOptions::FAST_WRITE_BIT | OverlayFlags::VSYNC.bits(),
    ));
    bridge.set_options(vsync);

    assert!(!bridge.options().fast_write);
    assert_eq!(backend.options_sent(), vec![OverlayFlags::VSYNC]);
}

#[test]
fn test_changed_overlay_mask_is_forwarded() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));
    bridge.set_options(BridgeOptions::from_bits(OverlayFlags::VSYNC.bits()));
    bridge.set_options(BridgeOptions::from_bits(OverlayFlags::DRAW_FPS.bits()));

    assert_eq!(
        backend.options_sent(),
        vec![OverlayFlags::VSYNC, OverlayFlags::DRAW_FPS]
    );
}

#[test]
fn test_fast_write_selects_write_primitive() {
    let locator = FakeLocator::new(&[10]);
    let image = locator.image.clone();
    let (mut bridge, backend) = bridge(locator);
    bridge.set_fast_write(true);

    bridge
        .attach(
            "game",
            |memory: &MemoryAccessor, _: &mut Projector, _: i32, _: i32| {
                memory.write_f32(POINT_AT, 2.0).unwrap();
            },
        )
        .unwrap();
    backend.fire_frame(1, 1);

    assert_eq!(image.writes()[0].strategy, WriteStrategy::Fast);
    assert_eq!(image.writes()[0].len, 4);
}

#[test]
fn test_overlay_flags_after_attach_still_forwarded() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));
    bridge.attach("game", noop).unwrap();

    bridge.set_overlay_flags(OverlayFlags::DRAW_FPS | OverlayFlags::FONT_IMPACT);
    assert_eq!(
        backend.options_sent(),
        vec![OverlayFlags::DRAW_FPS | OverlayFlags::FONT_IMPACT]
    );
}

#[test]
fn test_no_frames_after_detach() {
    let (mut bridge, backend) = bridge(FakeLocator::new(&[10]));
    let frames = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&frames);

    bridge
        .attach(
            "game",
            move |_: &MemoryAccessor, _: &mut Projector, _: i32, _: i32| {
                *counter.lock().unwrap() += 1;
            },
        )
        .unwrap();
    backend.fire_frame(10, 10);
    bridge.detach();

    assert!(!backend.fire_frame(10, 10));
    assert_eq!(*frames.lock().unwrap(), 1);
}
