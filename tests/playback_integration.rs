// Integration tests for the playback engine
//
// This suite drives the full pipeline without the UI:
// 1. Load a TelemetryTraceDTO JSON document from disk
// 2. Attach render surfaces through RenderSync
// 3. Play, change rate mid-lap, scrub, and replay, delivering frame
//    callbacks by hand in place of a real rendering environment

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use lapscope::playback::{
    PlaybackController, PlaybackMode, SharedFrame, TickScheduler, TickToken,
};
use lapscope::trace::loader::load_trace_json;
use tempfile::NamedTempFile;

/// Stands in for the rendering environment: records every tick request so
/// tests can deliver them explicitly.
#[derive(Clone, Default)]
struct RecordingScheduler {
    requested: Rc<RefCell<Vec<TickToken>>>,
}

impl TickScheduler for RecordingScheduler {
    fn request_tick(&mut self, token: TickToken) {
        self.requested.borrow_mut().push(token);
    }
}

/// The concrete two-sample lap: speed 100->200 km/h over two seconds and
/// fifty meters, with one annotated corner.
fn write_sample_lap() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"data":[
            {{"Time":0.0,"Distance":0.0,"X":0.0,"Y":0.0,"Speed":100.0,"Throttle":50.0,"Brake":0.0}},
            {{"Time":2.0,"Distance":50.0,"X":10.0,"Y":0.0,"Speed":200.0,"Throttle":100.0,"Brake":0.0}}
        ],"corners":[{{"number":1,"Distance":30.0,"X":6.0,"Y":0.0}}]}}"#
    )
    .unwrap();
    file.flush().unwrap();
    file
}

fn controller_with_sample_lap() -> (
    PlaybackController<RecordingScheduler>,
    RecordingScheduler,
    SharedFrame,
    SharedFrame,
) {
    let scheduler = RecordingScheduler::default();
    let mut controller = PlaybackController::new(scheduler.clone());

    let map_surface = SharedFrame::new();
    let chart_surface = SharedFrame::new();
    controller
        .render_sync_mut()
        .attach(Box::new(map_surface.clone()));
    controller
        .render_sync_mut()
        .attach(Box::new(chart_surface.clone()));

    let file = write_sample_lap();
    let trace = load_trace_json(&file.path().to_path_buf()).unwrap();
    assert_eq!(trace.corners().len(), 1);
    controller.load(trace);

    (controller, scheduler, map_surface, chart_surface)
}

#[test]
fn test_playback_with_mid_lap_rate_change() {
    let (mut controller, _scheduler, map_surface, chart_surface) = controller_with_sample_lap();

    // play at rate 1 starting at wall time 10s
    controller.play(10.);
    assert_eq!(controller.mode(), PlaybackMode::Playing);

    // one wall second in: halfway through the segment
    let token = controller.pending_tick().unwrap();
    controller.on_tick(token, 11.);
    let frame = chart_surface.get().unwrap();
    assert!((frame.speed_kmh - 150.).abs() < 1e-9);
    assert!((frame.distance_m - 25.).abs() < 1e-9);

    // doubling the rate must not move the playhead...
    controller.set_rate(2., 11.);
    // ...and half a wall second later virtual time reaches 2.0s exactly
    let token = controller.pending_tick().unwrap();
    controller.on_tick(token, 11.5);
    let frame = chart_surface.get().unwrap();
    assert!((frame.speed_kmh - 200.).abs() < 1e-9);
    assert!((frame.distance_m - 50.).abs() < 1e-9);

    // both surfaces saw the identical frame on every tick
    assert_eq!(map_surface.get(), chart_surface.get());

    // running past the end loops back to Idle, ready to replay
    let token = controller.pending_tick().unwrap();
    controller.on_tick(token, 11.6);
    assert_eq!(controller.mode(), PlaybackMode::Idle);
    assert_eq!(controller.cursor(), 0);
    assert!(controller.pending_tick().is_none());
}

#[test]
fn test_scrub_interrupts_playback() {
    let (mut controller, _scheduler, map_surface, chart_surface) = controller_with_sample_lap();

    controller.play(0.);
    let stale = controller.pending_tick().unwrap();

    controller.scrub(1);
    assert_eq!(controller.mode(), PlaybackMode::Paused);
    assert_eq!(controller.cursor(), 1);
    // scrub lands exactly on the recorded sample, no interpolation
    let frame = map_surface.get().unwrap();
    assert_eq!(frame.speed_kmh, 200.);
    assert_eq!(frame.distance_m, 50.);

    // the tick that was already scheduled when the user scrubbed must not
    // overwrite the scrubbed position
    controller.on_tick(stale, 5.);
    assert_eq!(controller.mode(), PlaybackMode::Paused);
    assert_eq!(map_surface.get().unwrap().cursor, 1);
    assert_eq!(map_surface.get(), chart_surface.get());
}

#[test]
fn test_replay_after_lap_completes() {
    let (mut controller, scheduler, _map_surface, chart_surface) = controller_with_sample_lap();

    controller.play(0.);
    let token = controller.pending_tick().unwrap();
    controller.on_tick(token, 3.);
    assert_eq!(controller.mode(), PlaybackMode::Idle);

    // playing again restarts from the first sample
    controller.play(100.);
    let token = controller.pending_tick().unwrap();
    controller.on_tick(token, 100.5);
    let frame = chart_surface.get().unwrap();
    assert!((frame.speed_kmh - 125.).abs() < 1e-9);

    // every emitted frame was paired with exactly one tick request
    let requested = scheduler.requested.borrow();
    assert!(!requested.is_empty());
    assert_eq!(
        requested.len(),
        requested.iter().collect::<std::collections::HashSet<_>>().len()
    );
}
