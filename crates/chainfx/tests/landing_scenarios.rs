//! # Landing Page Scenarios
//!
//! The stage end to end: counters, the static frame, resize and teardown.

use std::thread;
use std::time::Duration;

use chainfx::ui::{
    AnimatedCounter, CounterConfig, CounterPhase, FrameScheduler, HeadlessCanvas, Size,
    StaticPreferences,
};
use chainfx::effects::FramePump;
use chainfx::{FrameLoop, IntervalClock, LandingConfig, LoopControl, ManualClock, Stage};

fn landing(seed: u64) -> LandingConfig {
    let mut config = LandingConfig::default();
    config.field.seed = Some(seed);
    config
}

#[test]
fn test_tests_passing_counter_timeline() {
    let config = CounterConfig::new(2745).with_start_on_view(false);
    let mut counter = AnimatedCounter::new(&config).unwrap();
    let mut pump = FramePump::new();

    counter.mount(0.0, &mut pump);
    let mut values = Vec::new();
    for now in [0.0, 1000.0, 2000.0, 2500.0, 10_000.0] {
        for handle in pump.begin_frame() {
            counter.on_frame(handle, now, &mut pump);
        }
        values.push(counter.value());
    }

    // 1 - (1 - 0.5)^3 = 0.875; 0.875 * 2745 = 2401.875
    assert_eq!(values, [0, 2402, 2745, 2745, 2745]);
    assert_eq!(counter.phase(), CounterPhase::Settled);
    assert_eq!(pump.pending_count(), 0);
}

#[test]
fn test_counter_fires_once_across_scrolls() {
    let mut stage = Stage::new(
        HeadlessCanvas::new(),
        &landing(1),
        Size::new(1280.0, 720.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.mount(0.0);

    stage.scroll_to_stats(500.0);
    let started = stage.counter_phase("Tests Passing");
    assert_eq!(started, Some(CounterPhase::Counting { start_time: 500.0 }));

    let mut now = 500.0;
    for _ in 0..30 {
        now += 16.0;
        stage.frame(now);
    }
    stage.scroll_to(0.0, now);
    stage.scroll_to_stats(now + 1.0);

    // Still the first run
    assert_eq!(stage.counter_phase("Tests Passing"), started);
    assert_eq!(stage.host().observation_count(), 0);
}

#[test]
fn test_reduced_motion_page_is_static() {
    let prefs = StaticPreferences {
        reduced_motion: true,
        device_pixel_ratio: 1.0,
    };
    let mut config = landing(5);
    config.field.aurora.enabled = false;
    let mut stage = Stage::new(HeadlessCanvas::new(), &config, Size::new(800.0, 600.0), prefs).unwrap();
    stage.mount(0.0);

    let recorder = stage.field().canvas().recorder().unwrap();
    assert_eq!(recorder.count("circle"), 60);
    assert_eq!(recorder.count("line"), 0);
    assert_eq!(stage.pump().pending_count(), 0);

    for frame in 1..=20 {
        assert_eq!(stage.frame(f64::from(frame) * 16.0).callbacks, 0);
    }
    assert_eq!(stage.field().stats().frames_rendered, 1);
}

#[test]
fn test_turning_on_reduced_motion_stops_the_loop() {
    let mut stage = Stage::new(
        HeadlessCanvas::new(),
        &landing(6),
        Size::new(1024.0, 768.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.mount(0.0);
    stage.frame(16.0);
    assert!(stage.field().is_animating());

    stage.set_reduced_motion(true);
    assert!(!stage.field().is_animating());
    assert_eq!(stage.pump().pending_count(), 0);
    assert_eq!(stage.frame(32.0).callbacks, 0);
}

#[test]
fn test_pixel_ratio_change_resizes_backing() {
    let mut stage = Stage::new(
        HeadlessCanvas::new(),
        &landing(7),
        Size::new(1000.0, 500.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.mount(0.0);
    assert_eq!(stage.field().backing().unwrap().pixel_width, 1000);

    stage.set_device_pixel_ratio(3.0);
    let backing = stage.field().backing().unwrap();
    assert_eq!((backing.pixel_width, backing.pixel_height), (2000, 1000));
    assert_eq!(stage.pump().pending_count(), 1);
}

#[test]
fn test_resize_before_mount_only_moves_layout() {
    let mut stage = Stage::new(
        HeadlessCanvas::new(),
        &landing(8),
        Size::new(1280.0, 720.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.resize(Size::new(400.0, 800.0), 0.0);
    assert!(stage.field().particles().is_empty());
    assert_eq!(stage.pump().pending_count(), 0);
    assert!((stage.viewport().width - 400.0).abs() < f32::EPSILON);
    assert!((stage.viewport().height - 800.0).abs() < f32::EPSILON);

    // Seeded at the new width
    stage.mount(0.0);
    assert_eq!(stage.field().particles().len(), 25);
}

#[test]
fn test_resize_without_context_moves_stat_row() {
    let mut stage = Stage::new(
        HeadlessCanvas::without_context(),
        &landing(12),
        Size::new(1280.0, 720.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.mount(0.0);
    assert_eq!(stage.host().listener_count(), 0);

    // Taller window: the stat row moves below the new fold
    stage.resize(Size::new(1280.0, 1000.0), 10.0);
    stage.scroll_to(0.0, 20.0);
    assert_eq!(stage.counter_phase("Tests Passing"), Some(CounterPhase::NotStarted));

    stage.scroll_to_stats(30.0);
    assert_eq!(
        stage.counter_phase("Tests Passing"),
        Some(CounterPhase::Counting { start_time: 30.0 })
    );
}

#[test]
fn test_remount_counts_again_from_zero() {
    let mut stage = Stage::new(
        HeadlessCanvas::new(),
        &landing(13),
        Size::new(1280.0, 720.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.mount(0.0);
    stage.scroll_to_stats(0.0);

    let mut now = 0.0;
    while now < 500.0 {
        now += 16.0;
        stage.frame(now);
    }
    stage.unmount();
    assert_eq!(stage.pump().pending_count(), 0);

    // Still scrolled to the stats, so the first report starts them
    stage.mount(600.0);
    assert_eq!(
        stage.counter_phase("Tests Passing"),
        Some(CounterPhase::Counting { start_time: 600.0 })
    );
    assert_eq!(stage.stats()[1].display, "0+");

    now = 600.0;
    while now < 2_700.0 {
        now += 16.0;
        stage.frame(now);
    }
    let stats = stage.stats();
    assert_eq!(stats[1].display, "2,745+");
    assert!(stats.iter().all(|s| s.settled));
}

#[test]
fn test_recorder_keeps_only_the_current_frame() {
    let mut stage = Stage::new(
        HeadlessCanvas::new(),
        &landing(14),
        Size::new(1280.0, 720.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.mount(0.0);
    for frame in 1..=300 {
        stage.frame(f64::from(frame) * 16.0);
    }
    assert_eq!(stage.field().stats().frames_rendered, 300);

    let recorder = stage.field().canvas().recorder().unwrap();
    assert_eq!(recorder.count("clear"), 1);
    assert_eq!(recorder.commands().len(), recorder.last_frame().len());
}

#[test]
fn test_missing_context_page_still_counts() {
    let mut stage = Stage::new(
        HeadlessCanvas::without_context(),
        &landing(9),
        Size::new(1280.0, 720.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.mount(0.0);
    assert!(!stage.field().is_mounted());
    assert_eq!(stage.host().listener_count(), 0);

    stage.scroll_to_stats(0.0);
    let mut now = 0.0;
    while !stage.is_idle() {
        now += 16.0;
        stage.frame(now);
        assert!(now < 5_000.0, "counters never settled");
    }
    assert_eq!(stage.stats()[0].display, "82");
}

#[test]
fn test_frame_loop_drives_stage_until_cancelled() {
    let mut stage = Stage::new(
        HeadlessCanvas::new(),
        &landing(10),
        Size::new(1280.0, 720.0),
        StaticPreferences::default(),
    )
    .unwrap();
    stage.mount(0.0);

    let mut frame_loop = FrameLoop::new();
    let cancel = frame_loop.cancel_handle();
    let summary = frame_loop.run(&mut ManualClock::sixty_fps(), |now| {
        stage.frame(now);
        if stage.field().stats().frames_rendered == 12 {
            cancel.cancel();
        }
        LoopControl::Continue
    });

    assert!(summary.cancelled);
    assert_eq!(stage.field().stats().frames_rendered, 12);
    stage.unmount();
    assert_eq!(stage.pump().pending_count(), 0);
}

#[test]
fn test_cancel_from_another_thread() {
    let mut frame_loop = FrameLoop::new();
    let cancel = frame_loop.cancel_handle();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        cancel.cancel();
    });

    let mut pump = FramePump::new();
    let summary = frame_loop.run(&mut IntervalClock::new(200), |_| {
        let handle = pump.request_frame();
        pump.cancel_frame(handle);
        LoopControl::Continue
    });
    canceller.join().unwrap();

    assert!(summary.cancelled);
    assert!(summary.frames > 0);
}
