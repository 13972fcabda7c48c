//! # Particle Field Invariants
//!
//! Density tiers, wrap bounds, connection symmetry and the static frame.

use chainfx_effects::{connection_opacity, FieldConfig, FramePump, ParticleField};
use chainfx_ui::{
    DrawCommand, EffectTheme, FrameScheduler, HeadlessCanvas, ListenerId, Point, ResizeEvents,
    Size, StaticPreferences,
};
use proptest::prelude::*;

#[derive(Default)]
struct Listeners {
    registered: u32,
    removed: u32,
}

impl ResizeEvents for Listeners {
    fn add_resize_listener(&mut self) -> ListenerId {
        self.registered += 1;
        ListenerId(u64::from(self.registered))
    }

    fn remove_resize_listener(&mut self, _id: ListenerId) {
        self.removed += 1;
    }
}

fn seeded_field(seed: u64) -> ParticleField<HeadlessCanvas> {
    ParticleField::new(
        HeadlessCanvas::new(),
        FieldConfig::default().with_seed(seed),
        EffectTheme::default(),
    )
    .expect("default config is valid")
}

proptest! {
    #[test]
    fn prop_particle_count_follows_tier(
        width in 1.0f32..4000.0,
        height in 1.0f32..3000.0,
        seed in any::<u64>(),
    ) {
        let mut field = seeded_field(seed);
        field.initialize(Size::new(width, height));
        let config = FieldConfig::default();
        let expected = if width < config.density.mobile_breakpoint {
            config.density.mobile_count
        } else {
            config.density.desktop_count
        };
        prop_assert_eq!(field.particles().len(), expected);
    }

    #[test]
    fn prop_positions_stay_within_margin(
        width in 50.0f32..2000.0,
        height in 50.0f32..1500.0,
        seed in any::<u64>(),
        frames in 1usize..400,
    ) {
        let mut field = seeded_field(seed);
        let size = Size::new(width, height);
        field.initialize(size);
        let count = field.particles().len();
        let velocities: Vec<_> = field.particles().iter().map(|p| p.velocity).collect();
        let margin = field.config().wrap_margin;
        // Same arithmetic as the wrap, so edge values compare exactly
        let xs = -margin..=width + margin;
        let ys = -margin..=height + margin;

        for frame in 0..frames {
            field.tick(frame as f64 * 16.0);
            if let Some(recorder) = field.canvas_mut().recorder_mut() {
                recorder.reset();
            }
            for p in field.particles() {
                prop_assert!(
                    xs.contains(&p.position[0]) && ys.contains(&p.position[1]),
                    "escaped: {:?}",
                    p.position
                );
            }
        }

        // Same particles, same velocities: nothing was replaced
        prop_assert_eq!(field.particles().len(), count);
        let after: Vec<_> = field.particles().iter().map(|p| p.velocity).collect();
        prop_assert_eq!(after, velocities);
    }

    #[test]
    fn prop_connection_opacity_is_symmetric(
        ax in -100.0f32..1000.0, ay in -100.0f32..1000.0,
        bx in -100.0f32..1000.0, by in -100.0f32..1000.0,
    ) {
        let a = Point::new(ax, ay);
        let b = Point::new(bx, by);
        let ab = connection_opacity(a.distance_sq(b).sqrt(), 150.0, 0.06);
        let ba = connection_opacity(b.distance_sq(a).sqrt(), 150.0, 0.06);
        prop_assert_eq!(ab.to_bits(), ba.to_bits());
        prop_assert!((0.0..=0.06).contains(&ab));
    }
}

#[test]
fn test_threshold_boundary() {
    let max = FieldConfig::default().max_line_opacity;
    assert!(connection_opacity(150.0, 150.0, max).abs() < f32::EPSILON);
    assert!((connection_opacity(0.0, 150.0, max) - max).abs() < f32::EPSILON);
}

#[test]
fn test_reduced_motion_static_frame() {
    let mut field = seeded_field(2024);
    let mut pump = FramePump::new();
    let mut listeners = Listeners::default();
    let prefs = StaticPreferences {
        reduced_motion: true,
        device_pixel_ratio: 1.0,
    };

    field.mount(Size::new(800.0, 600.0), &prefs, &prefs, &mut listeners, &mut pump);

    let particles = field.particles().to_vec();
    assert_eq!(particles.len(), 60);
    assert_eq!(pump.pending_count(), 0, "reduced motion must not schedule frames");

    let recorder = field.canvas().recorder().expect("context available");
    assert_eq!(recorder.count("line"), 0);
    assert_eq!(recorder.count("circle"), particles.len());

    let centers: Vec<Point> = recorder
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Circle { center, .. } => Some(*center),
            _ => None,
        })
        .collect();
    for (center, particle) in centers.iter().zip(&particles) {
        assert_eq!(*center, particle.point());
    }

    // Pumping frames changes nothing
    for _ in 0..3 {
        assert!(pump.begin_frame().is_empty());
    }
    assert_eq!(field.stats().frames_rendered, 1);

    field.unmount(&mut listeners, &mut pump);
    assert_eq!(listeners.removed, 1);
}

#[test]
fn test_resize_while_running_keeps_one_loop() {
    let mut field = seeded_field(77);
    let mut pump = FramePump::new();
    let mut listeners = Listeners::default();
    let prefs = StaticPreferences::default();

    field.mount(Size::new(1280.0, 720.0), &prefs, &prefs, &mut listeners, &mut pump);
    for frame in 0..10 {
        for handle in pump.begin_frame() {
            field.on_frame(handle, f64::from(frame) * 16.7, &mut pump);
        }
        if frame % 3 == 0 {
            field.resize(Size::new(600.0 + f32::from(frame as u8) * 100.0, 500.0), &prefs, &mut pump);
        }
        assert_eq!(pump.pending_count(), 1);
    }

    // A superseded handle must not tick the field
    let stale = pump.request_frame();
    let before = field.stats().frames_rendered;
    field.on_frame(stale, 999.0, &mut pump);
    assert_eq!(field.stats().frames_rendered, before);
}
