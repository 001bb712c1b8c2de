// Behavioural tests for the fluid state simulator.
// Time is driven by a ManualClock and jitter by a seeded StdRng.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use water_core::*;

fn sim_with(config: SimulatorConfig) -> (FluidSimulator, ManualClock) {
    let clock = ManualClock::new(0.0);
    let sim =
        FluidSimulator::with_parts(config, Box::new(clock.clone()), StdRng::seed_from_u64(42));
    (sim, clock)
}

fn sim() -> (FluidSimulator, ManualClock) {
    sim_with(SimulatorConfig::default())
}

fn press(at: Vec2) -> PointerForce {
    PointerForce {
        position: Some(at),
        speed: Some(0.2),
        color: None,
        is_injection: true,
    }
}

fn drag(at: Vec2, speed: f32) -> PointerForce {
    PointerForce {
        position: Some(at),
        speed: Some(speed),
        color: None,
        is_injection: false,
    }
}

fn assert_unit(v: f32, what: &str) {
    assert!((0.0..=1.0).contains(&v), "{what} out of range: {v}");
}

fn assert_state_in_range(sim: &FluidSimulator) {
    let s = sim.render_state();
    for (i, e) in sim.channel_energies().iter().enumerate() {
        assert_unit(*e, &format!("channel {i}"));
    }
    assert_unit(s.energy, "energy");
    assert_unit(s.pointer_energy, "pointer energy");
    assert_unit(s.delete_mix, "delete mix");
    assert_unit(s.purify_progress, "purify progress");
    assert_unit(s.audio_amplitude, "audio amplitude");
    assert_unit(s.audio_peak, "audio peak");
    assert_unit(s.ripple_center.x, "ripple x");
    assert_unit(s.ripple_center.y, "ripple y");
    assert!(s.ink_drops.len() <= INK_MAX);
}

#[test]
fn oversized_inputs_are_clamped() {
    let (mut sim, clock) = sim();
    sim.inject_pointer_force(drag(Vec2::new(0.3, 0.3), 5.0));
    assert_eq!(sim.channel_energies()[0], 1.0);
    sim.inject_key_ripple(KeyRipple {
        position: Some(Vec2::new(0.7, 0.2)),
        strength: Some(12.0),
    });
    assert_eq!(sim.channel_energies()[1], 1.0);
    sim.apply_audio_energy(AudioSample {
        amplitude: 3.0,
        frequency: 0.4,
    });
    assert_eq!(sim.channel_energies()[2], 1.0);

    for i in 0..200 {
        clock.advance_ms(16.0);
        if i % 3 == 0 {
            sim.inject_pointer_force(drag(Vec2::new(0.1 * (i % 10) as f32, 0.5), -4.0 + i as f32));
        }
        if i % 5 == 0 {
            sim.inject_key_ripple(KeyRipple {
                position: Some(Vec2::new(0.5, 0.5)),
                strength: Some(i as f32),
            });
        }
        sim.advance(0.016);
        assert_state_in_range(&sim);
    }
}

#[test]
fn ripple_center_is_clamped() {
    let (mut sim, _clock) = sim();
    sim.inject_pointer_force(drag(Vec2::new(1.5, -0.2), 0.5));
    assert_eq!(sim.render_state().ripple_center, Vec2::new(1.0, 0.0));
}

#[test]
fn pointer_without_position_is_ignored() {
    let (mut sim, clock) = sim();
    clock.advance_secs(5.0);
    sim.inject_pointer_force(PointerForce {
        position: None,
        speed: Some(1.0),
        color: None,
        is_injection: true,
    });
    sim.advance(0.016);
    assert_eq!(sim.channel_energies(), [0.0, 0.0, 0.0]);
    assert_eq!(sim.ink_drops().count(), 0);
    // idle timer keeps running
    assert!((sim.seconds_since_input() - 5.0).abs() < 1e-9);
}

#[test]
fn pointer_speed_defaults_when_missing() {
    let (mut sim, _clock) = sim();
    sim.inject_pointer_force(PointerForce {
        position: Some(Vec2::splat(0.5)),
        ..Default::default()
    });
    assert!((sim.channel_energies()[0] - DEFAULT_POINTER_SPEED).abs() < 1e-6);
}

#[test]
fn pointer_samples_overwrite_rather_than_accumulate() {
    let (mut sim, _clock) = sim();
    sim.inject_pointer_force(drag(Vec2::splat(0.5), 0.9));
    sim.inject_pointer_force(drag(Vec2::splat(0.5), 0.1));
    assert!((sim.channel_energies()[0] - 0.1).abs() < 1e-6);
}

#[test]
fn key_ripple_without_position_keeps_center() {
    let (mut sim, _clock) = sim();
    sim.inject_key_ripple(KeyRipple {
        position: Some(Vec2::new(0.2, 0.8)),
        strength: Some(0.4),
    });
    sim.inject_key_ripple(KeyRipple {
        position: None,
        strength: None,
    });
    assert_eq!(sim.render_state().ripple_center, Vec2::new(0.2, 0.8));
    assert!((sim.channel_energies()[1] - DEFAULT_KEY_STRENGTH).abs() < 1e-6);
    assert_eq!(sim.ink_drops().count(), 0);
}

#[test]
fn ink_drop_uses_given_color_or_default() {
    let (mut sim, clock) = sim();
    sim.inject_pointer_force(press(Vec2::splat(0.5)));
    clock.advance_ms(10.0);
    sim.inject_pointer_force(PointerForce {
        color: Some(COLOR_POOL[2]),
        ..press(Vec2::splat(0.4))
    });
    let colors: Vec<Rgb> = sim.ink_drops().map(|d| d.color).collect();
    assert_eq!(colors, vec![DEFAULT_INK_COLOR, COLOR_POOL[2].base]);
}

#[test]
fn seventeenth_drop_evicts_the_earliest() {
    let (mut sim, clock) = sim();
    for i in 0..17 {
        clock.set_ms(i as f64 * 10.0);
        sim.inject_pointer_force(press(Vec2::new(0.05 * i as f32, 0.5)));
        assert!(sim.ink_drops().count() <= INK_MAX);
    }
    let born: Vec<f64> = sim.ink_drops().map(|d| d.born_at_ms).collect();
    assert_eq!(born.len(), INK_MAX);
    assert!(!born.contains(&0.0));
    assert_eq!(born.first(), Some(&10.0));
    assert_eq!(born.last(), Some(&160.0));
    assert!(born.windows(2).all(|w| w[0] < w[1]));

    sim.advance(0.016);
    assert_eq!(sim.render_state().ink_drops.len(), INK_MAX);
}

#[test]
fn drop_lives_exactly_its_lifetime() {
    let (mut sim, clock) = sim();
    let t = 1000.0;
    let life_ms = INK_LIFETIME_SEC as f64 * 1000.0;
    clock.set_ms(t);
    sim.inject_pointer_force(press(Vec2::splat(0.5)));

    clock.set_ms(t + life_ms - 1.0);
    sim.advance(0.016);
    assert_eq!(sim.render_state().ink_drops.len(), 1);
    let age = sim.render_state().ink_drops[0].age;
    assert!(age > 0.99 && age <= 1.0);

    clock.set_ms(t + life_ms + 1.0);
    sim.advance(0.016);
    assert!(sim.render_state().ink_drops.is_empty());
    assert_eq!(sim.ink_drops().count(), 0);
}

#[test]
fn idle_scene_purifies_back_to_default_palette() {
    let (mut sim, clock) = sim();
    sim.set_palette(Rgb::BLACK, Rgb::new(255, 0, 128));
    sim.inject_pointer_force(press(Vec2::splat(0.5)));

    clock.advance_secs(10.0);
    sim.advance(1.0);
    assert_eq!(sim.purify_target(), 0.0);
    assert_eq!(sim.render_state().base_color, Rgb::BLACK);

    clock.advance_secs(PURIFY_IDLE_DELAY_SEC as f64 + PURIFY_DURATION_SEC as f64);
    for _ in 0..120 {
        clock.advance_secs(1.0);
        sim.advance(1.0);
    }
    let s = sim.render_state();
    assert_eq!(sim.purify_target(), 1.0);
    assert!(s.purify_progress > 0.999, "progress {}", s.purify_progress);
    assert_eq!(s.base_color.to_hex(), "#6fdcff");
    assert_eq!(s.highlight_color.to_hex(), "#f7feff");
}

#[test]
fn palette_reaches_defaults_at_display_frame_rate() {
    let (mut sim, clock) = sim();
    sim.set_palette(Rgb::BLACK, Rgb::BLACK);
    let dt = 1.0 / 60.0;
    // Ten idle minutes at 60 fps.
    for _ in 0..36_000 {
        clock.advance_ms(1000.0 / 60.0);
        sim.advance(dt);
    }
    let s = sim.render_state();
    assert!(s.purify_progress > 0.999, "progress {}", s.purify_progress);
    assert_eq!(s.base_color.to_hex(), "#6fdcff");
    assert_eq!(s.highlight_color.to_hex(), "#f7feff");
}

#[test]
fn slow_drift_keeps_moving_below_one_byte_per_frame() {
    let (mut sim, clock) = sim();
    sim.set_palette(Rgb::BLACK, Rgb::BLACK);
    clock.advance_secs(PURIFY_IDLE_DELAY_SEC as f64 + 1.0);
    // A step this small moves the blue channel well under half a byte.
    for _ in 0..200 {
        clock.advance_ms(1.0);
        sim.advance(0.001);
    }
    let b = sim.render_state().base_color.b;
    assert!(b > 0, "base drift stalled at {b}");
}

#[test]
fn purify_ramps_linearly_after_idle_delay() {
    let (mut sim, clock) = sim();
    clock.advance_secs(20.0);
    sim.advance(0.016);
    assert_eq!(sim.purify_target(), 0.0);
    clock.advance_secs(10.0);
    sim.advance(0.016);
    assert!((sim.purify_target() - 0.25).abs() < 1e-4);
    clock.advance_secs(20.0);
    sim.advance(0.016);
    assert!((sim.purify_target() - 0.75).abs() < 1e-4);
}

#[test]
fn purify_progress_is_smoothed() {
    let (mut sim, clock) = sim();
    clock.advance_secs(100.0);
    sim.advance(0.016);
    assert_eq!(sim.purify_target(), 1.0);
    assert!((sim.render_state().purify_progress - PURIFY_SMOOTHING).abs() < 1e-6);
}

#[test]
fn any_injection_cancels_purification() {
    type Poke = fn(&mut FluidSimulator);
    let pokes: [Poke; 5] = [
        |s| s.inject_pointer_force(drag(Vec2::splat(0.5), 0.3)),
        |s| s.inject_key_ripple(KeyRipple::default()),
        |s| s.handle_recognized_text("hello"),
        |s| {
            s.apply_audio_energy(AudioSample {
                amplitude: 0.1,
                frequency: 0.0,
            })
        },
        |s| s.set_delete_mode(true),
    ];
    for poke in pokes {
        let (mut sim, clock) = sim();
        clock.advance_secs(200.0);
        for _ in 0..100 {
            sim.advance(0.016);
        }
        assert_eq!(sim.purify_target(), 1.0);
        let before = sim.render_state().purify_progress;
        assert!(before > 0.99);

        poke(&mut sim);
        sim.advance(0.016);
        assert_eq!(sim.purify_target(), 0.0);
        assert!(sim.render_state().purify_progress < before);
        assert!(sim.seconds_since_input() < 1e-9);
    }
}

#[test]
fn audio_can_be_excluded_from_idle_timer() {
    let (mut sim, clock) = sim_with(SimulatorConfig {
        audio_marks_input: false,
        ..Default::default()
    });
    clock.advance_secs(30.0);
    sim.apply_audio_energy(AudioSample {
        amplitude: 0.5,
        frequency: 0.0,
    });
    sim.advance(0.016);
    assert!(sim.purify_target() > 0.0);
    assert!((sim.render_state().audio_amplitude - 0.5).abs() < 1e-6);
}

#[test]
fn repeated_delete_mode_does_not_reset_idle_timer() {
    let (mut sim, clock) = sim();
    sim.set_delete_mode(true);
    assert!(sim.delete_active());
    clock.advance_secs(30.0);
    sim.set_delete_mode(true);
    sim.advance(0.016);
    assert!((sim.purify_target() - 0.25).abs() < 1e-4);

    sim.set_delete_mode(false);
    sim.advance(0.016);
    assert_eq!(sim.purify_target(), 0.0);
    assert!(!sim.delete_active());
}

#[test]
fn delete_mix_eases_toward_toggle() {
    let (mut sim, _clock) = sim();
    sim.set_delete_mode(true);
    sim.advance(0.016);
    let first = sim.render_state().delete_mix;
    assert!((first - DELETE_SMOOTHING).abs() < 1e-6);
    for _ in 0..200 {
        sim.advance(0.016);
    }
    assert!(sim.render_state().delete_mix > 0.99);
    sim.set_delete_mode(false);
    sim.advance(0.016);
    assert!(sim.render_state().delete_mix < 0.99);
}

#[test]
fn energy_decay_is_frame_rate_independent() {
    let (mut a, _ca) = sim();
    let (mut b, _cb) = sim();
    for s in [&mut a, &mut b] {
        s.inject_pointer_force(drag(Vec2::splat(0.5), 0.8));
        s.inject_key_ripple(KeyRipple {
            position: None,
            strength: Some(0.6),
        });
        s.apply_audio_energy(AudioSample {
            amplitude: 0.9,
            frequency: 0.0,
        });
    }
    a.advance(1.0);
    b.advance(0.5);
    b.advance(0.5);
    let ea = a.channel_energies();
    let eb = b.channel_energies();
    for i in 0..3 {
        assert!((ea[i] - eb[i]).abs() < 1e-6, "channel {i}: {} vs {}", ea[i], eb[i]);
    }
    assert!((ea[0] - 0.8 * 0.4).abs() < 1e-6);
    assert!((ea[2] - 0.9 * 0.4).abs() < 1e-6);
}

#[test]
fn blended_energy_lags_behind_inputs() {
    let (mut sim, _clock) = sim();
    sim.inject_pointer_force(drag(Vec2::splat(0.5), 1.0));
    sim.advance(0.0);
    let expected = ENERGY_SMOOTHING * POINTER_ENERGY_WEIGHT;
    assert!((sim.render_state().energy - expected).abs() < 1e-6);
    assert_eq!(sim.render_state().pointer_energy, 1.0);
}

#[test]
fn audio_peak_holds_and_decays_per_sample() {
    let (mut sim, _clock) = sim();
    let mut peaks = Vec::new();
    for amplitude in [0.2, 0.1, 0.05] {
        sim.apply_audio_energy(AudioSample {
            amplitude,
            frequency: 0.3,
        });
        peaks.push(sim.render_state().audio_peak);
    }
    for (got, want) in peaks.iter().zip([0.2, 0.18, 0.162]) {
        assert!((got - want).abs() < 1e-6, "{got} vs {want}");
    }
    assert!((sim.render_state().audio_amplitude - 0.05).abs() < 1e-6);
    assert!((sim.render_state().audio_frequency - 0.3).abs() < 1e-6);
}

#[test]
fn voice_intensity_remembers_loud_speech_after_it_quiets() {
    let (mut sim, _clock) = sim();
    for amplitude in [0.9, 0.05, 0.05, 0.05] {
        sim.apply_audio_energy(AudioSample {
            amplitude,
            frequency: 0.0,
        });
    }
    let s = sim.render_state();
    assert!((s.audio_amplitude - 0.05).abs() < 1e-6);
    assert!((s.voice_intensity() - 0.9 * 0.9 * 0.9 * 0.9).abs() < 1e-5);
    assert!(s.voice_intensity() > s.audio_amplitude);
}

#[test]
fn non_finite_audio_reads_as_silence() {
    let (mut sim, _clock) = sim();
    sim.apply_audio_energy(AudioSample {
        amplitude: f32::NAN,
        frequency: f32::INFINITY,
    });
    assert_eq!(sim.render_state().audio_amplitude, 0.0);
    assert_eq!(sim.render_state().audio_frequency, 0.0);
}

#[test]
fn recognized_text_is_logged_and_bumps_energy() {
    let (mut sim, clock) = sim();
    clock.set_ms(1234.0);
    sim.handle_recognized_text("  こんにちは ");
    sim.handle_recognized_text("   ");
    let entries: Vec<&TextEntry> = sim.text_entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "こんにちは");
    assert_eq!(entries[0].timestamp_ms, 1234.0);
    assert!((sim.channel_energies()[1] - TEXT_ENERGY_FLOOR).abs() < 1e-6);

    // floor bump never lowers a stronger key ripple
    sim.inject_key_ripple(KeyRipple {
        position: None,
        strength: Some(0.9),
    });
    sim.handle_recognized_text("again");
    assert!((sim.channel_energies()[1] - 0.9).abs() < 1e-6);
}

#[test]
fn text_log_keeps_most_recent_entries() {
    let (mut sim, _clock) = sim_with(SimulatorConfig {
        text_log_capacity: 3,
        ..Default::default()
    });
    for word in ["a", "b", "c", "d", "e"] {
        sim.handle_recognized_text(word);
    }
    let texts: Vec<&str> = sim.text_entries().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["c", "d", "e"]);
}

#[test]
fn swirl_turns_drops_around_ripple_center() {
    let (mut sim, clock) = sim_with(SimulatorConfig {
        ink_jitter: 0.0,
        ..Default::default()
    });
    sim.inject_pointer_force(PointerForce {
        speed: Some(1.0),
        ..press(Vec2::new(0.6, 0.5))
    });
    // move the center away without touching pointer energy
    sim.inject_key_ripple(KeyRipple {
        position: Some(Vec2::splat(0.5)),
        strength: Some(0.0),
    });
    clock.advance_ms(100.0);
    sim.advance(0.1);

    let p = sim.render_state().ink_drops[0].position;
    let radius = (p - Vec2::splat(0.5)).length();
    assert!((radius - 0.1).abs() < 1e-4);
    assert!(p.y > 0.5);

    let energy = 0.4f32.powf(0.1);
    let angle = energy * (-0.1f32 * SWIRL_FALLOFF).exp() * SWIRL_GAIN * 0.1;
    assert!(((p.y - 0.5) / 0.1 - angle.sin()).abs() < 1e-3);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let (mut sim, clock) = sim();
        sim.inject_pointer_force(press(Vec2::new(0.3, 0.6)));
        for i in 0..30 {
            clock.advance_ms(16.0);
            sim.inject_pointer_force(drag(Vec2::new(0.3 + 0.01 * i as f32, 0.6), 1.5));
            sim.advance(0.016);
        }
        sim.render_state().clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn bad_frame_deltas_are_ignored() {
    let (mut sim, _clock) = sim();
    sim.inject_pointer_force(drag(Vec2::splat(0.5), 0.8));
    sim.advance(f32::NAN);
    sim.advance(-3.0);
    assert!((sim.channel_energies()[0] - 0.8).abs() < 1e-6);
    assert_state_in_range(&sim);
}
