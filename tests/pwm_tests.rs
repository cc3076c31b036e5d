mod common;

use common::{MockPin, MockPwm};
use exo_spectra::colors::{CYAN, PURPLE, PURE_RED};
use exo_spectra::{COLOUR_OFF, Colour, DutyTargets, RgbIndicator, RgbLed, SoftPwm};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Runs `ticks` ticks and returns the (green, blue) level of each.
fn render<G, B>(pwm: &mut SoftPwm<'_, G, B>, ticks: usize) -> Vec<(bool, bool)>
where
    G: embedded_hal::digital::OutputPin,
    B: embedded_hal::digital::OutputPin,
{
    (0..ticks).map(|_| pwm.tick()).collect()
}

#[test]
fn red_is_reprogrammed_immediately() {
    let targets = DutyTargets::new(256);
    let red = MockPwm::new(1000);
    let mut indicator = RgbIndicator::new(red.clone(), &targets);

    indicator.set_duty_cycles(PURE_RED);
    assert_eq!(red.duty(), 255);

    // Purple's red component exceeds the hardware maximum.
    indicator.set_duty_cycles(PURPLE);
    assert_eq!(red.duty(), 1000);
    assert_eq!(red.writes(), vec![0, 255, 1000]);
}

#[test]
fn software_channels_follow_targets_each_period() {
    let targets = DutyTargets::new(256);
    let (green, blue) = (MockPin::new(), MockPin::new());
    let mut indicator = RgbIndicator::new(MockPwm::new(1000), &targets);
    let mut pwm = SoftPwm::new(green.clone(), blue.clone(), &targets);

    indicator.set_duty_cycles(CYAN);
    let levels = render(&mut pwm, 256);

    // CYAN = (0, 255, 255); period - 1 leaves a single off tick at phase 255.
    let green_on = levels.iter().filter(|(g, _)| *g).count();
    let blue_on = levels.iter().filter(|(_, b)| *b).count();
    assert_eq!(green_on, 255);
    assert_eq!(blue_on, 255);
    assert_eq!(levels[254], (false, false)); // phase 255
    assert_eq!(levels[255], (true, true)); // phase 0
}

#[test]
fn mid_period_change_only_affects_remaining_phases() {
    let targets = DutyTargets::new(256);
    let green = MockPin::new();
    let mut indicator = RgbIndicator::new(MockPwm::new(1000), &targets);
    let mut pwm = SoftPwm::new(green.clone(), MockPin::new(), &targets);

    indicator.set_duty_cycles(Colour::new(0, 200, 0));
    let before = render(&mut pwm, 100); // phases 1..=100
    let rendered = green.history();

    indicator.set_duty_cycles(Colour::new(0, 50, 0));
    let after = render(&mut pwm, 156); // phases 101..=255, then 0

    assert!(before.iter().all(|(g, _)| *g));
    // History already driven is untouched by the update.
    assert_eq!(&green.history()[..rendered.len()], &rendered[..]);
    // The rest of the period follows the new target: off until the wrap.
    assert!(after[..155].iter().all(|(g, _)| !*g));
    assert!(after[155].0);
    assert_eq!(pwm.phase(), 0);
}

#[test]
fn off_drives_both_software_channels_low() {
    let targets = DutyTargets::new(256);
    let mut indicator = RgbIndicator::new(MockPwm::new(1000), &targets);
    let mut pwm = SoftPwm::new(MockPin::new(), MockPin::new(), &targets);

    indicator.set_duty_cycles(CYAN);
    render(&mut pwm, 10);
    indicator.set_duty_cycles(COLOUR_OFF);

    assert!(render(&mut pwm, 512).iter().all(|&levels| levels == (false, false)));
}

#[test]
fn tick_never_sees_a_half_applied_triple() {
    static TARGETS: DutyTargets = DutyTargets::new(256);
    let stop = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            let mut indicator = RgbIndicator::new(MockPwm::new(1000), &TARGETS);
            let mut step: u16 = 0;
            while !stop.load(Ordering::Relaxed) {
                step = step.wrapping_add(37);
                let level = step % 256;
                indicator.set_duty_cycles(Colour::new(level, level, level));
            }
        });

        let mut pwm = SoftPwm::new(MockPin::new(), MockPin::new(), &TARGETS);
        for _ in 0..20_000 {
            let duty = TARGETS.load();
            assert_eq!(duty.green, duty.blue);
            assert_eq!(duty.red, duty.green);

            let (green, blue) = pwm.tick();
            assert_eq!(green, blue);
        }
        stop.store(true, Ordering::Relaxed);
    });
}
