use super::*;

fn word(lifetime: f64) -> Word {
    Word::new("ALMA", Point::new(10.0, 20.0), 1.0, Rgb8::WHITE, lifetime)
}

#[test]
fn spawned_word_is_fully_visible() {
    let w = word(60.0);
    assert_eq!(w.opacity(), 255.0);
    assert!(!w.is_dead());
    assert_eq!(w.remaining(), 60.0);
}

#[test]
fn fades_only_in_last_thirty_percent() {
    let mut w = word(60.0);
    for _ in 0..42 {
        w.update();
    }
    assert_eq!(w.opacity(), 255.0);

    for _ in 0..6 {
        w.update();
    }
    assert!((w.opacity() - 170.0).abs() < 1e-6, "{}", w.opacity());

    for _ in 0..12 {
        w.update();
    }
    assert_eq!(w.opacity(), 0.0);
    assert!(w.is_dead());
}

#[test]
fn dies_exactly_when_lifetime_runs_out() {
    for lifetime in [1.0, 2.5, 7.0, 60.0, 361.0] {
        let mut w = word(lifetime);
        let calls = lifetime.ceil() as usize;
        for i in 0..calls {
            assert!(!w.is_dead(), "lifetime {lifetime} dead early at {i}");
            w.update();
        }
        assert!(w.is_dead(), "lifetime {lifetime} still alive");
        assert_eq!(w.remaining(), 0.0);
    }
}

#[test]
fn remaining_never_goes_negative() {
    let mut w = word(3.0);
    for _ in 0..10 {
        w.update();
        assert!(w.remaining() >= 0.0);
        assert!((0.0..=255.0).contains(&w.opacity()));
    }
}

#[test]
fn zero_lifetime_is_dead_on_arrival() {
    let mut w = word(0.0);
    assert!(w.is_dead());
    w.update();
    assert!(w.is_dead());

    assert!(word(f64::NAN).is_dead());
    assert!(word(-4.0).is_dead());
}

#[test]
fn trigger_restarts_dead_and_live_words() {
    let mut w = word(10.0);
    for _ in 0..10 {
        w.update();
    }
    assert!(w.is_dead());

    w.trigger(2.5);
    assert_eq!(w.opacity(), 255.0);
    assert_eq!(w.remaining(), 10.0);
    assert_eq!(w.scale, 2.5);
    assert_eq!(w.text(), "ALMA");
    assert_eq!(w.position, Point::new(10.0, 20.0));

    for _ in 0..4 {
        w.update();
    }
    w.trigger(1.0);
    assert_eq!(w.remaining(), 10.0);
    assert_eq!(w.opacity(), 255.0);
}

#[test]
fn scale_is_not_damped_between_triggers() {
    let mut w = word(30.0);
    w.trigger(3.0);
    for _ in 0..20 {
        w.update();
    }
    assert_eq!(w.scale, 3.0);
}

#[test]
fn custom_fade_threshold() {
    let mut w = word(10.0).with_fade_threshold(0.5);
    for _ in 0..5 {
        w.update();
    }
    assert_eq!(w.opacity(), 255.0);
    w.update();
    assert!((w.opacity() - 204.0).abs() < 1e-9);
}
