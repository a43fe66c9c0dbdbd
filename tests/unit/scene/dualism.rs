use super::*;
use crate::assets::images::ImageLibrary;
use crate::foundation::core::FrameIndex;

fn ctx<'a>(images: &'a ImageLibrary, rng: &'a mut Rng64) -> FrameContext<'a> {
    FrameContext {
        canvas: Canvas::new(1000, 500),
        images,
        rng,
        frame: FrameIndex(0),
        time: 0.0,
        dt: 1.0 / 60.0,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn pair_spawns_in_bands_from_active_set() {
    let mut rng = Rng64::new(11);
    let mut s = DualismScene::default();
    for _ in 0..20 {
        let (a, b) = s.spawn_pair(Canvas::new(1000, 500), &mut rng);
        let (wa, wb) = (s.words().get(a).unwrap(), s.words().get(b).unwrap());
        assert!((100.0..400.0).contains(&wa.position.x));
        assert!((600.0..900.0).contains(&wb.position.x));
        assert_eq!(wa.position.y, wb.position.y);
        assert!((100.0..400.0).contains(&wa.position.y));
        assert_eq!(wa.color, LEFT_COLOR);
        assert_eq!(wb.color, RIGHT_COLOR);
        assert_eq!(wa.initial(), 360.0);
        assert!(
            DUALITY_SETS[0]
                .pairs
                .iter()
                .any(|(l, r)| *l == wa.text() && *r == wb.text())
        );
    }
    assert_eq!(s.words().len(), 40);
}

#[test]
fn spawned_words_get_their_own_wave_phase() {
    let mut rng = Rng64::new(11);
    let mut s = DualismScene::default();
    let (a, b) = s.spawn_pair(Canvas::new(1000, 500), &mut rng);
    let c = s.spawn_click(Point::new(5.0, 5.0), &mut rng);
    let phases: Vec<f64> = [a, b, c]
        .iter()
        .map(|id| s.words().get(*id).unwrap().style.wave_phase)
        .collect();
    assert!(phases.iter().all(|p| (0.0..TAU).contains(p)));
    assert_ne!(phases[0], phases[1]);
    assert_ne!(phases[1], phases[2]);
    assert_ne!(phases[0], phases[2]);
}

#[test]
fn select_set_changes_pair_source() {
    let mut rng = Rng64::new(3);
    let mut s = DualismScene::default();
    assert!(s.select_set(2));
    assert!(!s.select_set(3));
    assert_eq!(s.params().duality_set, 2);
    let (a, _) = s.spawn_pair(Canvas::new(100, 100), &mut rng);
    let left = s.words().get(a).unwrap().text().to_string();
    assert!(DUALITY_SETS[2].pairs.iter().any(|(l, _)| *l == left));
}

#[test]
fn kick_spawns_pair_and_retriggers_at_size_multiplier() {
    let images = ImageLibrary::default();
    let mut rng = Rng64::new(5);
    let mut c = ctx(&images, &mut rng);
    let mut s = DualismScene::default();

    s.apply_control(ControlCommand::Kick, &mut c);
    for _ in 0..100 {
        s.tick(&mut c);
    }
    s.apply_control(ControlCommand::BassLevel(1.0), &mut c);
    s.apply_control(ControlCommand::Kick, &mut c);

    assert_eq!(s.words().len(), 4);
    for (_, w) in s.words().iter() {
        assert!(approx(w.scale, 1.3));
        assert_eq!(w.remaining(), 360.0);
        assert_eq!(w.opacity(), 255.0);
    }
}

#[test]
fn bass_sets_background_size_and_rotation() {
    let images = ImageLibrary::default();
    let mut rng = Rng64::new(5);
    let mut c = ctx(&images, &mut rng);
    let mut s = DualismScene::default();
    s.spawn_click(Point::new(10.0, 10.0), c.rng);

    s.apply_control(ControlCommand::BassLevel(1.0), &mut c);
    assert_eq!(s.params().background, Rgb8::new(64, 32, 80));
    assert!(approx(s.params().word_size_multiplier, 1.3));
    let (_, w) = s.words().iter().next().unwrap();
    assert!(approx(w.style.rotation_deg, 30.0));

    s.apply_control(ControlCommand::BassLevel(0.0), &mut c);
    assert_eq!(s.params().background, Rgb8::BLACK);
    assert!(approx(s.params().word_size_multiplier, 0.8));
    let (_, w) = s.words().iter().next().unwrap();
    assert!(approx(w.style.rotation_deg, -30.0));
}

#[test]
fn melody_recolors_one_word_and_disperses_all() {
    let images = ImageLibrary::default();
    let mut rng = Rng64::new(5);
    let mut c = ctx(&images, &mut rng);
    let mut s = DualismScene::default();

    s.apply_control(ControlCommand::MelodyNote(0.5), &mut c);
    assert!(s.words().is_empty());

    s.spawn_click(Point::new(0.0, 0.0), c.rng);
    s.spawn_click(Point::new(1.0, 0.0), c.rng);
    s.apply_control(ControlCommand::MelodyNote(0.0), &mut c);
    let red = s
        .words()
        .iter()
        .filter(|(_, w)| w.color == Rgb8::new(255, 0, 0))
        .count();
    assert_eq!(red, 1);
    assert!(s.words().iter().all(|(_, w)| w.style.disperse == 0.0));

    s.apply_control(ControlCommand::MelodyNote(1.0), &mut c);
    assert!(s.words().iter().all(|(_, w)| approx(w.style.disperse, 100.0)));
}

#[test]
fn texture_sets_glitch_and_contrast_sets_speed() {
    let images = ImageLibrary::default();
    let mut rng = Rng64::new(5);
    let mut c = ctx(&images, &mut rng);
    let mut s = DualismScene::default();
    s.spawn_click(Point::new(0.0, 0.0), c.rng);

    s.apply_control(ControlCommand::Texture(0.5), &mut c);
    let (_, w) = s.words().iter().next().unwrap();
    assert!(approx(w.style.glitch, 0.4));

    s.apply_control(ControlCommand::Contrast(0.5), &mut c);
    assert!(approx(s.params().rotation_speed, 1.0));
    s.tick(&mut c);
    s.tick(&mut c);
    let (_, w) = s.words().iter().next().unwrap();
    assert!(approx(w.style.rotation_deg, 2.0));
}

#[test]
fn tick_fades_and_culls_words() {
    let images = ImageLibrary::default();
    let mut rng = Rng64::new(5);
    let mut c = ctx(&images, &mut rng);
    let mut s = DualismScene::default();
    let id = s.spawn_click(Point::new(0.0, 0.0), c.rng);
    assert_eq!(s.words().get(id).unwrap().scale, CLICK_SCALE);
    assert_eq!(s.words().get(id).unwrap().color, CLICK_COLOR);
    for _ in 0..149 {
        s.tick(&mut c);
    }
    assert_eq!(s.words().len(), 1);
    s.tick(&mut c);
    assert!(s.words().is_empty());
}

#[test]
fn manual_commands_map_to_operations() {
    let images = ImageLibrary::default();
    let mut rng = Rng64::new(5);
    let mut c = ctx(&images, &mut rng);
    let mut s = DualismScene::default();

    assert!(s.apply_manual(ManualCommand::SpawnPair, &mut c));
    assert_eq!(s.words().len(), 2);
    assert!(s.apply_manual(ManualCommand::RetriggerAll, &mut c));
    assert!(
        s.words()
            .iter()
            .all(|(_, w)| (2.0..3.0).contains(&w.scale))
    );
    assert!(s.apply_manual(ManualCommand::SpawnClick(Point::new(5.0, 5.0)), &mut c));
    assert_eq!(s.words().len(), 3);
    assert!(s.apply_manual(ManualCommand::SelectDualitySet(1), &mut c));
    assert_eq!(s.params().duality_set, 1);
    assert!(!s.apply_manual(ManualCommand::SelectDualitySet(7), &mut c));
    assert!(!s.apply_manual(ManualCommand::SelectScene(SceneKind::Landscape), &mut c));
    assert!(s.apply_manual(ManualCommand::ClearWords, &mut c));
    assert!(s.words().is_empty());
}

#[test]
fn render_clears_to_background_and_draws_words() {
    let images = ImageLibrary::default();
    let mut rng = Rng64::new(5);
    let mut c = ctx(&images, &mut rng);
    c.canvas = Canvas::new(600, 300);
    let mut s = DualismScene::default();
    let mut out = Surface::new(600, 300).unwrap();

    assert_eq!(s.render(&mut c, &mut out).unwrap(), SceneOutput::Rendered);
    assert!(out.data().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));

    let Some(face) = FontFace::system_sans() else {
        return;
    };
    s.set_font(&face).unwrap();
    s.spawn_click(Point::new(300.0, 150.0), c.rng);
    s.render(&mut c, &mut out).unwrap();
    let lit = out
        .data()
        .chunks_exact(4)
        .filter(|p| p[0] == CLICK_COLOR.r && p[1] == CLICK_COLOR.g)
        .count();
    assert!(lit > 0);
}

#[test]
fn words_are_not_drawn_without_a_font() {
    let images = ImageLibrary::default();
    let mut rng = Rng64::new(5);
    let mut c = ctx(&images, &mut rng);
    c.canvas = Canvas::new(64, 32);
    let mut s = DualismScene::default();
    assert!(s.text_engine().is_none());
    let mut out = Surface::new(64, 32).unwrap();
    s.spawn_click(Point::new(32.0, 16.0), c.rng);
    s.render(&mut c, &mut out).unwrap();
    assert!(out.data().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}
