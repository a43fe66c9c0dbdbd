use super::*;
use crate::deform::noise::{ConstantField, PerlinField};
use crate::foundation::core::Rgba8Premul;

fn white(w: u32, h: u32) -> ImageHandle {
    ImageHandle::solid(0, "white", w, h, Rgba8Premul::from_straight_rgba(255, 255, 255, 255))
        .unwrap()
}

fn coverage(s: &Surface) -> usize {
    s.data().chunks_exact(4).filter(|p| p[3] != 0).count()
}

#[test]
fn perspective_keeps_z0_plane_and_magnifies_toward_viewer() {
    let cam = Perspective::for_surface(200, 100);
    assert_eq!(cam.project(Vec3::new(30.0, 40.0, 0.0)), Some(Point::new(30.0, 40.0)));
    let near = cam.project(Vec3::new(200.0, 50.0, 10.0)).unwrap();
    assert!(near.x > 200.0);
    assert_eq!(near.y, 50.0);
    assert_eq!(cam.project(Vec3::new(0.0, 0.0, 1e9)), None);
}

#[test]
fn flat_painter_covers_dest() {
    let mut s = Surface::new(16, 8).unwrap();
    FlatPainter
        .paint(&white(4, 4), Rect::new(0.0, 0.0, 16.0, 8.0), 1.0, &mut s)
        .unwrap();
    assert_eq!(coverage(&s), 16 * 8);
    assert_eq!(s.pixel(7, 3).unwrap().to_array(), [255, 255, 255, 255]);
}

#[test]
fn half_opacity_paint_blends_over_existing_pixels() {
    let mut s = Surface::filled(8, 8, Rgba8Premul::opaque_black()).unwrap();
    FlatPainter
        .paint(&white(2, 2), Rect::new(0.0, 0.0, 8.0, 8.0), 0.5, &mut s)
        .unwrap();
    let p = s.pixel(4, 4).unwrap();
    assert!(p.r.abs_diff(128) <= 2, "{p:?}");
    assert_eq!(p.a, 255);
}

#[test]
fn undeformed_mesh_matches_flat_coverage() {
    let mut s = Surface::new(32, 16).unwrap();
    let mut painter = MeshPainter::with_resolution(Arc::new(ConstantField(0.5)), 6, 4);
    painter
        .paint(&white(8, 8), Rect::new(0.0, 0.0, 32.0, 16.0), 1.0, &mut s)
        .unwrap();
    assert_eq!(coverage(&s), 32 * 16);
    // Shared triangle edges overlap, so no pixel is left partly covered.
    assert!(s.data().chunks_exact(4).all(|p| p[0] >= 254 && p[3] >= 254));
}

#[test]
fn deformed_mesh_moves_pixels() {
    let dest = Rect::new(4.0, 4.0, 60.0, 28.0);
    let mut flat = Surface::new(64, 32).unwrap();
    FlatPainter.paint(&white(8, 8), dest, 1.0, &mut flat).unwrap();

    let mut warped = Surface::new(64, 32).unwrap();
    let mut painter = MeshPainter::with_resolution(Arc::new(PerlinField::new(4)), 12, 8);
    painter.set_params(DeformParams {
        time: 0.4,
        wave_amount: 30.0,
        erosion_amount: 0.8,
        effect_intensity: 1.0,
    });
    painter.paint(&white(8, 8), dest, 1.0, &mut warped).unwrap();
    assert_ne!(flat, warped);
}

#[test]
fn mesh_cache_holds_two_topologies() {
    let mut s = Surface::new(8, 8).unwrap();
    let mut painter = MeshPainter::with_resolution(Arc::new(ConstantField(0.5)), 2, 2);
    let full = Rect::new(0.0, 0.0, 8.0, 8.0);
    painter.paint(&white(4, 4), full, 1.0, &mut s).unwrap();
    painter.paint(&white(2, 4), full, 1.0, &mut s).unwrap();
    let sizes = |p: &MeshPainter| -> Vec<Option<kurbo::Size>> {
        p.meshes().iter().map(|m| m.source_size()).collect()
    };
    let first = sizes(&painter);
    assert_eq!(
        first,
        vec![Some(kurbo::Size::new(2.0, 4.0)), Some(kurbo::Size::new(4.0, 4.0))]
    );

    // Alternating between the two images keeps both meshes cached.
    painter.paint(&white(4, 4), full, 1.0, &mut s).unwrap();
    painter.paint(&white(2, 4), full, 1.0, &mut s).unwrap();
    assert_eq!(painter.meshes().len(), 2);
    assert_eq!(sizes(&painter), first);
    assert!(painter.meshes().iter().all(|m| m.dest() == Some(full)));

    painter.paint(&white(3, 3), full, 1.0, &mut s).unwrap();
    assert_eq!(painter.meshes().len(), 2);
    assert_eq!(painter.meshes()[0].source_size(), Some(kurbo::Size::new(3.0, 3.0)));
}
