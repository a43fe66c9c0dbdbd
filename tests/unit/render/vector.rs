use super::*;
use crate::assets::images::ImageHandle;
use crate::foundation::core::Rgba8Premul;

fn near(a: u8, b: u8) -> bool {
    a.abs_diff(b) <= 1
}

#[test]
fn rect_fill_is_composited_over_target() {
    let mut s = Surface::filled(8, 8, Rgba8Premul::opaque_black()).unwrap();
    let mut pass = VectorPass::for_surface(&s).unwrap();
    pass.fill_rect(Rect::new(2.0, 2.0, 6.0, 6.0), Rgb8::WHITE, 255.0);
    assert!(!pass.is_empty());
    pass.composite_onto(&mut s).unwrap();
    assert_eq!(s.pixel(3, 3).unwrap().to_array(), [255, 255, 255, 255]);
    assert_eq!(s.pixel(0, 0).unwrap().to_array(), [0, 0, 0, 255]);
    assert_eq!(s.pixel(6, 6).unwrap().to_array(), [0, 0, 0, 255]);
}

#[test]
fn translucent_rect_blends_with_target() {
    let mut s = Surface::filled(4, 4, Rgba8Premul::opaque_black()).unwrap();
    let mut pass = VectorPass::for_surface(&s).unwrap();
    pass.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgb8::WHITE, 128.0);
    pass.composite_onto(&mut s).unwrap();
    let p = s.pixel(1, 1).unwrap();
    assert!(near(p.r, 128), "{p:?}");
    assert_eq!(p.a, 255);
}

#[test]
fn zero_alpha_and_empty_rects_record_nothing() {
    let s = Surface::new(4, 4).unwrap();
    let mut pass = VectorPass::for_surface(&s).unwrap();
    pass.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgb8::WHITE, 0.0);
    pass.fill_rect(Rect::new(1.0, 1.0, 1.0, 3.0), Rgb8::WHITE, 255.0);
    pass.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Rgb8::WHITE, f64::NAN);
    assert!(pass.is_empty());
}

#[test]
fn pass_rejects_a_target_of_another_size() {
    let small = Surface::new(4, 4).unwrap();
    let mut big = Surface::new(5, 4).unwrap();
    let pass = VectorPass::for_surface(&small).unwrap();
    let err = pass.composite_onto(&mut big).unwrap_err();
    assert!(err.to_string().starts_with("render error:"), "{err}");
}

#[test]
fn radial_fill_darkens_outward() {
    let mut s = Surface::filled(41, 41, Rgba8Premul::from_straight_rgba(255, 255, 255, 255)).unwrap();
    let mut pass = VectorPass::for_surface(&s).unwrap();
    pass.fill_radial(
        Rect::new(0.0, 0.0, 41.0, 41.0),
        Point::new(20.5, 20.5),
        20.0,
        Rgb8::BLACK,
        &[(0.0, 0.0), (0.5, 0.0), (1.0, 255.0)],
    );
    pass.composite_onto(&mut s).unwrap();
    assert!(near(s.pixel(20, 20).unwrap().r, 255));
    let edge = s.pixel(20, 0).unwrap().r;
    let corner = s.pixel(0, 0).unwrap().r;
    assert!(edge < 40, "{edge}");
    assert!(corner <= edge);
}

#[test]
fn triangle_affine_maps_texel_corners_onto_screen_corners() {
    let uv = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 5.0),
    ];
    let pos = [
        Point::new(3.0, 4.0),
        Point::new(23.0, 4.0),
        Point::new(3.0, 14.0),
    ];
    let map = triangle_affine(uv, pos).unwrap();
    for (u, p) in uv.iter().zip(pos) {
        let got = map * *u;
        assert!((got - p).hypot() < 1e-9, "{got:?} vs {p:?}");
    }
}

#[test]
fn collinear_texels_have_no_map() {
    let uv = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(2.0, 2.0),
    ];
    let pos = [
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(0.0, 4.0),
    ];
    assert!(triangle_affine(uv, pos).is_none());
    let bad = [Point::new(f64::NAN, 0.0), pos[1], pos[2]];
    assert!(triangle_affine(bad, pos).is_none());
}

#[test]
fn inflation_moves_every_edge_outward() {
    let tri = [
        Point::new(0.0, 0.0),
        Point::new(30.0, 0.0),
        Point::new(0.0, 30.0),
    ];
    let [a, b, c] = inflate_triangle(tri, 0.75);
    // Legs along the axes move out by exactly the offset.
    assert!((a.y + 0.75).abs() < 1e-9 && (b.y + 0.75).abs() < 1e-9);
    assert!((a.x + 0.75).abs() < 1e-9 && (c.x + 0.75).abs() < 1e-9);

    let sliver = [
        Point::new(0.0, 0.0),
        Point::new(30.0, 0.0),
        Point::new(0.0, 0.5),
    ];
    assert_eq!(inflate_triangle(sliver, 0.75), sliver);
}

#[test]
fn image_scales_onto_a_rect() {
    let img = ImageHandle::solid(0, "g", 2, 2, Rgba8Premul::from_straight_rgba(0, 200, 0, 255))
        .unwrap();
    let mut s = Surface::filled(20, 10, Rgba8Premul::opaque_black()).unwrap();
    let mut pass = VectorPass::for_surface(&s).unwrap();
    pass.draw_image(
        img.paint(),
        kurbo::Size::new(2.0, 2.0),
        Affine::translate((10.0, 0.0)) * Affine::scale_non_uniform(5.0, 5.0),
        1.0,
    );
    pass.composite_onto(&mut s).unwrap();
    let inside = s.pixel(15, 5).unwrap();
    assert!(near(inside.g, 200) && inside.r == 0 && inside.a == 255, "{inside:?}");
    assert_eq!(s.pixel(5, 5).unwrap().to_array(), [0, 0, 0, 255]);
}

#[test]
fn adjacent_textured_triangles_leave_no_seam() {
    let img = ImageHandle::solid(0, "w", 4, 4, Rgba8Premul::from_straight_rgba(255, 255, 255, 255))
        .unwrap();
    let mut s = Surface::filled(16, 16, Rgba8Premul::opaque_black()).unwrap();
    let (p00, p10, p01, p11) = (
        Point::new(0.0, 0.0),
        Point::new(16.0, 0.0),
        Point::new(0.0, 16.0),
        Point::new(16.0, 16.0),
    );
    let (t00, t10, t01, t11) = (
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(0.0, 4.0),
        Point::new(4.0, 4.0),
    );
    let mut pass = VectorPass::for_surface(&s).unwrap();
    pass.textured_triangles(
        &img.paint(),
        [
            ([p00, p10, p01], [t00, t10, t01]),
            ([p10, p11, p01], [t10, t11, t01]),
        ],
        1.0,
    );
    pass.composite_onto(&mut s).unwrap();
    for y in 0..16 {
        for x in 0..16 {
            let p = s.pixel(x, y).unwrap();
            assert!(near(p.r, 255), "({x},{y}) {p:?}");
        }
    }
}

#[test]
fn oversized_surfaces_cannot_host_a_pass() {
    assert!(pixmap_dims(70_000, 10).is_err());
    assert_eq!(pixmap_dims(640, 360).unwrap(), (640, 360));
}
