use super::*;

#[test]
fn premultiply_then_demultiply_is_close() {
    let mut img = RgbaImage::new(3, 1);
    img.put_pixel(0, 0, image::Rgba([200, 100, 50, 255]));
    img.put_pixel(1, 0, image::Rgba([200, 100, 50, 128]));
    img.put_pixel(2, 0, image::Rgba([200, 100, 50, 0]));

    let pixmap = pixmap_from_rgba(&img).unwrap();
    let half = pixmap.pixel(1, 0).unwrap();
    assert_eq!(half.alpha(), 128);
    assert_eq!(half.red(), 100);

    let back = pixmap_to_rgba(&pixmap).unwrap();
    assert_eq!(back.get_pixel(0, 0).0, [200, 100, 50, 255]);
    let [r, g, b, a] = back.get_pixel(1, 0).0;
    assert_eq!(a, 128);
    assert!(r.abs_diff(200) <= 2 && g.abs_diff(100) <= 2 && b.abs_diff(50) <= 2);
    assert_eq!(back.get_pixel(2, 0).0, [0, 0, 0, 0]);
}

#[test]
fn zero_sized_pixmaps_are_rejected() {
    assert!(new_pixmap(0, 10).is_err());
    assert!(pixmap_from_rgba(&RgbaImage::new(0, 0)).is_err());
}
