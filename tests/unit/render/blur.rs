use super::*;

#[test]
fn kernel_sums_to_one_in_q16() {
    for (radius, sigma) in [(1, 0.5), (4, 2.0), (24, 12.0)] {
        let k = kernel_q16(radius, sigma).unwrap();
        assert_eq!(k.len(), (2 * radius + 1) as usize);
        assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
        assert!(k[radius as usize] >= k[0]);
    }
    assert!(kernel_q16(2, f32::NAN).is_err());
}

#[test]
fn non_positive_sigma_is_a_no_op() {
    let mut p = Pixmap::new(4, 4).unwrap();
    p.fill(resvg::tiny_skia::Color::from_rgba8(10, 20, 30, 255));
    let before = p.data().to_vec();
    blur_pixmap(&mut p, 0.0).unwrap();
    blur_pixmap(&mut p, -3.0).unwrap();
    assert_eq!(p.data(), &before[..]);
}

#[test]
fn uniform_image_is_unchanged() {
    let mut p = Pixmap::new(16, 16).unwrap();
    p.fill(resvg::tiny_skia::Color::from_rgba8(90, 60, 30, 255));
    let before = p.data().to_vec();
    blur_pixmap(&mut p, 3.0).unwrap();
    assert_eq!(p.data(), &before[..]);
}

#[test]
fn single_pixel_spreads_symmetrically() {
    let mut p = Pixmap::new(21, 21).unwrap();
    let idx = (10 * 21 + 10) * 4;
    p.data_mut()[idx..idx + 4].copy_from_slice(&[255, 255, 255, 255]);
    blur_pixmap(&mut p, 2.0).unwrap();

    let center = p.pixel(10, 10).unwrap().alpha();
    let left = p.pixel(8, 10).unwrap().alpha();
    let right = p.pixel(12, 10).unwrap().alpha();
    let up = p.pixel(10, 8).unwrap().alpha();
    assert!(center < 255 && center > left);
    assert!(left > 0);
    assert_eq!(left, right);
    assert!(left.abs_diff(up) <= 1);
    assert_eq!(p.pixel(0, 0).unwrap().alpha(), 0);
}

#[test]
fn blur_reaches_the_edges_of_non_square_pixmaps() {
    let mut p = Pixmap::new(9, 3).unwrap();
    let idx = (9 + 8) * 4;
    p.data_mut()[idx..idx + 4].copy_from_slice(&[0, 0, 255, 255]);
    blur_pixmap(&mut p, 1.0).unwrap();

    assert!(p.pixel(8, 1).unwrap().alpha() > p.pixel(7, 1).unwrap().alpha());
    assert!(p.pixel(7, 1).unwrap().alpha() > 0);
    assert!(p.pixel(8, 0).unwrap().alpha() > 0);
    assert_eq!(p.pixel(0, 1).unwrap().alpha(), 0);
}
