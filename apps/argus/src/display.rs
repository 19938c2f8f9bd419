/// Convert an HWC RGB buffer to the packed ARGB u32 pixels minifb wants.
pub fn rgb_to_argb(buf: &[u8], width: usize, height: usize) -> Vec<u32> {
    let expected = width * height * 3;
    assert!(
        buf.len() >= expected,
        "RGB buffer too small: expected {} bytes, got {}",
        expected,
        buf.len()
    );
    let mut argb = Vec::with_capacity(width * height);
    for i in 0..width * height {
        let idx = i * 3;
        let r = buf[idx] as u32;
        let g = buf[idx + 1] as u32;
        let b = buf[idx + 2] as u32;
        argb.push((r << 16) | (g << 8) | b);
    }
    argb
}
