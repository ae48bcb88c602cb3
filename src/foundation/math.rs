pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Composite premultiplied RGBA8 pixels over an opaque RGB8 buffer of the same pixel count.
pub(crate) fn over_premul_onto_rgb(dst_rgb: &mut [u8], src_rgba_premul: &[u8]) {
    for (d, s) in dst_rgb
        .chunks_exact_mut(3)
        .zip(src_rgba_premul.chunks_exact(4))
    {
        let a = u16::from(s[3]);
        if a == 0 {
            continue;
        }
        if a == 255 {
            d.copy_from_slice(&s[..3]);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let v = u16::from(s[c]) + mul_div255_u16(u16::from(d[c]), inv);
            d[c] = v.min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_replaces_destination() {
        let mut dst = vec![10u8, 20, 30];
        over_premul_onto_rgb(&mut dst, &[200, 100, 0, 255]);
        assert_eq!(dst, vec![200, 100, 0]);
    }

    #[test]
    fn transparent_source_leaves_destination() {
        let mut dst = vec![10u8, 20, 30];
        over_premul_onto_rgb(&mut dst, &[0, 0, 0, 0]);
        assert_eq!(dst, vec![10, 20, 30]);
    }

    #[test]
    fn half_alpha_blends_over_white() {
        // Premultiplied black at 50% over white lands near mid gray.
        let mut dst = vec![255u8, 255, 255];
        over_premul_onto_rgb(&mut dst, &[0, 0, 0, 128]);
        assert_eq!(dst, vec![127, 127, 127]);
    }
}
