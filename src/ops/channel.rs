// ============================================================================
// CHANNEL ISOLATION
// ============================================================================

use rayon::prelude::*;

use crate::buffer::{CHANNELS, Channel, PixelBuffer};

/// Keep one channel and zero the other two.
/// The kept samples are copied unchanged.
pub fn extract_channel(src: &PixelBuffer, channel: Channel) -> PixelBuffer {
    let idx = channel.index();
    let stride = src.stride();
    let src_raw = src.as_raw();
    let mut out = PixelBuffer::new(src.width(), src.height());

    out.as_raw_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &src_raw[y * stride..(y + 1) * stride];
            for (px_out, px_in) in row_out
                .chunks_exact_mut(CHANNELS)
                .zip(row_in.chunks_exact(CHANNELS))
            {
                px_out[idx] = px_in[idx];
            }
        });

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                buf.put_pixel(x, y, [(x * 20) as u8, (y * 30) as u8, (x + y) as u8 + 100]);
            }
        }
        buf
    }

    #[test]
    fn keeps_only_the_selected_channel() {
        let src = gradient(7, 5);
        for channel in [Channel::Blue, Channel::Green, Channel::Red] {
            let out = extract_channel(&src, channel);
            assert_eq!(out.dimensions(), src.dimensions());
            for (p_out, p_in) in out.pixels().zip(src.pixels()) {
                for c in 0..CHANNELS {
                    if c == channel.index() {
                        assert_eq!(p_out[c], p_in[c]);
                    } else {
                        assert_eq!(p_out[c], 0);
                    }
                }
            }
        }
    }

    #[test]
    fn is_idempotent() {
        let src = gradient(6, 6);
        let once = extract_channel(&src, Channel::Red);
        let twice = extract_channel(&once, Channel::Red);
        assert_eq!(once, twice);
    }

    #[test]
    fn green_of_pure_red_is_black() {
        let red = PixelBuffer::new_filled(100, 50, [0, 0, 255]);
        let out = extract_channel(&red, Channel::Green);
        assert_eq!(out.dimensions(), (100, 50));
        assert!(out.as_raw().iter().all(|&v| v == 0));
    }
}
