// ============================================================================
// IMAGE FILTERS - box blur, 3×3 sharpen, generic convolution
// ============================================================================
//
// All passes run in parallel with rayon. Convolution accumulates in f32; the
// box blur keeps exact integer window sums. Results are rounded and clamped
// back to u8. Borders are reflect-101 (`gfedcb|abcdefgh|gfedcba`), the same
// policy the usual desktop imaging libraries use for blur and filter2D.

use rayon::prelude::*;

use crate::buffer::{CHANNELS, PixelBuffer};

/// Dense convolution weights, row-major, odd width and height.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl Kernel {
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Self {
        assert_eq!(data.len(), width * height, "kernel data does not match its size");
        assert!(width % 2 == 1 && height % 2 == 1, "kernel dimensions must be odd");
        Self { data, width, height }
    }

    pub fn from_slice(data: &[f32], width: usize, height: usize) -> Self {
        Self::new(data.to_vec(), width, height)
    }

    /// Unity-gain high-pass: centre 5, four neighbours -1, corners 0.
    pub fn sharpen() -> Self {
        Self::from_slice(&[0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0], 3, 3)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn center(&self) -> (isize, isize) {
        ((self.width / 2) as isize, (self.height / 2) as isize)
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }
}

/// Map a possibly out-of-range coordinate onto `0..len` with reflect-101
/// (`gfedcb|abcdefgh|gfedcba`): the edge sample is not repeated.
pub fn map_coord(coord: isize, len: usize) -> usize {
    let n = len as isize;
    if (0..n).contains(&coord) {
        return coord as usize;
    }
    if n == 1 {
        return 0;
    }
    let period = 2 * n - 2;
    let mut c = coord.rem_euclid(period);
    if c >= n {
        c = period - c;
    }
    c as usize
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Direct 2-D convolution (correlation, kernel not flipped).
pub fn convolve(src: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let stride = src.stride();
    let src_raw = src.as_raw();
    let (kw, kh) = kernel.size();
    let (cx, cy) = kernel.center();

    // Column lookup is the same for every row.
    let col_map: Vec<Vec<usize>> = (0..w)
        .map(|x| {
            (0..kw)
                .map(|kx| map_coord(x as isize + kx as isize - cx, w))
                .collect()
        })
        .collect();

    let mut dst_raw = vec![0u8; stride * h];
    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let rows: Vec<usize> = (0..kh)
                .map(|ky| map_coord(y as isize + ky as isize - cy, h))
                .collect();
            for x in 0..w {
                let mut sums = [0.0f32; CHANNELS];
                for (ky, &sy) in rows.iter().enumerate() {
                    let row_start = sy * stride;
                    for (kx, &sx) in col_map[x].iter().enumerate() {
                        let weight = kernel.get(kx, ky);
                        if weight == 0.0 {
                            continue;
                        }
                        let si = row_start + sx * CHANNELS;
                        for c in 0..CHANNELS {
                            sums[c] += src_raw[si + c] as f32 * weight;
                        }
                    }
                }
                let oi = x * CHANNELS;
                for c in 0..CHANNELS {
                    row_out[oi + c] = to_u8(sums[c]);
                }
            }
        });

    PixelBuffer::from_raw(src.width(), src.height(), dst_raw)
        .unwrap_or_else(|| src.clone())
}

// --- Box Blur (square kernel, separable sliding window) ---

/// Window sums along one line of `len` samples with reflect-101 borders.
///
/// `emit(i, sum)` receives the sum of the `2 * radius + 1` samples centred on
/// `i`. The first window is seeded from whole periods of the mirrored line
/// plus a remainder, then each step adds the entering sample and drops the
/// leaving one, so the cost is O(len) whatever the radius.
fn sliding_window_sums(
    len: usize,
    radius: usize,
    sample: impl Fn(usize) -> u128,
    mut emit: impl FnMut(usize, u128),
) {
    let at = |c: isize| sample(map_coord(c, len));
    let r = radius as isize;
    let window = 2 * radius + 1;

    let mut sum = if len == 1 {
        sample(0) * window as u128
    } else {
        // Reflect-101 repeats every 2 * len - 2 positions.
        let period = 2 * len - 2;
        let period_sum: u128 = (0..period as isize).map(&at).sum();
        let partial: u128 = (0..(window % period) as isize).map(|i| at(i - r)).sum();
        (window / period) as u128 * period_sum + partial
    };
    emit(0, sum);

    for i in 1..len as isize {
        sum += at(i + r);
        sum -= at(i - 1 - r);
        emit(i as usize, sum);
    }
}

/// Mean of the `size`×`size` neighbourhood around every pixel.
/// `size` must be odd; 1 returns an identical copy. Running time does not
/// depend on `size`.
pub fn box_blur(src: &PixelBuffer, size: u32) -> PixelBuffer {
    debug_assert!(size % 2 == 1, "box blur size must be odd");
    if size <= 1 {
        return src.clone();
    }
    let w = src.width() as usize;
    let h = src.height() as usize;
    let stride = src.stride();
    let radius = (size / 2) as usize;
    let area = size as u128 * size as u128;
    let src_raw = src.as_raw();

    // Horizontal pass: exact window sums per row.
    let mut row_sums = vec![0u64; stride * h];
    row_sums
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &src_raw[y * stride..(y + 1) * stride];
            for c in 0..CHANNELS {
                sliding_window_sums(
                    w,
                    radius,
                    |x| row_in[x * CHANNELS + c] as u128,
                    |x, s| row_out[x * CHANNELS + c] = s as u64,
                );
            }
        });

    // Vertical pass, one column per task.
    let columns: Vec<Vec<u8>> = (0..w)
        .into_par_iter()
        .map(|x| {
            let mut col = vec![0u8; h * CHANNELS];
            for c in 0..CHANNELS {
                sliding_window_sums(
                    h,
                    radius,
                    |y| row_sums[y * stride + x * CHANNELS + c] as u128,
                    |y, s| col[y * CHANNELS + c] = ((s + area / 2) / area).min(255) as u8,
                );
            }
            col
        })
        .collect();

    let mut dst_raw = vec![0u8; stride * h];
    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            for (x, col) in columns.iter().enumerate() {
                row_out[x * CHANNELS..(x + 1) * CHANNELS]
                    .copy_from_slice(&col[y * CHANNELS..(y + 1) * CHANNELS]);
            }
        });

    PixelBuffer::from_raw(src.width(), src.height(), dst_raw)
        .unwrap_or_else(|| src.clone())
}

// --- Sharpen (fixed 3×3 kernel) ---

pub fn sharpen(src: &PixelBuffer) -> PixelBuffer {
    convolve(src, &Kernel::sharpen())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                buf.put_pixel(x, y, [v, v / 2, 255 - v]);
            }
        }
        buf
    }

    #[test]
    fn reflect101_mirrors_without_repeating_the_edge() {
        let m = |c| map_coord(c, 8);
        assert_eq!(m(-1), 1);
        assert_eq!(m(-2), 2);
        assert_eq!(m(8), 6);
        assert_eq!(m(9), 5);
        assert_eq!(m(3), 3);
        // Far outside keeps bouncing inside the range.
        assert!(m(-100) < 8);
        assert!(m(1000) < 8);
    }

    #[test]
    fn reflect101_on_tiny_axes() {
        assert_eq!(map_coord(-3, 1), 0);
        assert_eq!(map_coord(5, 1), 0);
        assert_eq!(map_coord(-1, 2), 1);
        assert_eq!(map_coord(2, 2), 0);
    }

    #[test]
    fn sharpen_kernel_layout() {
        let k = Kernel::sharpen();
        assert_eq!(k.size(), (3, 3));
        assert_eq!(k.center(), (1, 1));
        assert_eq!(Kernel::sharpen().get(1, 1), 5.0);
        assert_eq!(Kernel::sharpen().get(1, 0), -1.0);
        assert_eq!(Kernel::sharpen().get(0, 0), 0.0);
    }

    #[test]
    fn box_blur_keeps_uniform_colour() {
        let src = PixelBuffer::new_filled(10, 10, [200, 200, 200]);
        for k in [1, 3, 5, 9, 15] {
            assert_eq!(box_blur(&src, k), src, "k = {k}");
        }
        let coloured = PixelBuffer::new_filled(4, 7, [13, 77, 250]);
        assert_eq!(box_blur(&coloured, 3), coloured);
    }

    #[test]
    fn box_blur_averages_the_neighbourhood() {
        let mut src = PixelBuffer::new(5, 5);
        src.put_pixel(2, 2, [90, 0, 0]);
        let out = box_blur(&src, 3);
        // The single bright pixel spreads evenly over its 3×3 neighbourhood.
        for y in 1..=3 {
            for x in 1..=3 {
                assert_eq!(out.get_pixel(x, y), [10, 0, 0]);
            }
        }
        assert_eq!(out.get_pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn box_blur_matches_direct_convolution() {
        let src = checkerboard(9, 6);
        let separable = box_blur(&src, 3);
        let direct = convolve(&src, &Kernel::new(vec![1.0 / 9.0; 9], 3, 3));
        for (a, b) in separable.as_raw().iter().zip(direct.as_raw()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }

    /// Reference mean with an explicit window loop.
    fn naive_box_blur(src: &PixelBuffer, size: u32) -> PixelBuffer {
        let (w, h) = src.dimensions();
        let r = (size / 2) as isize;
        let mut out = PixelBuffer::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let mut sums = [0u64; CHANNELS];
                for dy in -r..=r {
                    for dx in -r..=r {
                        let sx = map_coord(x as isize + dx, w as usize) as u32;
                        let sy = map_coord(y as isize + dy, h as usize) as u32;
                        let p = src.get_pixel(sx, sy);
                        for c in 0..CHANNELS {
                            sums[c] += p[c] as u64;
                        }
                    }
                }
                let area = (size * size) as u64;
                let px = sums.map(|s| ((s + area / 2) / area) as u8);
                out.put_pixel(x, y, px);
            }
        }
        out
    }

    #[test]
    fn sliding_window_matches_explicit_window() {
        let mut src = checkerboard(7, 5);
        src.put_pixel(3, 2, [17, 201, 99]);
        src.put_pixel(0, 4, [250, 3, 128]);
        for k in [3, 5, 7, 9, 13, 21] {
            assert_eq!(box_blur(&src, k), naive_box_blur(&src, k), "k = {k}");
        }
    }

    #[test]
    fn window_sums_wrap_whole_periods() {
        // Line 0 1 2 mirrors as ..2 1 0 1 2 1 0..; period 4 sums to 4.
        let line = [0u128, 1, 2];
        let mut got = Vec::new();
        sliding_window_sums(3, 4, |i| line[i], |_, s| got.push(s));
        // 9 samples = two periods (8) + one sample at the window start.
        // Window at 0 covers -4..=4: 0 1 2 1 0 1 2 1 0.
        assert_eq!(got[0], 8);
        assert_eq!(got.len(), 3);
        assert_eq!(got, vec![8, 9, 10]);
    }

    #[test]
    fn huge_kernel_is_fast_and_keeps_uniform_colour() {
        let src = PixelBuffer::new_filled(512, 384, [37, 140, 222]);
        let start = std::time::Instant::now();
        assert_eq!(box_blur(&src, 1001), src);
        assert_eq!(box_blur(&src, 2_000_001), src);
        assert!(start.elapsed() < std::time::Duration::from_secs(20));
    }

    #[test]
    fn box_blur_larger_than_image() {
        let src = checkerboard(3, 2);
        let out = box_blur(&src, 11);
        assert_eq!(out.dimensions(), (3, 2));
    }

    #[test]
    fn sharpen_stays_in_range_at_extremes() {
        let black = PixelBuffer::new(8, 8);
        assert_eq!(sharpen(&black), black);
        let white = PixelBuffer::new_filled(8, 8, [255, 255, 255]);
        assert_eq!(sharpen(&white), white);
    }

    #[test]
    fn sharpen_clamps_high_contrast() {
        // 5*255 overshoots and 5*0 - 4*255 undershoots; both must saturate.
        let out = sharpen(&checkerboard(6, 6));
        let src = checkerboard(6, 6);
        for y in 1..5 {
            for x in 1..5 {
                let [b, _, r] = src.get_pixel(x, y);
                let [ob, _, or] = out.get_pixel(x, y);
                assert_eq!(ob, if b == 255 { 255 } else { 0 });
                assert_eq!(or, if r == 255 { 255 } else { 0 });
            }
        }
    }

    #[test]
    fn sharpen_boosts_a_single_peak() {
        let mut src = PixelBuffer::new_filled(5, 5, [100, 100, 100]);
        src.put_pixel(2, 2, [120, 100, 100]);
        let out = sharpen(&src);
        assert_eq!(out.get_pixel(2, 2), [200, 100, 100]);
        assert_eq!(out.get_pixel(2, 1), [80, 100, 100]);
        assert_eq!(out.get_pixel(1, 1), [100, 100, 100]);
    }
}
