use super::image::{Buffer, Image, RowsMut};
use super::kernels::{self, Kernel};

pub const CHANNEL_MIN: f64 = 0.0;
pub const CHANNEL_MAX: f64 = u16::MAX as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Grayscale,
    Sharpen,
    EdgeDetection,
    Blur,
}

impl Effect {
    #[allow(unused)]
    pub const ALL: [Effect; 4] = [
        Effect::Grayscale,
        Effect::Sharpen,
        Effect::EdgeDetection,
        Effect::Blur,
    ];

    /// Maps a catalog code to an effect, `None` for anything outside the set.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "G" => Some(Effect::Grayscale),
            "S" => Some(Effect::Sharpen),
            "E" => Some(Effect::EdgeDetection),
            "B" => Some(Effect::Blur),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Effect::Grayscale => "G",
            Effect::Sharpen => "S",
            Effect::EdgeDetection => "E",
            Effect::Blur => "B",
        }
    }

    pub fn kernel(&self) -> Option<&'static Kernel> {
        match self {
            Effect::Grayscale => None,
            Effect::Sharpen => Some(&kernels::SHARPEN),
            Effect::EdgeDetection => Some(&kernels::EDGE_DETECTION),
            Effect::Blur => Some(&kernels::BLUR),
        }
    }

    /// Computes this effect for the rows owned by `out`, reading only `input`.
    pub fn apply_rows(&self, input: &Buffer, out: &mut RowsMut) {
        match self.kernel() {
            Some(kernel) => convolve(input, kernel, out),
            None => grayscale(input, out),
        }
    }
}

impl Image {
    /// Applies `effect` over the full row range. Does not swap.
    pub fn apply(&mut self, effect: Effect) {
        let (input, mut rows) = self.rows_mut();
        effect.apply_rows(input, &mut rows);
    }
}

pub fn clamp(value: f64) -> u16 {
    if value < CHANNEL_MIN {
        CHANNEL_MIN as u16
    } else if value > CHANNEL_MAX {
        CHANNEL_MAX as u16
    } else {
        value as u16
    }
}

pub fn grayscale(input: &Buffer, out: &mut RowsMut) {
    let bounds = out.bounds();

    for y in out.min_y()..out.max_y() {
        for x in bounds.min_x..bounds.max_x {
            let [r, g, b, a] = input.get_pixel(x, y).0;
            let grey = clamp((r as f64 + g as f64 + b as f64) / 3.0);

            out.set(x, y, [grey, grey, grey, a]);
        }
    }
}

/// 3x3 convolution over red, green and blue. Neighbours outside the image
/// columns or outside the rows owned by `out` are left out of the sum
/// entirely. Alpha is copied from the input.
pub fn convolve(input: &Buffer, kernel: &Kernel, out: &mut RowsMut) {
    let bounds = out.bounds();
    let (min_y, max_y) = (out.min_y() as i64, out.max_y() as i64);
    let (min_x, max_x) = (bounds.min_x as i64, bounds.max_x as i64);

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (mut r_sum, mut g_sum, mut b_sum) = (0.0, 0.0, 0.0);

            for ky in -1i64..=1 {
                for kx in -1i64..=1 {
                    let ix = x + kx;
                    let iy = y + ky;
                    if ix < min_x || ix >= max_x || iy < min_y || iy >= max_y {
                        continue;
                    }

                    let [r, g, b, _] = input.get_pixel(ix as u32, iy as u32).0;
                    let weight = kernel[(ky + 1) as usize][(kx + 1) as usize];
                    r_sum += r as f64 * weight;
                    g_sum += g as f64 * weight;
                    b_sum += b as f64 * weight;
                }
            }

            let alpha = input.get_pixel(x as u32, y as u32).0[3];
            out.set(
                x as u32,
                y as u32,
                [clamp(r_sum), clamp(g_sum), clamp(b_sum), alpha],
            );
        }
    }
}
