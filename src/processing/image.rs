use image::{ImageBuffer, Rgba};

/// 16-bit RGBA pixels, channel values in `0..=65535`.
pub type Buffer = ImageBuffer<Rgba<u16>, Vec<u16>>;

const CHANNELS: usize = 4;

/// Inclusive-exclusive pixel rectangle. Images are always anchored at the
/// origin of their buffers, so `min_x`/`min_y` double as buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Bounds {
    pub fn of(buffer: &Buffer) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: buffer.width(),
            max_y: buffer.height(),
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }
}

/// Double-buffered image. Effects read `input` and write `output`; after
/// every applied effect the scheduler calls [`Image::swap`] so the next
/// effect reads what was just produced.
#[derive(Debug, Clone)]
pub struct Image {
    pub bounds: Bounds,
    input: Buffer,
    output: Buffer,
}

impl Image {
    pub fn new(buffer: Buffer) -> Self {
        let bounds = Bounds::of(&buffer);
        let output = buffer.clone();

        Self {
            bounds,
            input: buffer,
            output,
        }
    }

    #[allow(unused)]
    pub fn input(&self) -> &Buffer {
        &self.input
    }

    #[allow(unused)]
    pub fn output(&self) -> &Buffer {
        &self.output
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.input, &mut self.output);
    }

    /// Buffer holding the most recent effect result (the original pixels if
    /// nothing was applied yet).
    pub fn result(&self) -> &Buffer {
        &self.input
    }

    #[allow(unused)]
    pub fn into_result(self) -> Buffer {
        self.input
    }

    /// Frozen input together with a writable view over every output row.
    pub fn rows_mut(&mut self) -> (&Buffer, RowsMut<'_>) {
        let bounds = self.bounds;
        let rows = RowsMut {
            data: &mut self.output,
            bounds,
            min_y: bounds.min_y,
            max_y: bounds.max_y,
        };

        (&self.input, rows)
    }

    /// Frozen input together with disjoint writable views of at most
    /// `slice_height` rows each, covering the whole output top to bottom.
    pub fn split_rows(&mut self, slice_height: u32) -> (&Buffer, Vec<RowsMut<'_>>) {
        let bounds = self.bounds;
        let row_len = bounds.width() as usize * CHANNELS;
        let chunk_len = row_len * slice_height as usize;

        if chunk_len == 0 {
            return (&self.input, Vec::new());
        }

        let data: &mut [u16] = &mut self.output;
        let slices = data
            .chunks_mut(chunk_len)
            .enumerate()
            .map(|(i, chunk)| {
                let min_y = bounds.min_y + i as u32 * slice_height;
                let max_y = (min_y + slice_height).min(bounds.max_y);
                RowsMut {
                    data: chunk,
                    bounds,
                    min_y,
                    max_y,
                }
            })
            .collect();

        (&self.input, slices)
    }
}

/// Exclusive view over output rows `[min_y, max_y)`.
pub struct RowsMut<'a> {
    data: &'a mut [u16],
    bounds: Bounds,
    min_y: u32,
    max_y: u32,
}

impl RowsMut<'_> {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn min_y(&self) -> u32 {
        self.min_y
    }

    pub fn max_y(&self) -> u32 {
        self.max_y
    }

    pub fn set(&mut self, x: u32, y: u32, pixel: [u16; 4]) {
        debug_assert!(y >= self.min_y && y < self.max_y, "row {y} outside slice");

        let row = (y - self.min_y) as usize;
        let col = (x - self.bounds.min_x) as usize;
        let offset = (row * self.bounds.width() as usize + col) * CHANNELS;

        self.data[offset..offset + CHANNELS].copy_from_slice(&pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_common::random_buffer;

    #[test]
    fn swap_exchanges_buffers() {
        let mut image = Image::new(random_buffer(4, 3, 1));
        let original = image.input().clone();

        let (_, mut rows) = image.rows_mut();
        rows.set(0, 0, [1, 2, 3, 4]);

        image.swap();

        assert_eq!(image.result().get_pixel(0, 0).0, [1, 2, 3, 4]);
        assert_eq!(image.output(), &original);
    }

    #[test]
    fn split_rows_covers_every_row_once() {
        let mut image = Image::new(random_buffer(5, 7, 2));

        let (_, slices) = image.split_rows(3);
        let ranges: Vec<_> = slices.iter().map(|s| (s.min_y(), s.max_y())).collect();

        assert_eq!(ranges, vec![(0, 3), (3, 6), (6, 7)]);
    }

    #[test]
    fn slice_writes_land_on_absolute_rows() {
        let mut image = Image::new(random_buffer(2, 4, 3));

        {
            let (_, mut slices) = image.split_rows(2);
            slices[1].set(1, 3, [9, 9, 9, 9]);
        }
        image.swap();

        assert_eq!(image.result().get_pixel(1, 3).0, [9, 9, 9, 9]);
    }

    #[test]
    fn empty_image_has_no_slices() {
        let mut image = Image::new(Buffer::new(0, 0));

        let (_, slices) = image.split_rows(0);

        assert!(slices.is_empty());
    }
}
