use std::path::PathBuf;

use image::Rgba;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use crate::processing::data_loader::save_image;
use crate::processing::image::{Buffer, Image};
use crate::scheduler::PathConfig;

/// Deterministic noise image, same seed gives the same pixels.
pub fn random_buffer(width: u32, height: u32, seed: u64) -> Buffer {
    let mut rng = StdRng::seed_from_u64(seed);
    Buffer::from_fn(width, height, |_, _| {
        Rgba([rng.gen(), rng.gen(), rng.gen(), rng.gen_range(1..=u16::MAX)])
    })
}

pub fn uniform_buffer(width: u32, height: u32, pixel: [u16; 4]) -> Buffer {
    Buffer::from_pixel(width, height, Rgba(pixel))
}

/// Temporary `in/` + `out/` tree laid out like the real data directory.
pub struct DataFixture {
    _root: TempDir,
    pub paths: PathConfig,
}

impl DataFixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let paths = PathConfig {
            in_dir: root.path().join("in"),
            out_dir: root.path().join("out"),
        };

        Self { _root: root, paths }
    }

    pub fn write_input(&self, dir: &str, name: &str, buffer: &Buffer) {
        let path = self.paths.in_dir.join(dir).join(name);
        save_image(&path, &Image::new(buffer.clone())).unwrap();
    }

    pub fn output(&self, dir: &str, name: &str) -> PathBuf {
        self.paths.out_dir.join(format!("{}_{}", dir, name))
    }
}
