// Shared pieces of the demo programs: a synthetic grayscale camera and a few
// frame helpers. Not every demo uses every helper.
#![allow(dead_code)]

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Grayscale camera that renders a textured background with one bright,
/// patterned target drifting along a Lissajous path.
pub struct SyntheticCamera {
    pub width: usize,
    pub height: usize,
    tick: u64,
    target_size: i32,
}

impl SyntheticCamera {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tick: 0,
            target_size: 40,
        }
    }

    pub fn frame_len(&self) -> usize {
        self.width * self.height
    }

    /// Center of the target in the frame most recently read.
    pub fn target(&self) -> Point {
        self.target_at(self.tick.saturating_sub(1))
    }

    fn target_at(&self, tick: u64) -> Point {
        let t = tick as f64 / 120.0;
        let margin = self.target_size as f64;
        let half_w = (self.width as f64 - 2.0 * margin) / 2.0;
        let half_h = (self.height as f64 - 2.0 * margin) / 2.0;
        Point::new(
            (margin + half_w + half_w * (t * 1.3).sin()) as i32,
            (margin + half_h + half_h * (t * 0.9).cos()) as i32,
        )
    }

    /// Renders the next frame into `image`, resizing it only if the buffer
    /// does not have the right length yet.
    pub fn read(&mut self, image: &mut Vec<u8>) {
        image.resize(self.frame_len(), 0);

        let target = self.target_at(self.tick);
        let half = self.target_size / 2;
        for y in 0..self.height {
            let row = &mut image[y * self.width..(y + 1) * self.width];
            for (x, px) in row.iter_mut().enumerate() {
                let (xi, yi) = (x as i32, y as i32);
                let (dx, dy) = (xi - target.x, yi - target.y);
                *px = if dx.abs() < half && dy.abs() < half {
                    // Checkered target so template matching has texture to lock on.
                    if ((dx + half) / 5 + (dy + half) / 5) % 2 == 0 {
                        250
                    } else {
                        180
                    }
                } else {
                    background(x, y)
                };
            }
        }
        self.tick += 1;
    }
}

fn background(x: usize, y: usize) -> u8 {
    let h = (x as u32).wrapping_mul(73_856_093) ^ (y as u32).wrapping_mul(19_349_663);
    40 + (h % 48) as u8
}

/// SHA-256 over the pixel data.
pub fn frame_digest(image: &[u8]) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(image));
    digest
}

/// Writes a binary PGM (P5) image.
pub fn write_pgm(path: &Path, image: &[u8], width: usize, height: usize) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P5\n{} {}\n255\n", width, height)?;
    out.write_all(image)?;
    out.flush()
}

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
