//! Render particle snapshots and encode them as an animated GIF.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    time::Duration,
};

use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, DynamicImage, Frame, GrayImage, Luma,
};

use crate::{error::Result, vector::Vector, Float};

const PARTICLE: Luma<u8> = Luma([u8::MAX]);

/// Draw every particle as one white pixel on a black square frame.
///
/// `[-box_radius, box_radius]²` is mapped onto the whole frame with y pointing up.
/// Particles outside the box are skipped.
#[must_use]
pub fn render_frame(positions: &[Vector], box_radius: Float, resolution: u32) -> GrayImage {
    let mut frame = GrayImage::new(resolution, resolution);
    let scale = resolution as Float / (2. * box_radius);

    for r in positions {
        let col = (r.x + box_radius) * scale;
        let row = (box_radius - r.y) * scale;
        if !(0. ..=resolution as Float).contains(&col) || !(0. ..=resolution as Float).contains(&row)
        {
            continue;
        }

        // the far edges belong to the last pixel
        let col = (col as u32).min(resolution - 1);
        let row = (row as u32).min(resolution - 1);
        frame.put_pixel(col, row, PARTICLE);
    }

    frame
}

/// The frames of a run, in order.
#[derive(Clone, Debug)]
pub struct Animation {
    resolution: u32,
    frames: Vec<GrayImage>,
}

impl Animation {
    /// # Panics
    /// If `resolution` is zero.
    #[must_use]
    pub fn new(resolution: u32) -> Self {
        Self::with_capacity(resolution, 0)
    }

    #[must_use]
    pub fn with_capacity(resolution: u32, num_frames: usize) -> Self {
        assert!(resolution > 0, "frames need at least one pixel");
        Self {
            resolution,
            frames: Vec::with_capacity(num_frames),
        }
    }

    pub fn push(&mut self, positions: &[Vector], box_radius: Float) {
        self.frames
            .push(render_frame(positions, box_radius, self.resolution));
    }

    #[must_use]
    pub fn frames(&self) -> &[GrayImage] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Write a looping GIF that shows `fps` frames per second.
    pub fn write_gif(&self, path: impl AsRef<Path>, fps: Float) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        self.encode_gif(file, fps)
    }

    pub fn encode_gif<W: Write>(&self, writer: W, fps: Float) -> Result<()> {
        let delay = Delay::from_saturating_duration(Duration::from_secs_f64(1. / fps));
        let mut encoder = GifEncoder::new(writer);
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(self.frames.iter().map(|frame| {
            let rgba = DynamicImage::ImageLuma8(frame.clone()).to_rgba8();
            Frame::from_parts(rgba, 0, 0, delay)
        }))?;

        log::debug!("encoded {} frames", self.frames.len());
        Ok(())
    }
}
