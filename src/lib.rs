//! Word clouds for ASReview datasets.
//!
//! The crate has two layers. [`WordCloud`] turns a block of text into an
//! image: it tokenizes and counts words, lays them out on a canvas and
//! colours them. On top of it, [`data`], [`figure`] and [`entrypoint`] load a
//! screening dataset, pick the records and text field to show, and save or
//! display the result.

use std::{fs, path::PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use log::debug;
use nanorand::{Rng, WyRand};
use sat::{OccupancyMap, Rect};
use text::GlyphData;

pub use colormap::Colormap;
pub use config::Config;
pub use error::{DataError, Error, WordCloudError};
pub use stopwords::{default_stopwords, extend_stopwords};
pub use tokenizer::Tokenizer;

mod colormap;
pub mod config;
pub mod data;
pub mod entrypoint;
mod error;
pub mod figure;
mod sat;
mod stopwords;
mod text;
mod tokenizer;

pub struct Word {
    pub text: String,
    pub font_size: PxScale,
    pub glyphs: GlyphData,
    pub rotated: bool,
    pub position: (u32, u32),
}

impl Word {
    /// Width and height of the drawn word, orientation included.
    pub fn extent(&self) -> (u32, u32) {
        self.glyphs.extent(self.rotated)
    }
}

/// The typeface used when no font file is configured. It covers Latin,
/// Greek and Cyrillic only; CJK text needs a font passed to
/// [`WordCloud::with_font_from_path`].
pub fn default_font() -> Result<FontVec, WordCloudError> {
    Ok(FontVec::try_from_vec(
        epaint_default_fonts::UBUNTU_LIGHT.to_vec(),
    )?)
}

pub struct WordCloud {
    tokenizer: Tokenizer,
    background_color: Rgba<u8>,
    pub font: FontVec,
    width: u32,
    height: u32,
    min_font_size: f32,
    max_font_size: Option<f32>,
    font_step: f32,
    word_margin: u32,
    word_rotate_chance: f32,
    relative_font_scaling: f32,
    rng_seed: Option<u64>,
    colormap: Colormap,
}

impl Default for WordCloud {
    fn default() -> Self {
        let font = default_font().expect("Bundled font is invalid");
        let colormap = Colormap::from_name("viridis").expect("viridis is a built-in colormap");

        WordCloud {
            tokenizer: Tokenizer::default().with_filter(default_stopwords()),
            background_color: Rgba([0, 0, 0, 255]),
            font,
            width: 400,
            height: 200,
            min_font_size: 4.0,
            max_font_size: None,
            font_step: 1.0,
            word_margin: 2,
            word_rotate_chance: 0.10,
            relative_font_scaling: 0.5,
            rng_seed: None,
            colormap,
        }
    }
}

impl WordCloud {
    pub fn with_tokenizer(mut self, value: Tokenizer) -> Self {
        self.tokenizer = value;
        self
    }

    pub fn with_font(mut self, value: FontVec) -> Self {
        self.font = value;
        self
    }

    pub fn with_font_from_path(mut self, path: impl Into<PathBuf>) -> Result<Self, WordCloudError> {
        let path = path.into();
        let font_file =
            fs::read(&path).map_err(|source| WordCloudError::FontFile { path, source })?;

        self.font = FontVec::try_from_vec(font_file)?;

        Ok(self)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Result<Self, WordCloudError> {
        if width == 0 || height == 0 {
            return Err(WordCloudError::InvalidSize { width, height });
        }

        self.width = width;
        self.height = height;
        Ok(self)
    }

    pub fn with_background_color(mut self, value: Rgba<u8>) -> Self {
        self.background_color = value;
        self
    }

    pub fn with_colormap(mut self, value: Colormap) -> Self {
        self.colormap = value;
        self
    }

    pub fn with_rng_seed(mut self, value: u64) -> Self {
        self.rng_seed = Some(value);
        self
    }

    pub fn with_max_font_size(mut self, value: Option<f32>) -> Self {
        self.max_font_size = value;
        self
    }

    pub fn with_min_font_size(mut self, value: f32) -> Self {
        self.min_font_size = value;
        self
    }

    pub fn with_font_step(mut self, value: f32) -> Self {
        self.font_step = value;
        self
    }

    pub fn with_word_margin(mut self, value: u32) -> Self {
        self.word_margin = value;
        self
    }

    pub fn with_word_rotate_chance(mut self, value: f32) -> Self {
        self.word_rotate_chance = value;
        self
    }

    pub fn with_relative_font_scaling(mut self, value: f32) -> Self {
        self.relative_font_scaling = value;
        self
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rng(&self) -> WyRand {
        match self.rng_seed {
            Some(seed) => WyRand::new_seed(seed),
            None => WyRand::new(),
        }
    }

    fn generate_from_word_positions<F>(
        &self,
        rng: &mut WyRand,
        word_positions: &[Word],
        color_func: F,
    ) -> RgbaImage
    where
        F: Fn(&Word, &mut WyRand) -> Rgba<u8>,
    {
        let mut final_image_buffer =
            RgbaImage::from_pixel(self.width, self.height, self.background_color);

        for word in word_positions {
            let col = color_func(word, rng);

            text::draw_glyphs_to_rgba_buffer(
                &mut final_image_buffer,
                &word.glyphs,
                &self.font,
                word.position,
                word.rotated,
                col,
            )
        }

        final_image_buffer
    }

    /// Renders `text`, colouring each word with a uniform sample of the
    /// colormap (viridis unless configured).
    pub fn generate_from_text(&self, text: &str) -> Result<RgbaImage, WordCloudError> {
        self.generate_from_text_with_color_func(text, |_, rng| {
            self.colormap.sample(unit_interval(rng))
        })
    }

    pub fn generate_from_text_with_color_func<F>(
        &self,
        text: &str,
        color_func: F,
    ) -> Result<RgbaImage, WordCloudError>
    where
        F: Fn(&Word, &mut WyRand) -> Rgba<u8>,
    {
        let frequencies = self.tokenizer.get_normalized_word_frequencies(text);
        let mut rng = self.rng();
        let words = self.layout(&frequencies, &mut rng)?;

        Ok(self.generate_from_word_positions(&mut rng, &words, color_func))
    }

    /// Places the words of `text` without drawing them.
    pub fn layout_text(&self, text: &str) -> Result<Vec<Word>, WordCloudError> {
        let frequencies = self.tokenizer.get_normalized_word_frequencies(text);
        self.layout(&frequencies, &mut self.rng())
    }

    fn layout(
        &self,
        frequencies: &[(String, f32)],
        rng: &mut WyRand,
    ) -> Result<Vec<Word>, WordCloudError> {
        if frequencies.is_empty() {
            return Err(WordCloudError::NoWords);
        }

        let font_size = self.initial_font_size(frequencies)?;
        debug!(
            "Laying out {} words starting at {font_size}px",
            frequencies.len()
        );

        let words = self.place_words(frequencies, font_size, rng);
        debug!("Placed {} of {} words", words.len(), frequencies.len());

        Ok(words)
    }

    //使用前两个词的字号来作为参考
    fn initial_font_size(&self, frequencies: &[(String, f32)]) -> Result<f32, WordCloudError> {
        if let Some(max_font_size) = self.max_font_size {
            return Ok(max_font_size);
        }

        if frequencies.len() == 1 {
            return Ok(self.height as f32);
        }

        let trial = self.place_words(&frequencies[..2], self.height as f32, &mut self.rng());
        match trial.as_slice() {
            [first, second, ..] => {
                let (a, b) = (first.font_size.y, second.font_size.y);
                Ok((2.0 * a * b / (a + b)).floor())
            }
            [only] => Ok(only.font_size.y),
            [] => Err(WordCloudError::CanvasTooSmall),
        }
    }

    fn place_words(
        &self,
        frequencies: &[(String, f32)],
        start_font_size: f32,
        rng: &mut WyRand,
    ) -> Vec<Word> {
        let mut gray_buffer = GrayImage::from_pixel(self.width, self.height, Luma([0]));
        let mut occupancy = OccupancyMap::new(self.width, self.height);

        let mut final_words = Vec::with_capacity(frequencies.len());
        let mut font_size = start_font_size;
        let mut last_freq = 1.0;

        for (text, frequency) in frequencies {
            if *frequency <= 0.0 {
                continue;
            }

            let scaling = self.relative_font_scaling;
            if scaling != 0.0 {
                font_size =
                    ((scaling * (frequency / last_freq) + (1.0 - scaling)) * font_size).round();
            }

            let mut rotated = unit_interval(rng) < self.word_rotate_chance;
            let mut tried_other_orientation = false;

            let placement = loop {
                if font_size < self.min_font_size {
                    break None;
                }

                let glyphs = text::text_to_glyphs(text, &self.font, PxScale::from(font_size));
                let (width, height) = glyphs.extent(rotated);
                let rect = Rect {
                    width: width + self.word_margin,
                    height: height + self.word_margin,
                };

                if let Some(point) = occupancy.find_space_for_rect(&rect, rng) {
                    break Some((point, glyphs));
                }

                if !tried_other_orientation && self.word_rotate_chance > 0.0 {
                    rotated = !rotated;
                    tried_other_orientation = true;
                } else {
                    font_size -= self.font_step;
                    rotated = false;
                }
            };

            // the font only shrinks from here, so nothing later fits either
            let Some((point, glyphs)) = placement else {
                break;
            };

            let position = (
                point.x + self.word_margin / 2,
                point.y + self.word_margin / 2,
            );
            text::draw_glyphs_to_gray_buffer(
                &mut gray_buffer,
                &glyphs,
                &self.font,
                position,
                rotated,
            );
            occupancy.update(&gray_buffer, position.1);

            final_words.push(Word {
                text: text.clone(),
                font_size: PxScale::from(font_size),
                glyphs,
                rotated,
                position,
            });
            last_freq = *frequency;
        }

        final_words
    }
}

/// Uniform sample from `[0, 1)`.
fn unit_interval(rng: &mut WyRand) -> f32 {
    const STEPS: u32 = 1 << 24;
    rng.generate_range(0..STEPS) as f32 / STEPS as f32
}
