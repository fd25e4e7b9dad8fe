//! Word cloud rendering for a selection of dataset cells.

use std::{
    env,
    fmt::Display,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use image::{imageops, imageops::FilterType, Rgba, RgbImage, RgbaImage};
use log::{debug, info, warn};

use crate::{extend_stopwords, Colormap, Tokenizer, WordCloud, WordCloudError};

/// Resolution the figure is composed at, in pixels per inch.
pub const DPI: u32 = 100;
/// Padding around the cloud, in points (one default font size).
pub const PAD_POINTS: f32 = 10.0;

/// Styling passed through to the word cloud engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudOptions {
    pub width: u32,
    pub height: u32,
    pub colormap: String,
    pub random_state: Option<u64>,
    pub background_color: String,
    pub max_words: usize,
    pub stopwords: Vec<String>,
    pub font: Option<PathBuf>,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            colormap: "viridis".to_owned(),
            random_state: None,
            background_color: "white".to_owned(),
            max_words: 100,
            stopwords: extend_stopwords(Vec::<String>::new()),
            font: None,
        }
    }
}

impl CloudOptions {
    /// Configured engine for these options.
    pub fn build(&self) -> Result<WordCloud, WordCloudError> {
        let tokenizer = Tokenizer::default()
            .with_filter(&self.stopwords)
            .with_max_words(self.max_words);

        let background = csscolorparser::parse(&self.background_color)
            .map_err(|err| WordCloudError::InvalidColor {
                value: self.background_color.clone(),
                message: err.to_string(),
            })?
            .to_rgba8();

        let mut wordcloud = WordCloud::default()
            .with_tokenizer(tokenizer)
            .with_size(self.width, self.height)?
            .with_background_color(Rgba(background))
            .with_colormap(Colormap::from_name(&self.colormap)?);

        if let Some(seed) = self.random_state {
            wordcloud = wordcloud.with_rng_seed(seed);
        }
        if let Some(font) = &self.font {
            debug!("Using font {}", font.display());
            wordcloud = wordcloud.with_font_from_path(font)?;
        }

        Ok(wordcloud)
    }
}

/// Render the cells as one word cloud.
///
/// The cells are joined with single spaces. The figure is saved to `output`
/// when given (format from the extension) and shown otherwise.
pub fn word_cloud<T: Display>(
    cells: &[T],
    options: &CloudOptions,
    output: Option<&Path>,
) -> Result<(), WordCloudError> {
    let text = cells
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    debug!("Rendering {} cells, {} characters", cells.len(), text.len());

    let cloud = options.build()?.generate_from_text(&text)?;
    let figure = compose_figure(&cloud, options.width, options.height);

    match output {
        Some(path) => {
            figure.save(path)?;
            info!("Word cloud written to {}", path.display());
        }
        None => show(&figure)?,
    }

    Ok(())
}

/// Lay the cloud out on a white `width` x `height` figure.
///
/// The cloud is scaled into the area left inside the padding, keeping its
/// aspect ratio, and centered.
pub fn compose_figure(cloud: &RgbaImage, width: u32, height: u32) -> RgbImage {
    let mut figure = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    let pad = (PAD_POINTS * DPI as f32 / 72.0).round() as u32;
    let (inner_width, inner_height) = (
        width.saturating_sub(2 * pad).max(1),
        height.saturating_sub(2 * pad).max(1),
    );

    let (cloud_width, cloud_height) = cloud.dimensions();
    let scale = f32::min(
        inner_width as f32 / cloud_width as f32,
        inner_height as f32 / cloud_height as f32,
    );
    let target_width = ((cloud_width as f32 * scale).round() as u32).clamp(1, inner_width);
    let target_height = ((cloud_height as f32 * scale).round() as u32).clamp(1, inner_height);

    let resized = imageops::resize(cloud, target_width, target_height, FilterType::Triangle);
    let x = (width - target_width) / 2;
    let y = (height - target_height) / 2;
    imageops::overlay(&mut figure, &resized, x as i64, y as i64);

    image::DynamicImage::ImageRgba8(figure).to_rgb8()
}

fn show(figure: &RgbImage) -> Result<(), WordCloudError> {
    let path = env::temp_dir().join(format!("asreview-wordcloud-{}.png", std::process::id()));
    figure.save(&path)?;

    if open_viewer(&path) {
        info!("Word cloud opened from {}", path.display());
    } else {
        warn!(
            "No image viewer could be started, word cloud written to {}",
            path.display()
        );
    }

    Ok(())
}

fn open_viewer(path: &Path) -> bool {
    let viewers: &[(&str, &[&str])] = if cfg!(target_os = "macos") {
        &[("open", &[])]
    } else if cfg!(windows) {
        &[("cmd", &["/C", "start", ""])]
    } else {
        &[("xdg-open", &[])]
    };

    viewers.iter().any(|(program, args)| {
        Command::new(program)
            .args(*args)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| debug!("Unable to start {program}: {err}"))
            .is_ok()
    })
}
