use clap::Parser;

use tree_core::constants::PHOTO_COUNT;
use tree_core::scene::{DEFAULT_PHOTOS, DEFAULT_SEED};
use tree_core::{ImageSource, SceneConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive particle Christmas tree", long_about = None)]
pub struct Cli {
    /// Seed for every random layout draw
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Photo for the next panel (file path or URL); repeat up to three times
    #[arg(long = "photo", value_name = "PATH")]
    pub photos: Vec<String>,

    /// Initial zoom, clamped to 0.5..=2.0
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f32,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}

impl Cli {
    /// Panels without a `--photo` keep their default image.
    pub fn scene_config(&self) -> SceneConfig {
        if self.photos.len() > PHOTO_COUNT {
            log::warn!(
                "[cli] {} photos given, only the first {} are used",
                self.photos.len(),
                PHOTO_COUNT
            );
        }
        let photos = std::array::from_fn(|i| {
            let s = self.photos.get(i).map(String::as_str).unwrap_or(DEFAULT_PHOTOS[i]);
            ImageSource::parse(s)
        });
        SceneConfig {
            seed: self.seed,
            zoom: self.zoom,
            photos,
        }
    }
}
