//! Color sampling of product images.
//!
//! An image is summarized by averaging fixed square regions. Each region
//! yields one `R,G,B` token and the tokens keep the order of the profile.

use crate::crawlers::web::Fetcher;
use crate::error::SampleError;
use crate::results::ColorToken;
use image::{DynamicImage, ImageBuffer, Rgba};

/// Divisor taking a 16-bit channel average back to 0..=255
const CHANNEL_SCALE: u64 = 257;

/// Marker in a detail URL selecting the coarse profile
const COARSE_CATEGORY_MARKER: &str = "oil";

/// Square region `[x - half, x + half) x [y - half, y + half)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub center_x: i64,
    pub center_y: i64,
    pub half_width: i64,
}

impl Region {
    pub const fn new(center_x: i64, center_y: i64, half_width: i64) -> Self {
        Self {
            center_x,
            center_y,
            half_width,
        }
    }
}

const COARSE_REGIONS: [Region; 2] = [Region::new(300, 100, 20), Region::new(300, 300, 20)];

const FINE_REGIONS: [Region; 6] = [
    Region::new(300, 100, 10),
    Region::new(300, 245, 10),
    Region::new(300, 280, 10),
    Region::new(300, 310, 10),
    Region::new(300, 340, 10),
    Region::new(300, 375, 10),
];

/// Ordered set of sampling regions for a record category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Two wide regions
    Coarse,
    /// Six narrow regions
    Fine,
}

impl Profile {
    pub fn regions(self) -> &'static [Region] {
        match self {
            Profile::Coarse => &COARSE_REGIONS,
            Profile::Fine => &FINE_REGIONS,
        }
    }

    /// Picks the profile from the category marker in an item URL
    pub fn for_url(url: &str) -> Self {
        if url.contains(COARSE_CATEGORY_MARKER) {
            Profile::Coarse
        } else {
            Profile::Fine
        }
    }
}

/// Averages every channel over one region.
///
/// Pixels outside the image read as black but still count towards the
/// average.
pub fn average_region(pixels: &ImageBuffer<Rgba<u16>, Vec<u16>>, region: Region) -> ColorToken {
    let (width, height) = pixels.dimensions();
    let mut sums = [0u64; 3];
    let mut count = 0u64;

    for x in (region.center_x - region.half_width)..(region.center_x + region.half_width) {
        for y in (region.center_y - region.half_width)..(region.center_y + region.half_width) {
            count += 1;
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                continue;
            }

            let pixel = pixels.get_pixel(x as u32, y as u32);
            for (sum, channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += u64::from(*channel);
            }
        }
    }

    if count == 0 {
        return ColorToken::Rgb(0, 0, 0);
    }

    let [r, g, b] = sums.map(|sum| (sum / count / CHANNEL_SCALE) as u8);
    ColorToken::Rgb(r, g, b)
}

/// Samples every region of `profile` on a decoded image
pub fn sample_image(image: &DynamicImage, profile: Profile) -> Vec<ColorToken> {
    let pixels = image.to_rgba16();
    profile
        .regions()
        .iter()
        .map(|region| average_region(&pixels, *region))
        .collect()
}

/// Fetches, decodes and samples linked images
pub struct ImageSampler<'f, F> {
    fetcher: &'f F,
}

impl<'f, F: Fetcher> ImageSampler<'f, F> {
    pub fn new(fetcher: &'f F) -> Self {
        Self { fetcher }
    }

    /// Returns one token per profile region, or a single
    /// [`ColorToken::Unknown`] when the image is unavailable
    pub async fn sample(&self, url: &str, profile: Profile) -> Vec<ColorToken> {
        match self.try_sample(url, profile).await {
            Ok(tokens) => tokens,
            Err(e) => {
                ::log::error!("Failed to sample colors from {}: {}", url, e);
                vec![ColorToken::Unknown]
            }
        }
    }

    async fn try_sample(&self, url: &str, profile: Profile) -> Result<Vec<ColorToken>, SampleError> {
        let bytes = self.fetcher.fetch_bytes(url).await?;
        let image = image::load_from_memory(&bytes)?;
        ::log::debug!(
            "Sampling {}x{} image {} with {:?} profile",
            image.width(),
            image.height(),
            url,
            profile
        );
        Ok(sample_image(&image, profile))
    }
}
