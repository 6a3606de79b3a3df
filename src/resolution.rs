//! Native resolution tables per generation model.
//!
//! Each model only produces a discrete set of output sizes. Selections are snapped to one of
//! these ratios while the user drags, so whatever region gets sent for generation maps onto a
//! size the backend can produce without padding.

use std::sync::OnceLock;

use crate::foundation::math::round3;

/// Generation models the canvas can target.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Fast image model; matches the input geometry pixel for pixel.
    #[default]
    FlashImage,
    /// High quality image model; tends to pad toward square output.
    ProImage,
    /// Fast video model.
    VideoFast,
    /// High quality video model (1080p).
    VideoHq,
}

/// Behavioral family of a model, the key of the render-fit policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// Image models that keep the input geometry.
    Flash,
    /// Image models that may letterbox.
    Pro,
    /// Video models.
    Video,
}

impl ModelKind {
    /// All models, in menu order.
    pub const ALL: [ModelKind; 4] = [
        ModelKind::FlashImage,
        ModelKind::ProImage,
        ModelKind::VideoFast,
        ModelKind::VideoHq,
    ];

    /// Backend model identifier.
    pub fn id(self) -> &'static str {
        match self {
            ModelKind::FlashImage => "gemini-2.5-flash-image",
            ModelKind::ProImage => "gemini-3-pro-image-preview",
            ModelKind::VideoFast => "veo-3.1-fast-generate-preview",
            ModelKind::VideoHq => "veo-3.1-generate-preview",
        }
    }

    /// Behavioral family.
    pub fn family(self) -> ModelFamily {
        match self {
            ModelKind::FlashImage => ModelFamily::Flash,
            ModelKind::ProImage => ModelFamily::Pro,
            ModelKind::VideoFast | ModelKind::VideoHq => ModelFamily::Video,
        }
    }

    /// `true` for models that return a video asset.
    pub fn is_video(self) -> bool {
        self.family() == ModelFamily::Video
    }

    /// Native resolution table for this model.
    pub fn resolutions(self) -> &'static ResolutionTable {
        static FLASH: OnceLock<ResolutionTable> = OnceLock::new();
        static PRO: OnceLock<ResolutionTable> = OnceLock::new();
        static VIDEO: OnceLock<ResolutionTable> = OnceLock::new();

        match self {
            ModelKind::FlashImage => {
                FLASH.get_or_init(|| ResolutionTable::with_orientations(&flash_base()))
            }
            ModelKind::ProImage => PRO.get_or_init(|| {
                let mut base = pro_base();
                base.extend(flash_base());
                ResolutionTable::with_orientations(&base)
            }),
            // Both video orientations are listed explicitly.
            ModelKind::VideoFast | ModelKind::VideoHq => {
                VIDEO.get_or_init(|| ResolutionTable::new(video_base()))
            }
        }
    }
}

/// One native output size.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
    /// `w / h` as tabulated (three decimals).
    pub ratio: f64,
    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Resolution {
    /// Entry without a label.
    pub fn new(w: u32, h: u32, ratio: f64) -> Self {
        Self {
            w,
            h,
            ratio,
            label: None,
        }
    }

    /// Entry with a display label.
    pub fn labeled(w: u32, h: u32, ratio: f64, label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Self::new(w, h, ratio)
        }
    }

    /// The same entry in the other orientation.
    pub fn transposed(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
            ratio: round3(f64::from(self.h) / f64::from(self.w)),
            label: self.label.clone(),
        }
    }
}

/// Ordered, non-empty list of native resolutions. Order matters: ties resolve to the first entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ResolutionTable {
    entries: Vec<Resolution>,
}

impl ResolutionTable {
    /// Wrap a list verbatim. An empty list falls back to a single square entry.
    pub fn new(entries: Vec<Resolution>) -> Self {
        if entries.is_empty() {
            return Self {
                entries: vec![Resolution::new(1024, 1024, 1.0)],
            };
        }
        Self { entries }
    }

    /// Expand `base` with the transposed version of every non-square entry.
    ///
    /// The base entries keep their order and the transposed ones follow in base order.
    pub fn with_orientations(base: &[Resolution]) -> Self {
        let mut all = base.to_vec();
        all.extend(base.iter().filter(|r| r.w != r.h).map(Resolution::transposed));
        Self::new(all)
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[Resolution] {
        &self.entries
    }

    /// Entry whose ratio is closest to `ratio`; the first one wins ties.
    pub fn nearest(&self, ratio: f64) -> &Resolution {
        let mut best = &self.entries[0];
        let mut best_diff = f64::MAX;
        for entry in &self.entries {
            let diff = (entry.ratio - ratio).abs();
            if diff < best_diff {
                best_diff = diff;
                best = entry;
            }
        }
        best
    }

    /// First entry whose ratio is within `tolerance` of `ratio`.
    pub fn matching(&self, ratio: f64, tolerance: f64) -> Option<&Resolution> {
        self.entries
            .iter()
            .find(|r| (r.ratio - ratio).abs() < tolerance)
    }
}

/// Aspect ratios the image backend accepts as a hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AspectRatioHint {
    /// 1:1
    #[serde(rename = "1:1")]
    Square,
    /// 3:4
    #[serde(rename = "3:4")]
    Portrait3x4,
    /// 4:3
    #[serde(rename = "4:3")]
    Landscape4x3,
    /// 9:16
    #[serde(rename = "9:16")]
    Portrait9x16,
    /// 16:9
    #[serde(rename = "16:9")]
    Landscape16x9,
}

impl AspectRatioHint {
    const IMAGE_CHOICES: [(AspectRatioHint, f64); 5] = [
        (AspectRatioHint::Square, 1.0),
        (AspectRatioHint::Portrait3x4, 0.75),
        (AspectRatioHint::Landscape4x3, 1.33),
        (AspectRatioHint::Portrait9x16, 0.5625),
        (AspectRatioHint::Landscape16x9, 1.77),
    ];

    /// Closest accepted hint for an arbitrary ratio; earlier choices win ties.
    pub fn closest(ratio: f64) -> Self {
        Self::closest_among(&Self::IMAGE_CHOICES, ratio)
    }

    /// Closest orientation the video backend accepts (16:9 or 9:16).
    pub fn closest_video(ratio: f64) -> Self {
        Self::closest_among(
            &[
                (AspectRatioHint::Landscape16x9, 1.77),
                (AspectRatioHint::Portrait9x16, 0.5625),
            ],
            ratio,
        )
    }

    fn closest_among(choices: &[(AspectRatioHint, f64)], ratio: f64) -> Self {
        let mut best = choices[0];
        for &c in &choices[1..] {
            if (c.1 - ratio).abs() < (best.1 - ratio).abs() {
                best = c;
            }
        }
        best.0
    }

    /// Wire string, e.g. `"16:9"`.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatioHint::Square => "1:1",
            AspectRatioHint::Portrait3x4 => "3:4",
            AspectRatioHint::Landscape4x3 => "4:3",
            AspectRatioHint::Portrait9x16 => "9:16",
            AspectRatioHint::Landscape16x9 => "16:9",
        }
    }
}

/// Output size class requested from the image backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SizeHint {
    /// ~1024px long edge.
    #[default]
    #[serde(rename = "1K")]
    K1,
    /// ~2048px long edge.
    #[serde(rename = "2K")]
    K2,
}

impl SizeHint {
    /// Only the pro model honors larger sizes; it gets `2K` once the selection outgrows
    /// `upgrade_px` on either side.
    pub fn for_selection(model: ModelKind, width: f64, height: f64, upgrade_px: f64) -> Self {
        if model == ModelKind::ProImage && (width > upgrade_px || height > upgrade_px) {
            SizeHint::K2
        } else {
            SizeHint::K1
        }
    }

    /// Wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            SizeHint::K1 => "1K",
            SizeHint::K2 => "2K",
        }
    }
}

fn flash_base() -> Vec<Resolution> {
    [
        (1024, 1024, 1.000),
        (512, 2048, 0.250),
        (992, 1056, 0.939),
        (960, 1088, 0.882),
        (640, 1632, 0.392),
        (544, 1920, 0.283),
        (928, 1120, 0.829),
        (832, 1248, 0.667),
        (736, 1408, 0.523),
        (704, 1472, 0.478),
        (896, 1152, 0.778),
        (768, 1344, 0.571),
        (672, 1536, 0.438),
        (576, 1792, 0.321),
        (608, 1696, 0.358),
        (800, 1280, 0.625),
        (864, 1184, 0.730),
    ]
    .into_iter()
    .map(|(w, h, ratio)| Resolution::new(w, h, ratio))
    .collect()
}

fn pro_base() -> Vec<Resolution> {
    let mut out = vec![Resolution::labeled(2048, 2048, 1.000, "Square")];
    out.extend(
        [
            (1056, 4096, 0.258),
            (1088, 3936, 0.276),
            (1120, 3808, 0.294),
            (1152, 3680, 0.313),
            (1440, 2944, 0.489),
            (1472, 2880, 0.511),
            (1536, 2784, 0.552),
            (1600, 2656, 0.602),
            (1792, 2400, 0.747),
            (1920, 2208, 0.870),
            (1984, 2144, 0.925),
            (2016, 2112, 0.955),
        ]
        .into_iter()
        .map(|(w, h, ratio)| Resolution::new(w, h, ratio)),
    );
    out
}

fn video_base() -> Vec<Resolution> {
    vec![
        Resolution::labeled(1280, 720, 1.777, "HD Landscape"),
        Resolution::labeled(720, 1280, 0.562, "HD Portrait"),
        Resolution::labeled(1920, 1080, 1.777, "FHD Landscape"),
        Resolution::labeled(1080, 1920, 0.562, "FHD Portrait"),
    ]
}

#[cfg(test)]
#[path = "../tests/unit/resolution.rs"]
mod tests;
