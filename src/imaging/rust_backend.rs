//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageDecoder::dimensions` + EXIF orientation (header only) |
//! | Decode (JPEG, PNG, BMP, TIFF, WebP) | `image` crate, format sniffed from content, EXIF orientation applied |
//! | Resample | `fast_image_resize` convolution: `Box` (area) or `CatmullRom` (cubic) |
//! | Pad | `image::imageops::replace` onto a canvas filled with the pad colour |
//! | Encode | `image::DynamicImage::write_to` into a temp file, then renamed; format from the output extension |
//!
//! Decoded images are reduced to one of two layouts, tagged with
//! [`PixelFormat`]: 8-bit luma for grayscale sources and 8-bit RGB for
//! everything else. Alpha is dropped.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::ResizePlan;
use super::params::{Filter, PixelFormat, RenderParams};
use crate::config::PadColor;
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::metadata::Orientation;
use image::{
    ColorType, DynamicImage, GrayImage, ImageDecoder, ImageFormat, ImageReader, Luma, Rgb,
    RgbImage,
};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Extensions treated as images during discovery.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("bmp", ImageFormat::Bmp),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using `image` and `fast_image_resize`.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Open a reader with the format sniffed from the file's leading bytes.
fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<File>>, BackendError> {
    ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| decode_error(path, e))
}

/// True when the orientation swaps width and height.
fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Load and decode an image from disk, upright per its EXIF orientation.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let mut decoder = open_reader(path)?
        .into_decoder()
        .map_err(|e| decode_error(path, e))?;
    let orientation = decoder.orientation().map_err(|e| decode_error(path, e))?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// A decoded image in one of the two layouts the resampler handles.
struct Raster {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Raster {
    fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        match img.color() {
            ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => Self {
                width,
                height,
                format: PixelFormat::Grayscale,
                data: img.into_luma8().into_raw(),
            },
            _ => Self {
                width,
                height,
                format: PixelFormat::Color,
                data: img.into_rgb8().into_raw(),
            },
        }
    }
}

fn pixel_type(format: PixelFormat) -> PixelType {
    match format {
        PixelFormat::Grayscale => PixelType::U8,
        PixelFormat::Color => PixelType::U8x3,
    }
}

fn filter_type(filter: Filter) -> FilterType {
    match filter {
        Filter::Area => FilterType::Box,
        Filter::Cubic => FilterType::CatmullRom,
    }
}

/// Resample a raster to exactly `width × height`.
fn resample(
    raster: Raster,
    width: u32,
    height: u32,
    filter: Filter,
) -> Result<Raster, BackendError> {
    if (raster.width, raster.height) == (width, height) {
        return Ok(raster);
    }
    let pixels = pixel_type(raster.format);
    let src_image = Image::from_vec_u8(raster.width, raster.height, raster.data, pixels)
        .map_err(|e| BackendError::Resize(e.to_string()))?;
    let mut dst_image = Image::new(width, height, pixels);

    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(filter_type(filter)));
    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(|e| BackendError::Resize(e.to_string()))?;

    Ok(Raster {
        width,
        height,
        format: raster.format,
        data: dst_image.into_vec(),
    })
}

/// Place the scaled raster on a pad-coloured canvas of the plan's final size.
fn compose(
    raster: Raster,
    plan: &ResizePlan,
    pad_color: PadColor,
) -> Result<DynamicImage, BackendError> {
    let (w, h) = (raster.width, raster.height);
    let (canvas_w, canvas_h) = plan.output_dimensions();
    let (x, y) = (i64::from(plan.padding.left), i64::from(plan.padding.top));
    let malformed = || BackendError::Resize(format!("buffer does not hold a {w}x{h} image"));

    match raster.format {
        PixelFormat::Grayscale => {
            let scaled = GrayImage::from_raw(w, h, raster.data).ok_or_else(malformed)?;
            if plan.padding.is_empty() {
                return Ok(DynamicImage::ImageLuma8(scaled));
            }
            let mut canvas = GrayImage::from_pixel(canvas_w, canvas_h, Luma([pad_color.luma()]));
            image::imageops::replace(&mut canvas, &scaled, x, y);
            Ok(DynamicImage::ImageLuma8(canvas))
        }
        PixelFormat::Color => {
            let scaled = RgbImage::from_raw(w, h, raster.data).ok_or_else(malformed)?;
            if plan.padding.is_empty() {
                return Ok(DynamicImage::ImageRgb8(scaled));
            }
            let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, Rgb(pad_color.rgb()));
            image::imageops::replace(&mut canvas, &scaled, x, y);
            Ok(DynamicImage::ImageRgb8(canvas))
        }
    }
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling of `path`, unique per process and call.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}-{n}.tmp", std::process::id()))
}

/// Save a DynamicImage to the given path, inferring format from extension.
///
/// The format is checked before anything is created, so an unsupported
/// extension leaves nothing behind. The image is written to a temporary
/// sibling and renamed into place: a reader, or a second task targeting the
/// same path, only ever sees a complete file.
fn save_image(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path)
        .ok()
        .filter(|f| f.writing_enabled())
        .ok_or_else(|| BackendError::UnsupportedFormat(path.to_path_buf()))?;

    let tmp = temp_path(path);
    let result = write_image(img, &tmp, path, format).and_then(|()| {
        fs::rename(&tmp, path).map_err(|source| BackendError::Write {
            path: path.to_path_buf(),
            source,
        })
    });
    if result.is_err() {
        // Nothing to clean up if the temp file was never created.
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Encode `img` into `file`. Errors are reported against `target`.
fn write_image(
    img: &DynamicImage,
    file: &Path,
    target: &Path,
    format: ImageFormat,
) -> Result<(), BackendError> {
    let write_error = |source| BackendError::Write {
        path: target.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(file).map_err(write_error)?);
    img.write_to(&mut writer, format)
        .map_err(|e| BackendError::Encode {
            path: target.to_path_buf(),
            message: e.to_string(),
        })?;
    writer.flush().map_err(write_error)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let mut decoder = open_reader(path)?
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;
        let (width, height) = decoder.dimensions();
        if width == 0 || height == 0 {
            return Err(decode_error(path, "image has no pixels"));
        }
        let orientation = decoder.orientation().map_err(|e| decode_error(path, e))?;
        if swaps_axes(orientation) {
            Ok(Dimensions {
                width: height,
                height: width,
            })
        } else {
            Ok(Dimensions { width, height })
        }
    }

    fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
        let source = Raster::from_dynamic(load_image(&params.source)?);
        let plan = &params.plan;
        let scaled = resample(source, plan.width, plan.height, plan.filter)?;
        let output = compose(scaled, plan, params.pad_color)?;
        save_image(&output, &params.output)
    }
}
