use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::error::Result;
use crate::model::Workflow;
use crate::render::{self, Raster, RenderOptions};

/// JPEG quality factor, 0.9 on a 0..1 scale.
pub const JPEG_QUALITY: u8 = 90;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported image format {0:?} (expected png or jpeg)")]
pub struct UnknownFormat(pub String);

impl FromStr for ImageFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Encode a finished raster. The raster is only read.
pub fn export(raster: &Raster, format: ImageFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ImageFormat::Png => encode_png(raster)?,
        ImageFormat::Jpeg => encode_jpeg(raster)?,
    };
    tracing::debug!(%format, bytes = bytes.len(), "exported diagram");
    Ok(bytes)
}

fn encode_png(raster: &Raster) -> Result<Vec<u8>> {
    let surface = raster.to_surface()?;
    let mut out = Vec::new();
    surface.write_to_png(&mut out)?;
    Ok(out)
}

fn encode_jpeg(raster: &Raster) -> Result<Vec<u8>> {
    // The canvas background is opaque, so dropping alpha loses nothing.
    let rgb = raster.to_rgb8();
    let mut out = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
        encoder.encode(&rgb, raster.width(), raster.height(), ExtendedColorType::Rgb8)?;
    }
    Ok(out)
}

/// `workflow-<type>-<epoch millis>.<ext>`
pub fn file_name(workflow_type: &str, format: ImageFormat, at: DateTime<Utc>) -> String {
    // The type comes from untrusted JSON; keep it a single path component.
    let workflow_type = workflow_type.replace(['/', '\\'], "_");
    format!(
        "workflow-{}-{}.{}",
        workflow_type,
        at.timestamp_millis(),
        format.extension()
    )
}

#[derive(Clone, Debug)]
pub struct Download {
    pub file_name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// Render and encode in one step. Without a workflow, or with one that has no
/// nodes, there is nothing to download and `Ok(None)` comes back.
pub fn download(
    workflow: Option<&Workflow>,
    format: ImageFormat,
    options: &RenderOptions,
    at: DateTime<Utc>,
) -> Result<Option<Download>> {
    let Some(workflow) = workflow.filter(|workflow| !workflow.is_empty()) else {
        tracing::debug!("no workflow to export");
        return Ok(None);
    };
    let rendered = render::render(workflow, options)?;
    let bytes = export(&rendered.raster, format)?;
    Ok(Some(Download {
        file_name: file_name(&workflow.workflow_type, format, at),
        format,
        bytes,
    }))
}
