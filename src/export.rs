use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::SketchResult;

/// Receives a finished export bitmap and is responsible for storing it.
pub trait ExportSink {
    fn accept(&mut self, image: &RgbaImage) -> SketchResult<()>;
}

/// Encodes `image` as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> SketchResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Writes exports as PNG files, overwriting the target.
#[derive(Debug, Clone)]
pub struct PngFileSink {
    path: PathBuf,
}

impl PngFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for PngFileSink {
    fn accept(&mut self, image: &RgbaImage) -> SketchResult<()> {
        std::fs::write(&self.path, encode_png(image)?)?;
        log::info!(
            "Exported {}x{} image to {}",
            image.width(),
            image.height(),
            self.path.display()
        );
        Ok(())
    }
}

/// Keeps the encoded PNG of the latest export in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    latest: Option<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&[u8]> {
        self.latest.as_deref()
    }
}

impl ExportSink for MemorySink {
    fn accept(&mut self, image: &RgbaImage) -> SketchResult<()> {
        let bytes = encode_png(image)?;
        log::info!("Kept {} byte export in memory", bytes.len());
        self.latest = Some(bytes);
        Ok(())
    }
}
