use crate::{AppError, Result};
use image_effect::{RasterImage, codec::{self, SourceFormat}};
use std::{
    fs::File,
    io::Read,
    path::Path,
};

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Raw upload. `size` is the size the upload declared, checked before any
/// decoding happens.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    name: String,
    size: u64,
    bytes: Vec<u8>,
}

impl UploadedAsset {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Reads at most `max_file_size + 1` bytes. A file over the limit is
    /// rejected from its metadata without reading it.
    pub fn from_path(path: &Path, max_file_size: u64) -> Result<Self> {
        let size = std::fs::metadata(path)?.len();
        if size > max_file_size {
            return Err(AppError::OversizeUpload {
                size,
                limit: max_file_size,
            });
        }

        let mut bytes = Vec::with_capacity(size as usize);
        File::open(path)?
            .take(max_file_size.saturating_add(1))
            .read_to_end(&mut bytes)?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let size = size.max(bytes.len() as u64);
        let upload = Self::new(name, bytes).with_size(size);
        upload.check_size(max_file_size)?;
        Ok(upload)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Format implied by the file name, if it has an extension.
    pub fn declared_format(&self) -> Result<Option<SourceFormat>> {
        let Some(ext) = Path::new(&self.name).extension() else {
            return Ok(None);
        };

        let ext = ext.to_string_lossy();
        SourceFormat::from_extension(&ext).map(Some).ok_or_else(|| {
            AppError::UnsupportedFormat(format!(
                "`.{ext}` files are not accepted, use one of {}",
                ACCEPTED_EXTENSIONS.join(", ")
            ))
        })
    }

    pub fn check_size(&self, max_file_size: u64) -> Result<()> {
        if self.size > max_file_size {
            return Err(AppError::OversizeUpload {
                size: self.size,
                limit: max_file_size,
            });
        }
        Ok(())
    }

    /// Size check, extension check and content sniffing. Nothing is
    /// decoded, so this is cheap enough to run before loading a model.
    pub fn precheck(&self, max_file_size: u64) -> Result<SourceFormat> {
        self.check_size(max_file_size)?;
        let declared = self.declared_format()?;
        let sniffed = codec::sniff(&self.bytes)?;

        if let Some(declared) = declared.filter(|declared| *declared != sniffed) {
            log::debug!(
                "{} is named {} but holds {}",
                self.name,
                declared.mime(),
                sniffed.mime()
            );
        }

        Ok(sniffed)
    }

    pub fn decode(&self, max_file_size: u64) -> Result<RasterImage> {
        self.precheck(max_file_size)?;
        let image = codec::decode(&self.bytes)?;
        log::info!(
            "decoded {} ({} bytes) as {}x{} {:?}",
            self.name,
            self.size,
            image.width(),
            image.height(),
            image.channels()
        );

        Ok(image)
    }
}
