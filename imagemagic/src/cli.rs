use crate::{
    Result,
    config::Config,
    logic::{Request, Selection, UploadedAsset},
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "imagemagic", version, about)]
pub struct Args {
    /// home, remove-background, sketch, ai-image, search or readme
    #[arg(default_value = "home")]
    pub selection: Selection,

    /// Image to process (png, jpg or jpeg)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Where result images are written
    #[arg(short, long, default_value = "imagemagic-out")]
    pub output_dir: PathBuf,

    /// Also write the page as a standalone HTML file
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Config file instead of the platform default
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub kernel_size: Option<u32>,

    /// Background model file name, e.g. u2netp.onnx
    #[arg(long)]
    pub model: Option<String>,

    /// Never fetch a missing model
    #[arg(long)]
    pub no_download: bool,

    /// Upload limit in bytes
    #[arg(long)]
    pub max_file_size: Option<u64>,

    /// Directory holding the home page example images
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,
}

impl Args {
    /// Flags override the loaded config for this run only.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(kernel_size) = self.kernel_size {
            config.sketch.kernel_size = kernel_size;
        }
        if let Some(model) = &self.model {
            config.background.model = model.clone();
        }
        if self.no_download {
            config.background.auto_download = false;
        }
        if let Some(max_file_size) = self.max_file_size {
            config.upload.max_file_size = max_file_size;
        }
        if let Some(assets_dir) = &self.assets_dir {
            config.assets_dir = assets_dir.clone();
        }
        config
    }

    /// Builds the request, reading the input file only when it is within
    /// `max_file_size`.
    pub fn request(&self, max_file_size: u64) -> Result<Request> {
        let upload = match &self.input {
            Some(path) if self.selection.needs_upload() => {
                Some(UploadedAsset::from_path(path, max_file_size)?)
            }
            Some(path) => {
                log::warn!(
                    "`{}` takes no image, ignoring {}",
                    self.selection,
                    path.display()
                );
                None
            }
            None => None,
        };

        Ok(Request {
            selection: self.selection,
            upload,
            query: self.query.clone(),
        })
    }
}
