use super::{Download, Page, Render, UploadedAsset};
use crate::{Result, config::Config};
use image_effect::{Effect, codec, sketch_effect::PencilSketchConfig};
use std::time::Instant;

pub const CAPTION: &str = "Pencil Sketch";
pub const WIDTH: u32 = 200;

pub fn handle(upload: &UploadedAsset, config: &Config) -> Result<Page> {
    let original = upload.decode(config.upload.max_file_size)?;
    let original_png = codec::encode_png(&original)?;

    let started = Instant::now();
    let sketch = PencilSketchConfig::new()
        .with_kernel_size(config.sketch.kernel_size)
        .with_sigma(config.sketch.sigma)
        .apply(original.into_rgb())?;
    log::info!(
        "pencil sketch of {} took {:.2?}",
        upload.name(),
        started.elapsed()
    );

    let png = codec::encode_png(&sketch)?;
    let download = Download::new(&config.output.download_name, &png);

    Ok(vec![
        Render::Columns(vec![
            vec![Render::image(super::ORIGINAL_CAPTION, super::ORIGINAL_WIDTH, original_png)],
            vec![Render::image(CAPTION, WIDTH, png)],
        ]),
        Render::Download(download),
    ])
}
