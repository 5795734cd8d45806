use anyhow::{Context, Result};
use image_effect::{Effect, ImageEffect, codec, sketch_effect::PencilSketchConfig};
use std::{fs, path::Path, time::Instant};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let output_dir = Path::new("tmp");
    fs::create_dir_all(output_dir)?;

    let img_path = std::env::args().nth(1).unwrap_or_else(|| "data/test.png".to_string());
    let bytes = fs::read(&img_path).with_context(|| img_path.clone())?;
    let img = codec::decode(&bytes)?.into_rgb();
    log::info!("Image size: {}x{}", img.width(), img.height());

    for kernel_size in [21, 55, 111, 171] {
        let config = PencilSketchConfig::new().with_kernel_size(kernel_size);
        let effect = ImageEffect::PencilSketch(config);

        let start = Instant::now();
        let sketch = effect.apply(img.clone())?;
        log::info!("kernel {kernel_size} spent: {:?}", start.elapsed());

        let filename = format!("pencil_sketch_k{kernel_size}.png");
        fs::write(output_dir.join(&filename), codec::encode_png(&sketch)?)?;
        println!("✓ Generated {}", filename);
    }

    println!("\n✓ All pencil sketches generated!");
    println!("  Images saved to: tmp/");

    Ok(())
}
