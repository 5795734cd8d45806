use anyhow::{Context, Result};
use background_remover::{BackgroundRemover, Model, Segmenter, remover::binary_mask};
use std::{fs, path::PathBuf, time::Instant};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let input_file = PathBuf::from("./examples/test-rgb.png");
    let output_dir = PathBuf::from("./output");
    fs::create_dir_all(&output_dir)?;

    let rgb = image::open(&input_file)
        .with_context(|| input_file.display().to_string())?
        .to_rgb8();
    log::info!("Image size: {}x{}", rgb.width(), rgb.height());

    for model in Model::all_models() {
        let model_path = PathBuf::from("./models").join(model.file_name());
        if !model_path.exists() {
            log::warn!("Skip {model}, download it from {}", model.download_url());
            continue;
        }

        let mut remover = BackgroundRemover::new(model, &model_path)?;

        let start = Instant::now();
        let result = Segmenter::remove(&mut remover, &rgb)?;
        log::info!("{model} spent: {:?}", start.elapsed());

        let output_path = output_dir.join(format!("result_{model}.png"));
        result
            .save(&output_path)
            .with_context(|| output_path.display().to_string())?;

        let mask = remover.get_mask(&rgb)?;
        binary_mask(&mask, 128).save(output_dir.join(format!("mask_{model}.png")))?;
        log::info!("Saved {}", output_path.display());
    }

    Ok(())
}
