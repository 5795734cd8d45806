use anyhow::Result;
use image_effect::codec;
use image_search::{ImageSearchProvider, UnsplashSearch};
use std::{fs, path::Path, time::Instant};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "mountain".to_string());
    let output_dir = Path::new("tmp");
    fs::create_dir_all(output_dir)?;

    let search = UnsplashSearch::new();
    let start = Instant::now();
    let outcome = search.search(&query).await?;
    log::info!("search spent: {:?}", start.elapsed());

    if let Some(warning) = &outcome.warning {
        println!("! {warning}");
    }

    for (i, column) in outcome.columns(search.columns()).iter().enumerate() {
        for (j, thumbnail) in column.iter().enumerate() {
            let filename = format!("search_c{i}_{j}.png");
            fs::write(output_dir.join(&filename), codec::encode_png(&thumbnail.image)?)?;
            println!("✓ {} <- {}", filename, thumbnail.url);
        }
    }

    println!("\n✓ {} thumbnails saved to: tmp/", outcome.thumbnails.len());

    Ok(())
}
