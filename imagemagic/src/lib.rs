//! ImageMagic: remove an image's background, turn it into a pencil sketch or
//! search the web for pictures, then download the result as a PNG.

#[macro_use]
extern crate derivative;

pub mod cli;
pub mod config;
pub mod error;
pub mod logic;
pub mod presenter;

pub use error::{AppError, Result};

use background_remover::Segmenter;
use image_search::UnsplashSearch;
use logic::{Collaborators, model};
use std::{fs, io};

/// Installs the logger: `[HH:MM:SS LEVEL file line] message`, `info` unless
/// `RUST_LOG` says otherwise.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("ort", log::LevelFilter::Warn)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper", log::LevelFilter::Warn)
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

pub async fn desktop_main(args: cli::Args) -> anyhow::Result<()> {
    init_logger();
    log::debug!("start...");

    config::init(args.config.as_deref())?;
    let config = args.apply(config::all());
    if config.is_first_run {
        log::info!("wrote default config to {}", config.config_path.display());
    }

    let search = UnsplashSearch::new()
        .with_endpoint(&config.search.endpoint)?
        .with_max_results(config.search.max_results)
        .with_columns(config.search.columns);

    let page = match args.request(config.upload.max_file_size) {
        Err(e) => logic::failure_page(&e),
        Ok(request) => match model::segmenter_for(&request, &config).await {
            Ok(mut remover) => {
                let collaborators = Collaborators {
                    segmenter: remover
                        .as_mut()
                        .map(|remover| remover as &mut dyn Segmenter),
                    search: &search,
                };
                logic::handle(&request, &config, collaborators).await
            }
            Err(e) => logic::failure_page(&e),
        },
    };

    presenter::present(&page, &args.output_dir, &mut io::stdout().lock())?;

    if let Some(path) = &args.html {
        fs::write(path, presenter::html(&page))?;
        log::info!("wrote {}", path.display());
    }

    log::debug!("exit...");
    Ok(())
}
