use crate::{AppError, Result, config::Config, logic::Request};
use background_remover::{BackgroundRemover, Model};
use futures::StreamExt;
use reqwest::Client;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Model named by `background.model`, and where its file lives.
pub fn resolve(config: &Config) -> Result<(Model, PathBuf)> {
    let name = config.background.model.as_str();
    let model = Model::from_file_name(name).ok_or_else(|| {
        let known = Model::all_models()
            .iter()
            .map(|model| model.file_name())
            .collect::<Vec<_>>()
            .join(", ");
        AppError::Processing(format!("unknown background model `{name}`, expected one of {known}"))
    })?;

    Ok((model, config.models_dir.join(model.file_name())))
}

/// Streams `url` into `<save_path>.tmp` and renames it once every byte
/// arrived. A short download leaves the `.tmp` file behind.
pub async fn download(url: &str, save_path: &Path) -> Result<()> {
    let mut tmp_path = save_path.to_path_buf().into_os_string();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let response = Client::new()
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| AppError::Network(format!("{url}: {e}")))?;

    let total = response.content_length();
    let mut save_file = fs::File::create(&tmp_path)?;
    let mut downloaded: u64 = 0;
    let mut reported = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            AppError::Network(format!("{url}: stopped after {downloaded} bytes. {e}"))
        })?;
        save_file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;

        if let Some(total) = total.filter(|total| *total > 0) {
            let percent = downloaded * 100 / total;
            if percent >= reported + 10 {
                reported = percent - percent % 10;
                log::info!("downloading {}: {percent}%", save_path.display());
            }
        }
    }
    save_file.flush()?;

    if total.is_some_and(|total| total != downloaded) {
        return Err(AppError::Network(format!(
            "{url}: incomplete download {downloaded}/{} bytes",
            total.unwrap_or_default()
        )));
    }

    fs::rename(&tmp_path, save_path)?;
    log::info!("saved {} ({downloaded} bytes)", save_path.display());
    Ok(())
}

/// Path of the configured model, fetching it first when allowed.
pub async fn ensure(config: &Config) -> Result<(Model, PathBuf)> {
    let (model, path) = resolve(config)?;
    if path.exists() {
        return Ok((model, path));
    }

    if !config.background.auto_download {
        return Err(AppError::Processing(format!(
            "model {} not found, download it from {}",
            path.display(),
            model.download_url()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    log::info!("fetching model {model} from {}", model.download_url());
    download(model.download_url(), &path).await?;
    Ok((model, path))
}

pub async fn load_remover(config: &Config) -> Result<BackgroundRemover> {
    let (model, path) = ensure(config).await?;
    Ok(BackgroundRemover::new(model, path)?)
}

/// Segmenter for `request`, if it needs one. The upload is checked first so
/// a bad file never costs a model download.
pub async fn segmenter_for(
    request: &Request,
    config: &Config,
) -> Result<Option<BackgroundRemover>> {
    if !request.needs_segmenter() {
        return Ok(None);
    }

    if let Some(upload) = &request.upload {
        upload.precheck(config.upload.max_file_size)?;
    }

    load_remover(config).await.map(Some)
}
