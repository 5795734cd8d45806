use anyhow::{Context, Result, bail};
use log::debug;
use once_cell::sync::Lazy;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

const CARGO_TOML: &str = include_str!("../Cargo.toml");
static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub models_dir: PathBuf,

    #[serde(skip)]
    pub assets_dir: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(skip)]
    pub app_name: String,

    #[serde(default)]
    pub upload: Upload,

    #[serde(default)]
    pub sketch: Sketch,

    #[serde(default)]
    pub background: Background,

    #[serde(default)]
    pub search: Search,

    #[serde(default)]
    pub output: Output,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Upload {
    // bytes
    #[derivative(Default(value = "5 * 1024 * 1024"))]
    pub max_file_size: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Sketch {
    #[derivative(Default(value = "111"))]
    pub kernel_size: u32,

    // 0 derives sigma from the kernel size
    #[derivative(Default(value = "0.0"))]
    pub sigma: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Background {
    #[derivative(Default(value = "\"u2net.onnx\".to_string()"))]
    pub model: String,

    #[derivative(Default(value = "true"))]
    pub auto_download: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Search {
    #[derivative(Default(value = "image_search::unsplash::DEFAULT_ENDPOINT.to_string()"))]
    pub endpoint: String,

    #[derivative(Default(value = "image_search::unsplash::DEFAULT_MAX_RESULTS"))]
    pub max_results: usize,

    #[derivative(Default(value = "image_search::unsplash::DEFAULT_COLUMNS"))]
    pub columns: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Output {
    #[derivative(Default(value = "\"result.png\".to_string()"))]
    pub download_name: String,
}

impl Config {
    /// Resolves the platform directories and loads `config_path`, or the
    /// default `<config_dir>/imagemagic.toml` when it is `None`.
    pub fn init(&mut self, config_path: Option<&Path>) -> Result<()> {
        let metadata = toml::from_str::<toml::Table>(CARGO_TOML)?;

        self.app_name = metadata
            .get("package")
            .and_then(|package| package.get("name"))
            .and_then(|name| name.as_str())
            .unwrap_or("imagemagic")
            .to_string();

        let Some(app_dirs) = AppDirs::new(Some(&self.app_name), true) else {
            bail!("no home directory to place {} files in", self.app_name);
        };

        self.create_dirs(&app_dirs, config_path)?;
        self.load().with_context(|| "load config file failed")?;
        debug!("{:?}", self);
        Ok(())
    }

    fn create_dirs(&mut self, app_dirs: &AppDirs, config_path: Option<&Path>) -> Result<()> {
        self.config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => app_dirs.config_dir.join(format!("{}.toml", self.app_name)),
        };
        self.models_dir = app_dirs.data_dir.join("models");
        self.assets_dir = app_dirs.data_dir.join("assets");

        fs::create_dir_all(&app_dirs.data_dir)?;
        fs::create_dir_all(&self.models_dir)?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(())
    }

    /// Reads `config_path`. A missing or unparsable file is replaced by the
    /// defaults; an unparsable one is kept as `<file>.bak` first.
    pub fn load(&mut self) -> Result<()> {
        let parsed = fs::read_to_string(&self.config_path)
            .ok()
            .map(|text| toml::from_str::<Config>(&text));

        match parsed {
            Some(Ok(mut c)) => {
                c.config_path = self.config_path.clone();
                c.models_dir = self.models_dir.clone();
                c.assets_dir = self.assets_dir.clone();
                c.is_first_run = self.is_first_run;
                c.app_name = self.app_name.clone();
                *self = c;
                Ok(())
            }
            Some(Err(e)) => {
                log::warn!("invalid config {}: {e}", self.config_path.display());
                self.is_first_run = true;

                let mut bak_file = self.config_path.clone().into_os_string();
                bak_file.push(".bak");
                _ = fs::copy(&self.config_path, bak_file);

                self.save()
            }
            None => {
                self.is_first_run = true;
                self.save()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(&self.config_path, text)
                .with_context(|| format!("save config {} failed", self.config_path.display()))?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }
}

fn lock() -> MutexGuard<'static, Config> {
    CONFIG.lock().unwrap_or_else(|e| e.into_inner())
}

/// Loads the global configuration. Call once at startup.
pub fn init(config_path: Option<&Path>) -> Result<()> {
    lock().init(config_path)
}

pub fn all() -> Config {
    lock().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_at(path: &Path) -> Config {
        Config {
            config_path: path.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.upload.max_file_size, 5_242_880);
        assert_eq!(config.sketch.kernel_size, 111);
        assert_eq!(config.background.model, "u2net.onnx");
        assert!(config.background.auto_download);
        assert_eq!(config.search.endpoint, "https://unsplash.com/s/photos/");
        assert_eq!(config.search.max_results, 40);
        assert_eq!(config.search.columns, 3);
        assert_eq!(config.output.download_name, "result.png");
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imagemagic.toml");

        let mut config = config_at(&path);
        config.load().unwrap();
        assert!(config.is_first_run);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[sketch]"));
        assert!(text.contains("kernel_size = 111"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imagemagic.toml");
        fs::write(&path, "[sketch]\nkernel_size = 21\n").unwrap();

        let mut config = config_at(&path);
        config.load().unwrap();
        assert!(!config.is_first_run);
        assert_eq!(config.sketch.kernel_size, 21);
        assert_eq!(config.upload.max_file_size, 5_242_880);
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_invalid_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imagemagic.toml");
        fs::write(&path, "[sketch\nkernel_size = ").unwrap();

        let mut config = config_at(&path);
        config.load().unwrap();
        assert!(config.is_first_run);
        assert_eq!(config.sketch.kernel_size, 111);

        let bak = dir.path().join("imagemagic.toml.bak");
        assert_eq!(fs::read_to_string(bak).unwrap(), "[sketch\nkernel_size = ");
        assert!(
            toml::from_str::<Config>(&fs::read_to_string(&path).unwrap()).is_ok()
        );
    }
}
