//! Operation selector and the per-operation handlers.
//!
//! Every handler takes its input and the configuration explicitly and
//! returns a [`Page`] describing what to show. Nothing is kept between
//! interactions.

mod ai_image;
mod download;
mod home;
pub mod model;
mod readme;
mod remove_background;
mod render;
mod search;
mod sketch;
mod upload;

pub use download::{Download, data_uri};
pub use render::{Page, Render, banner, flatten};
pub use upload::{ACCEPTED_EXTENSIONS, UploadedAsset};

use crate::{AppError, config::Config};
use background_remover::Segmenter;
use image_search::ImageSearchProvider;
use std::{fmt, str::FromStr};

pub const ORIGINAL_CAPTION: &str = "Original Image";
pub const ORIGINAL_WIDTH: u32 = 300;

pub use remove_background::{CAPTION as BACKGROUND_CAPTION, WIDTH as BACKGROUND_WIDTH};
pub use sketch::{CAPTION as SKETCH_CAPTION, WIDTH as SKETCH_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Home,
    RemoveBackground,
    Sketch,
    AiImage,
    Search,
    Readme,
}

impl Selection {
    pub fn all() -> [Self; 6] {
        [
            Self::Home,
            Self::RemoveBackground,
            Self::Sketch,
            Self::AiImage,
            Self::Search,
            Self::Readme,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::RemoveBackground => "Remove Background",
            Self::Sketch => "Convert to Pencil Sketch",
            Self::AiImage => "image with AI",
            Self::Search => "Search image",
            Self::Readme => "README.md",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::RemoveBackground => "remove-background",
            Self::Sketch => "sketch",
            Self::AiImage => "ai-image",
            Self::Search => "search",
            Self::Readme => "readme",
        }
    }

    pub fn needs_upload(&self) -> bool {
        matches!(self, Self::RemoveBackground | Self::Sketch)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::all()
            .into_iter()
            .find(|selection| {
                selection.label().eq_ignore_ascii_case(s)
                    || selection.name().eq_ignore_ascii_case(s)
            })
            .or(match s.to_ascii_lowercase().as_str() {
                "pencil-sketch" => Some(Self::Sketch),
                _ => None,
            })
            .ok_or_else(|| {
                let names = Self::all().map(|selection| selection.name()).join(", ");
                format!("unknown option `{s}`, expected one of {names}")
            })
    }
}

/// One interaction.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub selection: Selection,
    pub upload: Option<UploadedAsset>,
    pub query: Option<String>,
}

impl Request {
    pub fn needs_segmenter(&self) -> bool {
        self.selection == Selection::RemoveBackground && self.upload.is_some()
    }
}

/// External capabilities a request may need.
pub struct Collaborators<'a> {
    pub segmenter: Option<&'a mut dyn Segmenter>,
    pub search: &'a dyn ImageSearchProvider,
}

/// Runs `request` to completion. Failures become a warning or error block
/// on the returned page.
pub async fn handle(request: &Request, config: &Config, collaborators: Collaborators<'_>) -> Page {
    log::info!("handle `{}`", request.selection);

    let result = match request.selection {
        Selection::Home => Ok(home::handle(config)),
        Selection::Readme => Ok(readme::handle()),
        Selection::AiImage => Ok(ai_image::handle()),
        Selection::Search => {
            search::handle(request.query.as_deref(), config, collaborators.search).await
        }
        Selection::Sketch => match &request.upload {
            Some(upload) => sketch::handle(upload, config),
            None => Ok(upload_prompt()),
        },
        Selection::RemoveBackground => match (&request.upload, collaborators.segmenter) {
            (None, _) => Ok(upload_prompt()),
            (Some(upload), Some(segmenter)) => remove_background::handle(upload, config, segmenter),
            (Some(_), None) => Err(AppError::Processing(
                "no background removal model is loaded".to_string(),
            )),
        },
    };

    match result {
        Ok(page) => with_banner(page),
        Err(e) => failure_page(&e),
    }
}

/// Page for a failure that happened before a handler could run.
pub fn failure_page(e: &AppError) -> Page {
    log::warn!("{e}");
    with_banner(vec![Render::from_error(e)])
}

fn with_banner(page: Page) -> Page {
    let mut full = banner();
    full.extend(page);
    full
}

fn upload_prompt() -> Page {
    vec![Render::Info(format!(
        "Upload an image ({}).",
        ACCEPTED_EXTENSIONS.join(", ")
    ))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_labels_round_trip() {
        for selection in Selection::all() {
            assert_eq!(selection.label().parse::<Selection>(), Ok(selection));
            assert_eq!(selection.name().parse::<Selection>(), Ok(selection));
        }
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!("pencil-sketch".parse(), Ok(Selection::Sketch));
        assert_eq!(" REMOVE-BACKGROUND ".parse(), Ok(Selection::RemoveBackground));
        assert_eq!("search image".parse(), Ok(Selection::Search));
        assert!("blur".parse::<Selection>().unwrap_err().contains("remove-background"));
        assert_eq!(Selection::default(), Selection::Home);
        assert_eq!(Selection::Sketch.to_string(), "Convert to Pencil Sketch");
    }

    #[test]
    fn test_needs() {
        assert!(Selection::Sketch.needs_upload());
        assert!(!Selection::Search.needs_upload());

        let request = Request {
            selection: Selection::RemoveBackground,
            upload: Some(UploadedAsset::new("a.png", vec![])),
            query: None,
        };
        assert!(request.needs_segmenter());
        assert!(!Request::default().needs_segmenter());
    }
}
