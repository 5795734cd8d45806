use super::{Page, Render};
use crate::config::Config;
use image_effect::codec;
use std::{fs, path::Path};

pub const BACKGROUND_EXAMPLE: &str = "Background_remove.png";
pub const SKETCH_EXAMPLE: &str = "pencil_sketch.png";

fn text(s: &str) -> Render {
    Render::Markdown(s.to_string())
}

// Example pictures are optional; a missing or unreadable one is skipped.
fn example(dir: &Path, name: &str) -> Option<Render> {
    let path = dir.join(name);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("no example image {}: {e}", path.display());
            return None;
        }
    };

    if let Err(e) = codec::sniff(&bytes) {
        log::warn!("skip example image {}: {e}", path.display());
        return None;
    }

    Some(Render::image("Original Image", 600, bytes))
}

pub fn handle(config: &Config) -> Page {
    let assets = config.assets_dir.as_path();
    let mut page = vec![
        Render::Header("Home".to_string()),
        text("## Welcome to Image Processing App"),
        text(
            "This app allows you to perform various image processing tasks such as background \
             removal and converting images to pencil sketches.",
        ),
        text("### Background Removal"),
        text(
            "With the background removal feature, you can easily separate the main object from \
             its background.",
        ),
        text("Here's an example of an original image and its background removed version:"),
        text("### Original Image and Background Removed"),
    ];
    page.extend(example(assets, BACKGROUND_EXAMPLE));

    page.extend([
        text("### Pencil Sketch Conversion"),
        text("The app also provides an option to convert images into pencil sketches."),
        text("Here's an example of an original image and its corresponding pencil sketch:"),
        text("### Original Image and Pencil Sketch"),
    ]);
    page.extend(example(assets, SKETCH_EXAMPLE));

    page.extend([
        text("### Summary"),
        text(
            "This app offers a simple yet powerful interface for performing common image \
             processing tasks.",
        ),
        text("Explore the various functionalities and unleash your creativity!"),
        Render::Divider,
        text("### About the Author"),
        text("This app was created by codewithdark."),
        text("For more projects and contact information, visit:"),
        text(
            "[GitHub](https://github.com/codewithdark-git) | \
             [LinkedIn](https://www.linkedin.com/in/codewithdark)",
        ),
    ]);

    page
}
