use super::{Page, Render, Selection};

pub fn handle() -> Page {
    vec![
        Render::Header(Selection::AiImage.label().to_string()),
        Render::Info("Image generation is not available yet.".to_string()),
    ]
}
