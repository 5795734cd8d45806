use super::{Page, Render};

const README: &str = include_str!("../../../README.md");

pub fn handle() -> Page {
    vec![
        Render::Title("README".to_string()),
        Render::Markdown(README.to_string()),
    ]
}
