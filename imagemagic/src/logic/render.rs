use super::download::Download;
use crate::AppError;

/// One page is the ordered list of blocks a handler produced.
pub type Page = Vec<Render>;

#[derive(Debug, Clone, PartialEq)]
pub enum Render {
    Title(String),
    Header(String),
    Markdown(String),
    Divider,
    Image {
        caption: Option<String>,
        width: Option<u32>,
        png: Vec<u8>,
    },
    Columns(Vec<Vec<Render>>),
    Download(Download),
    Info(String),
    Warning(String),
    Error(String),
}

impl Render {
    pub fn image(caption: &str, width: u32, png: Vec<u8>) -> Self {
        Render::Image {
            caption: Some(caption.to_string()),
            width: Some(width),
            png,
        }
    }

    pub fn from_error(e: &AppError) -> Self {
        if e.is_warning() {
            Render::Warning(e.to_string())
        } else {
            Render::Error(e.to_string())
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match self {
            Render::Image { caption, .. } => caption.as_deref(),
            _ => None,
        }
    }
}

/// Header shown above every page.
pub fn banner() -> Page {
    vec![
        Render::Title("🎉Welcome to ImageMagic".to_string()),
        Render::Markdown(
            "✨ImageMagic is a versatile image processing application🚀 that simplifies common \
             image editing tasks.\nUpload an image and choose from the available options to \
             enhance your images effortlessly⚡!"
                .to_string(),
        ),
    ]
}

/// Walks nested columns too.
pub fn flatten(page: &[Render]) -> Vec<&Render> {
    let mut blocks = Vec::new();
    for block in page {
        match block {
            Render::Columns(columns) => {
                for column in columns {
                    blocks.extend(flatten(column));
                }
            }
            block => blocks.push(block),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error() {
        assert_eq!(
            Render::from_error(&AppError::EmptyQuery),
            Render::Warning("Please enter a search query.".to_string())
        );
        assert!(matches!(
            Render::from_error(&AppError::CorruptImage("bad".into())),
            Render::Error(_)
        ));
    }

    #[test]
    fn test_flatten() {
        let page = vec![
            Render::Divider,
            Render::Columns(vec![
                vec![Render::image("a", 1, vec![])],
                vec![Render::image("b", 2, vec![]), Render::Divider],
            ]),
        ];

        let captions: Vec<_> = flatten(&page).iter().filter_map(|b| b.caption()).collect();
        assert_eq!(captions, vec!["a", "b"]);
        assert_eq!(flatten(&page).len(), 4);
    }
}
