use super::{Page, Render};
use crate::{AppError, Result, config::Config};
use image_effect::codec;
use image_search::{ImageSearchProvider, SearchError, unsplash::FETCH_WARNING};

pub async fn handle(
    query: Option<&str>,
    config: &Config,
    provider: &dyn ImageSearchProvider,
) -> Result<Page> {
    let query = query.map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::EmptyQuery);
    }

    let outcome = match provider.search(query).await {
        Ok(outcome) => outcome,
        Err(SearchError::EmptyQuery) => return Err(AppError::EmptyQuery),
        Err(e) => {
            log::warn!("search `{query}` failed: {e}");
            return Ok(vec![Render::Warning(FETCH_WARNING.to_string())]);
        }
    };

    let mut page = Page::new();
    if !outcome.thumbnails.is_empty() {
        let mut columns = Vec::new();
        for column in outcome.columns(config.search.columns) {
            let mut blocks = Vec::with_capacity(column.len());
            for thumbnail in column {
                blocks.push(Render::Image {
                    caption: None,
                    width: None,
                    png: codec::encode_png(&thumbnail.image)?,
                });
            }
            columns.push(blocks);
        }
        page.push(Render::Columns(columns));
    }

    match outcome.warning {
        Some(warning) => page.push(Render::Warning(warning)),
        None if page.is_empty() => {
            page.push(Render::Info(format!("No images found for `{query}`.")))
        }
        None => (),
    }

    Ok(page)
}
