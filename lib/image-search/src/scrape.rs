use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

static IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .unwrap()
});

/// Collects the `src` of every `<img>` tag in document order.
///
/// Relative sources are resolved against `base`. Anything that does not end
/// up as an http(s) URL (`data:`, `javascript:`, empty) is skipped.
pub fn extract_image_urls(html: &str, base: &Url) -> Vec<Url> {
    IMG_SRC
        .captures_iter(html)
        .filter_map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| unescape(m.as_str().trim()))
        })
        .filter(|src| !src.is_empty())
        .filter_map(|src| match base.join(&src) {
            Ok(url) => Some(url),
            Err(e) => {
                log::debug!("skip img src `{src}`: {e}");
                None
            }
        })
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .collect()
}

fn unescape(src: &str) -> String {
    src.replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://unsplash.com/s/photos/cat").unwrap()
    }

    #[test]
    fn test_extract_quoted_sources() {
        let html = r#"
            <div><img class="a" src="https://images.example.com/1.jpg?w=400&amp;q=80" alt="x"></div>
            <IMG SRC='https://images.example.com/2.jpg'>
            <img
                alt="multi line"
                src="https://images.example.com/3.jpg" />
        "#;

        let urls: Vec<String> = extract_image_urls(html, &base())
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://images.example.com/1.jpg?w=400&q=80",
                "https://images.example.com/2.jpg",
                "https://images.example.com/3.jpg",
            ]
        );
    }

    #[test]
    fn test_extract_resolves_relative_and_skips_others() {
        let html = r#"
            <img src="/static/logo.png">
            <img src="data:image/gif;base64,R0lGOD">
            <img src="">
            <img srcset="https://images.example.com/ignored.jpg 2x">
            <img src=//cdn.example.com/4.png>
        "#;

        let urls: Vec<String> = extract_image_urls(html, &base())
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://unsplash.com/static/logo.png",
                "https://cdn.example.com/4.png",
            ]
        );
    }

    #[test]
    fn test_extract_nothing() {
        assert!(extract_image_urls("<p>no images</p>", &base()).is_empty());
    }
}
