//! Terminal and HTML output for a [`Page`].

use crate::{
    Result,
    logic::{Page, Render},
};
use std::{
    ffi::OsStr,
    fmt::Write as _,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Prints text blocks to `out` and writes every image and download into
/// `output_dir`. Returns the written files in page order.
pub fn present(page: &[Render], output_dir: &Path, out: &mut impl Write) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let mut presenter = Terminal {
        output_dir,
        written: Vec::new(),
        images: 0,
    };
    presenter.blocks(page, out)?;
    Ok(presenter.written)
}

struct Terminal<'a> {
    output_dir: &'a Path,
    written: Vec<PathBuf>,
    images: usize,
}

impl Terminal<'_> {
    fn blocks(&mut self, page: &[Render], out: &mut impl Write) -> Result<()> {
        for block in page {
            self.block(block, out)?;
        }
        Ok(())
    }

    fn block(&mut self, block: &Render, out: &mut impl Write) -> Result<()> {
        match block {
            Render::Title(text) => writeln!(out, "\n{text}\n{}", "=".repeat(text.chars().count()))?,
            Render::Header(text) => {
                writeln!(out, "\n{text}\n{}", "-".repeat(text.chars().count()))?
            }
            Render::Markdown(text) => writeln!(out, "{text}")?,
            Render::Divider => writeln!(out, "---")?,
            Render::Info(text) => writeln!(out, "[info] {text}")?,
            Render::Warning(text) => writeln!(out, "[warning] {text}")?,
            Render::Error(text) => writeln!(out, "[error] {text}")?,
            Render::Columns(columns) => {
                for column in columns {
                    self.blocks(column, out)?;
                }
            }
            Render::Image { caption, png, .. } => {
                self.images += 1;
                let stem = caption.as_deref().map(slug).unwrap_or_else(|| "image".to_string());
                let path = self.output_dir.join(format!("{:02}-{stem}.png", self.images));
                fs::write(&path, png)?;
                writeln!(
                    out,
                    "[image] {} -> {}",
                    caption.as_deref().unwrap_or("untitled"),
                    path.display()
                )?;
                self.written.push(path);
            }
            Render::Download(download) => {
                let png = download.png().map_err(|e| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
                })?;
                let path = self.output_dir.join(download_file_name(&download.file_name));
                fs::write(&path, png)?;
                writeln!(out, "[download] Download Image -> {}", path.display())?;
                self.written.push(path);
            }
        }
        Ok(())
    }
}

/// Last component of `name`, so a configured name never leaves the output
/// directory.
fn download_file_name(name: &str) -> &OsStr {
    Path::new(name)
        .file_name()
        .unwrap_or(OsStr::new("result.png"))
}

fn slug(caption: &str) -> String {
    let slug = caption
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() { "image".to_string() } else { slug }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Standalone HTML page with every image inlined as a data URI.
pub fn html(page: &[Render]) -> String {
    let mut body = String::new();
    html_blocks(page, &mut body);

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>ImageMagic - Your Image Processing Companion</title>\n\
         <style>.columns {{ display: flex; gap: 1em; }} .column {{ flex: 1; }} \
         .warning {{ color: #8a6d3b; }} .error {{ color: #a94442; }} \
         img {{ max-width: 100%; }}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

fn html_blocks(page: &[Render], body: &mut String) {
    for block in page {
        _ = match block {
            Render::Title(text) => writeln!(body, "<h1>{}</h1>", escape(text)),
            Render::Header(text) => writeln!(body, "<h2>{}</h2>", escape(text)),
            Render::Markdown(text) => {
                writeln!(body, "<pre class=\"markdown\">{}</pre>", escape(text))
            }
            Render::Divider => writeln!(body, "<hr>"),
            Render::Info(text) => writeln!(body, "<p class=\"info\">{}</p>", escape(text)),
            Render::Warning(text) => writeln!(body, "<p class=\"warning\">{}</p>", escape(text)),
            Render::Error(text) => writeln!(body, "<p class=\"error\">{}</p>", escape(text)),
            Render::Columns(columns) => {
                body.push_str("<div class=\"columns\">\n");
                for column in columns {
                    body.push_str("<div class=\"column\">\n");
                    html_blocks(column, body);
                    body.push_str("</div>\n");
                }
                writeln!(body, "</div>")
            }
            Render::Image {
                caption,
                width,
                png,
            } => {
                let width = width.map(|w| format!(" width=\"{w}\"")).unwrap_or_default();
                let caption = caption
                    .as_deref()
                    .map(|c| format!("<figcaption>{}</figcaption>", escape(c)))
                    .unwrap_or_default();
                writeln!(
                    body,
                    "<figure><img src=\"{}\"{width}>{caption}</figure>",
                    crate::logic::data_uri(png)
                )
            }
            Render::Download(download) => writeln!(body, "<p>{}</p>", download.anchor()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Download;

    fn page() -> Page {
        vec![
            Render::Title("Welcome".to_string()),
            Render::Warning("careful <b>".to_string()),
            Render::Columns(vec![
                vec![Render::image("Original Image", 300, b"one".to_vec())],
                vec![Render::image("Pencil Sketch", 200, b"two".to_vec())],
            ]),
            Render::Download(Download::new("result.png", b"two")),
        ]
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Original Image"), "original-image");
        assert_eq!(slug("  Background  Removed!"), "background-removed");
        assert_eq!(slug("🎉"), "image");
    }

    #[test]
    fn test_present_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let written = present(&page(), dir.path(), &mut out).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("01-original-image.png"),
                dir.path().join("02-pencil-sketch.png"),
                dir.path().join("result.png"),
            ]
        );
        assert_eq!(fs::read(dir.path().join("result.png")).unwrap(), b"two");

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[warning] careful <b>"));
        assert!(text.contains("Welcome\n======="));
    }

    #[test]
    fn test_download_stays_in_output_dir() {
        assert_eq!(download_file_name("../x.png"), "x.png");
        assert_eq!(download_file_name("/tmp/out/y.png"), "y.png");
        assert_eq!(download_file_name(".."), "result.png");
        assert_eq!(download_file_name(""), "result.png");

        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("out");
        let page = vec![Render::Download(Download::new("../escape.png", b"png"))];

        let written = present(&page, &output_dir, &mut Vec::new()).unwrap();
        assert_eq!(written, vec![output_dir.join("escape.png")]);
        assert!(!dir.path().join("escape.png").exists());
    }

    #[test]
    fn test_html() {
        let html = html(&page());
        assert!(html.contains("<h1>Welcome</h1>"));
        assert!(html.contains("careful &lt;b&gt;"));
        assert!(html.contains("<div class=\"columns\">"));
        assert!(html.contains("width=\"200\"><figcaption>Pencil Sketch</figcaption>"));
        assert!(html.contains(
            r#"<a href="data:image/png;base64,dHdv" download="result.png">Download Image</a>"#
        ));
    }
}
