use base64::{Engine as _, engine::general_purpose};

/// A downloadable PNG carried inline as a data URI.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub data_uri: String,
}

pub fn data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    )
}

impl Download {
    pub fn new(file_name: &str, png: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            data_uri: data_uri(png),
        }
    }

    pub fn anchor(&self) -> String {
        format!(
            r#"<a href="{}" download="{}">Download Image</a>"#,
            self.data_uri,
            self.file_name.replace('"', "&quot;")
        )
    }

    /// PNG bytes back out of the data URI.
    pub fn png(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let payload = self
            .data_uri
            .strip_prefix("data:image/png;base64,")
            .unwrap_or(&self.data_uri);
        general_purpose::STANDARD.decode(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri(b"hello"), "data:image/png;base64,aGVsbG8=");
        assert_eq!(data_uri(&[]), "data:image/png;base64,");
    }

    #[test]
    fn test_anchor() {
        let download = Download::new("result.png", b"hello");
        assert_eq!(
            download.anchor(),
            r#"<a href="data:image/png;base64,aGVsbG8=" download="result.png">Download Image</a>"#
        );
        assert_eq!(download.png().unwrap(), b"hello");
    }
}
