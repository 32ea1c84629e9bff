use crate::domain::{ImagePart, NewsInput};
use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const DEFAULT_USER_AGENT: &str = "newscheck/0.1";

#[derive(Debug, Clone)]
pub struct InputAssemblerConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for InputAssemblerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl InputAssemblerConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Where image bytes come from: an http(s) URL or anything else, read as a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(Url),
    Local(PathBuf),
}

impl ImageSource {
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => ImageSource::Remote(url),
            _ => ImageSource::Local(PathBuf::from(raw)),
        }
    }
}

// Remote sources are shown as scheme and host only; chat file URLs embed credentials.
impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Remote(url) => {
                write!(f, "{}://{}", url.scheme(), url.host_str().unwrap_or("?"))
            }
            ImageSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct InputAssembler {
    http: HttpClient,
}

impl InputAssembler {
    pub fn new(config: InputAssemblerConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .context("failed to build HTTP client for image downloads")?;
        Ok(Self { http })
    }

    /// Builds the outbound payload. Image failures are logged and degrade to
    /// the text-only payload.
    pub fn assemble(&self, text: &str, image_source: Option<&str>) -> NewsInput {
        let Some(raw) = image_source.map(str::trim).filter(|s| !s.is_empty()) else {
            return NewsInput::from_text(text);
        };

        let source = ImageSource::parse(raw);
        match self.load_image(&source) {
            Ok(bytes) if !bytes.is_empty() => {
                info!(source = %source, bytes = bytes.len(), "image loaded");
                NewsInput::with_image(ImagePart::jpeg(bytes), text)
            }
            Ok(_) => {
                warn!(source = %source, "image source is empty, sending text only");
                NewsInput::from_text(text)
            }
            Err(err) => {
                warn!(source = %source, error = %format!("{err:#}"), "image load failed, sending text only");
                NewsInput::from_text(text)
            }
        }
    }

    pub fn load_image(&self, source: &ImageSource) -> Result<Vec<u8>> {
        match source {
            ImageSource::Remote(url) => self.fetch_remote(url),
            ImageSource::Local(path) => {
                fs::read(path).with_context(|| format!("cannot read image file {:?}", path))
            }
        }
    }

    fn fetch_remote(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|e| e.without_url())
            .context("image request failed")?
            .error_for_status()
            .map_err(|e| e.without_url())
            .context("image server returned an error status")?;
        let bytes = response
            .bytes()
            .map_err(|e| e.without_url())
            .context("image body could not be read")?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EMPTY_INPUT_TEXT, IMAGE_PLACEHOLDER_TEXT};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    fn assembler() -> InputAssembler {
        InputAssembler::new(InputAssemblerConfig::default().with_timeout(Duration::from_secs(2)))
            .unwrap()
    }

    /// Serves a single HTTP response on loopback and returns the image URL.
    fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap_or(0) > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            )
            .unwrap();
            stream.write_all(body).unwrap();
            stream.flush().unwrap();
        });
        format!("http://{}/photo.jpg", addr)
    }

    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    // Port 9 (discard) on loopback refuses connections on any normal host.
    const UNREACHABLE: &str = "http://127.0.0.1:9/photo.jpg";

    #[test]
    fn source_kinds() {
        assert!(matches!(ImageSource::parse("https://x.org/a.jpg"), ImageSource::Remote(_)));
        assert!(matches!(ImageSource::parse("http://x.org/a.jpg"), ImageSource::Remote(_)));
        assert_eq!(
            ImageSource::parse("/tmp/a.jpg"),
            ImageSource::Local(PathBuf::from("/tmp/a.jpg"))
        );
        assert!(matches!(ImageSource::parse("file:///tmp/a.jpg"), ImageSource::Local(_)));
        assert!(matches!(ImageSource::parse("photos/a.jpg"), ImageSource::Local(_)));
    }

    #[test]
    fn remote_display_hides_path() {
        let source = ImageSource::parse("https://api.telegram.org/file/botSECRET/photos/1.jpg");
        assert_eq!(source.to_string(), "https://api.telegram.org");
    }

    #[test]
    fn text_only() {
        let a = assembler();
        assert_eq!(a.assemble("  breaking news ", None), NewsInput::Text("breaking news".into()));
        assert_eq!(a.assemble("", None), NewsInput::Text(EMPTY_INPUT_TEXT.into()));
        assert_eq!(a.assemble("claim", Some("  ")), NewsInput::Text("claim".into()));
    }

    #[test]
    fn local_image_with_and_without_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let a = assembler();

        let input = a.assemble("", Some(&path));
        assert_eq!(input.text(), IMAGE_PLACEHOLDER_TEXT);
        let image = input.image().unwrap();
        assert_eq!(image.data, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(image.mime_type, "image/jpeg");

        let input = a.assemble(" caption text ", Some(&path));
        assert_eq!(input.text(), "caption text");
        assert!(input.image().is_some());
    }

    #[test]
    fn missing_or_empty_file_falls_back() {
        let a = assembler();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jpg");
        let input = a.assemble("claim", Some(missing.to_str().unwrap()));
        assert_eq!(input, NewsInput::Text("claim".into()));

        let empty = tempfile::NamedTempFile::new().unwrap();
        let input = a.assemble("", Some(empty.path().to_str().unwrap()));
        assert_eq!(input, NewsInput::Text(EMPTY_INPUT_TEXT.into()));
    }

    #[test]
    fn unreachable_url_falls_back() {
        let a = assembler();
        assert_eq!(
            a.assemble("vaccines cause X", Some(UNREACHABLE)),
            NewsInput::Text("vaccines cause X".into())
        );
        assert_eq!(
            a.assemble("   ", Some(UNREACHABLE)),
            NewsInput::Text(EMPTY_INPUT_TEXT.into())
        );
        assert!(a.load_image(&ImageSource::parse(UNREACHABLE)).is_err());
    }

    #[test]
    fn remote_image_is_downloaded() {
        let url = serve_once("200 OK", JPEG);
        let input = assembler().assemble(" is this real? ", Some(&url));
        assert_eq!(
            input,
            NewsInput::with_image(ImagePart::jpeg(JPEG.to_vec()), "is this real?")
        );
        assert_eq!(input.text(), "is this real?");
        assert_eq!(input.image().unwrap().data, JPEG.to_vec());
    }

    #[test]
    fn remote_error_status_falls_back() {
        let a = assembler();
        let url = serve_once("404 Not Found", b"missing");
        assert_eq!(
            a.assemble("vaccines cause X", Some(&url)),
            NewsInput::Text("vaccines cause X".into())
        );

        let url = serve_once("404 Not Found", b"missing");
        assert_eq!(a.assemble("", Some(&url)), NewsInput::Text(EMPTY_INPUT_TEXT.into()));
    }
}
