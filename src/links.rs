use crate::error::{Error, Result};
use crate::video::normalize_path;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Url;
use std::io;
use std::process::{Command, Stdio};
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "http://localhost/";

const THUMB_DIR: &str = "./thumb/";
const PLAYER_ROOT: &str = "/prfile/";

// Bytes that would end or reshape a path segment: the url crate's
// path-segment set plus `%` and `/`.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Relative location of a video's animated thumbnail.
pub fn thumbnail_url(hash: &str) -> String {
    format!("{}{}.gif", THUMB_DIR, hash)
}

/// Player location for a video: the first path segment is dropped and the
/// rest is mounted under `/prfile/`, each segment percent-encoded.
pub fn player_url(path: &str) -> String {
    let path = normalize_path(path);
    let rest = match path.split_once('/') {
        Some((_, rest)) => rest,
        None => path.as_str(),
    };
    let encoded: Vec<String> = rest
        .split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect();
    format!("{}{}", PLAYER_ROOT, encoded.join("/"))
}

/// Parses the backend address, making sure relative joins land under it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| Error::BaseUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(Error::BaseUrl(format!("{}: not a hierarchical url", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolves a link produced by [`thumbnail_url`] or [`player_url`].
pub fn resolve(base: &Url, link: &str) -> Result<Url> {
    base.join(link)
        .map_err(|e| Error::BaseUrl(format!("{} + {}: {}", base, link, e)))
}

/// Hands the url to the desktop's default handler.
pub fn open_in_browser(url: &Url) -> Result<()> {
    info!("opening {}", url);

    let mut cmd = launcher();
    let status = cmd
        .arg(url.as_str())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .map_err(Error::Open)?;

    if !status.success() {
        return Err(Error::Open(io::Error::new(
            io::ErrorKind::Other,
            format!("launcher exited with {}", status),
        )));
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn launcher() -> Command {
    Command::new("open")
}

#[cfg(target_os = "windows")]
fn launcher() -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(&["/C", "start", ""]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher() -> Command {
    Command::new("xdg-open")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_is_gif_under_thumb() {
        assert_eq!(thumbnail_url("abc123"), "./thumb/abc123.gif");
        assert_eq!(thumbnail_url(""), "./thumb/.gif");
    }

    #[test]
    fn player_drops_first_segment() {
        assert_eq!(player_url("a/video/b.mp4"), "/prfile/video/b.mp4");
        assert_eq!(player_url(r"D:\video\show\e01.mkv"), "/prfile/video/show/e01.mkv");
        assert_eq!(player_url("/srv/media/x.mp4"), "/prfile/srv/media/x.mp4");
        assert_eq!(player_url("lonely.mp4"), "/prfile/lonely.mp4");
    }

    #[test]
    fn player_escapes_reserved_characters() {
        assert_eq!(player_url("a/show/Ep #1.mp4"), "/prfile/show/Ep%20%231.mp4");
        assert_eq!(player_url("a/show/what?.mp4"), "/prfile/show/what%3F.mp4");
        assert_eq!(
            player_url("a/show/50%25 off.mp4"),
            "/prfile/show/50%2525%20off.mp4"
        );
        assert_eq!(player_url("a/アニメ/op.mkv"), "/prfile/%E3%82%A2%E3%83%8B%E3%83%A1/op.mkv");

        let base = parse_base_url("http://nas.local/").unwrap();
        let url = resolve(&base, &player_url("a/show/Ep #1?.mp4")).unwrap();
        assert_eq!(url.path(), "/prfile/show/Ep%20%231%3F.mp4");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let base = parse_base_url("http://nas.local:8080/gallery").unwrap();
        assert_eq!(base.as_str(), "http://nas.local:8080/gallery/");
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn links_resolve_against_base() {
        let base = parse_base_url("http://nas.local/gallery/").unwrap();
        let thumb = resolve(&base, &thumbnail_url("ff")).unwrap();
        assert_eq!(thumb.as_str(), "http://nas.local/gallery/thumb/ff.gif");

        let player = resolve(&base, &player_url("a/video/b.mp4")).unwrap();
        assert_eq!(player.as_str(), "http://nas.local/prfile/video/b.mp4");
    }
}
