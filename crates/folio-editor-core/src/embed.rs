//! Video URL handling.
//!
//! Watch-page and short links for YouTube are rewritten to their embeddable
//! form. Anything else is embedded as given.

use smol_str::{SmolStr, format_smolstr};

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// The player URL for a video link.
pub fn video_src(url: &str) -> SmolStr {
    match youtube_embed_url(url) {
        Some(embed) => embed,
        None => SmolStr::new(url.trim()),
    }
}

/// Embeddable URL for a YouTube link, or `None` if `url` is not one.
pub fn youtube_embed_url(url: &str) -> Option<SmolStr> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("//"))
        .unwrap_or(url);
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
    let host = host.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host);

    let id = match host {
        "youtu.be" => path_segment(path),
        "youtube.com" | "youtube-nocookie.com" => {
            if path.starts_with("embed/") {
                return Some(SmolStr::new(url));
            }
            if let Some(rest) = path
                .strip_prefix("shorts/")
                .or_else(|| path.strip_prefix("live/"))
            {
                path_segment(rest)
            } else if path.starts_with("watch") {
                query_param(path, "v")
            } else {
                None
            }
        }
        _ => None,
    }?;

    is_video_id(id).then(|| format_smolstr!("{EMBED_BASE}{id}"))
}

fn path_segment(path: &str) -> Option<&str> {
    let end = path.find(['/', '?', '#']).unwrap_or(path.len());
    Some(&path[..end])
}

fn query_param<'a>(path: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = path.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(key, value)| (key == name).then_some(value))
}

fn is_video_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url_is_rewritten() {
        assert_eq!(
            video_src("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_short_links() {
        assert_eq!(
            video_src("https://youtu.be/dQw4w9WgXcQ?si=abc"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(
            video_src("youtube.com/shorts/abc_DEF-123"),
            "https://www.youtube.com/embed/abc_DEF-123"
        );
    }

    #[test]
    fn test_embed_url_kept() {
        let url = "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ";
        assert_eq!(video_src(url), url);
    }

    #[test]
    fn test_other_urls_pass_through() {
        assert_eq!(video_src(" https://vimeo.com/1234 "), "https://vimeo.com/1234");
        assert_eq!(video_src("not a url"), "not a url");
        assert!(youtube_embed_url("https://www.youtube.com/watch?list=x").is_none());
    }
}
