//! Share links: absolute interview URLs and the iframe embed snippet.

pub const DEFAULT_EMBED_WIDTH: u32 = 1350;
pub const DEFAULT_EMBED_HEIGHT: u32 = 735;

/// `http` for local development hosts, `https` everywhere else.
pub fn share_protocol(live_url: &str) -> &'static str {
    if live_url.contains("localhost") {
        "http"
    } else {
        "https"
    }
}

/// The URL stored on an interview at creation time.
pub fn stored_interview_url(live_url: &str, interview_id: &str) -> String {
    format!("{live_url}/call/{interview_id}")
}

/// Resolves the absolute public URL of an interview.
///
/// A readable slug wins; otherwise a stored URL is used verbatim when it already
/// carries a scheme, or is prefixed with `https://`.
pub fn resolve_interview_url(
    live_url: &str,
    readable_slug: Option<&str>,
    stored_url: Option<&str>,
) -> Option<String> {
    if let Some(slug) = readable_slug.filter(|s| !s.is_empty()) {
        let protocol = share_protocol(live_url);
        return Some(format!("{protocol}://{live_url}/call/{slug}"));
    }
    let url = stored_url.filter(|u| !u.is_empty())?;
    if url.starts_with("http") {
        Some(url.to_string())
    } else {
        Some(format!("https://{url}"))
    }
}

pub fn embed_code(url: &str, width: u32, height: u32) -> String {
    format!(r#"<iframe src="{url}" width="{width}" height="{height}"></iframe>"#)
}
