//! String and file helpers shared by the handlers: platform names, caption
//! formatting, download directory housekeeping.

use std::path::Path;

use teloxide::utils::html;

/// Ellipsis appended to truncated captions
const ELLIPSIS: &str = "...";

/// Returns a display name for the platform a link points to.
///
/// Plain substring matching, first hit wins. Unknown hosts are "Source".
///
/// # Example
///
/// ```
/// use reelbot::core::utils::get_platform_name;
///
/// assert_eq!(get_platform_name("https://youtu.be/dQw4w9WgXcQ"), "YouTube");
/// assert_eq!(get_platform_name("https://example.com/video"), "Source");
/// ```
pub fn get_platform_name(url: &str) -> &'static str {
    if url.contains("youtube.com") || url.contains("youtu.be") {
        "YouTube"
    } else if url.contains("tiktok.com") {
        "TikTok"
    } else if url.contains("instagram.com") {
        "Instagram"
    } else if url.contains("twitter.com") || url.contains("x.com") {
        "Twitter/X"
    } else {
        "Source"
    }
}

/// Escapes text for use inside a double-quoted HTML attribute.
fn escape_attribute(text: &str) -> String {
    html::escape(text).replace('"', "&quot;")
}

/// The "Open in ..." line that heads every caption (HTML parse mode).
pub fn link_line(original_link: &str) -> String {
    format!(
        "🔗 <a href=\"{}\">Open in {}</a>",
        escape_attribute(original_link),
        get_platform_name(original_link)
    )
}

/// Builds the video caption: link line, then the description if it has any
/// non-whitespace content.
///
/// The result never exceeds `max_length` characters. When the description
/// does not fit it is cut and ends with `...`; when not even the link line
/// fits, the caption is the plain link text. Cuts never land inside a tag or
/// an HTML escape sequence, so the caption can still be sent with HTML parse
/// mode.
pub fn format_caption(original_link: &str, description: &str, max_length: usize) -> String {
    let header = link_line(original_link);
    let header_len = header.chars().count();

    // Cutting inside the <a> tag would leave HTML Telegram rejects
    if header_len > max_length {
        return truncate_html(&html::escape(original_link), max_length);
    }

    let description = description.trim();
    if description.is_empty() {
        return header;
    }

    let body = html::escape(description);
    let body_len = body.chars().count();

    if header_len + 2 + body_len <= max_length {
        return format!("{}\n\n{}", header, body);
    }

    // Room for at least one description character plus the ellipsis
    let budget = max_length.saturating_sub(header_len + 2);
    if budget > ELLIPSIS.len() {
        return format!(
            "{}\n\n{}{}",
            header,
            take_html_chars(&body, budget - ELLIPSIS.len()),
            ELLIPSIS
        );
    }

    header
}

/// Cuts `text` to `max_length` characters with a trailing ellipsis when it
/// is too long.
fn truncate_html(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    format!(
        "{}{}",
        take_html_chars(text, max_length.saturating_sub(ELLIPSIS.len())),
        ELLIPSIS
    )
}

/// First `count` characters of escaped HTML text, backing off to before a
/// `&...;` sequence that would otherwise be split.
fn take_html_chars(text: &str, count: usize) -> &str {
    let end = text.char_indices().nth(count).map(|(i, _)| i).unwrap_or(text.len());
    let prefix = &text[..end];

    match prefix.rfind('&') {
        Some(amp) if !prefix[amp..].contains(';') => &prefix[..amp],
        _ => prefix,
    }
}

/// Checks that the message text looks like a link.
pub fn is_probable_url(text: &str) -> bool {
    text.trim().starts_with("http")
}

/// Ensures the downloads directory exists.
pub fn ensure_downloads_dir(downloads_dir: &Path) -> std::io::Result<()> {
    fs_err::create_dir_all(downloads_dir)
}

/// Removes a file. Missing files and removal errors are ignored.
pub fn cleanup_file(file_path: &Path) {
    match fs_err::remove_file(file_path) {
        Ok(()) => log::debug!("Removed {}", file_path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::debug!("Ignoring cleanup failure: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REEL: &str = "https://www.instagram.com/reel/C8xYz12AbCd/";

    #[test]
    fn test_platform_names() {
        assert_eq!(get_platform_name("https://www.youtube.com/shorts/abc"), "YouTube");
        assert_eq!(get_platform_name("https://youtu.be/abc"), "YouTube");
        assert_eq!(get_platform_name("https://www.tiktok.com/@user/video/1"), "TikTok");
        assert_eq!(get_platform_name(REEL), "Instagram");
        assert_eq!(get_platform_name("https://twitter.com/user/status/1"), "Twitter/X");
        assert_eq!(get_platform_name("https://x.com/user/status/1"), "Twitter/X");
        assert_eq!(get_platform_name("https://vimeo.com/123"), "Source");
    }

    #[test]
    fn test_link_line() {
        assert_eq!(
            link_line(REEL),
            "🔗 <a href=\"https://www.instagram.com/reel/C8xYz12AbCd/\">Open in Instagram</a>"
        );
    }

    #[test]
    fn test_link_line_escapes_href() {
        let line = link_line("https://example.com/?a=1&b=\"2\"");
        assert!(line.contains("href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_caption_with_description() {
        let caption = format_caption(REEL, "  Sunset over the bay  \n", 1024);
        assert_eq!(caption, format!("{}\n\nSunset over the bay", link_line(REEL)));
    }

    #[test]
    fn test_caption_without_description() {
        assert_eq!(format_caption(REEL, "", 1024), link_line(REEL));
        assert_eq!(format_caption(REEL, " \n\t ", 1024), link_line(REEL));
    }

    #[test]
    fn test_caption_escapes_description() {
        let caption = format_caption(REEL, "<b>bold</b> & co", 1024);
        assert!(caption.ends_with("&lt;b&gt;bold&lt;/b&gt; &amp; co"));
    }

    #[test]
    fn test_long_caption_hits_budget_exactly() {
        let description = "a".repeat(5000);
        let caption = format_caption(REEL, &description, 1024);
        assert_eq!(caption.chars().count(), 1024);
        assert!(caption.ends_with("a..."));
        assert!(caption.starts_with(&link_line(REEL)));
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        let description = "ё".repeat(3000);
        let caption = format_caption(REEL, &description, 500);
        assert_eq!(caption.chars().count(), 500);
        assert!(caption.len() > 500);
    }

    #[test]
    fn test_caption_that_fits_exactly_is_untouched() {
        let header_len = link_line(REEL).chars().count();
        let description = "b".repeat(100);
        let max = header_len + 2 + 100;
        let caption = format_caption(REEL, &description, max);
        assert_eq!(caption.chars().count(), max);
        assert!(!caption.ends_with("..."));
    }

    #[test]
    fn test_cut_never_splits_escape_sequence() {
        let header_len = link_line(REEL).chars().count();
        // Escaped body is "xx&amp;&amp;...". Five characters would be "xx&am",
        // which backs off to "xx".
        let description = format!("xx{}", "&".repeat(50));
        let caption = format_caption(REEL, &description, header_len + 2 + 8);
        assert!(caption.ends_with("\n\nxx..."), "got {caption}");
        assert!(caption.chars().count() < header_len + 2 + 8);

        // Seven characters end exactly on the first escape sequence.
        let caption = format_caption(REEL, &description, header_len + 2 + 10);
        assert!(caption.ends_with("\n\nxx&amp;..."), "got {caption}");
        assert_eq!(caption.chars().count(), header_len + 2 + 10);
    }

    #[test]
    fn test_tiny_budget_still_respected() {
        let caption = format_caption(REEL, "description", 10);
        assert_eq!(caption, "https:/...");
    }

    #[test]
    fn test_budget_below_link_line_drops_markup() {
        let header_len = link_line(REEL).chars().count();
        let caption = format_caption(REEL, "description", header_len - 1);
        assert!(!caption.contains('<'), "got {caption}");
        assert!(caption.chars().count() <= header_len - 1);
        assert!(caption.starts_with("https://www.instagram.com/"));

        let link = "https://example.com/watch?v=1&t=20";
        let caption = format_caption(link, "", link_line(link).chars().count() - 1);
        assert_eq!(caption, "https://example.com/watch?v=1&amp;t=20");
    }

    #[test]
    fn test_no_room_for_description_keeps_link_line() {
        let header = link_line(REEL);
        let header_len = header.chars().count();
        for max in header_len..header_len + 6 {
            assert_eq!(format_caption(REEL, "description", max), header);
        }
    }

    #[test]
    fn test_is_probable_url() {
        assert!(is_probable_url("https://youtu.be/x"));
        assert!(is_probable_url("  http://example.com  "));
        assert!(!is_probable_url("hello there"));
        assert!(!is_probable_url("www.youtube.com/watch?v=1"));
    }

    #[test]
    fn test_cleanup_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-existed.mp4");
        cleanup_file(&missing);
        cleanup_file(&missing);
        assert!(!missing.exists());
    }

    #[test]
    fn test_cleanup_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("video.mp4");
        std::fs::write(&file, b"data").unwrap();
        cleanup_file(&file);
        assert!(!file.exists());
    }

    #[test]
    fn test_ensure_downloads_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("downloads");
        ensure_downloads_dir(&nested).unwrap();
        ensure_downloads_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
