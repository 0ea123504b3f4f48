//! Content-type validation and the image extension table.

/// Image category detected from a response `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Gif,
    Png,
    /// Any other `image/*` subtype; stored as `.jpg`.
    Other,
}

impl ImageKind {
    /// File extension (with leading dot) used for both temporary and final names.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg | ImageKind::Other => ".jpg",
            ImageKind::Gif => ".gif",
            ImageKind::Png => ".png",
        }
    }
}

/// Classifies a `Content-Type` header value. Returns `None` unless the media type is `image/*`.
///
/// Parameters (`; charset=...`) are ignored and matching is case-insensitive.
pub fn classify_content_type(content_type: &str) -> Option<ImageKind> {
    let media = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    let subtype = media.strip_prefix("image/")?;
    Some(match subtype {
        "jpeg" | "jpg" => ImageKind::Jpeg,
        "gif" => ImageKind::Gif,
        "png" => ImageKind::Png,
        _ => ImageKind::Other,
    })
}
