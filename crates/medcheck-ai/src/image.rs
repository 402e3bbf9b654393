//! Image payloads attached to an analysis request.

const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// A base64-encoded bitmap with an explicit media type.
///
/// The payload never carries a data-URI prefix; stripping happens at
/// construction so the wire request always sees bare base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    media_type: String,
    data: String,
}

impl ImageAttachment {
    /// Wrap an already-encoded bare payload.
    pub fn new(media_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            data: base64_data.into(),
        }
    }

    /// Build an attachment from user input: either bare base64 or a
    /// `data:<media-type>;base64,<payload>` URI.
    ///
    /// A data URI keeps its declared media type; bare input defaults to
    /// `image/jpeg`.
    pub fn from_user_input(input: &str) -> Self {
        if let Some(rest) = input.strip_prefix("data:")
            && let Some((header, payload)) = rest.split_once(',')
        {
            let media_type = header.strip_suffix(";base64").unwrap_or(header);
            let media_type = if media_type.is_empty() {
                DEFAULT_MEDIA_TYPE
            } else {
                media_type
            };
            return Self::new(media_type, payload);
        }
        Self::new(DEFAULT_MEDIA_TYPE, input)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Bare base64 payload, no prefix.
    pub fn data(&self) -> &str {
        &self.data
    }
}
