use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio_util::sync::CancellationToken;

/// Images above this size are not previewed.
pub const MAX_PREVIEW_BYTES: usize = 20 * 1024 * 1024;

/// Build a `data:` URL for an image so it can be shown inline.
///
/// Returns `None` for non-images, empty content, or oversized files.
pub fn image_data_url(mime_type: &str, content: &[u8]) -> Option<String> {
    if !mime_type.starts_with("image/") || content.is_empty() || content.len() > MAX_PREVIEW_BYTES
    {
        return None;
    }
    Some(format!("data:{mime_type};base64,{}", STANDARD.encode(content)))
}

/// Encode a preview unless `token` is cancelled first.
///
/// The outer `None` means cancelled; the inner value is the preview itself.
pub(crate) async fn run_preview(
    token: CancellationToken,
    mime_type: String,
    content: bytes::Bytes,
) -> Option<Option<String>> {
    if token.is_cancelled() {
        return None;
    }
    let encode = tokio::task::spawn_blocking(move || image_data_url(&mime_type, &content));
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        joined = encode => Some(joined.ok().flatten()),
    }
}
