//! Storage key generation shared by both backends.

/// Random bytes per video key (256 bits, hex encoded to 64 characters).
const VIDEO_KEY_RANDOM_BYTES: usize = 32;

/// Key for a processed video: `{prefix}/{random hex}.mp4`.
///
/// The token comes from the thread-local CSPRNG; collisions are not checked for.
pub fn video_storage_key(prefix: &str) -> String {
    let token: [u8; VIDEO_KEY_RANDOM_BYTES] = rand::random();
    let token = hex::encode(token);
    if prefix.is_empty() {
        format!("{}.mp4", token)
    } else {
        format!("{}/{}.mp4", prefix.trim_matches('/'), token)
    }
}

/// Key for a thumbnail: `{video_id}.{extension}`.
pub fn thumbnail_storage_key(video_id: uuid::Uuid, extension: &str) -> String {
    format!("{}.{}", video_id, extension.trim_start_matches('.'))
}
