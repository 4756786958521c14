/// Bytes per mebibyte, used when converting `*_SIZE_MB` settings.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

pub const DEFAULT_PORT: u16 = 8091;
pub const DEFAULT_MAX_THUMBNAIL_SIZE_MB: u64 = 10;
pub const DEFAULT_MAX_VIDEO_SIZE_MB: u64 = 1024;

/// Issuer claim expected on access tokens.
pub const TOKEN_ISSUER: &str = "tubely-access";

/// Multipart field names, one per asset kind.
pub const THUMBNAIL_FIELD: &str = "thumbnail";
pub const VIDEO_FIELD: &str = "video";

/// URL prefix under which the assets root is served.
pub const ASSETS_ROUTE: &str = "/assets";
