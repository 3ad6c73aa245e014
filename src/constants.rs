pub mod images {

    pub const DEFAULT_PROFILE_IMAGE: &str = "default.png";

    /// Uploaded pictures are shrunk to fit within this square.
    pub const PROFILE_IMAGE_SIZE: u32 = 125;

    pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

    pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
}

pub mod pagination {

    pub const DEFAULT_PER_PAGE: u64 = 5;

    pub const MAX_PER_PAGE: u64 = 100;
}
