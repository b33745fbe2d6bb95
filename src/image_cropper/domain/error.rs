use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid bounds: min ({min_x}, {min_y}) exceeds max ({max_x}, {max_y})")]
    InvalidBounds {
        min_x: u32,
        min_y: u32,
        max_x: u32,
        max_y: u32,
    },

    // ピクセルバッファの長さが幅x高さと一致しない
    #[error("Pixel buffer of {actual} bytes does not match a {width}x{height} image")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}
