use std::sync::Arc;

pub(crate) mod decode;
pub(crate) mod store;

/// Decoded raster ready for compositing.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// A flattened raster encoded as PNG, as handed to the generation backend or downloaded.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    /// PNG bytes.
    pub png: Arc<[u8]>,
}
