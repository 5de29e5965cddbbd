//! QR code rendering.

use std::io::Cursor;

use image::Luma;
use qrcode::QrCode;

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("failed to encode QR payload: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("failed to render QR image: {0}")]
    Render(#[from] image::ImageError),
}

/// Render `text` as a PNG QR code, at least 256x256 pixels.
pub fn encode_png(text: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(text.as_bytes())?;
    let img = code.render::<Luma<u8>>().min_dimensions(256, 256).build();
    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, image::ImageFormat::Png)?;
    Ok(png.into_inner())
}
