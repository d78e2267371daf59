//! QR payload extraction from uploaded images.

use log::debug;

use crate::error_handling::DecodeError;

/// Decodes the first readable QR code in an encoded image.
///
/// Returns `Ok(None)` when the image is valid but no code decodes, or when the
/// decoded payload is empty. Bytes that are not a supported image (PNG or JPEG)
/// are an error, and so is a code whose payload is not UTF-8 text when no
/// other code in the image decodes.
///
/// When an image holds several codes, which one is returned depends on the
/// order the detector reports them in.
pub fn decode_qr(bytes: &[u8]) -> Result<Option<String>, DecodeError> {
    let luma = image::load_from_memory(bytes)?.to_luma8();
    let (width, height) = luma.dimensions();
    debug!("Searching {}x{} image for QR codes", width, height);

    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            luma.get_pixel(x as u32, y as u32).0[0]
        });
    let grids = prepared.detect_grids();
    debug!("Detected {} candidate grid(s)", grids.len());

    let mut undecodable_payload = false;
    for grid in grids {
        match grid.decode() {
            Ok((_, content)) if !content.is_empty() => return Ok(Some(content)),
            Ok(_) => debug!("Skipping QR code with empty payload"),
            Err(rqrr::DeQRError::EncodingError) => {
                debug!("QR code payload is not UTF-8");
                undecodable_payload = true;
            }
            Err(e) => debug!("Candidate grid did not decode: {}", e),
        }
    }
    if undecodable_payload {
        return Err(DecodeError::Payload);
    }
    Ok(None)
}
