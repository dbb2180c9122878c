use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Luma};
use qrcode::{types::QrError, QrCode};

use crate::error::GateError;

pub use qrcode::EcLevel;

/// Media-type prefix of every successfully encoded image.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Filename convention when the image is offered for download.
pub const DOWNLOAD_FILENAME: &str = "qrcode.png";

#[derive(Debug, Clone)]
pub struct QrOptions {
    /// Error-correction level. Higher levels survive more damage to the
    /// printed code, but hold less data.
    pub ec_level: EcLevel,
    /// Edge length of one module, in pixels.
    pub module_px: u32,
    /// Whether to surround the code with the standard quiet zone.
    pub quiet_zone: bool,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            module_px: 8,
            quiet_zone: true,
        }
    }
}

/// Encode `payload` as a QR code and return a self-contained PNG data URI.
///
/// Deterministic: the same payload and options always yield a byte-identical
/// string. A payload beyond the symbology's capacity for the selected
/// error-correction level fails with [`GateError::PayloadTooLarge`] rather
/// than being truncated.
pub fn encode_data_uri(payload: &str, options: &QrOptions) -> Result<String, GateError> {
    let code =
        QrCode::with_error_correction_level(payload, options.ec_level).map_err(|err| match err {
            QrError::DataTooLong => GateError::PayloadTooLarge,
            _ => GateError::UnsupportedPayload,
        })?;

    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(options.module_px, options.module_px)
        .quiet_zone(options.quiet_zone)
        .build();

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(&png)))
}
