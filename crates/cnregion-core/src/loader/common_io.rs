// crates/cnregion-core/src/loader/common_io.rs
use super::CompressionMode;
use crate::error::Result;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

#[cfg(not(feature = "compact"))]
use crate::error::RegionError;

#[cfg(not(feature = "compact"))]
fn compact_disabled() -> RegionError {
    RegionError::InvalidData("Gzip requested but 'compact' disabled".into())
}

/// Wraps `reader` in a gzip decoder when asked to.
pub(crate) fn decode_stream<'r, R: Read + 'r>(
    reader: R,
    compression: CompressionMode,
) -> Result<Box<dyn Read + 'r>> {
    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                Ok(Box::new(GzDecoder::new(reader)))
            }
            #[cfg(not(feature = "compact"))]
            {
                drop(reader);
                Err(compact_disabled())
            }
        }
        CompressionMode::None => Ok(Box::new(reader)),
    }
}

pub(crate) fn open_stream(path: &Path, compression: CompressionMode) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    decode_stream(BufReader::new(file), compression)
}

/// Applies the requested framing to an encoded database.
pub(crate) fn encode_frame(data: &[u8], compression: CompressionMode) -> Result<Cow<'_, [u8]>> {
    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                let buffer = Vec::with_capacity(data.len() / 4);
                let mut encoder = GzEncoder::new(buffer, Compression::default());
                encoder.write_all(data)?;
                Ok(Cow::Owned(encoder.finish()?))
            }
            #[cfg(not(feature = "compact"))]
            {
                Err(compact_disabled())
            }
        }
        CompressionMode::None => Ok(Cow::Borrowed(data)),
    }
}

/// Writes `data` to `path`, replacing any existing file.
///
/// Nothing is written when framing fails.
pub(crate) fn write_stream(path: &Path, data: &[u8], compression: CompressionMode) -> Result<()> {
    let framed = encode_frame(data, compression)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&framed)?;
    writer.flush()?;
    Ok(())
}
