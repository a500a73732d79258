//! Capture file reader.
//!
//! A capture is a sequence of records, each a `u32` little-endian byte length
//! followed by that many bytes of one raw frame.

use std::path::Path;

use bytes::Bytes;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

use crate::error::{CliError, Result};

/// Largest record accepted from a capture (16 MiB)
pub const MAX_RECORD_SIZE: u32 = 16 * 1024 * 1024;

pub struct CaptureReader<R> {
    inner: R,
    offset: u64,
}

impl CaptureReader<BufReader<File>> {
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::capture_not_found(path));
        }
        let file = File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncRead + Unpin> CaptureReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Byte offset of the next record header
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read the next record, `None` at a clean end of file.
    pub async fn next_record(&mut self) -> Result<Option<Bytes>> {
        let mut len_buf = [0u8; 4];
        let mut filled = 0;
        while filled < len_buf.len() {
            let n = self.inner.read(&mut len_buf[filled..]).await?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(CliError::capture_format(
                    self.offset,
                    "truncated record length",
                ));
            }
            filled += n;
        }

        let len = u32::from_le_bytes(len_buf);
        if len > MAX_RECORD_SIZE {
            return Err(CliError::capture_format(
                self.offset,
                format!("record length {len} exceeds {MAX_RECORD_SIZE}"),
            ));
        }

        let mut record = vec![0u8; len as usize];
        if let Err(e) = self.inner.read_exact(&mut record).await {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                return Err(CliError::capture_format(
                    self.offset,
                    format!("truncated record, expected {len} bytes"),
                ));
            }
            return Err(e.into());
        }

        self.offset += 4 + len as u64;
        Ok(Some(Bytes::from(record)))
    }
}

/// Encode one capture record
#[cfg(test)]
pub fn encode_record(frame: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + frame.len());
    out.extend_from_slice(&(frame.len() as u32).to_le_bytes());
    out.extend_from_slice(frame);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_records_in_order() {
        let mut data = encode_record(&[1, 2, 3]);
        data.extend(encode_record(&[]));
        data.extend(encode_record(&[9; 16]));

        let mut reader = CaptureReader::new(&data[..]);
        assert_eq!(reader.next_record().await.unwrap().unwrap(), &[1, 2, 3][..]);
        assert_eq!(reader.next_record().await.unwrap().unwrap().len(), 0);
        assert_eq!(reader.next_record().await.unwrap().unwrap(), &[9u8; 16][..]);
        assert!(reader.next_record().await.unwrap().is_none());
        assert_eq!(reader.offset(), data.len() as u64);
    }

    #[tokio::test]
    async fn test_truncated_payload() {
        let mut data = encode_record(&[1, 2, 3, 4]);
        data.truncate(6);

        let mut reader = CaptureReader::new(&data[..]);
        let err = reader.next_record().await.unwrap_err();
        assert!(matches!(err, CliError::CaptureFormat { offset: 0, .. }));
    }

    #[tokio::test]
    async fn test_truncated_length() {
        let mut data = encode_record(&[7]);
        data.extend_from_slice(&[1, 0]);

        let mut reader = CaptureReader::new(&data[..]);
        assert!(reader.next_record().await.unwrap().is_some());
        let err = reader.next_record().await.unwrap_err();
        assert!(matches!(err, CliError::CaptureFormat { offset: 5, .. }));
    }

    #[tokio::test]
    async fn test_oversized_record_length() {
        let data = (MAX_RECORD_SIZE + 1).to_le_bytes();
        let mut reader = CaptureReader::new(&data[..]);
        assert!(reader.next_record().await.is_err());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = CaptureReader::open(&dir.path().join("missing.cap")).await;
        assert!(matches!(result, Err(CliError::CaptureNotFound { .. })));
    }
}
