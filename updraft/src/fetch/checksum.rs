//! SHA-256 checksum calculation for asset verification.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::FetchError;

/// Buffer size for reading files during checksum calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Calculate the SHA-256 checksum of a byte buffer.
///
/// Returns the lowercase hexadecimal digest.
pub fn calculate_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Calculate the SHA-256 checksum of a file.
///
/// Returns the lowercase hexadecimal digest of the file contents.
pub async fn calculate_file_checksum(path: &Path) -> Result<String, FetchError> {
    let mut file = File::open(path).await.map_err(|e| FetchError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).await.map_err(|e| FetchError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify that a file matches an expected checksum.
///
/// `key` identifies the asset in the error on mismatch.
pub async fn verify_file_checksum(path: &Path, key: &str, expected: &str) -> Result<(), FetchError> {
    let actual = calculate_file_checksum(path).await?;
    if actual != expected {
        return Err(FetchError::ChecksumMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_calculate_checksum() {
        // SHA-256 of "hello world"
        assert_eq!(
            calculate_checksum(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_calculate_checksum_empty() {
        // SHA-256 of empty string
        assert_eq!(
            calculate_checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn test_calculate_file_checksum() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.txt");
        tokio::fs::write(&file_path, b"hello world").await.unwrap();

        let checksum = calculate_file_checksum(&file_path).await.unwrap();
        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[tokio::test]
    async fn test_calculate_nonexistent_file() {
        let result = calculate_file_checksum(Path::new("/nonexistent/file.txt")).await;
        assert!(matches!(result, Err(FetchError::Io { .. })));
    }

    #[tokio::test]
    async fn test_verify_file_checksum_match() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.txt");
        tokio::fs::write(&file_path, b"hello world").await.unwrap();

        let result = verify_file_checksum(
            &file_path,
            "test",
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_verify_file_checksum_mismatch() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.txt");
        tokio::fs::write(&file_path, b"hello world").await.unwrap();

        let result = verify_file_checksum(&file_path, "test", "wrong").await;
        match result {
            Err(FetchError::ChecksumMismatch { key, .. }) => assert_eq!(key, "test"),
            other => panic!("expected ChecksumMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_large_file_checksum_consistent() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("large.bin");

        // Larger than the read buffer
        let data = vec![0xABu8; 100_000];
        tokio::fs::write(&file_path, &data).await.unwrap();

        let a = calculate_file_checksum(&file_path).await.unwrap();
        let b = calculate_file_checksum(&file_path).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, calculate_checksum(&data));
    }
}
