use std::fs;
use std::io::Read;

use camino::Utf8Path;
use flate2::read::MultiGzDecoder;

use crate::error::LayoutError;

const READ_AHEAD: usize = 512;

/// Checks that `path` is a non-empty, readable regular file. Gzip files must
/// also start with a decodable gzip member.
pub fn verify_file(path: &Utf8Path) -> Result<(), LayoutError> {
    let invalid = |reason: String| LayoutError::InvalidFile {
        path: path.to_owned(),
        reason,
    };

    let metadata = fs::metadata(path.as_std_path()).map_err(|err| invalid(err.to_string()))?;
    if !metadata.is_file() {
        return Err(invalid("not a regular file".to_string()));
    }
    if metadata.len() == 0 {
        return Err(invalid("file is empty".to_string()));
    }

    let file = fs::File::open(path.as_std_path()).map_err(|err| invalid(format!("open: {err}")))?;
    if path.extension() == Some("gz") {
        let mut decoder = MultiGzDecoder::new(file);
        let mut buf = [0u8; READ_AHEAD];
        decoder
            .read(&mut buf)
            .map_err(|err| invalid(format!("unreadable gzip stream: {err}")))?;
    }
    Ok(())
}

pub fn is_regular_file(path: &Utf8Path) -> bool {
    path.as_std_path().is_file()
}

pub fn path_exists(path: &Utf8Path) -> bool {
    path.as_std_path().exists()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;
    use camino::Utf8PathBuf;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, root)
    }

    #[test]
    fn accepts_gzip() {
        let (_temp, root) = temp_root();
        let path = root.join("S1.hard-filtered.vcf.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"##fileformat=VCFv4.2\n").unwrap();
        fs::write(&path, encoder.finish().unwrap()).unwrap();

        verify_file(&path).unwrap();
    }

    #[test]
    fn rejects_empty_file() {
        let (_temp, root) = temp_root();
        let path = root.join("S1.sv.vcf.gz");
        fs::write(&path, b"").unwrap();

        let err = verify_file(&path).unwrap_err();
        assert_matches!(err, LayoutError::InvalidFile { reason, .. } if reason == "file is empty");
    }

    #[test]
    fn rejects_corrupt_gzip() {
        let (_temp, root) = temp_root();
        let path = root.join("S1.sv.vcf.gz");
        fs::write(&path, b"plain text, not gzip").unwrap();

        let err = verify_file(&path).unwrap_err();
        assert_matches!(err, LayoutError::InvalidFile { .. });
    }

    #[test]
    fn rejects_directory() {
        let (_temp, root) = temp_root();
        let err = verify_file(&root).unwrap_err();
        assert_matches!(err, LayoutError::InvalidFile { .. });
    }

    #[test]
    fn plain_files_skip_gzip_check() {
        let (_temp, root) = temp_root();
        let path = root.join("S1.mapping_metrics.csv");
        fs::write(&path, b"MAPPING/ALIGNING SUMMARY,,Total input reads,100\n").unwrap();
        verify_file(&path).unwrap();
        assert!(path_exists(&path));
        assert!(is_regular_file(&path));
        assert!(!is_regular_file(&root));
    }
}
