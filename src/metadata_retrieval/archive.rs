/// Extraction of downloaded series archives.
use super::RetrievalError;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::ZipArchive;

/// Extracts every file of the ZIP archive at `archive` into `destination`
///
/// Directory components of entry names are dropped, so all files land
/// directly in `destination` and no entry can escape it. Directory entries
/// are skipped. Returns the number of extracted files.
pub fn extract_flat(archive: &Path, destination: &Path) -> Result<usize, RetrievalError> {
    let file = File::open(archive).map_err(|e| RetrievalError::Extraction {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipArchive::new(file)?;

    fs::create_dir_all(destination).map_err(|e| RetrievalError::Extraction {
        path: destination.to_path_buf(),
        source: e,
    })?;

    let mut extracted = 0;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let Some(name) = entry.enclosed_name().and_then(|path| path.file_name().map(|n| n.to_owned())) else {
            tracing::warn!(entry = entry.name(), "Skipping archive entry without a usable file name");
            continue;
        };

        let target = destination.join(name);
        let mut output = File::create(&target).map_err(|e| RetrievalError::Extraction {
            path: target.clone(),
            source: e,
        })?;
        io::copy(&mut entry, &mut output).map_err(|e| RetrievalError::Extraction {
            path: target.clone(),
            source: e,
        })?;

        extracted += 1;
    }

    tracing::info!(
        archive = %archive.display(),
        destination = %destination.display(),
        files = extracted,
        "Extracted archive"
    );

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temp::{create_temp_dir, create_temp_file};
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        for (name, contents) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
        }

        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_flat_drops_directories() {
        let bytes = build_zip(&[
            ("en.xml", "<Data/>"),
            ("nested/", ""),
            ("nested/actors.xml", "<Actors/>"),
            ("../banners.xml", "<Banners/>"),
        ]);
        let archive = create_temp_file("archive_test", "zip", &bytes).unwrap();
        let destination = create_temp_dir("archive_test").unwrap();

        let count = extract_flat(&archive, &destination).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read_to_string(destination.join("en.xml")).unwrap(), "<Data/>");
        assert_eq!(fs::read_to_string(destination.join("actors.xml")).unwrap(), "<Actors/>");
        assert!(!destination.join("nested").exists());
        assert!(!destination.join("banners.xml").exists());
    }

    #[test]
    fn test_extract_flat_rejects_non_archives() {
        let archive = create_temp_file("archive_test", "zip", b"not a zip").unwrap();
        let destination = create_temp_dir("archive_test").unwrap();

        assert!(matches!(
            extract_flat(&archive, &destination),
            Err(RetrievalError::Archive(_))
        ));
    }
}
