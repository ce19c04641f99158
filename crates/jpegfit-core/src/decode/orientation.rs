//! EXIF orientation lookup.
//!
//! Reading metadata never fails a request: [`resolve_rotation`] turns any
//! read error into [`Rotation::None`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Tag};
use tracing::debug;

use super::{DecodeError, Orientation, Rotation};

/// Reads the orientation tag embedded in an image file.
pub trait MetadataReader {
    /// Returns `Orientation::Normal` when the file has metadata but no
    /// orientation tag. Errors when the file or its metadata can't be read.
    fn read_orientation(&self, path: &Path) -> Result<Orientation, DecodeError>;
}

/// [`MetadataReader`] backed by `kamadak-exif`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataReader;

impl MetadataReader for ExifMetadataReader {
    fn read_orientation(&self, path: &Path) -> Result<Orientation, DecodeError> {
        let file = File::open(path).map_err(|e| DecodeError::from_io(e, path))?;
        let mut reader = BufReader::new(file);

        let exif = Reader::new()
            .read_from_container(&mut reader)
            .map_err(|e| DecodeError::ExifError(e.to_string()))?;

        Ok(exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default())
    }
}

/// Resolve the upright rotation for `path`, absorbing read failures.
pub fn resolve_rotation(reader: &dyn MetadataReader, path: &Path) -> Rotation {
    match reader.read_orientation(path) {
        Ok(orientation) => orientation.rotation(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no usable orientation metadata");
            Rotation::None
        }
    }
}

/// Rotation in degrees (0, 90, 180 or 270) for the file at `path`.
pub fn rotation_degrees(path: &Path) -> u16 {
    resolve_rotation(&ExifMetadataReader, path).degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_jpeg, with_exif_orientation, write_fixture};

    struct FailingReader;

    impl MetadataReader for FailingReader {
        fn read_orientation(&self, _path: &Path) -> Result<Orientation, DecodeError> {
            Err(DecodeError::ExifError("boom".to_string()))
        }
    }

    struct FixedReader(Orientation);

    impl MetadataReader for FixedReader {
        fn read_orientation(&self, _path: &Path) -> Result<Orientation, DecodeError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_missing_file_is_zero_degrees() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.jpg");

        let result = ExifMetadataReader.read_orientation(&path);
        assert!(matches!(result, Err(DecodeError::NotFound(_))));
        assert_eq!(rotation_degrees(&path), 0);
    }

    #[test]
    fn test_jpeg_without_exif_is_zero_degrees() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "plain.jpg", &gradient_jpeg(8, 8, 90));

        assert_eq!(rotation_degrees(&path), 0);
    }

    #[test]
    fn test_rotation_tags_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let base = gradient_jpeg(8, 4, 90);

        for (tag, expected) in [(1u16, 0u16), (3, 180), (6, 90), (8, 270)] {
            let name = format!("tag{tag}.jpg");
            let path = write_fixture(dir.path(), &name, &with_exif_orientation(&base, tag));
            assert_eq!(rotation_degrees(&path), expected, "orientation tag {tag}");
        }
    }

    #[test]
    fn test_mirrored_tags_are_not_corrected() {
        let dir = tempfile::tempdir().unwrap();
        let base = gradient_jpeg(8, 4, 90);

        for tag in [2u16, 4, 5, 7] {
            let name = format!("mirror{tag}.jpg");
            let path = write_fixture(dir.path(), &name, &with_exif_orientation(&base, tag));
            assert_eq!(rotation_degrees(&path), 0, "orientation tag {tag}");
        }
    }

    #[test]
    fn test_reader_failure_is_absorbed() {
        let rotation = resolve_rotation(&FailingReader, Path::new("whatever.jpg"));
        assert_eq!(rotation, Rotation::None);
    }

    #[test]
    fn test_resolve_maps_orientation() {
        let rotation = resolve_rotation(&FixedReader(Orientation::Rotate270CW), Path::new("x"));
        assert_eq!(rotation, Rotation::Cw270);
    }
}
