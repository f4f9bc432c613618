//! File classification for uploaded inputs.

/// Extensions the field form offers for shape archives.
///
/// Only ZIP content is actually decodable; other archive formats are
/// accepted at the form and classified as unrecognised at decode time.
pub const SHAPE_ARCHIVE_EXTENSIONS: &[&str] = &[".zip", ".rar", ".7z", ".tar.gz"];

/// Extensions the field form offers for the table file.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &[".xls", ".xlsx"];

/// Detected file type based on extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Zipped shapefile layers
    ZipArchive,
    /// RAR, 7z or gzipped tarball
    OtherArchive,
    /// Excel workbook
    Spreadsheet,
    /// Unknown format
    Unknown,
}

/// Detect file type from a file name.
pub fn detect_file_type(name: &str) -> FileType {
    let lower = name.to_lowercase();

    if lower.ends_with(".zip") {
        FileType::ZipArchive
    } else if lower.ends_with(".rar") || lower.ends_with(".7z") || lower.ends_with(".tar.gz") {
        FileType::OtherArchive
    } else if SPREADSHEET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        FileType::Spreadsheet
    } else {
        FileType::Unknown
    }
}

/// Render an extension list as an HTML `accept` attribute value.
pub fn accept_attribute(extensions: &[&str]) -> String {
    extensions.join(",")
}
