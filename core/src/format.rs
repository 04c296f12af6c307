use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    /// libgd's own uncompressed raster container.
    Gd,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Gd,
    ];

    /// Map an extension (without the dot, any case) to a format tag.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "gd" => Some(ImageFormat::Gd),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(extension_of(path)?)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Gd => "gd",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Gd => "GD",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unknown image format: {s}"))
    }
}

/// Suffix after the leftmost `.` in the file name that leaves 2 to 4
/// characters before the end. `None` when no such suffix exists.
pub fn extension_of(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    name.char_indices()
        .filter(|&(_, c)| c == '.')
        .map(|(i, _)| &name[i + 1..])
        .find(|suffix| (2..=4).contains(&suffix.chars().count()))
}
