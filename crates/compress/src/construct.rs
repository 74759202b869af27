use crate::Container;
use crate::error::{Error, ErrorKind};
use std::{path::Path, str::FromStr};

impl FromStr for Container {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "raw" => Ok(Container::None),
            "chd" => Ok(Container::Chd),
            "nsz" => Ok(Container::Nsz),
            "xcz" => Ok(Container::Xcz),
            "ncz" => Ok(Container::Ncz),
            "cso" => Ok(Container::Cso),
            "zso" => Ok(Container::Zso),
            "rvz" => Ok(Container::Rvz),
            "gcz" => Ok(Container::Gcz),
            "wia" => Ok(Container::Wia),
            "7z" | "7zip" | "sevenzip" => Ok(Container::SevenZip),
            "zip" => Ok(Container::Zip),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(s.to_string())),
        }
    }
}

impl Container {
    /// Detect the container from a file extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "chd" => Container::Chd,
                "nsz" => Container::Nsz,
                "xcz" => Container::Xcz,
                "ncz" => Container::Ncz,
                "cso" => Container::Cso,
                "zso" => Container::Zso,
                "rvz" => Container::Rvz,
                "gcz" => Container::Gcz,
                "wia" => Container::Wia,
                "7z" => Container::SevenZip,
                "zip" => Container::Zip,
                _ => Container::None,
            })
            .unwrap_or(Container::None)
    }

    /// Whether this is a compressed container rather than a raw dump.
    #[inline]
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        !matches!(self, Container::None)
    }
}
