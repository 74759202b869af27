use crate::Container;
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Container {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl Container {
    /// Returns the file extension for this container, including the dot.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Container::None => "",
            Container::Chd => ".chd",
            Container::Nsz => ".nsz",
            Container::Xcz => ".xcz",
            Container::Ncz => ".ncz",
            Container::Cso => ".cso",
            Container::Zso => ".zso",
            Container::Rvz => ".rvz",
            Container::Gcz => ".gcz",
            Container::Wia => ".wia",
            Container::SevenZip => ".7z",
            Container::Zip => ".zip",
        }
    }

    /// Returns the short name used for storage and display.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Container::None => "none",
            Container::Chd => "chd",
            Container::Nsz => "nsz",
            Container::Xcz => "xcz",
            Container::Ncz => "ncz",
            Container::Cso => "cso",
            Container::Zso => "zso",
            Container::Rvz => "rvz",
            Container::Gcz => "gcz",
            Container::Wia => "wia",
            Container::SevenZip => "7z",
            Container::Zip => "zip",
        }
    }
}
