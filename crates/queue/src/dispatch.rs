use crate::codec::{CartridgeCodec, Codec, DiscCodec};
use crate::tool::Tool;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Platforms whose games ship on CDs or GD-ROMs and go through `chdman`.
pub const DISC_PLATFORMS: [&str; 10] = [
    "Sony Playstation",
    "Sony Playstation 2",
    "Sega Saturn",
    "Sega CD",
    "SNK Neo Geo CD",
    "Sega Dreamcast",
    "NEC TurboGrafx-CD",
    "Philips CD-i",
    "Panasonic 3DO",
    "Arcade",
];
/// Platforms whose games go through `nsz`.
pub const CARTRIDGE_PLATFORMS: [&str; 1] = ["Nintendo Switch"];

/// Where the external tools live, if not found automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPaths {
    pub chdman: Option<PathBuf>,
    pub nsz: Option<PathBuf>,
}

/// Maps platform labels to the codec that handles them.
///
/// Lookup is exact and case-sensitive: a label must be spelled the way the
/// platform resolver spells it.
#[derive(Clone, Default)]
pub struct DispatchTable {
    handlers: HashMap<String, Arc<dyn Codec>>,
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for platform in self.platforms() {
            if let Some(codec) = self.handlers.get(platform) {
                map.entry(&platform, &codec.name());
            }
        }
        map.finish()
    }
}

impl DispatchTable {
    /// A table that routes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Disc platforms to `chdman`, the Switch to `nsz`.
    pub fn standard(tools: &ToolPaths) -> Self {
        let disc: Arc<dyn Codec> = Arc::new(DiscCodec::new(Tool::chdman(tools.chdman.clone())));
        let cartridge: Arc<dyn Codec> = Arc::new(CartridgeCodec::new(Tool::nsz(tools.nsz.clone())));
        let table = DISC_PLATFORMS.iter().fold(Self::empty(), |table, platform| table.with(*platform, disc.clone()));
        CARTRIDGE_PLATFORMS.iter().fold(table, |table, platform| table.with(*platform, cartridge.clone()))
    }

    /// Route `platform` to `codec`, replacing any previous route.
    pub fn with(mut self, platform: impl Into<String>, codec: Arc<dyn Codec>) -> Self {
        self.handlers.insert(platform.into(), codec);
        self
    }

    pub fn get_handler(&self, platform: &str) -> Option<&Arc<dyn Codec>> {
        self.handlers.get(platform)
    }

    /// Every routed platform, sorted.
    pub fn platforms(&self) -> Vec<&str> {
        let mut platforms: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        platforms.sort_unstable();
        platforms
    }
}
