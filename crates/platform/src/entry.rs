/// A known platform and the tokens that identify it inside a path.
///
/// Names are compared case-insensitively. The `priority` only matters when
/// two platforms with names of the same length match a path with the same
/// weight; see [`PlatformTable`](crate::PlatformTable) for the full ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEntry {
    /// Canonical display label, e.g. `"Sony Playstation 2"`.
    pub name: String,
    /// Alternative tokens, e.g. `"ps2"`, `"playstation2"`.
    pub aliases: Vec<String>,
    /// Tie-break priority (higher wins); defaults to `0`.
    pub priority: i32,
}

impl PlatformEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), aliases: Vec::new(), priority: 0 }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Every lowercase term that identifies this platform: the name as-is,
    /// with spaces stripped, hyphenated, underscored, then each alias.
    ///
    /// Duplicates are removed while keeping first-seen order.
    pub fn terms(&self) -> Vec<String> {
        let name = self.name.to_lowercase();
        let candidates = [name.replace(' ', ""), name.replace(' ', "-"), name.replace(' ', "_")];
        let mut terms = vec![name];
        for term in candidates.into_iter().chain(self.aliases.iter().map(|a| a.trim().to_lowercase())) {
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        terms
    }

    /// Whether the canonical name contains a digit (`"Nintendo 64"`).
    pub(crate) fn has_digit(&self) -> bool {
        self.name.chars().any(|c| c.is_ascii_digit())
    }
}

fn entry(name: &str, aliases: &[&str]) -> PlatformEntry {
    PlatformEntry::new(name).with_aliases(aliases.iter().copied())
}

/// The built-in platform list.
///
/// Aliases shorter than three characters are absent: even as standalone
/// words, tokens like `gb` or `ds` turn up in too many file names. Short
/// aliases that remain only match as whole words (see
/// [`Resolver`](crate::Resolver)).
pub(crate) fn builtin() -> Vec<PlatformEntry> {
    vec![
        // Sony
        entry("Sony Playstation", &["playstation", "playstation 1", "playstation1", "ps1", "psx"]),
        entry("Sony Playstation 2", &["playstation 2", "playstation2", "ps2"]),
        entry("Sony Playstation 3", &["playstation 3", "playstation3", "ps3"]),
        entry("Sony Playstation Portable", &["playstation portable", "psp"]),
        entry("Sony Playstation Vita", &["playstation vita", "ps vita", "psvita", "vita"]),
        // Microsoft
        entry("Microsoft Xbox", &["xbox"]),
        entry("Microsoft Xbox 360", &["xbox 360", "xbox360", "x360"]),
        // Nintendo
        entry("Nintendo Entertainment System", &["nes", "famicom"]),
        entry("Super Nintendo Entertainment System", &["snes", "super nintendo", "super famicom"]),
        entry("Nintendo 64", &["n64"]),
        entry("Nintendo GameCube", &["gamecube", "game cube", "gcn"]),
        entry("Nintendo Wii", &["wii"]),
        entry("Nintendo Wii U", &["wii u", "wiiu", "wii-u"]),
        entry("Nintendo Switch", &["switch", "nsw"]),
        entry("Nintendo Game Boy", &["game boy", "gameboy"]),
        entry("Nintendo Game Boy Color", &["game boy color", "gameboy color", "gbc"]),
        entry("Nintendo Game Boy Advance", &["game boy advance", "gameboy advance", "gba"]),
        entry("Nintendo DS", &["nds"]),
        entry("Nintendo 3DS", &["3ds"]),
        // Sega
        entry("Sega Master System", &["master system", "sms"]),
        entry("Sega Genesis", &["genesis", "mega drive", "megadrive"]),
        entry("Sega CD", &["mega cd", "megacd", "mega-cd"]),
        entry("Sega 32X", &["32x"]),
        entry("Sega Saturn", &["saturn"]),
        entry("Sega Dreamcast", &["dreamcast"]),
        entry("Sega Game Gear", &["game gear", "gamegear"]),
        // NEC
        entry("NEC TurboGrafx-16", &["turbografx-16", "turbografx 16", "turbografx16", "pc engine", "pce"]),
        entry("NEC TurboGrafx-CD", &["turbografx-cd", "turbografx cd", "pc engine cd", "pc-engine cd", "pcecd", "pce-cd"]),
        // SNK
        entry("SNK Neo Geo", &["neo geo", "neogeo"]),
        entry("SNK Neo Geo CD", &["neo geo cd", "neogeo cd", "neogeocd", "ngcd"]),
        // Others
        entry("Philips CD-i", &["cd-i", "cdi"]),
        entry("Panasonic 3DO", &["3do"]),
        entry("Atari 2600", &[]),
        entry("Arcade", &["mame"]),
    ]
}
