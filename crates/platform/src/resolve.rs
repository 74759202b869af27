use crate::entry::PlatformEntry;
use crate::table::PlatformTable;
use crate::{UNKNOWN, XBOX_360};
use std::path::Path;

/// Tokens that mean "Xbox 360" no matter what else the path contains. The
/// shorter `xbox` term would otherwise be a candidate for the same segment.
const XBOX_360_TOKENS: [&str; 5] = ["xbox 360", "xbox360", "xbox_360", "xbox-360", "x360"];
const DIGIT_BONUS: usize = 10;
const BOUNDARY_BONUS: usize = 5;
/// Terms this short only count when they stand alone as a word.
const SHORT_TERM: usize = 4;

/// The winning term for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'a> {
    pub platform: &'a str,
    pub term: String,
    pub weight: usize,
}

/// Infers a platform label from a filesystem path.
///
/// Every term of every [`PlatformEntry`] is searched for as a substring of
/// the normalized path, and each hit is weighted:
///
/// - the term's length,
/// - plus 10 if both the platform name and the term contain a digit,
/// - plus 5 if the hit spans a whole path segment (bounded by the start or
///   end of the path, `/`, `_`, or a file extension's `.`).
///
/// Terms of four characters or fewer (`nes`, `gcn`, `vita`) are ignored when
/// they sit inside a longer word, so `/home/jones` never reads as NES.
///
/// The heaviest hit wins; ties go to whichever platform comes first in the
/// [`PlatformTable`]. A path that mentions an Xbox 360 token is resolved to
/// [`XBOX_360`] before any weighting happens.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: PlatformTable,
    terms: Vec<Vec<String>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(PlatformTable::default())
    }
}

impl Resolver {
    pub fn new(table: PlatformTable) -> Self {
        let terms = table.iter().map(PlatformEntry::terms).collect();
        Self { table, terms }
    }

    pub fn table(&self) -> &PlatformTable {
        &self.table
    }

    /// Resolve a path to a platform label, or [`UNKNOWN`].
    pub fn resolve(&self, path: impl AsRef<Path>) -> &str {
        self.best_match(path).map(|m| m.platform).unwrap_or(UNKNOWN)
    }

    /// Like [`resolve`](Self::resolve) but also reports which term won and
    /// with what weight.
    pub fn best_match(&self, path: impl AsRef<Path>) -> Option<Match<'_>> {
        let normalized = normalize(&path.as_ref().to_string_lossy());
        if normalized.is_empty() {
            return None;
        }
        if let Some(token) = XBOX_360_TOKENS.iter().find(|t| normalized.contains(*t)) {
            return Some(Match { platform: XBOX_360, term: (*token).to_string(), weight: usize::MAX });
        }

        let mut best: Option<Match<'_>> = None;
        for (entry, terms) in self.table.iter().zip(&self.terms) {
            for term in terms {
                let Some(weight) = weigh(&normalized, term, entry.has_digit()) else {
                    continue;
                };
                if best.as_ref().is_none_or(|b| weight > b.weight) {
                    best = Some(Match { platform: &entry.name, term: term.clone(), weight });
                }
            }
        }
        if let Some(m) = &best {
            tracing::trace!(platform = m.platform, term = %m.term, weight = m.weight, path = %normalized, "Resolved platform");
        }
        best
    }
}

/// Lowercase, use `/` as the only separator, and collapse repeated or
/// trailing separators.
fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.trim().chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.extend(c.to_lowercase());
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// The heaviest weight of any occurrence of `term` in `path`.
fn weigh(path: &str, term: &str, platform_has_digit: bool) -> Option<usize> {
    let length = term.chars().count();
    let base = length + if platform_has_digit && term.chars().any(|c| c.is_ascii_digit()) { DIGIT_BONUS } else { 0 };
    path.match_indices(term)
        .filter(|(start, _)| length > SHORT_TERM || is_word(path, *start, start + term.len()))
        .map(|(start, _)| base + if on_boundary(path, start, start + term.len()) { BOUNDARY_BONUS } else { 0 })
        .max()
}

fn on_boundary(path: &str, start: usize, end: usize) -> bool {
    let before = path[..start].chars().next_back();
    let after = path[end..].chars().next();
    matches!(before, None | Some('/' | '_')) && matches!(after, None | Some('/' | '_' | '.'))
}

fn is_word(path: &str, start: usize, end: usize) -> bool {
    let before = path[..start].chars().next_back();
    let after = path[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/roms/Xbox 360/game.iso", "Microsoft Xbox 360")]
    #[case("/roms/xbox360/game.iso", "Microsoft Xbox 360")]
    #[case("D:\\Games\\X360\\Halo 3.iso", "Microsoft Xbox 360")]
    #[case("/roms/Xbox/Halo.iso", "Microsoft Xbox")]
    #[case("/roms/Playstation 2/game.iso", "Sony Playstation 2")]
    #[case("/roms/Sony Playstation 2/Gran Turismo 4.bin", "Sony Playstation 2")]
    #[case("/roms/playstation2/game.iso", "Sony Playstation 2")]
    #[case("/roms/ps2/game.iso", "Sony Playstation 2")]
    #[case("/roms/Playstation/game.cue", "Sony Playstation")]
    #[case("/roms/psx/Crash Bandicoot.chd", "Sony Playstation")]
    #[case("/roms/PC Engine CD/Ys.cue", "NEC TurboGrafx-CD")]
    #[case("/roms/PC Engine/Bonk.pce", "NEC TurboGrafx-16")]
    #[case("/roms/Neo Geo CD/Metal Slug.chd", "SNK Neo Geo CD")]
    #[case("/roms/Game Boy Color/Zelda.gbc", "Nintendo Game Boy Color")]
    #[case("/roms/Nintendo Switch/Zelda.nsp", "Nintendo Switch")]
    #[case("/roms/genesis/Sonic.md", "Sega Genesis")]
    #[case("/roms/Wii U/game.wud", "Nintendo Wii U")]
    #[case("/roms/wii/game.iso", "Nintendo Wii")]
    #[case("/roms/3do/Road Rash.iso", "Panasonic 3DO")]
    #[case("/random/unrecognized/path/file.bin", "Unknown")]
    #[case("", "Unknown")]
    #[case("/home/jones/roms/misc/x.bin", "Unknown")]
    #[case("/srv/phones/backup/lines.txt", "Unknown")]
    #[case("/roms/vitality/game.iso", "Unknown")]
    #[case("/roms/nes/x.nes", "Nintendo Entertainment System")]
    #[case("/roms/Sony PS2 Games/game.iso", "Sony Playstation 2")]
    #[case("/roms/Vita/game.vpk", "Sony Playstation Vita")]
    fn test_resolve_builtin(#[case] path: &str, #[case] expected: &str) {
        let resolver = Resolver::default();
        assert_eq!(resolver.resolve(path), expected);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let resolver = Resolver::default();
        let path = "/mnt/library/Sega Saturn/Panzer Dragoon (Disc 1).cue";
        assert_eq!(resolver.resolve(path), resolver.resolve(path));
        assert_eq!(resolver.resolve(path), "Sega Saturn");
    }

    #[test]
    fn test_xbox_360_wins_over_xbox_even_when_both_appear() {
        let resolver = Resolver::default();
        assert_eq!(resolver.resolve("/xbox/xbox 360/game.iso"), "Microsoft Xbox 360");
    }

    #[test]
    fn test_boundary_bonus_prefers_whole_segments() {
        let table = PlatformTable::new([
            PlatformEntry::new("Alpha").with_aliases(["abcd"]),
            PlatformEntry::new("Beta").with_aliases(["wxyz"]),
        ]);
        let resolver = Resolver::new(table);
        // Same term length; only `wxyz` sits on a segment boundary.
        let m = resolver.best_match("/roms/xabcdx/wxyz/file.bin").unwrap();
        assert_eq!(m.platform, "Beta");
        assert_eq!(m.weight, 4 + BOUNDARY_BONUS);
    }

    #[test]
    fn test_underscore_counts_as_boundary() {
        let resolver = Resolver::default();
        let m = resolver.best_match("/roms/my_ps2_games/game.iso").unwrap();
        assert_eq!(m.platform, "Sony Playstation 2");
        assert_eq!(m.term, "ps2");
        assert_eq!(m.weight, 3 + DIGIT_BONUS + BOUNDARY_BONUS);
    }

    #[rstest]
    #[case("/agnes/x", None)]
    #[case("/snes-games/x", None)]
    #[case("/nes/x", Some(3 + BOUNDARY_BONUS))]
    #[case("/my nes games/x", Some(3))]
    fn test_short_terms_must_stand_alone(#[case] path: &str, #[case] weight: Option<usize>) {
        let resolver = Resolver::new(PlatformTable::new([PlatformEntry::new("Nintendo").with_aliases(["nes"])]));
        assert_eq!(resolver.best_match(path).map(|m| m.weight), weight);
    }

    #[test]
    fn test_digit_bonus_requires_both_sides() {
        let table = PlatformTable::new([PlatformEntry::new("Console 9").with_aliases(["nine"])]);
        let resolver = Resolver::new(table);
        assert_eq!(resolver.best_match("/nine").unwrap().weight, 4 + BOUNDARY_BONUS);
        assert_eq!(resolver.best_match("/console 9").unwrap().weight, 9 + DIGIT_BONUS + BOUNDARY_BONUS);
    }

    #[test]
    fn test_equal_weight_ties_go_to_table_order() {
        let first = PlatformEntry::new("Aaaa").with_aliases(["shared"]);
        let second = PlatformEntry::new("Bbbb").with_aliases(["shared"]);
        let resolver = Resolver::new(PlatformTable::new([first.clone(), second.clone()]));
        assert_eq!(resolver.resolve("/shared/x"), "Aaaa");
        let resolver = Resolver::new(PlatformTable::new([first, second.with_priority(1)]));
        assert_eq!(resolver.resolve("/shared/x"), "Bbbb");
    }

    #[test]
    fn test_injected_table_only_knows_its_entries() {
        let resolver = Resolver::new(PlatformTable::new([PlatformEntry::new("Arcade")]));
        assert_eq!(resolver.resolve("/roms/ps2/game.iso"), UNKNOWN);
        assert_eq!(resolver.resolve("/roms/ARCADE/pacman.zip"), "Arcade");
    }

    #[rstest]
    #[case("C:\\Roms\\\\PS2\\", "c:/roms/ps2")]
    #[case("/roms//ps2/", "/roms/ps2")]
    #[case("/", "/")]
    #[case("  ", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }
}
