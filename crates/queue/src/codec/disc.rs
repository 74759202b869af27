//! The disc codec (`chdman`): CD images to and from CHD.

use super::cue::synthesize;
use super::{Codec, Failure, Outcome, cleanup, run_tool};
use crate::job::{Action, Job};
use crate::process::ExecContext;
use crate::tool::Tool;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Raw track formats that may have a cue sheet next to them.
const TRACK_EXTENSIONS: [&str; 4] = [".bin", ".img", ".raw", ".wav"];

/// Compresses disc images to CHD and extracts them again.
#[derive(Debug, Clone)]
pub struct DiscCodec {
    tool: Tool,
}

impl DiscCodec {
    pub fn new(tool: Tool) -> Self {
        Self { tool }
    }
}

/// PlayStation 2 discs get BIN+CUE handling where other platforms get ISO.
fn is_ps2(platform: &str) -> bool {
    let platform = platform.to_lowercase();
    platform.contains("playstation 2") || platform == "ps2"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// `createcd`, from a cue sheet, GDI or ISO.
    Cd,
    /// `createraw`, from a bare track.
    Raw,
}

impl Mode {
    fn command(&self) -> &'static str {
        match self {
            Self::Cd => "createcd",
            Self::Raw => "createraw",
        }
    }
}

/// Everything decided about a compress job before anything is written or run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CompressPlan {
    input: PathBuf,
    output: PathBuf,
    mode: Mode,
    /// Status lines explaining the decisions made.
    notes: Vec<String>,
    /// The input is a cue sheet that has to be written first.
    synthesize_cue: bool,
}

/// Decide how to compress `source`. `None` means the file type is not
/// supported. Only looks at the filesystem to find sibling cue sheets.
fn plan_compress(source: &Path, extension: &str, platform: &str) -> Option<CompressPlan> {
    let ps2 = is_ps2(platform);
    let output = source.with_extension("chd");
    let sibling_cue = source.with_extension("cue");
    let plan = |input: PathBuf, mode: Mode, notes: Vec<String>, synthesize_cue: bool| CompressPlan {
        input,
        output: output.clone(),
        mode,
        notes,
        synthesize_cue,
    };
    let plan = match extension {
        ".cue" if ps2 => plan(source.to_path_buf(), Mode::Cd, vec!["Detected PS2 .cue file, using createcd...".to_string()], false),
        ".cue" => plan(source.to_path_buf(), Mode::Cd, Vec::new(), false),
        ".bin" if ps2 => {
            if sibling_cue.is_file() {
                let note = format!("Found matching .cue file for PS2 .bin, using that instead: {}", sibling_cue.display());
                plan(sibling_cue, Mode::Cd, vec![note], false)
            } else {
                let note = "Warning: PS2 .bin file without .cue. Creating .cue file...".to_string();
                plan(sibling_cue, Mode::Cd, vec![note], true)
            }
        },
        ".iso" if ps2 => {
            let notes = vec![
                "Warning: PS2 .iso files might not compress correctly with chdman.".to_string(),
                "Consider converting to .bin/.cue format first.".to_string(),
            ];
            plan(source.to_path_buf(), Mode::Cd, notes, false)
        },
        ".gdi" | ".iso" => plan(source.to_path_buf(), Mode::Cd, Vec::new(), false),
        ext if TRACK_EXTENSIONS.contains(&ext) => {
            if sibling_cue.is_file() {
                let note = format!("Found matching .cue file, using that instead: {}", sibling_cue.display());
                plan(sibling_cue, Mode::Cd, vec![note], false)
            } else {
                let note = "No matching .cue file found, compressing as a raw track with createraw".to_string();
                plan(source.to_path_buf(), Mode::Raw, vec![note], false)
            }
        },
        _ => return None,
    };
    Some(plan)
}

fn args(command: &str, input: &Path, output_flag: &str, output: &Path) -> Vec<OsString> {
    vec![command.into(), "-i".into(), input.into(), output_flag.into(), output.into()]
}

impl DiscCodec {
    fn compress(&self, job: &Job, ctx: &ExecContext<'_>) -> Outcome {
        let source = job.path.as_path();
        let Some(plan) = plan_compress(source, &job.extension(), &job.platform) else {
            let reason = format!("Unsupported file type for CHD: {}", source.display());
            ctx.status(&reason);
            return Outcome::Skipped(reason);
        };
        ctx.status(format!("Compressing to CHD: {} ({}) -> {}", source.display(), job.platform, plan.output.display()));
        for note in &plan.notes {
            ctx.status(note);
        }
        if plan.synthesize_cue {
            match synthesize(source) {
                Ok(cue) => ctx.status(format!("Created cue sheet: {}", cue.display())),
                Err(e) => {
                    let reason = (*e).to_string();
                    ctx.status(format!("Error compressing {} to CHD: {reason}", source.display()));
                    return Outcome::Failed(Failure::Setup(reason));
                },
            }
        }
        let outcome = run_tool(ctx, &self.tool, args(plan.mode.command(), &plan.input, "-o", &plan.output));
        match &outcome {
            Outcome::Succeeded => ctx.status(format!("Compressed {} -> {}", source.display(), plan.output.display())),
            Outcome::Failed(failure) => ctx.status(format!("Error compressing {} to CHD: {failure}", source.display())),
            _ => {},
        }
        outcome
    }

    fn uncompress(&self, job: &Job, ctx: &ExecContext<'_>) -> Outcome {
        let source = job.path.as_path();
        if job.extension() != ".chd" {
            let reason = format!("Unsupported file type for CHD extraction: {}", source.display());
            ctx.status(&reason);
            return Outcome::Skipped(reason);
        }
        let (outputs, args) = if is_ps2(&job.platform) {
            let cue = source.with_extension("cue");
            let bin = source.with_extension("bin");
            ctx.status(format!("Decompressing PS2 CHD: {} -> BIN/CUE format", source.display()));
            let mut args = args("extractcd", source, "-o", &cue);
            args.extend(["-ob".into(), bin.clone().into()]);
            (vec![bin, cue], args)
        } else {
            let iso = source.with_extension("iso");
            ctx.status(format!("Decompressing CHD: {} ({}) -> {}", source.display(), job.platform, iso.display()));
            (vec![iso.clone()], args("extractcd", source, "-o", &iso))
        };
        let outcome = run_tool(ctx, &self.tool, args);
        match &outcome {
            Outcome::Succeeded => verify_outputs(ctx, source, &outputs),
            Outcome::Failed(failure) => ctx.status(format!("Error decompressing {}: {failure}", source.display())),
            _ => {},
        }
        outcome
    }
}

/// Report the size of each extracted file. A missing output after a clean
/// exit is only a warning.
fn verify_outputs(ctx: &ExecContext<'_>, source: &Path, outputs: &[PathBuf]) {
    let sizes: Vec<_> = outputs.iter().map(|o| std::fs::metadata(o).ok().filter(|m| m.is_file()).map(|m| m.len())).collect();
    if sizes.iter().any(Option::is_none) {
        for (output, _) in outputs.iter().zip(&sizes).filter(|(_, size)| size.is_none()) {
            tracing::warn!(path = %output.display(), "Expected output missing after extraction");
            ctx.status(format!("Warning: Output file {} not found after extraction", output.display()));
        }
        return;
    }
    ctx.status(format!("Successfully extracted {}", source.display()));
    for (output, size) in outputs.iter().zip(sizes.into_iter().flatten()) {
        ctx.status(format!("{} (Size: {size} bytes)", output.display()));
    }
}

impl Codec for DiscCodec {
    fn name(&self) -> &'static str {
        "chdman"
    }

    fn execute(&self, job: &Job, ctx: &ExecContext<'_>) -> Outcome {
        let outcome = match job.action {
            Action::Compress => self.compress(job, ctx),
            Action::Uncompress => self.uncompress(job, ctx),
        };
        cleanup(ctx, &job.path, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::testing::Harness;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("Sony Playstation 2", true)]
    #[case("sony playstation 2", true)]
    #[case("PS2", true)]
    #[case("Sony Playstation", false)]
    #[case("ps2 homebrew", false)]
    fn test_is_ps2(#[case] platform: &str, #[case] expected: bool) {
        assert_eq!(is_ps2(platform), expected);
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_plan_cue() {
        let dir = TempDir::new().unwrap();
        let source = touch(&dir, "game.cue");
        let plan = plan_compress(&source, ".cue", "Sega Saturn").unwrap();
        assert_eq!((plan.input, plan.mode, plan.synthesize_cue), (source, Mode::Cd, false));
        assert_eq!(plan.output, dir.path().join("game.chd"));
        assert!(plan.notes.is_empty());
    }

    #[test]
    fn test_plan_ps2_bin_prefers_sibling_cue() {
        let dir = TempDir::new().unwrap();
        let source = touch(&dir, "game.bin");
        let cue = touch(&dir, "game.cue");
        let plan = plan_compress(&source, ".bin", "Sony Playstation 2").unwrap();
        assert_eq!((plan.input, plan.mode, plan.synthesize_cue), (cue, Mode::Cd, false));
    }

    #[test]
    fn test_plan_ps2_bin_without_cue_synthesizes() {
        let dir = TempDir::new().unwrap();
        let source = touch(&dir, "game.bin");
        let plan = plan_compress(&source, ".bin", "Sony Playstation 2").unwrap();
        assert_eq!((plan.input, plan.mode, plan.synthesize_cue), (dir.path().join("game.cue"), Mode::Cd, true));
        // Planning alone writes nothing.
        assert!(!dir.path().join("game.cue").exists());
    }

    #[rstest]
    #[case("track.bin", ".bin")]
    #[case("track.img", ".img")]
    #[case("track.raw", ".raw")]
    #[case("track.wav", ".wav")]
    fn test_plan_other_tracks_fall_back_to_raw(#[case] name: &str, #[case] extension: &str) {
        let dir = TempDir::new().unwrap();
        let source = touch(&dir, name);
        let plan = plan_compress(&source, extension, "Sega CD").unwrap();
        assert_eq!((plan.input, plan.mode, plan.synthesize_cue), (source, Mode::Raw, false));
        assert_eq!(plan.notes.len(), 1);
    }

    #[test]
    fn test_plan_other_tracks_prefer_sibling_cue() {
        let dir = TempDir::new().unwrap();
        let source = touch(&dir, "track.img");
        let cue = touch(&dir, "track.cue");
        let plan = plan_compress(&source, ".img", "Panasonic 3DO").unwrap();
        assert_eq!((plan.input, plan.mode), (cue, Mode::Cd));
    }

    #[test]
    fn test_plan_iso_and_gdi() {
        let dir = TempDir::new().unwrap();
        let iso = touch(&dir, "game.iso");
        let plan = plan_compress(&iso, ".iso", "Sony Playstation 2").unwrap();
        assert_eq!((plan.input.as_path(), plan.mode), (iso.as_path(), Mode::Cd));
        assert!(plan.notes[0].starts_with("Warning: PS2 .iso"));
        let plan = plan_compress(&iso, ".iso", "Sega Dreamcast").unwrap();
        assert!(plan.notes.is_empty());
        let gdi = touch(&dir, "game.gdi");
        assert_eq!(plan_compress(&gdi, ".gdi", "Sega Dreamcast").unwrap().mode, Mode::Cd);
    }

    #[test]
    fn test_plan_unsupported() {
        assert!(plan_compress(Path::new("/roms/game.zip"), ".zip", "Arcade").is_none());
        assert!(plan_compress(Path::new("/roms/game"), "", "Arcade").is_none());
    }

    #[test]
    fn test_uncompress_requires_chd() {
        let harness = Harness::new(false);
        let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
        let codec = DiscCodec::new(Tool::chdman(Some(PathBuf::from("/definitely/not/chdman"))));
        let job = Job::new(Action::Uncompress, "Sega Saturn", "/roms/saturn/game.iso");
        assert!(matches!(codec.execute(&job, &ctx), Outcome::Skipped(_)));
        assert_eq!(harness.lines(), vec!["Unsupported file type for CHD extraction: /roms/saturn/game.iso"]);
    }

    #[test]
    fn test_missing_tool_fails_without_deleting() {
        let dir = TempDir::new().unwrap();
        let source = touch(&dir, "game.cue");
        let harness = Harness::new(true);
        let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
        let codec = DiscCodec::new(Tool::chdman(Some(dir.path().join("no-chdman"))));
        let outcome = codec.execute(&Job::new(Action::Compress, "Sega Saturn", &source), &ctx);
        assert_eq!(outcome, Outcome::Failed(Failure::Setup("chdman not found".to_string())));
        assert!(source.exists());
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use crate::codec::testing::fake_tool;

        fn codec(dir: &TempDir, code: i32) -> DiscCodec {
            DiscCodec::new(Tool::chdman(Some(fake_tool(dir.path(), "chdman", code))))
        }

        #[test]
        fn test_ps2_bin_without_cue_is_archived_from_synthesized_cue() {
            let dir = TempDir::new().unwrap();
            let bin = touch(&dir, "game.bin");
            let harness = Harness::new(false);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            let outcome = codec(&dir, 0).execute(&Job::new(Action::Compress, "Sony Playstation 2", &bin), &ctx);
            assert_eq!(outcome, Outcome::Succeeded);

            let cue = dir.path().join("game.cue");
            let sheet = fs::read_to_string(&cue).unwrap();
            assert_eq!(sheet.lines().map(str::trim).collect::<Vec<_>>(), vec![
                r#"FILE "game.bin" BINARY"#,
                "TRACK 01 MODE2/2352",
                "INDEX 01 00:00:00"
            ]);
            let args: Vec<_> = harness.lines().into_iter().filter_map(|l| l.strip_prefix("arg: ").map(String::from)).collect();
            let chd = dir.path().join("game.chd");
            assert_eq!(args, vec!["createcd", "-i", cue.to_str().unwrap(), "-o", chd.to_str().unwrap()]);
            assert!(!args.contains(&bin.to_str().unwrap().to_string()));
            assert!(bin.exists());
        }

        #[test]
        fn test_raw_track_uses_createraw() {
            let dir = TempDir::new().unwrap();
            let img = touch(&dir, "track.img");
            let harness = Harness::new(false);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            codec(&dir, 0).execute(&Job::new(Action::Compress, "Sega CD", &img), &ctx);
            let lines = harness.lines();
            assert!(lines.contains(&"arg: createraw".to_string()));
            assert!(lines.contains(&format!("arg: {}", img.display())));
        }

        #[test]
        fn test_success_deletes_original_when_asked() {
            let dir = TempDir::new().unwrap();
            let iso = touch(&dir, "game.iso");
            let harness = Harness::new(true);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            let outcome = codec(&dir, 0).execute(&Job::new(Action::Compress, "Sega Dreamcast", &iso), &ctx);
            assert_eq!(outcome, Outcome::Succeeded);
            assert!(!iso.exists());
            assert!(harness.lines().contains(&format!("Deleted original: {}", iso.display())));
        }

        #[test]
        fn test_failed_delete_still_succeeds() {
            use std::os::unix::fs::PermissionsExt;
            let dir = TempDir::new().unwrap();
            let iso = touch(&dir, "game.iso");
            // A tool that consumes its input leaves nothing to delete.
            let tool = dir.path().join("chdman");
            fs::write(&tool, format!("#!/bin/sh\nrm -f '{}'\nexit 0\n", iso.display())).unwrap();
            fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

            let harness = Harness::new(true);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            let codec = DiscCodec::new(Tool::chdman(Some(tool)));
            let outcome = codec.execute(&Job::new(Action::Compress, "Sega Dreamcast", &iso), &ctx);
            assert_eq!(outcome, Outcome::Succeeded);
            let prefix = format!("Could not delete original {}: ", iso.display());
            assert!(harness.lines().iter().any(|l| l.starts_with(&prefix)));
        }

        #[test]
        fn test_failure_keeps_original_and_reports_code() {
            let dir = TempDir::new().unwrap();
            let iso = touch(&dir, "game.iso");
            let harness = Harness::new(true);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            let outcome = codec(&dir, 2).execute(&Job::new(Action::Compress, "Sega Dreamcast", &iso), &ctx);
            assert_eq!(outcome, Outcome::Failed(Failure::ExitCode(2)));
            assert!(iso.exists());
            assert!(harness.lines().contains(&format!("Error compressing {} to CHD: exit code 2", iso.display())));
        }

        #[test]
        fn test_ps2_uncompress_extracts_bin_and_cue() {
            let dir = TempDir::new().unwrap();
            let chd = touch(&dir, "game.chd");
            let harness = Harness::new(false);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            let outcome = codec(&dir, 0).execute(&Job::new(Action::Uncompress, "Sony Playstation 2", &chd), &ctx);
            assert_eq!(outcome, Outcome::Succeeded);
            let lines = harness.lines();
            let args: Vec<_> = lines.iter().filter_map(|l| l.strip_prefix("arg: ")).collect();
            let cue = dir.path().join("game.cue");
            let bin = dir.path().join("game.bin");
            assert_eq!(args, vec![
                "extractcd",
                "-i",
                chd.to_str().unwrap(),
                "-o",
                cue.to_str().unwrap(),
                "-ob",
                bin.to_str().unwrap()
            ]);
            // The fake tool writes nothing, which is only a warning.
            assert!(lines.contains(&format!("Warning: Output file {} not found after extraction", bin.display())));
        }

        #[test]
        fn test_uncompress_reports_output_size() {
            let dir = TempDir::new().unwrap();
            let chd = touch(&dir, "game.chd");
            let iso = touch(&dir, "game.iso");
            let harness = Harness::new(false);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            let outcome = codec(&dir, 0).execute(&Job::new(Action::Uncompress, "Sega Saturn", &chd), &ctx);
            assert_eq!(outcome, Outcome::Succeeded);
            let lines = harness.lines();
            assert!(lines.contains(&format!("arg: {}", iso.display())));
            assert!(lines.contains(&format!("{} (Size: 4 bytes)", iso.display())));
        }
    }
}
