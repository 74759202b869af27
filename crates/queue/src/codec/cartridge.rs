//! The cartridge codec (`nsz`): Nintendo Switch NSP to and from NSZ.

use super::{Codec, Outcome, cleanup, run_tool};
use crate::job::{Action, Job};
use crate::process::ExecContext;
use crate::tool::Tool;
use std::ffi::OsStr;

#[derive(Debug, Clone)]
pub struct CartridgeCodec {
    tool: Tool,
}

impl CartridgeCodec {
    pub fn new(tool: Tool) -> Self {
        Self { tool }
    }
}

impl Codec for CartridgeCodec {
    fn name(&self) -> &'static str {
        "nsz"
    }

    fn execute(&self, job: &Job, ctx: &ExecContext<'_>) -> Outcome {
        let path = job.path.as_path();
        let (flag, verb) = match (job.action, job.extension().as_str()) {
            (Action::Compress, ".nsp") => ("-C", "compressing"),
            (Action::Uncompress, ".nsz") => ("-D", "decompressing"),
            _ => {
                let reason = format!("Unsupported action or file type for: {}", path.display());
                ctx.status(&reason);
                return Outcome::Skipped(reason);
            },
        };
        match job.action {
            Action::Compress => ctx.status(format!("Compressing NSP: {}", path.display())),
            Action::Uncompress => ctx.status(format!("Decompressing NSZ: {}", path.display())),
        }
        let outcome = run_tool(ctx, &self.tool, [OsStr::new(flag), path.as_os_str()]);
        match &outcome {
            Outcome::Succeeded => ctx.status(format!("Nintendo Switch queue processed: {}", job.action)),
            Outcome::Failed(failure) => ctx.status(format!("Error {verb} {}: {failure}", path.display())),
            _ => {},
        }
        cleanup(ctx, path, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Failure;
    use crate::codec::testing::Harness;
    use rstest::rstest;
    use std::path::PathBuf;

    fn codec() -> CartridgeCodec {
        CartridgeCodec::new(Tool::nsz(Some(PathBuf::from("/definitely/not/nsz"))))
    }

    #[rstest]
    #[case(Action::Compress, "/roms/switch/Zelda.nsz")]
    #[case(Action::Uncompress, "/roms/switch/Zelda.nsp")]
    #[case(Action::Compress, "/roms/switch/Zelda.xci")]
    fn test_unsupported_combinations_are_skipped(#[case] action: Action, #[case] path: &str) {
        let harness = Harness::new(false);
        let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
        let outcome = codec().execute(&Job::new(action, "Nintendo Switch", path), &ctx);
        assert_eq!(outcome, Outcome::Skipped(format!("Unsupported action or file type for: {path}")));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let harness = Harness::new(false);
        let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
        let outcome = codec().execute(&Job::new(Action::Compress, "Nintendo Switch", "/roms/Zelda.NSP"), &ctx);
        // Routed to the tool, which is missing.
        assert_eq!(outcome, Outcome::Failed(Failure::Setup("nsz not found".to_string())));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use crate::codec::testing::fake_tool;
        use tempfile::TempDir;

        #[rstest]
        #[case(Action::Compress, "Zelda.nsp", "-C")]
        #[case(Action::Uncompress, "Zelda.nsz", "-D")]
        fn test_invokes_nsz(#[case] action: Action, #[case] name: &str, #[case] flag: &str) {
            let dir = TempDir::new().unwrap();
            let source = dir.path().join(name);
            std::fs::write(&source, b"").unwrap();
            let codec = CartridgeCodec::new(Tool::nsz(Some(fake_tool(dir.path(), "nsz", 0))));
            let harness = Harness::new(true);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            assert_eq!(codec.execute(&Job::new(action, "Nintendo Switch", &source), &ctx), Outcome::Succeeded);
            let lines = harness.lines();
            let args: Vec<_> = lines.iter().filter_map(|l| l.strip_prefix("arg: ")).collect();
            assert_eq!(args, vec![flag, source.to_str().unwrap()]);
            assert!(!source.exists());
        }

        #[test]
        fn test_failure_reports_code() {
            let dir = TempDir::new().unwrap();
            let source = dir.path().join("Zelda.nsp");
            std::fs::write(&source, b"").unwrap();
            let codec = CartridgeCodec::new(Tool::nsz(Some(fake_tool(dir.path(), "nsz", 1))));
            let harness = Harness::new(true);
            let ctx = ExecContext::new(&harness.observer, &harness.control, &harness.options);
            let outcome = codec.execute(&Job::new(Action::Compress, "Nintendo Switch", &source), &ctx);
            assert_eq!(outcome, Outcome::Failed(Failure::ExitCode(1)));
            assert!(source.exists());
            assert!(harness.lines().contains(&format!("Error compressing {}: exit code 1", source.display())));
        }
    }
}
