use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for ringflow")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, deny, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Run cargo deny check
    Deny,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Launch the desktop demo
    Run {
        /// Extra arguments passed to ringflow-desktop
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
}

/// One cargo invocation run by a task.
struct Step {
    banner: &'static str,
    args: &'static [&'static str],
}

const FMT: Step = Step {
    banner: "cargo fmt --check",
    args: &["fmt", "--all", "--", "--check"],
};
const CLIPPY: Step = Step {
    banner: "cargo clippy",
    args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
};
const TEST: Step = Step {
    banner: "cargo test",
    args: &["test", "--workspace"],
};
const DENY: Step = Step {
    banner: "cargo deny check (licenses bans sources)",
    args: &["deny", "check", "licenses", "bans", "sources"],
};
const DOC: Step = Step {
    banner: "cargo doc",
    args: &["doc", "--workspace", "--no-deps"],
};
const BUILD: Step = Step {
    banner: "cargo build",
    args: &["build", "--workspace"],
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [&FMT, &CLIPPY, &TEST, &DENY, &DOC] {
                run(step.banner, step.args.iter().copied())?;
            }
        }
        Commands::Fmt => run(FMT.banner, FMT.args.iter().copied())?,
        Commands::Clippy => run(CLIPPY.banner, CLIPPY.args.iter().copied())?,
        Commands::Test => run(TEST.banner, TEST.args.iter().copied())?,
        Commands::Deny => run(DENY.banner, DENY.args.iter().copied())?,
        Commands::Doc => run(DOC.banner, DOC.args.iter().copied())?,
        Commands::Build => run(BUILD.banner, BUILD.args.iter().copied())?,
        Commands::Run { args } => {
            let base = ["run", "-p", "ringflow-desktop", "--"];
            run(
                "cargo run -p ringflow-desktop",
                base.into_iter().chain(args.iter().map(String::as_str)),
            )?;
        }
    }

    Ok(())
}

fn run<'a>(banner: &str, args: impl IntoIterator<Item = &'a str>) -> Result<()> {
    println!("==> Running {banner}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{banner} failed");
    }
    Ok(())
}
