use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use vitrina::assets::{AssetResolver, FsOutputDir};
use vitrina::check::Report;
use vitrina::static_check::StaticValidator;
use vitrina::BuildMode;

#[derive(Parser)]
#[command(name = "vitrina", version, about = "Build and validate the static site")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Dev,
    Production,
}

impl From<ModeArg> for BuildMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Dev => BuildMode::Development,
            ModeArg::Production => BuildMode::Production,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render the page and stage its assets into the output directory
    Build {
        #[arg(long, default_value = "dist")]
        out: PathBuf,
        /// Directory holding the asset source files
        #[arg(long, default_value = "public")]
        assets: PathBuf,
        #[arg(long, value_enum, default_value = "production")]
        mode: ModeArg,
    },
    /// Run the static validator against a finished build
    Check {
        #[arg(long, default_value = "dist")]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "production")]
        mode: ModeArg,
    },
}

fn print_report(report: &Report) {
    for group in &report.groups {
        let mark = if group.passed() { "ok" } else { "FAILED" };
        println!("[{}] {}", mark, group.name);
        for check in &group.checks {
            if !check.passed {
                println!(
                    "    {}: expected {}, got {}",
                    check.name, check.expected, check.actual
                );
            }
        }
    }
    println!(
        "{} checks in {} groups, {} failed",
        report.total_checks(),
        report.groups.len(),
        report.failures().len()
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Build { out, assets, mode } => {
            let model = vitrina::data::arturo_soto()?;
            let out_dir = FsOutputDir::create(&out)?;
            let resolver = AssetResolver::new(&assets);
            let html = vitrina::build_site(&model, &resolver, &out_dir, mode.into())?;
            println!(
                "built {} ({} bytes) into {}",
                model.title,
                html.len(),
                out.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { out, mode } => {
            let model = vitrina::data::arturo_soto()?;
            let out_dir = FsOutputDir::new(&out);
            let report = StaticValidator::new(&model, mode.into()).run(&out_dir);
            print_report(&report);
            Ok(if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
