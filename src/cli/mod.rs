use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::cmake::Generator;
use crate::config::Config;
use crate::exec::SystemRunner;
use crate::tasks::cmake::{self, CmakeOptions};
use crate::tasks::cxx::{self, ClangTidyOptions, CppcheckOptions, HtmlReportOptions, ReportFormat};
use crate::tasks::TaskContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "Task runner for CMake-based C/C++ projects", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ./cxtask.toml, then ~/.config/cxtask/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Project scope and generator override
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Project directory, or "all" for every configured project
    #[arg(default_value = "all")]
    pub project: String,

    /// CMake generator (e.g. make, ninja, or a full CMake generator name)
    #[arg(short, long)]
    pub generator: Option<Generator>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Extra arguments for the native build tool
    #[arg(long, allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Extra arguments for the configure step
    #[arg(long, allow_hyphen_values = true)]
    pub init_args: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize one or all cmake projects
    Init {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Extra arguments for the configure step
        #[arg(long, allow_hyphen_values = true)]
        args: Option<String>,
    },

    /// Build one or all cmake projects
    Build(BuildArgs),

    /// Test one or all cmake projects
    #[command(alias = "ctest")]
    Test {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Extra arguments for ctest
        #[arg(long, allow_hyphen_values = true)]
        args: Option<String>,

        /// Extra arguments for the configure step
        #[arg(long, allow_hyphen_values = true)]
        init_args: Option<String>,
    },

    /// Remove the build directories of one or all cmake projects
    Clean {
        /// Project directory, or "all" for every configured project
        #[arg(default_value = "all")]
        project: String,

        /// Only show what would be removed
        #[arg(long)]
        dry_run: bool,
    },

    /// Clean, then initialize
    Reinit {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Extra arguments for the configure step
        #[arg(long, allow_hyphen_values = true)]
        args: Option<String>,

        /// Only show what would be removed
        #[arg(long)]
        dry_run: bool,
    },

    /// Build the clean target, then build again
    Rebuild(BuildArgs),

    /// Build and test
    All {
        #[command(flatten)]
        build: BuildArgs,

        /// Extra arguments for ctest
        #[arg(long, allow_hyphen_values = true)]
        test_args: Option<String>,
    },

    /// Reinit, build and test
    #[command(alias = "redo_all")]
    RedoAll {
        #[command(flatten)]
        build: BuildArgs,

        /// Extra arguments for ctest
        #[arg(long, allow_hyphen_values = true)]
        test_args: Option<String>,
    },

    /// Apply the cppcheck static analyzer
    Cppcheck {
        /// Path or file to check
        path: Option<String>,

        /// Build directory containing compile_commands.json
        #[arg(long)]
        build_dir: Option<PathBuf>,

        #[arg(long)]
        report_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Html)]
        format: ReportFormat,
    },

    /// Generate the cppcheck HTML report from a previous XML report
    #[command(alias = "cppcheck_html")]
    CppcheckHtml {
        #[arg(long)]
        report_xml: Option<PathBuf>,

        #[arg(long)]
        report_dir: Option<PathBuf>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        source_dir: Option<String>,
    },

    /// Apply clang-tidy to a source scope
    #[command(alias = "clang_tidy")]
    ClangTidy(TidyArgs),

    /// Apply clang-tidy to files modified according to git
    #[command(alias = "clang_tidy_delta")]
    ClangTidyDelta(TidyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TidyArgs {
    /// Path scope to check (normally a directory)
    pub path: Option<String>,

    /// Build directory containing compile_commands.json
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Checks to apply, like 'cert-*'
    #[arg(long)]
    pub checks: Option<String>,
}

impl From<TidyArgs> for ClangTidyOptions {
    fn from(args: TidyArgs) -> Self {
        Self {
            path: args.path,
            build_dir: args.build_dir,
            checks: args.checks,
        }
    }
}

/// Split a whitespace-separated argument string
fn split_args(args: Option<&str>) -> Vec<String> {
    args.map(|a| a.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

impl BuildArgs {
    fn options(&self, test_args: Option<&str>) -> CmakeOptions {
        CmakeOptions {
            generator: self.scope.generator.clone(),
            init_args: split_args(self.init_args.as_deref()),
            build_args: split_args(self.args.as_deref()),
            test_args: split_args(test_args),
            dry_run: false,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref())?;
    match &config.source {
        Some(path) => tracing::debug!(config = %path.display(), "loaded configuration"),
        None => tracing::debug!("using built-in configuration"),
    }

    let runner = SystemRunner;
    let ctx = TaskContext::new(&config.tasks, &runner);
    dispatch(&ctx, cli.command)
}

fn dispatch(ctx: &TaskContext, command: Commands) -> Result<()> {
    match command {
        Commands::Init { scope, args } => {
            let opts = CmakeOptions {
                generator: scope.generator,
                init_args: split_args(args.as_deref()),
                ..CmakeOptions::default()
            };
            cmake::init(ctx, Some(&scope.project), &opts)
        }
        Commands::Build(args) => cmake::build(ctx, Some(&args.scope.project), &args.options(None)),
        Commands::Test {
            scope,
            args,
            init_args,
        } => {
            let opts = CmakeOptions {
                generator: scope.generator,
                init_args: split_args(init_args.as_deref()),
                test_args: split_args(args.as_deref()),
                ..CmakeOptions::default()
            };
            cmake::test(ctx, Some(&scope.project), &opts)
        }
        Commands::Clean { project, dry_run } => cmake::clean(ctx, Some(&project), dry_run),
        Commands::Reinit {
            scope,
            args,
            dry_run,
        } => {
            let opts = CmakeOptions {
                generator: scope.generator,
                init_args: split_args(args.as_deref()),
                dry_run,
                ..CmakeOptions::default()
            };
            cmake::reinit(ctx, Some(&scope.project), &opts)
        }
        Commands::Rebuild(args) => {
            cmake::rebuild(ctx, Some(&args.scope.project), &args.options(None))
        }
        Commands::All { build, test_args } => cmake::all(
            ctx,
            Some(&build.scope.project),
            &build.options(test_args.as_deref()),
        ),
        Commands::RedoAll { build, test_args } => cmake::redo_all(
            ctx,
            Some(&build.scope.project),
            &build.options(test_args.as_deref()),
        ),
        Commands::Cppcheck {
            path,
            build_dir,
            report_dir,
            format,
        } => cxx::cppcheck(
            ctx,
            &CppcheckOptions {
                path,
                build_dir,
                report_dir,
                format,
            },
        ),
        Commands::CppcheckHtml {
            report_xml,
            report_dir,
            title,
            source_dir,
        } => cxx::cppcheck_html(
            ctx,
            &HtmlReportOptions {
                report_xml,
                report_dir,
                title,
                source_dir,
            },
        ),
        Commands::ClangTidy(args) => cxx::clang_tidy(ctx, &args.into()),
        Commands::ClangTidyDelta(args) => {
            let files = cxx::clang_tidy_delta(ctx, &args.into())?;
            println!("{} modified file(s)", files.len());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_project_defaults_to_all() {
        let cli = Cli::parse_from(["cxtask", "init"]);
        match cli.command {
            Commands::Init { scope, args } => {
                assert_eq!(scope.project, "all");
                assert!(scope.generator.is_none());
                assert!(args.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_generator_is_canonicalized() {
        let cli = Cli::parse_from(["cxtask", "build", "demo", "-g", "Ninja", "--args", "-j4 -k"]);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.scope.project, "demo");
                let opts = args.options(None);
                assert_eq!(opts.generator, Some(Generator::new("ninja")));
                assert_eq!(opts.build_args, ["-j4", "-k"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_aliases() {
        assert!(matches!(
            Cli::parse_from(["cxtask", "ctest"]).command,
            Commands::Test { .. }
        ));
        assert!(matches!(
            Cli::parse_from(["cxtask", "redo_all"]).command,
            Commands::RedoAll { .. }
        ));
        assert!(matches!(
            Cli::parse_from(["cxtask", "clang_tidy_delta"]).command,
            Commands::ClangTidyDelta(_)
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cxtask", "clean", "--dry-run", "-vv", "--config", "x.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
        assert!(matches!(cli.command, Commands::Clean { dry_run: true, .. }));
    }

    #[test]
    fn test_split_args() {
        assert!(split_args(None).is_empty());
        assert_eq!(split_args(Some("  -j4   -k ")), ["-j4", "-k"]);
    }
}
