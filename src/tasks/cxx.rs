use anyhow::{bail, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};

use super::cmake::{cmake_build, configure};
use super::TaskContext;
use crate::exec::CommandBuilder;
use crate::state::MarkerStore;

/// Compile-command database emitted by the configure step
pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

/// Files considered C/C++ sources for clang-tidy-delta
pub const CPP_SOURCE_FILE_PATTERNS: &[&str] = &["*.cpp", "*.hpp", "*.h", "*.c", "*.cxx", "*.hxx"];

/// Options every cppcheck run gets before the profile options
const CPPCHECK_BASE_OPTIONS: &[&str] = &["-i", "lib", "-i", "tests", "--enable=all", "--xml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Html,
    Xml,
}

#[derive(Debug, Clone, Default)]
pub struct CppcheckOptions {
    pub path: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Default)]
pub struct HtmlReportOptions {
    pub report_xml: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub title: Option<String>,
    pub source_dir: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClangTidyOptions {
    pub path: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub checks: Option<String>,
}

fn analysis_build_dir(ctx: &TaskContext, explicit: Option<&PathBuf>) -> PathBuf {
    explicit
        .cloned()
        .unwrap_or_else(|| PathBuf::from(&ctx.config.analysis.build_dir))
}

fn resolve_report_dir(ctx: &TaskContext, explicit: Option<&PathBuf>) -> PathBuf {
    explicit
        .cloned()
        .unwrap_or_else(|| PathBuf::from(&ctx.config.cppcheck.report_dir))
}

/// Source tree for the analysis build dir, made absolute because cmake
/// runs inside the build dir, which may be nested at any depth
fn analysis_source_dir(ctx: &TaskContext) -> Result<PathBuf> {
    let source_dir = Path::new(&ctx.config.analysis.source_dir);
    if source_dir.is_absolute() {
        return Ok(source_dir.to_path_buf());
    }

    let cwd = std::env::current_dir()?;
    Ok(if source_dir == Path::new(".") {
        cwd
    } else {
        cwd.join(source_dir)
    })
}

/// Make sure `build_dir` has a compile-command database.
///
/// If it is missing, the build directory is reconfigured once from the
/// analysis source dir with `CMAKE_EXPORT_COMPILE_COMMANDS=ON` and rebuilt.
pub fn ensure_compile_commands(ctx: &TaskContext, build_dir: &Path) -> Result<PathBuf> {
    let database = build_dir.join(COMPILE_COMMANDS_FILE);
    if database.exists() {
        return Ok(database);
    }

    tracing::warn!(file = %database.display(), "MISSING COMPILE-DATABASE: REBUILD");
    let source_dir = analysis_source_dir(ctx)?;
    let generator = ctx.resolve_generator(None, MarkerStore::load(build_dir).as_ref());
    configure(
        ctx,
        &source_dir,
        build_dir,
        &generator,
        &["-DCMAKE_EXPORT_COMPILE_COMMANDS=ON".to_string()],
    )?;
    cmake_build(ctx, build_dir, &[])?;

    if !database.exists() {
        bail!("Compile-command database still missing: {}", database.display());
    }
    Ok(database)
}

/// Apply the cppcheck static analyzer to a CMake project
pub fn cppcheck(ctx: &TaskContext, opts: &CppcheckOptions) -> Result<()> {
    let build_dir = analysis_build_dir(ctx, opts.build_dir.as_ref());
    let report_dir = resolve_report_dir(ctx, opts.report_dir.as_ref());
    let report_xml = report_dir.join("report.xml");

    let database = ensure_compile_commands(ctx, &build_dir)?;
    crate::fs::ensure_dir(&report_dir)?;

    let topdir = std::env::current_dir()?;
    let cmd = CommandBuilder::new("cppcheck")
        .arg(format!("--project={}", database.display()))
        .args(CPPCHECK_BASE_OPTIONS.iter().copied())
        .arg(format!("--relative-paths={}", topdir.display()))
        .args(ctx.config.cppcheck.active_options().iter().cloned())
        .arg(format!("--output-file={}", report_xml.display()))
        .arg(opts.path.as_deref().unwrap_or("."));
    ctx.runner.run(&cmd)?;
    tracing::info!(report = %report_xml.display(), "REPORT WRITTEN");

    if opts.format == ReportFormat::Html {
        cppcheck_html(
            ctx,
            &HtmlReportOptions {
                report_xml: Some(report_xml),
                report_dir: Some(report_dir),
                ..HtmlReportOptions::default()
            },
        )?;
    }

    Ok(())
}

/// Generate the cppcheck HTML report from a previous XML report
pub fn cppcheck_html(ctx: &TaskContext, opts: &HtmlReportOptions) -> Result<()> {
    let report_dir = resolve_report_dir(ctx, opts.report_dir.as_ref());
    let report_xml = opts
        .report_xml
        .clone()
        .unwrap_or_else(|| report_dir.join("report.xml"));

    if !report_dir.is_dir() {
        tracing::warn!(report_dir = %report_dir.display(), "MISSING-DIRECTORY");
    }
    if !report_xml.exists() {
        tracing::warn!(report_xml = %report_xml.display(), "MISSING-REPORT");
    }
    crate::fs::ensure_dir(&report_dir)?;

    let title = match &opts.title {
        Some(title) => title.clone(),
        None => default_title()?,
    };

    let cmd = CommandBuilder::new("cppcheck-htmlreport")
        .arg(format!("--title={}", title))
        .arg(format!("--file={}", report_xml.display()))
        .arg(format!("--report-dir={}", report_dir.display()))
        .arg(format!("--source-dir={}", opts.source_dir.as_deref().unwrap_or(".")));
    ctx.runner.run(&cmd)?;

    tracing::info!(report = %report_dir.join("index.html").display(), "HTML-REPORT WRITTEN");
    Ok(())
}

/// Name of the current directory
fn default_title() -> Result<String> {
    let cwd = std::env::current_dir()?;
    Ok(cwd
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "cppcheck".to_string()))
}

/// Apply clang-tidy (via run-clang-tidy) to a source scope
pub fn clang_tidy(ctx: &TaskContext, opts: &ClangTidyOptions) -> Result<()> {
    let paths = [opts.path.clone().unwrap_or_else(|| ".".to_string())];
    run_clang_tidy(ctx, opts, &paths)
}

fn run_clang_tidy(ctx: &TaskContext, opts: &ClangTidyOptions, paths: &[String]) -> Result<()> {
    let build_dir = analysis_build_dir(ctx, opts.build_dir.as_ref());

    let mut cmd = CommandBuilder::new(ctx.config.clang_tidy.program.as_str());
    if let Some(checks) = &opts.checks {
        cmd = cmd.arg(format!("-checks={}", checks));
    }
    let cmd = cmd
        .arg("-p")
        .arg(build_dir.to_string_lossy())
        .args(paths.iter().cloned());

    ctx.runner.run(&cmd)
}

/// C/C++ files reported as modified by `git diff --name-only`
pub fn select_modified_files(
    ctx: &TaskContext,
    path: Option<&str>,
    file_patterns: &[&str],
) -> Result<Vec<String>> {
    let patterns = file_patterns
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let cmd = CommandBuilder::git("diff")
        .arg("--name-only")
        .arg(path.unwrap_or("."))
        .env("GIT_PAGER", "cat");
    let result = ctx.runner.capture(&cmd)?;
    if !result.success {
        bail!(
            "git diff failed with exit code {}: {}",
            result.exit_code,
            result.stderr.trim()
        );
    }

    Ok(filter_source_files(&result.stdout, &patterns))
}

fn filter_source_files(listing: &str, patterns: &[Pattern]) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| match patterns.iter().find(|p| p.matches(name)) {
            Some(pattern) => {
                tracing::debug!(file = name, pattern = pattern.as_str(), "MATCHED");
                true
            }
            None => false,
        })
        .map(str::to_string)
        .collect()
}

/// Apply clang-tidy to modified source files only
pub fn clang_tidy_delta(ctx: &TaskContext, opts: &ClangTidyOptions) -> Result<Vec<String>> {
    let files = select_modified_files(ctx, opts.path.as_deref(), CPP_SOURCE_FILE_PATTERNS)?;

    for file in &files {
        tracing::info!(file = file.as_str(), "CLANG-TIDY");
    }
    tracing::info!("{} modified file(s)", files.len());

    if !files.is_empty() {
        run_clang_tidy(ctx, opts, &files)?;
    }

    Ok(files)
}
