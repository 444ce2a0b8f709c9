use anyhow::{Context, Result};
use std::path::Path;

use super::TaskContext;
use crate::cmake::{Decision, Generator};
use crate::exec::CommandBuilder;
use crate::projects::{self, Project};
use crate::state::{BuildState, MarkerStore};

/// Options shared by the composed cmake tasks
#[derive(Debug, Clone, Default)]
pub struct CmakeOptions {
    /// Explicit generator override
    pub generator: Option<Generator>,
    /// Extra arguments for the configure step
    pub init_args: Vec<String>,
    /// Extra arguments for the native build tool (after `--`)
    pub build_args: Vec<String>,
    /// Extra arguments for ctest
    pub test_args: Vec<String>,
    pub dry_run: bool,
}

// ============================================================================
// Primitive steps
// ============================================================================

/// Configure a build directory with `generator` and record the generator.
///
/// cmake runs inside `build_dir`, so a relative `source_dir` is resolved
/// from there. The marker is only written if cmake succeeds.
pub fn configure(
    ctx: &TaskContext,
    source_dir: &Path,
    build_dir: &Path,
    generator: &Generator,
    args: &[String],
) -> Result<()> {
    crate::fs::ensure_dir(build_dir)?;

    tracing::info!(
        build_dir = %build_dir.display(),
        generator = %generator,
        "CMAKE-INIT"
    );

    let cmd = CommandBuilder::cmake()
        .arg("-G")
        .arg(generator.cmake_name())
        .args(args.iter().cloned())
        .arg(source_dir.to_string_lossy())
        .working_dir(build_dir);
    ctx.runner.run(&cmd)?;

    MarkerStore::store(build_dir, generator)
        .with_context(|| format!("Failed to record generator for {}", build_dir.display()))
}

/// `cmake --build . [-- <args>]` inside the build directory
pub fn cmake_build(ctx: &TaskContext, build_dir: &Path, args: &[String]) -> Result<()> {
    crate::fs::ensure_dir(build_dir)?;
    tracing::info!(build_dir = %build_dir.display(), "CMAKE-BUILD");

    let mut cmd = CommandBuilder::cmake().arg("--build").arg(".");
    if !args.is_empty() {
        cmd = cmd.arg("--").args(args.iter().cloned());
    }
    ctx.runner.run(&cmd.working_dir(build_dir))
}

/// `ctest [<args>]` inside the build directory
pub fn cmake_test(ctx: &TaskContext, build_dir: &Path, args: &[String]) -> Result<()> {
    crate::fs::ensure_dir(build_dir)?;
    tracing::info!(build_dir = %build_dir.display(), "CMAKE-TEST");

    let cmd = CommandBuilder::ctest()
        .args(args.iter().cloned())
        .working_dir(build_dir);
    ctx.runner.run(&cmd)
}

/// Remove a build directory; missing directories are fine
pub fn cleanup(build_dir: &Path, dry_run: bool) -> Result<()> {
    crate::fs::remove_dir_tree(build_dir, dry_run)?;
    Ok(())
}

/// Bring a build directory in line with the requested generator.
///
/// Reuses it when the stored generator matches, replaces it when it differs,
/// configures it fresh when nothing is stored. Project build directories are
/// direct children of the project, so the source dir is `..`.
pub fn ensure_init(
    ctx: &TaskContext,
    build_dir: &Path,
    generator: Option<&Generator>,
    init_args: &[String],
) -> Result<Decision> {
    let state = BuildState::inspect(build_dir);
    let requested = ctx.resolve_generator(generator, state.stored_generator.as_ref());
    let decision = state.decide(&requested);
    let source_dir = Path::new("..");

    match &decision {
        Decision::Skip => {
            tracing::info!(
                build_dir = %build_dir.display(),
                generator = %requested,
                "CMAKE-INIT: directory exists already (SKIPPED)"
            );
        }
        Decision::Reinit { previous } => {
            tracing::info!(
                build_dir = %build_dir.display(),
                generator = %requested,
                was = %previous,
                "CMAKE-REINIT"
            );
            // The old tree stays aside until the new generator has configured,
            // so its marker and CMakeCache come back together on failure
            let aside = crate::fs::move_aside(build_dir)?;

            if let Err(err) = configure(ctx, source_dir, build_dir, &requested, init_args) {
                if let Err(restore_err) = crate::fs::restore_aside(&aside, build_dir) {
                    tracing::warn!(
                        error = %restore_err,
                        aside = %aside.display(),
                        "failed to restore previous build directory"
                    );
                }
                return Err(err);
            }
            crate::fs::remove_dir_tree(&aside, false)?;
        }
        Decision::Init => {
            configure(ctx, source_dir, build_dir, &requested, init_args)?;
        }
    }

    Ok(decision)
}

// ============================================================================
// Tasks
// ============================================================================

fn selected(ctx: &TaskContext, project: Option<&str>) -> Result<Vec<Project>> {
    projects::select_projects(project, &ctx.config.cmake)
}

/// Initialize one or all cmake projects
pub fn init(ctx: &TaskContext, project: Option<&str>, opts: &CmakeOptions) -> Result<()> {
    for project in selected(ctx, project)? {
        ensure_init(ctx, &project.build_dir(), opts.generator.as_ref(), &opts.init_args)?;
    }
    Ok(())
}

/// Build one or all cmake projects (initializing them first if needed)
pub fn build(ctx: &TaskContext, project: Option<&str>, opts: &CmakeOptions) -> Result<()> {
    for project in selected(ctx, project)? {
        let build_dir = project.build_dir();
        ensure_init(ctx, &build_dir, opts.generator.as_ref(), &opts.init_args)?;
        cmake_build(ctx, &build_dir, &opts.build_args)?;
    }
    Ok(())
}

/// Test one or all cmake projects (initializing them first if needed)
pub fn test(ctx: &TaskContext, project: Option<&str>, opts: &CmakeOptions) -> Result<()> {
    for project in selected(ctx, project)? {
        let build_dir = project.build_dir();
        ensure_init(ctx, &build_dir, opts.generator.as_ref(), &opts.init_args)?;
        cmake_test(ctx, &build_dir, &opts.test_args)?;
    }
    Ok(())
}

/// Remove the build directories of one or all cmake projects
pub fn clean(ctx: &TaskContext, project: Option<&str>, dry_run: bool) -> Result<()> {
    for project in selected(ctx, project)? {
        cleanup(&project.build_dir(), dry_run)?;
    }
    Ok(())
}

/// Clean, then initialize
pub fn reinit(ctx: &TaskContext, project: Option<&str>, opts: &CmakeOptions) -> Result<()> {
    clean(ctx, project, opts.dry_run)?;
    init(ctx, project, opts)
}

/// Build the native `clean` target, then build again
pub fn rebuild(ctx: &TaskContext, project: Option<&str>, opts: &CmakeOptions) -> Result<()> {
    let clean_opts = CmakeOptions {
        build_args: vec!["clean".to_string()],
        ..opts.clone()
    };
    build(ctx, project, &clean_opts)?;
    build(ctx, project, opts)
}

/// build + test
pub fn all(ctx: &TaskContext, project: Option<&str>, opts: &CmakeOptions) -> Result<()> {
    build(ctx, project, opts)?;
    test(ctx, project, opts)
}

/// reinit + build + test
pub fn redo_all(ctx: &TaskContext, project: Option<&str>, opts: &CmakeOptions) -> Result<()> {
    reinit(ctx, project, opts)?;
    build(ctx, project, opts)?;
    test(ctx, project, opts)
}
