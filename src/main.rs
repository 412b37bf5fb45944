//! `release-install` CLI entrypoint.
//!
//! Selects one asset from a release, asks for confirmation, then downloads,
//! unwraps and installs the binary it contains.

use std::io::{BufRead, Write};

use camino::{FromPathBufError, Utf8PathBuf};
use clap::Parser;
use release_install::cli::Cli;
use release_install::config::Config;
use release_install::error::Result;
use release_install::extraction::{ContentUnwrapper, DEFAULT_MAX_DEPTH};
use release_install::install_flow::Installer;
use release_install::logging::{init_logging, level_for};
use release_install::output::{
    confirm, confirm_prompt, selection_summary, success_message, write_stderr_line,
};
use release_install::release::ReleaseTag;
use release_install::repository::Repository;
use release_install::sink::FsBinarySink;
use release_install::source::{SourceCatalog, SourceOptions, token_for_host};

fn main() {
    let cli = Cli::parse();
    init_logging(level_for(cli.verbosity, cli.quiet));
    let mut stderr = std::io::stderr();
    let mut stdin = std::io::stdin().lock();
    let run_result = run(&cli, &mut stdin, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, input: &mut dyn BufRead, stderr: &mut dyn Write) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let rules = config.effective_rules(cli.rules()?);
    let repo: Repository = cli.repo.parse()?;
    let tag = ReleaseTag::new(cli.tag.as_str());

    let token = token_for_host(repo.host(), cli.token.as_deref(), |name| {
        std::env::var(name).ok()
    });
    let options = SourceOptions {
        token,
        show_progress: !cli.quiet,
    };
    let source = SourceCatalog::builtin().source_for(&repo, options)?;
    let sink = FsBinarySink::new(install_dir(cli, &config)?);
    let installer = Installer::new(&source, &sink).with_unwrapper(unwrapper_for(cli, &config));

    let selection = installer.find(&tag, &rules)?;
    if !cli.quiet {
        write_stderr_line(stderr, selection_summary(&selection.binary, &selection.artifact));
    }
    if cli.dry_run {
        return Ok(());
    }

    if !cli.yes {
        let prompt = confirm_prompt(&selection.binary, &selection.artifact);
        if !confirm(&prompt, input, stderr)? {
            write_stderr_line(stderr, "Installation cancelled.");
            return Ok(());
        }
    }

    let path = installer.install(&selection)?;
    if !cli.quiet {
        write_stderr_line(stderr, success_message(&selection.binary, &path));
    }
    Ok(())
}

/// `--dir`, else the configured directory, else the current directory.
fn install_dir(cli: &Cli, config: &Config) -> Result<Utf8PathBuf> {
    if let Some(dir) = cli.dir.clone().or_else(|| config.dir.clone()) {
        return Ok(dir);
    }
    let cwd = std::env::current_dir()?;
    let dir = Utf8PathBuf::try_from(cwd).map_err(FromPathBufError::into_io_error)?;
    Ok(dir)
}

fn unwrapper_for(cli: &Cli, config: &Config) -> ContentUnwrapper {
    ContentUnwrapper::new(
        cli.max_depth
            .or(config.max_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH),
    )
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
