// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use mdindex::{
    config::{IndexConfig, CONFIG_FILE_NAME},
    fs::DiskFs,
    index,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::{fs::read_to_string, path::PathBuf, process::exit};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keep an index document in sync with the markdown files of a repository.
#[derive(Debug, Clone, Parser)]
#[command(about, override_usage = "mdindex [options]", version)]
struct Cli {
    /// Repository root to scan.
    #[arg(short = 'C', long, value_name = "path", default_value = ".")]
    pub root: PathBuf,

    /// Index document to generate, relative to repository root.
    #[arg(short = 'o', long, value_name = "path")]
    pub index: Option<PathBuf>,

    /// Glob of relative paths to leave out of the index.
    #[arg(short, long = "ignore", value_name = "glob")]
    pub ignore: Vec<String>,

    /// Configuration file to use instead of <root>/mdindex.toml.
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Prefix to prepend to every link target.
    #[arg(long, value_name = "url")]
    pub link_prefix: Option<String>,

    /// Honor .gitignore rules while scanning.
    #[arg(long)]
    pub gitignore: bool,

    /// Do not write, fail if the index document is out of date.
    #[arg(long, group = "mode")]
    pub check: bool,

    /// Print rendered index document instead of writing it.
    #[arg(long, group = "mode")]
    pub stdout: bool,
}

impl Cli {
    fn run(self) -> Result<()> {
        let check = self.check;
        let stdout = self.stdout;
        let config = self.into_config()?;
        debug!("effective configuration:\n{config}");

        let fs = DiskFs::new();
        let index_path = config.index_path();
        if stdout {
            print!("{}", index::generate(&fs, &config)?);
        } else if check {
            if index::check(&fs, &config)? {
                bail!("index document {:?} is out of date", index_path.display());
            }
            info!("{:?} is up to date", index_path.display());
        } else if !index::update(&fs, &config)? {
            info!("{:?} unchanged", index_path.display());
        }

        Ok(())
    }

    /// Layer command line options over configuration file.
    fn into_config(self) -> Result<IndexConfig> {
        let path = match self.config {
            Some(path) => Some(path),
            None => {
                let path = self.root.join(CONFIG_FILE_NAME);
                path.is_file().then_some(path)
            }
        };

        let mut config = match path {
            Some(path) => {
                let data = read_to_string(&path)
                    .with_context(|| format!("failed to read config file {:?}", path.display()))?;
                data.parse::<IndexConfig>()
                    .with_context(|| format!("invalid config file {:?}", path.display()))?
            }
            None => IndexConfig::default(),
        };

        config.root = self.root;
        if let Some(index) = self.index {
            config.index = index;
        }
        if let Some(prefix) = self.link_prefix {
            config.link_prefix = Some(prefix);
        }
        config.ignore.extend(self.ignore);
        config.respect_gitignore |= self.gitignore;

        Ok(config)
    }
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}
