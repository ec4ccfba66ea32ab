//! Purge command implementation
//!
//! Deletes every file and directory under the configured working
//! directory, keeping the directory itself.

use crate::config::load_config;
use crate::core::SessionCleanup;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the purge command
#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Purge this directory instead of the configured one
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl PurgeArgs {
    /// Execute the purge command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let root = match &self.dir {
            Some(dir) => dir.clone(),
            None => match load_config(config_path) {
                Ok(config) => PathBuf::from(config.export.working_directory),
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    return Ok(2);
                }
            },
        };

        tracing::info!(root = %root.display(), "Purging working directory");

        if !self.yes {
            print!("Delete everything under {}? [y/N]: ", root.display());
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Purge cancelled.");
                return Ok(0);
            }
        }

        let purged = tokio::task::spawn_blocking(move || {
            SessionCleanup::default().purge_working_directory(&root)
        })
        .await?;

        if purged {
            println!("✅ Working directory purged");
            Ok(0)
        } else {
            eprintln!("❌ Some entries could not be removed, see the log for details");
            Ok(1)
        }
    }
}
