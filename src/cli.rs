// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the build, upload and deploy subcommands and global flags.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stackpack")]
#[command(about = "Package a git tree, publish it to S3 and deploy it to an OpsWorks stack")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only final results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to stackpack.yml in the current directory)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package the checked-out revision into an archive under the build directory
    Build {
        /// Archive filename (defaults to PACKAGE_FILENAME, then git-<hash>.<ext>)
        filename: Option<String>,
    },

    /// Upload a built archive to DEPLOY_BUCKET/PACKAGE_FOLDER
    Upload {
        /// Archive filename (defaults to PACKAGE_FILENAME, then git-<hash>.<ext>)
        filename: Option<String>,
    },

    /// Deploy an uploaded archive to an OpsWorks app and wait for it to finish
    Deploy {
        /// OpsWorks app name or shortname
        app_name: Option<String>,

        /// OpsWorks stack name
        stack_name: Option<String>,

        /// Archive filename (defaults to PACKAGE_FILENAME, then git-<hash>.<ext>)
        filename: Option<String>,
    },
}
