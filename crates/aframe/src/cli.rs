//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// A-Frame - Build WebVR scenes from the command line
#[derive(Parser, Debug)]
#[command(name = "aframe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new scene project from a template
    #[command(visible_aliases = ["new", "n", "start"])]
    Create(CreateArgs),

    /// Build the scene once
    #[command(visible_aliases = ["compile", "generate"])]
    Build(BuildArgs),

    /// Serve the scene locally, rebuilding on change
    #[command(visible_aliases = ["server", "dev"])]
    Serve(ServeArgs),

    /// Publish the scene
    #[command(visible_aliases = ["publish", "push"])]
    Deploy(DeployArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project directory name
    pub name: Option<String>,

    /// Template alias, `owner/repo` shorthand, or Git URL
    #[arg(short, long)]
    pub template: Option<String>,

    /// Directory to create the project in (overrides the name)
    #[arg(short, long)]
    pub directory: Option<Utf8PathBuf>,

    /// Scaffold into a non-empty directory
    #[arg(short, long)]
    pub force: bool,

    /// Skip installing template dependencies
    #[arg(long)]
    pub no_install: bool,

    /// Skip git init and the initial commit
    #[arg(long)]
    pub no_git: bool,

    /// Create a GitHub repository (optionally with an explicit slug)
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub github: Option<String>,

    /// Do not copy the repository URL to the clipboard
    #[arg(long)]
    pub no_clipboard: bool,

    /// Do not open the repository URL in the browser
    #[arg(long)]
    pub no_open: bool,
}

/// Flags shared by every command that runs the bundler
#[derive(Args, Debug, Clone)]
pub struct BundlerArgs {
    /// Path to the bundler config file
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Build with production optimizations
    #[arg(short, long)]
    pub production: bool,

    /// Environment name forwarded to the bundler
    #[arg(short, long)]
    pub env: Option<String>,

    /// Parallel jobs forwarded to the bundler
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl BundlerArgs {
    pub fn to_options(&self) -> aframe_core::types::BuildOptions {
        aframe_core::types::BuildOptions {
            config: self.config.clone(),
            production: self.production,
            env: self.env.clone(),
            jobs: self.jobs,
        }
    }
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project directory (defaults to the current directory)
    pub directory: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub bundler: BundlerArgs,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Project directory (defaults to the current directory)
    pub directory: Option<Utf8PathBuf>,

    /// Listen host (env: HOST, IP)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Listen port (env: PORT)
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Use an https:// URL (env: HTTPS, SSL)
    #[arg(short = 's', long)]
    pub https: bool,

    /// Mount the upload endpoint at POST /upload
    #[arg(long)]
    pub uploads: bool,

    /// Shut down when stdin closes
    #[arg(long)]
    pub stdin: bool,

    /// Do not copy the URL to the clipboard
    #[arg(long)]
    pub no_clipboard: bool,

    /// Do not open the URL in the browser
    #[arg(long)]
    pub no_open: bool,

    #[command(flatten)]
    pub bundler: BundlerArgs,
}

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Project directory (defaults to the current directory)
    pub directory: Option<Utf8PathBuf>,

    /// Deploy provider: github-pages, ipfs, or cdn
    #[arg(long, default_value = "github-pages")]
    pub provider: String,

    /// GitHub repository (`owner/repo` or URL) for github-pages
    #[arg(long)]
    pub repo: Option<String>,

    /// Deploy binary used by the cdn provider
    #[arg(long, default_value = "now")]
    pub cdn_bin: String,

    /// Do not submit the deployed URL to the A-Frame Index
    #[arg(long)]
    pub no_submit: bool,

    /// Do not copy the deployed URL to the clipboard
    #[arg(long)]
    pub no_clipboard: bool,

    /// Do not open the deployed URL in the browser
    #[arg(long)]
    pub no_open: bool,

    #[command(flatten)]
    pub bundler: BundlerArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
