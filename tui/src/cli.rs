use std::path::PathBuf;

use clap::Parser;
use srcview_protocol::Link;

/// Browse a code index served over HTTP.
#[derive(Debug, Parser)]
#[command(name = "srcview", version)]
pub struct Cli {
    /// Where to start: `summary:<id>` or `<file>[:<line>[:<col>[:<line>:<col>]]]`
    #[arg(value_name = "LINK")]
    pub link: Option<Link>,

    /// Base URL of the index server
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Template for "view in VCS" links, with `$file` and `$line` placeholders
    #[arg(long, value_name = "TEMPLATE")]
    pub vcs_link: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
