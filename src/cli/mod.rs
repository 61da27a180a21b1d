//! Command line interface

pub mod serve;

use clap::{Parser, Subcommand};

/// Product catalog behind a read-through cache
#[derive(Parser)]
#[command(name = "product-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}
