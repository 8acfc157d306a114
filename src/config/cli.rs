use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "portfolio-api")]
#[command(about = "Backend API for the portfolio website")]
pub struct CliConfig {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8001")]
    pub bind: SocketAddr,

    #[arg(long, help = "Load the portfolio document from this TOML file")]
    pub portfolio_file: Option<PathBuf>,

    #[arg(long, help = "Keep submissions in memory instead of MongoDB")]
    pub memory_store: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
