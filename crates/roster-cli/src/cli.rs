use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "roster", about = "Roster: employee, domain and company registry", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Run one invocation against a fresh in-memory ledger
    Invoke(InvokeArgs),
    /// Run a script of invocations against one in-memory ledger
    Run(RunArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Script run against the ledger before serving
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

#[derive(Args)]
pub struct InvokeArgs {
    /// Operation name, e.g. `init_domain`
    pub function: String,
    /// Positional arguments
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct RunArgs {
    /// One invocation per line; blank lines and `#` comments are skipped
    pub script: PathBuf,
    /// Stop at the first failing invocation
    #[arg(long)]
    pub stop_on_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve_defaults() {
        let cli = Cli::try_parse_from(["roster", "serve"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert!(args.config.is_none());
            assert!(args.bind.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_serve_with_bind() {
        let cli = Cli::try_parse_from(["roster", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind.unwrap().port(), 9000);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_invoke_with_args() {
        let cli = Cli::try_parse_from(["roster", "invoke", "init_domain", "d1", "Eng"]).unwrap();
        if let Command::Invoke(args) = cli.command {
            assert_eq!(args.function, "init_domain");
            assert_eq!(args.args, vec!["d1", "Eng"]);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_run_global_flags() {
        let cli =
            Cli::try_parse_from(["roster", "run", "demo.txt", "--format", "json", "-v"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        if let Command::Run(args) = cli.command {
            assert_eq!(args.script, PathBuf::from("demo.txt"));
            assert!(!args.stop_on_error);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(Cli::try_parse_from(["roster", "invoke", "read", "k", "--format", "xml"]).is_err());
    }
}
