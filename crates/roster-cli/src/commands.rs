use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use roster_chaincode::{Chaincode, Invocation, Response};
use roster_server::{RosterServer, ServerConfig};
use roster_store::InMemoryLedger;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Invoke(args) => cmd_invoke(args, cli.format),
        Command::Run(args) => cmd_run(args, cli.format),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let ledger = InMemoryLedger::new();
    if let Some(seed) = &args.seed {
        let chaincode = Chaincode::with_config(ledger.clone(), config.chaincode.clone());
        let summary = run_script(&chaincode, &read_script(seed)?, true, |_, _| {});
        if summary.failed > 0 {
            anyhow::bail!("seed script {} failed", seed.display());
        }
        println!(
            "{} Seeded {} invocations from {}",
            "✓".green(),
            summary.succeeded,
            seed.display()
        );
    }

    println!("Roster server on {}", config.bind_addr.to_string().bold());
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(RosterServer::with_ledger(config, ledger).serve())?;
    Ok(())
}

fn cmd_invoke(args: InvokeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let chaincode = Chaincode::new(InMemoryLedger::new());
    let invocation = Invocation::new(args.function, args.args);
    let response = chaincode.invoke(&invocation);
    print_response(&invocation, &response, format);
    if !response.is_success() {
        anyhow::bail!("invocation failed");
    }
    Ok(())
}

fn cmd_run(args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let script = read_script(&args.script)?;
    let chaincode = Chaincode::new(InMemoryLedger::new());
    let summary = run_script(&chaincode, &script, args.stop_on_error, |inv, resp| {
        print_response(inv, resp, format)
    });

    if format == OutputFormat::Text {
        let keys = chaincode.ledger().len()?;
        let failed = if summary.failed > 0 {
            summary.failed.to_string().red().bold()
        } else {
            summary.failed.to_string().normal()
        };
        println!(
            "\n{} succeeded, {} failed, {} keys in ledger",
            summary.succeeded.to_string().green().bold(),
            failed,
            keys
        );
    }
    if args.stop_on_error && summary.failed > 0 {
        anyhow::bail!("script stopped at first failure");
    }
    Ok(())
}

fn read_script(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Run every invocation in `script` in order, reporting each outcome.
pub fn run_script<F>(
    chaincode: &Chaincode<InMemoryLedger>,
    script: &str,
    stop_on_error: bool,
    mut report: F,
) -> ScriptSummary
where
    F: FnMut(&Invocation, &Response),
{
    let mut summary = ScriptSummary::default();
    let invocations = script
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(Invocation::parse_line);

    for invocation in invocations {
        let response = chaincode.invoke(&invocation);
        report(&invocation, &response);
        if response.is_success() {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
            if stop_on_error {
                break;
            }
        }
    }
    summary
}

fn print_response(invocation: &Invocation, response: &Response, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let line = serde_json::json!({
                "function": invocation.function,
                "args": invocation.args,
                "response": response.to_wire(),
            });
            println!("{line}");
        }
        OutputFormat::Text => {
            let call = format!("{} {}", invocation.function, invocation.args.join(" "));
            match response {
                Response::Success { payload: None } => {
                    println!("{} {}", "✓".green().bold(), call.trim_end());
                }
                Response::Success { payload: Some(bytes) } => {
                    println!("{} {}", "✓".green().bold(), call.trim_end());
                    let value = roster_chaincode::wire_payload(bytes);
                    let pretty = serde_json::to_string_pretty(&value)
                        .unwrap_or_else(|_| value.to_string());
                    for line in pretty.lines() {
                        println!("  {}", line.dimmed());
                    }
                }
                Response::Error { message } => {
                    println!("{} {}", "✗".red().bold(), call.trim_end());
                    println!("  {}", message.red());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_store::LedgerState;
    use std::io::Write;

    const DEMO: &str = "\
# seed the registry
init_domain d1 Eng
init_company c1 Acme

init_employee e1 Ann SWE 1990-01-01 d1 Eng c1 Acme
set_domain e1 d9 WrongName
getEmployeeById e1
";

    #[test]
    fn script_runs_in_order() {
        let chaincode = Chaincode::new(InMemoryLedger::new());
        let mut seen = Vec::new();
        let summary = run_script(&chaincode, DEMO, false, |inv, _| {
            seen.push(inv.function.clone())
        });
        assert_eq!(summary, ScriptSummary { succeeded: 4, failed: 1 });
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0], "init_domain");
        assert!(chaincode.ledger().get("e1").unwrap().is_some());
    }

    #[test]
    fn stop_on_error_halts() {
        let chaincode = Chaincode::new(InMemoryLedger::new());
        let summary = run_script(&chaincode, DEMO, true, |_, _| {});
        assert_eq!(summary, ScriptSummary { succeeded: 3, failed: 1 });
    }

    #[test]
    fn script_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{DEMO}").unwrap();
        assert_eq!(read_script(file.path()).unwrap(), DEMO);
    }

    #[test]
    fn missing_script_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_script(&dir.path().join("none.txt")).unwrap_err();
        assert!(err.to_string().contains("none.txt"));
    }
}
