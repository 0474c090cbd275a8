use anyhow::{bail, Context, Result};
use env_logger::Builder;
use eos_trx_analyzer::analyzer::AnalyzerConfig;
use eos_trx_analyzer::analyze_bytes;
use log::{info, LevelFilter};
use std::fs;
use std::io::{Read, Write};

fn print_usage(program: &str) {
    println!("EOS Transaction Analyzer v{}", eos_trx_analyzer::VERSION);
    println!("\nUsage:");
    println!("  {} <FILE|-> [--verbose]", program);
    println!("  {} --version", program);
    println!("\nThe input is a packed transaction as JSON, hex, base64 or raw binary.");
    println!("Use - to read it from standard input.");
    println!("\nOptions:");
    println!("  --verbose, -V        Include hex dumps and the JSON form of installed ABIs");
    println!("  --version, -v        Show version information");
    println!("  --help, -h           Show this help");
}

// Simple CLI without clap
fn main() -> Result<()> {
    // Initialize logger; RUST_LOG overrides the default level
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Utc::now().timestamp(),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("eos-trx-analyzer");

    let mut input = None;
    let mut verbose = false;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("EOS Transaction Analyzer v{}", eos_trx_analyzer::VERSION);
                return Ok(());
            }
            "--help" | "-h" => {
                print_usage(program);
                return Ok(());
            }
            "--verbose" | "-V" => verbose = true,
            other if input.is_none() => input = Some(other.to_string()),
            other => println!("Unknown argument: {}", other),
        }
    }

    let Some(input) = input else {
        print_usage(program);
        return Ok(());
    };

    let data = if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read transaction from standard input")?;
        buf
    } else {
        fs::read(&input).with_context(|| format!("Failed to read transaction file: {}", input))?
    };
    info!("Read {} bytes of input", data.len());

    let report = analyze_bytes(&data, AnalyzerConfig { verbose, now: None })?;
    print!("{}", report.text);

    if let Some(error) = report.fatal {
        bail!("Analysis stopped: {}", error);
    }
    Ok(())
}
