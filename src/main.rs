//! `culm`: inspect and exercise an application configuration.
//!
//! ```text
//! culm --config app.toml check
//! culm --config app.toml routes
//! culm --config app.toml resolve /v1/users /users/0042
//! culm --config app.toml bind User body.json
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use culm::config::load_config;
use culm::observability::{logging, metrics};
use culm::App;

#[derive(Parser)]
#[command(name = "culm")]
#[command(about = "Route table and payload schema tool", long_about = None)]
struct Cli {
    /// Application configuration file (TOML).
    #[arg(short, long, default_value = "culm.toml")]
    config: PathBuf,

    /// Print collected metrics (Prometheus text format) to stderr on exit.
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the configuration and build the application
    Check,
    /// List registered routes in registration order
    Routes,
    /// Resolve request paths to handlers
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Bind a JSON payload against a named schema
    Bind {
        schema: String,
        /// Payload file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let handle = if cli.metrics {
        match metrics::install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("error: metrics recorder: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    };

    if let Some(handle) = handle {
        eprint!("{}", handle.render());
    }
    code
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        path = %cli.config.display(),
        routes = config.routes.len(),
        schemas = config.schemas.len(),
        "Configuration loaded"
    );

    let app = App::from_config(&config)?;

    match &cli.command {
        Commands::Check => {
            println!(
                "ok: {} routes, {} schemas",
                app.router().len(),
                app.schemas().len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Routes => {
            for entry in app.router().entries() {
                let target = &entry.handler;
                match &target.input {
                    Some(input) => println!("{}\t{}\t<- {}", entry.pattern, target.handler, input.name()),
                    None => println!("{}\t{}", entry.pattern, target.handler),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve { paths } => {
            let mut missed = false;
            for path in paths {
                match app.resolve(path) {
                    Some(found) => {
                        let params: Vec<&str> = found.params.iter().collect();
                        println!("{}\t{}\t{}\t{:?}", path, found.handler.handler, found.pattern, params);
                    }
                    None => {
                        missed = true;
                        println!("{}\t-", path);
                    }
                }
            }
            Ok(if missed { ExitCode::from(1) } else { ExitCode::SUCCESS })
        }
        Commands::Bind { schema, file } => {
            let raw = match file {
                Some(path) => std::fs::read(path)?,
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin().read_to_end(&mut buf)?;
                    buf
                }
            };

            match app.bind(schema, &raw) {
                Ok(bound) => {
                    println!("{}", serde_json::to_string_pretty(&bound)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(culm::AppError::Rejected { source, .. }) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "error": source.kind().as_str(),
                            "field": source.field(),
                            "message": source.to_string(),
                        }))?
                    );
                    Ok(ExitCode::from(2))
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
