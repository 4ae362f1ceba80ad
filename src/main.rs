//! otm-tools: IaC to Open Threat Model transformation tool
//!
//! Converts parsed infrastructure plan snapshots into OTM documents using
//! operator-supplied mapping definitions.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use otm_tools::config::TransformConfig;
use otm_tools::mapping::UnmappedPolicy;
use otm_tools::pipeline::exit_codes;
use otm_tools::provider;
use otm_tools::{cli, model::TrustZone};

#[derive(Parser)]
#[command(name = "otm-tools")]
#[command(version)]
#[command(about = "IaC to Open Threat Model transformation tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Unmapped resources (with --fail-on-unmapped)
    2  Upload failed
    3  Error occurred

EXAMPLES:
    # Transform a plan snapshot with one mapping file
    otm-tools transform -i plan.json -m aws-mapping.yaml -o model.otm.json

    # Earlier mapping files take precedence
    otm-tools transform -i plan.json -m project.yaml -m defaults.yaml

    # CI gate: any unmapped resource fails the run
    otm-tools transform -i plan.json -m mapping.yaml --fail-on-unmapped")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a plan snapshot into an OTM document
    Transform {
        /// Plan snapshot JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Mapping definition file(s); earlier files take precedence
        #[arg(short, long = "mapping", required = true)]
        mappings: Vec<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Provider key (overrides the snapshot's own)
        #[arg(long)]
        provider: Option<String>,

        /// Project id stamped into the document
        #[arg(long, default_value = "project")]
        project_id: String,

        /// Project display name
        #[arg(long, default_value = "Project")]
        project_name: String,

        /// Treat unmapped resources as a failure
        #[arg(long)]
        fail_on_unmapped: bool,

        /// Run strategies sequentially instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// List the registered source providers
    Providers,

    /// Upload an OTM document to a project-import endpoint
    #[cfg(feature = "upload")]
    Upload {
        /// OTM document to upload
        file: PathBuf,

        /// Server base URL
        #[arg(short, long, env = "OTM_SERVER")]
        server: String,

        /// API token
        #[arg(short, long, env = "OTM_TOKEN", hide_env_values = true)]
        token: String,

        /// Target project id
        #[arg(short, long)]
        project_id: String,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Transform {
            input,
            mappings,
            output,
            provider,
            project_id,
            project_name,
            fail_on_unmapped,
            sequential,
        } => {
            let command = cli::transform::TransformCommand {
                input,
                mappings,
                output,
                provider,
                config: TransformConfig {
                    project_id,
                    project_name,
                    unmapped_policy: if fail_on_unmapped {
                        UnmappedPolicy::Fail
                    } else {
                        UnmappedPolicy::Warn
                    },
                    parallel_strategies: !sequential,
                    default_trust_zone: TrustZone::default(),
                },
            };
            Ok(cli::transform::run(&command)?)
        }

        Commands::Providers => {
            for descriptor in provider::PROVIDERS {
                println!(
                    "{:<16} {:<24} {}",
                    descriptor.key, descriptor.label, descriptor.category
                );
            }
            Ok(exit_codes::SUCCESS)
        }

        #[cfg(feature = "upload")]
        Commands::Upload {
            file,
            server,
            token,
            project_id,
        } => {
            let command = cli::upload::UploadCommand {
                file,
                project_id,
                config: otm_tools::config::UploadConfig {
                    base_url: server,
                    token,
                    ..Default::default()
                },
            };
            Ok(cli::upload::run(&command)?)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX)),
        Err(err) => {
            // Unmapped resources under --fail-on-unmapped get their own code
            let code = match err.downcast_ref::<otm_tools::error::OtmError>() {
                Some(otm_tools::error::OtmError::Mapping {
                    source: otm_tools::error::MappingErrorKind::UnmappedResources { .. },
                    ..
                }) => exit_codes::UNMAPPED_RESOURCES,
                _ => exit_codes::ERROR,
            };
            eprintln!("error: {err:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
        }
    }
}
