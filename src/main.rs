#[macro_use]
extern crate tracing;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use ipmonster::{Error, IpMonster, Options, Settings, trace, validate};
use serde_json::Value;
use yansi::Paint;

#[derive(Parser, Debug)]
#[command(name = "ipmonster", version, about = "Query the IP Monster geolocation API")]
struct Cli {
    /// API key, overrides IPMONSTER_API_KEY
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Base URL of the API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Response format requested from the API
    #[arg(long, global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a single IP address
    Lookup { ip: String },
    /// Look up up to 300 IP addresses in one request
    Batch {
        #[arg(required_unless_present = "json", conflicts_with = "json")]
        ips: Vec<String>,
        /// Read the addresses from a JSON file holding an array of strings
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Check addresses locally without calling the API
    Validate {
        #[arg(required = true)]
        ips: Vec<String>,
    },
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            output: self.output.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenv().ok();
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = trace::init(&settings.log) {
        eprintln!("{}", err.to_string().red().bold());
        return ExitCode::FAILURE;
    }
    debug!("{:?}", settings);

    match run(cli, &settings).await {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            eprintln!("error[{}]: {}", err.code(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, settings: &Settings) -> Result<ExitCode, Error> {
    let options = cli.options();
    let client = IpMonster::new(settings)?;

    let result = match cli.command {
        Command::Lookup { ip } => client.lookup(&ip, &options).await?,
        Command::Batch { json: Some(path), .. } => {
            let content = tokio::fs::read_to_string(&path).await?;
            let ips: Value = serde_json::from_str(&content)?;
            client.batch_lookup_value(&ips, &options).await?
        }
        Command::Batch { ips, json: None } => client.batch_lookup(&ips, &options).await?,
        Command::Validate { ips } => {
            let mut all_valid = true;
            for ip in &ips {
                let valid = validate(ip);
                all_valid &= valid;
                println!("{}\t{}", ip, if valid { "valid" } else { "invalid" });
            }
            return Ok(if all_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(ExitCode::SUCCESS)
}
