use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Value};
use std::process;
use tracing_subscriber::EnvFilter;

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("Sets a custom config file")
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn query_inputs(matches: &ArgMatches) -> Map<String, Value> {
    let mut inputs = Map::new();
    for key in ["domain", "timescale", "dataset", "country", "station", "network"] {
        if let Some(value) = matches.get_one::<String>(key) {
            inputs.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    inputs
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("WOUDC Data Registry Metrics")
        .version("1.0")
        .about("Serves file submission metrics from the data registry search index")
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the metrics API server")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("query")
                .about("Run one metrics request and print the result")
                .arg(config_arg())
                .arg(Arg::new("domain").long("domain").required(true))
                .arg(Arg::new("timescale").long("timescale").required(true))
                .arg(Arg::new("dataset").long("dataset"))
                .arg(Arg::new("country").long("country"))
                .arg(Arg::new("station").long("station"))
                .arg(Arg::new("network").long("network")),
        )
        .get_matches();

    init_tracing(matches.get_flag("json-logs"));

    match matches.subcommand() {
        Some(("serve", serve_matches)) => {
            let config_path = serve_matches.get_one::<String>("config")
                .map(|s| s.as_str())
                .unwrap_or("config/metrics.toml");

            metrics::run_metrics_server(config_path).await?;
        }
        Some(("query", query_matches)) => {
            let config_path = query_matches.get_one::<String>("config")
                .map(|s| s.as_str())
                .unwrap_or("config/metrics.toml");

            let result = metrics::run_metrics_query(config_path, &query_inputs(query_matches)).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            eprintln!("No subcommand specified. Use --help for usage information.");
            process::exit(1);
        }
    }

    Ok(())
}
