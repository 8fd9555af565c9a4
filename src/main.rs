//! Clinical Risk - command line entry point
//!
//! Usage:
//!   clinical-risk assess [request.json]      (reads stdin when no file)
//!   clinical-risk batch <dataset> [ratio] [prefix]
//!   clinical-risk batch-file <dataset> <file> [prefix] [from=to ...]
//!   clinical-risk info
//!   clinical-risk enums

use std::io::Read;
use std::process::ExitCode;

use clinical_risk::constants::{APP_NAME, APP_VERSION, DEFAULT_HOLDOUT_RATIO};
use clinical_risk::{
    load_external, BatchRunner, CsvDatasetSource, DatasetKind, DefaultModelProvider, EngineConfig, RiskAssessmentRequest,
    RiskEngine, RiskError, RiskResult,
};

const USAGE: &str = "usage: clinical-risk <assess [file] | batch <dataset> [ratio] [prefix] | batch-file <dataset> <file> [prefix] [from=to ...] | info | enums>";

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> RiskResult<()> {
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        return Err(RiskError::Config("missing command".to_string()));
    };

    let config = EngineConfig::from_env()?;
    let source = CsvDatasetSource::new(config.dataset_dir.clone());
    let provider = DefaultModelProvider::from_config(&config);
    let engine = RiskEngine::new(config, Box::new(source), Box::new(provider));
    engine.initialize()?;

    match command.as_str() {
        "assess" => {
            let raw = match args.get(1) {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let request: RiskAssessmentRequest = serde_json::from_str(&raw)?;
            let report = engine.assess(&request)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "batch" => {
            let kind: DatasetKind = args
                .get(1)
                .ok_or_else(|| RiskError::Config("batch needs a dataset name".to_string()))?
                .parse()?;
            let ratio = match args.get(2) {
                Some(raw) => raw
                    .parse::<f64>()
                    .map_err(|_| RiskError::Config(format!("invalid ratio '{}'", raw)))?,
                None => 1.0 - DEFAULT_HOLDOUT_RATIO,
            };
            let prefix = args.get(3).map(String::as_str).unwrap_or_default();

            let summary = BatchRunner::new(&engine).run(kind, ratio, prefix)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "batch-file" => {
            let kind: DatasetKind = args
                .get(1)
                .ok_or_else(|| RiskError::Config("batch-file needs a dataset name".to_string()))?
                .parse()?;
            let path = args
                .get(2)
                .ok_or_else(|| RiskError::Config("batch-file needs a CSV file".to_string()))?;
            let prefix = args.get(3).map(String::as_str).unwrap_or_default();
            let renames = args
                .iter()
                .skip(4)
                .map(|pair| {
                    pair.split_once('=')
                        .map(|(from, to)| (from.to_string(), to.to_string()))
                        .ok_or_else(|| RiskError::Config(format!("invalid rename '{}', expected from=to", pair)))
                })
                .collect::<RiskResult<Vec<_>>>()?;

            let rows = load_external(path, kind, &renames)?;
            let summary = BatchRunner::new(&engine).run_rows(kind, &rows, prefix)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "info" => {
            println!("{}", serde_json::to_string_pretty(&engine.dataset_info()?)?);
        }
        "enums" => {
            let enums = engine.categorical_enums()?;
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "enums": enums }))?);
        }
        other => {
            eprintln!("{}", USAGE);
            return Err(RiskError::Config(format!("unknown command '{}'", other)));
        }
    }

    Ok(())
}
