use movie_charts::api::{Dashboard, DashboardConfig};
use movie_charts::core::Metric;
use movie_charts::feed::read_rows_from_path;
use movie_charts::render::NullRenderer;
use movie_charts::telemetry::init_default_tracing;
use std::fs;
use std::path::PathBuf;

const USAGE: &str = "usage: movie_charts_demo --input <csv> [--metric <budget|revenue|popularity>] [--config <json>] [--output <path>]";
const FRAME_MS: f64 = 16.0;

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    metric: Option<Metric>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = init_default_tracing("movie_charts=info");
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            DashboardConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => DashboardConfig::default(),
    };

    let rows = read_rows_from_path(&args.input, config.max_records).map_err(|err| err.to_string())?;
    let mut dashboard = Dashboard::new(config).map_err(|err| err.to_string())?;
    let update = dashboard
        .on_data_loaded(&rows, 0.0)
        .map_err(|err| err.to_string())?;
    eprintln!(
        "loaded {} rows: {} bars, {} line vertices, {} dots",
        update.parse.rows,
        update.bar.entered.len(),
        update.line.entered.len(),
        update.scatter.entered.len()
    );

    let mut now_ms = 0.0;
    if let Some(metric) = args.metric {
        // Switch mid-animation so the redirect path runs.
        now_ms = config.timing.duration_ms / 2.0;
        let _ = dashboard.advance(now_ms);
        let report = dashboard
            .select_metric(metric, now_ms)
            .map_err(|err| err.to_string())?;
        eprintln!(
            "metric {}: {} entered, {} updated, {} exited",
            metric.name(),
            report.entered.len(),
            report.updated.len(),
            report.exited.len()
        );
    }

    let mut renderer = NullRenderer::default();
    while !dashboard.is_idle() {
        now_ms += FRAME_MS;
        let _ = dashboard.advance(now_ms);
        dashboard.render(&mut renderer).map_err(|err| err.to_string())?;
    }
    eprintln!("rendered {} frames", renderer.frames_rendered);

    let payload = dashboard
        .snapshot()
        .to_json_contract_v1_pretty()
        .map_err(|err| err.to_string())?;
    match &args.output {
        Some(path) => fs::write(path, payload)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{payload}");
            Ok(())
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut input = None::<PathBuf>;
    let mut metric = None::<Metric>;
    let mut config = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --input".to_owned())?;
                input = Some(PathBuf::from(value));
            }
            "--metric" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --metric".to_owned())?;
                metric = Some(value.parse::<Metric>().map_err(|err| err.to_string())?);
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    let input = input.ok_or_else(|| USAGE.to_owned())?;
    Ok(CliArgs {
        input,
        metric,
        config,
        output,
    })
}
