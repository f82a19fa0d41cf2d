use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use n3_charts::api::{ContextOptions, GraphHandle, LineGraph, LineGraphConfig, RenderContext};
use n3_charts::core::Series;
use n3_charts::error::ChartResult;
use n3_charts::render::{Renderer, Selection, Surface, SvgRenderer};
use n3_charts::telemetry::init_tracing_with_filter;
use tracing::info;

/// Render a line/area chart from JSON series data into an SVG document.
#[derive(Parser, Debug)]
#[command(name = "n3-render")]
#[command(version, about)]
struct Cli {
    /// JSON array of series: `[{"key": "a", "values": [{"x": 0, "y": 1}]}]`
    #[arg(short, long)]
    data: PathBuf,

    /// JSON chart configuration; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file; the SVG is written to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rendered width of the target, used when the config sets no width; needs `--height`
    #[arg(long, requires = "height")]
    width: Option<f64>,

    /// Rendered height of the target, used when the config sets no height; needs `--width`
    #[arg(long, requires = "width")]
    height: Option<f64>,

    /// Log render timing
    #[arg(long)]
    debug: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    let filter = match (cli.verbose, cli.debug) {
        (0, false) => "warn",
        (0, true) | (1, _) => "n3_charts=debug",
        _ => "n3_charts=trace",
    };
    let _ = init_tracing_with_filter(filter);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let data: Vec<Series> = serde_json::from_str(&read(&cli.data)?)
        .map_err(|err| format!("invalid data in `{}`: {err}", cli.data.display()))?;
    let config = match &cli.config {
        Some(path) => LineGraphConfig::from_json_str(&read(path)?)
            .map_err(|err| format!("invalid config in `{}`: {err}", path.display()))?,
        None => LineGraphConfig::default(),
    };

    let mut surface = Surface::new();
    if let (Some(width), Some(height)) = (cli.width, cli.height) {
        surface.set_rendered_size(width, height);
    }
    let surface = surface.into_shared();
    let selection = Selection::single(surface.clone());
    selection.bind(&data);

    let options = ContextOptions::default().with_debug(cli.debug);
    let mut context = RenderContext::init(options).map_err(|err| err.to_string())?;
    context.add_graph(move || -> ChartResult<GraphHandle> {
        let mut graph = LineGraph::from_config(&config);
        graph.apply(&selection)?;
        Ok(graph.into_shared())
    });
    context.flush().map_err(|err| err.to_string())?;
    context.teardown();

    let mut renderer = SvgRenderer::new();
    renderer
        .render(&surface.borrow())
        .map_err(|err| err.to_string())?;
    info!(bytes = renderer.output().len(), "svg rendered");
    write_output(cli.output.as_deref(), renderer.output())
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("failed to read `{}`: {err}", path.display()))
}

fn write_output(path: Option<&Path>, svg: &str) -> Result<(), String> {
    match path {
        Some(path) => fs::write(path, svg)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{svg}").map_err(|err| format!("failed to write stdout: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn width_and_height_come_as_a_pair() {
        for args in [
            ["n3-render", "--data", "d.json", "--width", "800"],
            ["n3-render", "--data", "d.json", "--height", "300"],
        ] {
            let err = Cli::try_parse_from(args).expect_err("lone size flag");
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }

        let cli = Cli::try_parse_from([
            "n3-render", "--data", "d.json", "--width", "800", "--height", "300",
        ])
        .expect("both size flags");
        assert_eq!((cli.width, cli.height), (Some(800.0), Some(300.0)));
    }
}
