#[cfg(feature = "cairo-backend")]
use barchart_rs::api::{BarChart, ChartOptions, NoopScheduler};
#[cfg(feature = "cairo-backend")]
use barchart_rs::render::CairoSurface;
#[cfg(feature = "cairo-backend")]
use std::fs::{self, File};
#[cfg(feature = "cairo-backend")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cairo-backend")]
const DEFAULT_OUTPUT_PATH: &str = "bar_chart.png";
#[cfg(feature = "cairo-backend")]
const DEFAULT_WIDTH: u32 = 800;
#[cfg(feature = "cairo-backend")]
const DEFAULT_HEIGHT: u32 = 500;

#[cfg(feature = "cairo-backend")]
#[derive(Debug)]
struct CliArgs {
    content_path: PathBuf,
    options_path: Option<PathBuf>,
    output_path: PathBuf,
    width: u32,
    height: u32,
    pointer: Option<(f64, f64)>,
}

#[cfg(feature = "cairo-backend")]
fn main() {
    let _ = barchart_rs::telemetry::init_default_tracing();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cairo-backend"))]
fn main() {
    eprintln!("this tool requires feature `cairo-backend`");
    std::process::exit(1);
}

#[cfg(feature = "cairo-backend")]
fn run() -> Result<(), String> {
    let args = parse_args()?;

    let content = read_json(&args.content_path)?;
    let options = match &args.options_path {
        Some(path) => ChartOptions::from_partial_json(&read_json(path)?)
            .map_err(|err| format!("invalid options `{}`: {err}", path.display()))?,
        None => ChartOptions::default(),
    };

    let surface = CairoSurface::new(args.width, args.height)
        .map_err(|err| format!("failed to create surface: {err}"))?;
    let mut chart = BarChart::new(surface, options, NoopScheduler)
        .map_err(|err| format!("failed to create chart: {err}"))?;
    chart
        .update_json(&content)
        .map_err(|err| format!("invalid content `{}`: {err}", args.content_path.display()))?;
    chart
        .render()
        .map_err(|err| format!("render failed: {err}"))?;

    if let Some((x, y)) = args.pointer {
        chart.pointer_move(x, y);
        chart
            .render()
            .map_err(|err| format!("hint render failed: {err}"))?;
    }

    if let Some(parent) = args.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!("failed to create output dir `{}`: {err}", parent.display())
            })?;
        }
    }
    let mut file = File::create(&args.output_path).map_err(|err| {
        format!(
            "failed to create output `{}`: {err}",
            args.output_path.display()
        )
    })?;
    chart
        .surface()
        .write_png(&mut file)
        .map_err(|err| format!("failed to write png: {err}"))?;

    let stats = chart.surface().stats();
    println!(
        "wrote {} ({} rects, {} paths, {} texts)",
        args.output_path.display(),
        stats.rects_drawn,
        stats.paths_drawn,
        stats.texts_drawn
    );
    Ok(())
}

#[cfg(feature = "cairo-backend")]
fn read_json(path: &Path) -> Result<serde_json::Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
    serde_json::from_str(&raw).map_err(|err| format!("failed to parse `{}`: {err}", path.display()))
}

#[cfg(feature = "cairo-backend")]
fn parse_args() -> Result<CliArgs, String> {
    let mut content_path: Option<PathBuf> = None;
    let mut options_path: Option<PathBuf> = None;
    let mut output_path = PathBuf::from(DEFAULT_OUTPUT_PATH);
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut pointer: Option<(f64, f64)> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--content" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --content".to_owned())?;
                content_path = Some(PathBuf::from(value));
            }
            "--options" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --options".to_owned())?;
                options_path = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output_path = PathBuf::from(value);
            }
            "--size" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --size".to_owned())?;
                (width, height) = parse_size(&value)?;
            }
            "--pointer" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --pointer".to_owned())?;
                pointer = Some(parse_pointer(&value)?);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`\n\n{}", usage_message()));
            }
        }
    }

    let content_path =
        content_path.ok_or_else(|| format!("--content is required\n\n{}", usage_message()))?;
    Ok(CliArgs {
        content_path,
        options_path,
        output_path,
        width,
        height,
        pointer,
    })
}

#[cfg(feature = "cairo-backend")]
fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("size `{value}` must look like 800x500"))?;
    let width = width
        .parse()
        .map_err(|err| format!("invalid width `{width}`: {err}"))?;
    let height = height
        .parse()
        .map_err(|err| format!("invalid height `{height}`: {err}"))?;
    Ok((width, height))
}

#[cfg(feature = "cairo-backend")]
fn parse_pointer(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("pointer `{value}` must look like 120,80"))?;
    let x = x.parse().map_err(|err| format!("invalid x `{x}`: {err}"))?;
    let y = y.parse().map_err(|err| format!("invalid y `{y}`: {err}"))?;
    Ok((x, y))
}

#[cfg(feature = "cairo-backend")]
fn print_usage() {
    println!("{}", usage_message());
}

#[cfg(feature = "cairo-backend")]
fn usage_message() -> String {
    format!(
        "Usage: cargo run --features cairo-backend --bin render_bar_chart_png -- --content <path> [options]\n\nOptions:\n  --content <path>   Content descriptor JSON (labels, data, ...)\n  --options <path>   Partial chart options JSON\n  --output <path>    Output PNG path (default: {DEFAULT_OUTPUT_PATH})\n  --size <WxH>       Surface size in pixels (default: {DEFAULT_WIDTH}x{DEFAULT_HEIGHT})\n  --pointer <x,y>    Render with the hint under this pointer position\n  -h, --help         Show this message"
    )
}
