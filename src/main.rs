use std::convert::TryFrom;
use std::fs::File;
use std::io;
use std::io::{ BufReader, Read };
use std::path::{ Path, PathBuf };
use std::time::Instant;

use anyhow::{ Context, Result };
use clap::{ ArgEnum, Parser };
use log::{ debug, info };

use scene_tracer::consts::OUT_FILE;
use scene_tracer::scene::{ Scene, SceneJson };

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Text,
    Json,
}

impl Format {
    /// Guesses a description format from a file extension, defaulting to text.
    fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Format::Json,
            _ => Format::Text,
        }
    }
}

/// Renders a scene of spheres and rectangles lit by one directional light.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Opt {
    /// Scene description to render. Reads standard input when absent or `-`.
    input: Option<PathBuf>,

    /// Format of the scene description. Guessed from the extension otherwise.
    #[clap(short, long, arg_enum)]
    format: Option<Format>,

    /// Where to write the image; `.png` writes a PNG, `-` writes PPM to stdout.
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Render on a thread pool of this size (0 picks one per core).
    #[clap(short, long)]
    threads: Option<usize>,

    /// Render the built-in demo scene instead of reading one.
    #[clap(long, conflicts_with = "input")]
    demo: bool,

    /// Print the parsed scene description as JSON and exit.
    #[clap(long)]
    emit_json: bool,

    /// Log filter, e.g. `debug`. Overrides RUST_LOG.
    #[clap(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(filters) = level {
        builder.parse_filters(filters);
    }

    builder.init();
}

fn read_description(opt: &Opt) -> Result<SceneJson> {
    if opt.demo {
        return Ok(SceneJson::demo());
    }

    let (mut input, guess): (Box<dyn Read>, Format) = match &opt.input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            (Box::new(BufReader::new(file)), Format::from_path(path))
        },
        _ => (Box::new(io::stdin()), Format::Text),
    };

    let mut text = String::new();
    input.read_to_string(&mut text).context("reading scene description")?;

    let description = match opt.format.unwrap_or(guess) {
        Format::Text => SceneJson::parse_text(&text)?,
        Format::Json => serde_json::from_str(&text)?,
    };

    Ok(description)
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    init_logging(opt.log_level.as_deref());
    debug!("{:?}", opt);

    let description = read_description(&opt)?;
    if opt.emit_json {
        println!("{}", serde_json::to_string_pretty(&description)?);
        return Ok(());
    }

    let scene = Scene::try_from(description)?;
    let camera = scene.camera;
    info!("loaded scene: {} primitives, {}x{} image",
        scene.world.objects.len(), camera.width(), camera.height());

    let start = Instant::now();
    let canvas = match opt.threads {
        None => camera.render(&scene.world),
        Some(n) => camera.render_parallel(&scene.world, n)
            .context("building the render thread pool")?,
    };
    info!("rendered in {:.2?}", start.elapsed());

    let out = opt.output.as_path();
    if out.as_os_str() == "-" {
        canvas.write_ppm(&mut io::stdout().lock())
            .context("writing image to stdout")?;
        return Ok(());
    }

    match out.extension().and_then(|e| e.to_str()) {
        Some("png") => canvas.save_png(out)
            .with_context(|| format!("writing {}", out.display()))?,
        _ => canvas.save_ppm(out)
            .with_context(|| format!("writing {}", out.display()))?,
    }
    info!("wrote {}", out.display());

    Ok(())
}
