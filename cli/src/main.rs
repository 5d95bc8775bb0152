use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use panelgen_core::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use web_time::{SystemTime, UNIX_EPOCH};

mod render;

/// Generate binary grid panels and tutorial puzzles into a JSON puzzle store.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Puzzle store to read and write back, created when missing
    #[arg(long, global = true, default_value = "puzzles.json")]
    store: PathBuf,

    /// Force a seed instead of one derived from the clock
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a layout, replacing anything stored under its id
    Layout(LayoutArgs),
    /// Generate one regular panel
    Panel(PanelArgs),
    /// Generate one tutorial puzzle and print its hint blocks
    Tutorial(TutorialArgs),
    /// Generate every known recipe whose layout is in the store
    Catalog {
        /// Leave out recipes that may never finish
        #[arg(long)]
        skip_unreliable: bool,
    },
    /// Print what is stored under an id
    Show {
        #[arg(long)]
        id: PuzzleId,
    },
    /// List the stored puzzles and their sizes
    List,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[arg(long)]
    id: PuzzleId,

    /// Width and height, as `WxH`
    #[arg(long, value_parser = parse_size)]
    size: Coord2,

    /// Disabled cell, as `x,y`
    #[arg(long, value_parser = parse_coords)]
    disabled: Vec<Coord2>,
}

#[derive(Args, Debug)]
struct PanelArgs {
    #[arg(long)]
    id: PuzzleId,

    /// Diamonds to place, as `COLOR:AMOUNT`, served in the order given
    #[arg(long, value_parser = parse_diamonds)]
    diamond: Vec<(Color, usize)>,

    /// Flowers with a fixed petal count, as `PETALS:AMOUNT`
    #[arg(long, value_parser = parse_flowers)]
    flowers: Vec<(u8, usize)>,

    /// Flowers showing whatever their cell ends up with
    #[arg(long, default_value_t = 0)]
    wildcard: usize,

    /// Extra cells locked after placement
    #[arg(long, default_value_t = 0)]
    locks: usize,

    /// Locked cell, as `x,y` for its random value or `x,y:lit` / `x,y:unlit`
    #[arg(long, value_parser = parse_lock)]
    lock: Vec<(Coord2, Option<bool>)>,
}

#[derive(Args, Debug)]
struct TutorialArgs {
    #[arg(long)]
    id: PuzzleId,

    /// Fewest hidden cells
    #[arg(long)]
    min: usize,

    /// Most hidden cells
    #[arg(long)]
    max: usize,

    /// Host object the hint blocks are placed under
    #[arg(long, default_value = "")]
    path: String,

    /// Local position of cell 0,0 under the host object, as `x,y`
    #[arg(long, value_parser = parse_origin, default_value = "-1,1", allow_hyphen_values = true)]
    origin: (f32, f32),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let mut store = read_store(&cli.store)?;
    let seed = cli.seed.unwrap_or_else(seed_from_clock);
    log::info!("seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    match cli.command {
        Command::Layout(args) => {
            let layout = Layout::from_disabled_coords(args.size, &args.disabled)?;
            log::info!(
                "Puzzle {}: {}x{} layout with {} enabled cells",
                args.id,
                layout.width(),
                layout.height(),
                layout.enabled_cell_count()
            );
            if store.contains(args.id) {
                log::warn!("Puzzle {}: replacing the stored puzzle", args.id);
            }
            store.insert_layout(args.id, layout);
        }
        Command::Panel(args) => {
            let mut generator = Generator::load(args.id, &store)?;
            for (color, amount) in args.diamond {
                generator.add(SymbolKind::Diamond, color, amount);
            }
            for (petals, amount) in args.flowers {
                generator.set_flowers(petals, amount)?;
            }
            for (coords, lit) in args.lock {
                generator.lock_tile(coords, lit)?;
            }
            generator
                .set_wildcard_flowers(args.wildcard)
                .set_locks(args.locks);

            let generated = generator.generate_into(&mut store, &mut rng)?;
            print!("{}", render::grid(&generated.output));
        }
        Command::Tutorial(args) => {
            let anchor = HintAnchor {
                path: args.path,
                origin: args.origin,
            };
            let generator = TutorialGenerator::load(args.id, &store, args.min, args.max, anchor)?;
            log::debug!(
                "Tutorial {}: {:?} gaps under {:?}",
                generator.id(),
                generator.gap_range(),
                generator.anchor().path
            );
            let mut host = RecordingHost::new();

            let generated = generator.publish(&mut store, &mut host, &mut rng)?;
            print!("{}", render::grid(&generated.output.grid));
            println!();
            print!("{}", render::canvas(&generated.output.canvas));
            if let Some(placement) = host.placement(args.id) {
                println!("{}", serde_json::to_string_pretty(placement)?);
            }
        }
        Command::Catalog { skip_unreliable } => {
            let mut host = RecordingHost::new();
            let report = catalog::run(&mut store, &mut host, &mut rng, skip_unreliable)?;
            print!("{}", render::report(&report));
        }
        Command::Show { id } => {
            print!("{}", render::grid(&store.restore(id)?));
            return Ok(());
        }
        Command::List => {
            for id in store.ids() {
                print!("{}", render::summary(id, &store.restore(id)?));
            }
            return Ok(());
        }
    }

    write_store(&cli.store, &store)
}

/// Clock-derived session seed in `100000..1000000`, short enough to type back in with `--seed`.
fn seed_from_clock() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    (millis % 900_000) as u64 + 100_000
}

fn read_store(path: &Path) -> anyhow::Result<MemoryStore> {
    if !path.exists() {
        log::info!("{} not found, starting with an empty store", path.display());
        return Ok(MemoryStore::new());
    }
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

fn write_store(path: &Path, store: &MemoryStore) -> anyhow::Result<()> {
    let json = serde_json::to_string(store).context("serializing puzzle store")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn split_pair<'a>(
    value: &'a str,
    separator: char,
    what: &str,
) -> anyhow::Result<(&'a str, &'a str)> {
    match value.split_once(separator) {
        Some(pair) => Ok(pair),
        None => bail!("expected {what}, got {value:?}"),
    }
}

fn parse_size(value: &str) -> anyhow::Result<Coord2> {
    let (width, height) = split_pair(value, 'x', "WxH")?;
    Ok((width.trim().parse()?, height.trim().parse()?))
}

fn parse_coords(value: &str) -> anyhow::Result<Coord2> {
    let (x, y) = split_pair(value, ',', "x,y")?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn parse_origin(value: &str) -> anyhow::Result<(f32, f32)> {
    let (x, y) = split_pair(value, ',', "x,y")?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn parse_lock(value: &str) -> anyhow::Result<(Coord2, Option<bool>)> {
    let Some((coords, state)) = value.split_once(':') else {
        return Ok((parse_coords(value)?, None));
    };
    let lit = match state.trim() {
        "lit" | "on" | "1" => true,
        "unlit" | "off" | "0" => false,
        other => bail!("unknown lock state {other:?}, expected lit or unlit"),
    };
    Ok((parse_coords(coords)?, Some(lit)))
}

fn parse_flowers(value: &str) -> anyhow::Result<(u8, usize)> {
    let (petals, amount) = split_pair(value, ':', "PETALS:AMOUNT")?;
    let petals = petals.trim().parse()?;
    Symbol::flower(petals)?;
    Ok((petals, amount.trim().parse()?))
}

fn parse_diamonds(value: &str) -> anyhow::Result<(Color, usize)> {
    let (color, amount) = split_pair(value, ':', "COLOR:AMOUNT")?;
    Ok((parse_color(color)?, amount.trim().parse()?))
}

fn parse_color(value: &str) -> anyhow::Result<Color> {
    let color = match value.trim().to_ascii_lowercase().as_str() {
        "black" => Color::Black,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "gold" => Color::Gold,
        "teal" => Color::Teal,
        "purple" | "petalpurple" => Color::PetalPurple,
        "red" => Color::Red,
        "orange" => Color::Orange,
        "blue" => Color::Blue,
        other => bail!("unknown color {other:?}"),
    };
    Ok(color)
}
