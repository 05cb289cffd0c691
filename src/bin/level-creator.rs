//! Command-line interface for level_creator
//!
//! Usage:
//!   level-creator single [OPTIONS] <COLORED> <LINES> <OUT_DIR>
//!   level-creator batch  [OPTIONS] <INPUT_DIR> <OUT_DIR>

use level_creator::utils::log::{init_subscriber, level_for_verbosity};
use level_creator::{ImagePair, LevelCreator, LevelSettings, Pixmap, run_batch, write_level_folder};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

enum Mode {
    Single,
    Batch,
}

struct Args {
    mode: Mode,
    paths: Vec<PathBuf>,
    settings: LevelSettings,
    verbosity: u8,
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {program} single [OPTIONS] <COLORED.png> <LINES.png> <OUT_DIR>");
    eprintln!("  {program} batch  [OPTIONS] <INPUT_DIR> <OUT_DIR>");
    eprintln!();
    eprintln!("Batch mode pairs <name>.png with <name>-lines.png and writes OUT_DIR/<name>/.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --line-threshold <0-255>        Ink alpha at which a pixel is a line (default: 200)");
    eprintln!("  --region-size-threshold <N>     Minimum open pixels per region (default: 24)");
    eprintln!("  --color-merge-threshold <F>     LAB distance for merging colors (default: 0.1)");
    eprintln!("  --ignore-white                  Leave regions sampling white uncolored");
    eprintln!("  --pack-padding <N>              Atlas padding around regions (default: 4)");
    eprintln!("  --max-pack-size <EXP>           Largest atlas side as a power of two (default: 11)");
    eprintln!("  --asset-prefix <PATH>           Asset path prefix written to level.txt (default: Assets/Levels)");
    eprintln!("  -v, --verbose                   More logging (repeat for trace)");
    eprintln!("  --help                          Show this message");
}

fn value<T: std::str::FromStr>(args: &[String], i: &mut usize, name: &str) -> Result<T, String> {
    *i += 1;
    let raw = args.get(*i).ok_or_else(|| format!("{name} needs a value"))?;
    raw.parse().map_err(|_| format!("invalid value for {name}: {raw}"))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mode = match args.get(1).map(String::as_str) {
        Some("single") => Mode::Single,
        Some("batch") => Mode::Batch,
        Some(other) => return Err(format!("unknown mode: {other}")),
        None => return Err("missing mode".to_string()),
    };

    let mut settings = LevelSettings::default();
    let mut paths = Vec::new();
    let mut verbosity = 0u8;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--line-threshold" => {
                settings = settings.with_line_threshold(value(args, &mut i, "--line-threshold")?);
            }
            "--region-size-threshold" => {
                settings = settings.with_region_size_threshold(value(args, &mut i, "--region-size-threshold")?);
            }
            "--color-merge-threshold" => {
                settings = settings.with_color_merge_threshold(value(args, &mut i, "--color-merge-threshold")?);
            }
            "--ignore-white" => {
                settings = settings.with_ignore_white_regions(true);
            }
            "--pack-padding" => {
                settings = settings.with_pack_padding(value(args, &mut i, "--pack-padding")?);
            }
            "--max-pack-size" => {
                settings = settings.with_max_pack_size(value(args, &mut i, "--max-pack-size")?);
            }
            "--asset-prefix" => {
                settings = settings.with_asset_prefix(value::<String>(args, &mut i, "--asset-prefix")?);
            }
            "-v" | "--verbose" => {
                verbosity = verbosity.saturating_add(1);
            }
            "-vv" => {
                verbosity = verbosity.saturating_add(2);
            }
            arg if !arg.starts_with('-') => paths.push(PathBuf::from(arg)),
            other => return Err(format!("unknown option: {other}")),
        }
        i += 1;
    }

    let expected = match mode {
        Mode::Single => 3,
        Mode::Batch => 2,
    };
    if paths.len() != expected {
        return Err(format!("expected {expected} paths, got {}", paths.len()));
    }

    Ok(Args {
        mode,
        paths,
        settings,
        verbosity,
    })
}

fn run_single(args: &Args) -> level_creator::Result<()> {
    let (colored, lines, out_dir) = (&args.paths[0], &args.paths[1], &args.paths[2]);
    let pair = ImagePair::new(Pixmap::open(colored)?, Pixmap::open(lines)?);

    let level = LevelCreator::new(args.settings.clone()).process(&pair)?;

    let name = out_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    write_level_folder(out_dir, &level, &args.settings.asset_path(&name))?;

    println!(
        "{}: {} regions, {} colors, {} atlases, id {}",
        out_dir.display(),
        level.regions.len(),
        level.colors.len(),
        level.atlases.len(),
        level.id
    );
    Ok(())
}

fn run_batch_mode(args: &Args) -> level_creator::Result<bool> {
    let report = run_batch(&args.paths[0], &args.paths[1], args.settings.clone())?;
    println!("{report}");
    Ok(report.all_succeeded())
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("level-creator");

    if argv.iter().any(|a| a == "--help") {
        print_usage(program);
        return ExitCode::SUCCESS;
    }

    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("error: {msg}");
            print_usage(program);
            return ExitCode::from(2);
        }
    };

    init_subscriber(level_for_verbosity(args.verbosity));

    let result = match args.mode {
        Mode::Single => run_single(&args).map(|_| true),
        Mode::Batch => run_batch_mode(&args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %err, "level creation failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
