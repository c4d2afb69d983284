//! Command implementations.
//!
//! Each command writes its user-facing output to `out` and returns the
//! process exit code. Progress lines and logs go to stderr.

use crate::cli::{Cli, Command, GenerateArgs, GlobalOptions, InputArgs, PreviewArgs, USAGE};
use crate::{BUILD_DATE, VERSION};
use anyhow::{bail, Context, Result};
use nametagkit_core::{BatchResult, NameString, ProgressEvent, ProgressStatus};
use nametagkit_designer::{
    list_font_families, MeshExporter, StlExporter, TagDimensions, TagGenerator, UnionMode,
};
use nametagkit_packager::{
    package_tags, BatchProcessor, DirectoryDelivery, MemoryDelivery, OpenScadRunner,
    PackageOptions, ScadExporter, ScadTemplate,
};
use nametagkit_settings::{Config, ExporterKind};
use nametagkit_visualizer::{PreviewSession, AUTO_ROTATE_SPEED_DEG};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Every name succeeded.
pub const EXIT_SUCCESS: u8 = 0;
/// At least one name failed, or the command itself failed.
pub const EXIT_FAILURE: u8 = 1;
/// Input was rejected before any work started.
pub const EXIT_INVALID_INPUT: u8 = 2;

/// Frames in one full auto-rotate turn.
pub const TURNTABLE_FRAMES: u32 = 12;

/// Run the parsed command.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<u8> {
    match &cli.command {
        Command::Help => {
            write!(out, "{}", USAGE)?;
            Ok(EXIT_SUCCESS)
        }
        Command::Version => {
            writeln!(out, "nametagkit {} (built {})", VERSION, BUILD_DATE)?;
            Ok(EXIT_SUCCESS)
        }
        Command::Generate(args) => generate(&load_config(&cli.global)?, args, out),
        Command::Validate(input) => validate(&load_config(&cli.global)?, input, out),
        Command::Preview(args) => preview(&load_config(&cli.global)?, args, out),
        Command::CheckOpenScad => check_openscad(&load_config(&cli.global)?, out),
        Command::Fonts => fonts(out),
        Command::InitConfig { path, force } => init_config(path.as_deref(), *force, out),
    }
}

/// `--config` must exist; the default location may be absent.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    if let Some(path) = &global.config {
        return Config::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    match Config::default_path() {
        Ok(path) => Config::load_or_default(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        Err(e) => {
            debug!("Using default config: {}", e);
            Ok(Config::default())
        }
    }
}

fn read_input(input: &InputArgs) -> Result<String> {
    input.read().with_context(|| match &input.file {
        Some(path) => format!("failed to read names from {}", path.display()),
        None => "failed to read names".to_string(),
    })
}

/// Where and how a batch's output ends up.
struct OutputPlan {
    dims: TagDimensions,
    directory: PathBuf,
    archive_name: String,
    loose: bool,
    sources: bool,
}

fn generate(config: &Config, args: &GenerateArgs, out: &mut dyn Write) -> Result<u8> {
    let raw = read_input(&args.input)?;
    let names = match config.names.validator().validate(&raw) {
        Ok(names) => names,
        Err(e) => {
            warn!("Batch aborted: {}", e);
            writeln!(out, "{}", e)?;
            return Ok(EXIT_INVALID_INPUT);
        }
    };

    let plan = OutputPlan {
        dims: config.geometry.clone(),
        directory: args
            .out
            .clone()
            .unwrap_or_else(|| config.package.output_directory.clone()),
        archive_name: config.package.archive_name.clone(),
        loose: args.loose,
        sources: args.sources || config.package.include_sources,
    };
    let union_mode = if args.merged {
        UnionMode::Merged
    } else {
        config.export.union_mode
    };

    match args.exporter.unwrap_or(config.export.exporter) {
        ExporterKind::Native => run_batch(StlExporter::new(union_mode), &plan, &names, out),
        ExporterKind::OpenScad => {
            let runner = OpenScadRunner::resolve(
                config.export.openscad_path.as_deref(),
                config.export.openscad_timeout(),
            )?;
            let template = ScadTemplate::new(&plan.dims)?;
            run_batch(ScadExporter::new(template, runner), &plan, &names, out)
        }
    }
}

fn print_progress(event: &ProgressEvent) {
    match event.status {
        ProgressStatus::Processing => eprintln!(
            "[{}/{}] {:>3.0}% {}",
            event.current,
            event.total,
            event.percent(),
            event.name
        ),
        ProgressStatus::Error => eprintln!(
            "[{}/{}] {} failed: {}",
            event.current,
            event.total,
            event.name,
            event.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn run_batch<E: MeshExporter>(
    exporter: E,
    plan: &OutputPlan,
    names: &[NameString],
    out: &mut dyn Write,
) -> Result<u8> {
    let generator = TagGenerator::new(plan.dims.clone());

    let result = if plan.loose {
        let delivery = DirectoryDelivery::new(plan.directory.clone());
        let mut processor = BatchProcessor::new(generator, exporter, delivery);
        let result = processor.run(names, print_progress);
        let written = processor.delivery().written().len();
        writeln!(out, "Wrote {} STL files to {}", written, plan.directory.display())?;
        result
    } else {
        let mut processor = BatchProcessor::new(generator, exporter, MemoryDelivery::new());
        let result = processor.run(names, print_progress);
        let artifacts = processor.into_delivery().into_artifacts();
        if artifacts.is_empty() {
            writeln!(out, "No tags generated, archive not written")?;
        } else {
            let options = PackageOptions {
                sources: if plan.sources {
                    Some(ScadTemplate::new(&plan.dims)?)
                } else {
                    None
                },
                generator: format!("NameTagKit {}", VERSION),
                ..PackageOptions::default()
            };
            let archive = package_tags(&artifacts, &options)?;
            let path = write_archive(&plan.directory, &plan.archive_name, &archive)?;
            writeln!(out, "Wrote {} ({} tags)", path.display(), artifacts.len())?;
        }
        result
    };

    print_summary(&result, out)?;
    Ok(if result.is_complete_success() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}

fn write_archive(directory: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create {}", directory.display()))?;
    let path = directory.join(file_name);
    std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Archive written: {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

fn print_summary(result: &BatchResult, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "Generated {}/{} tags{}",
        result.successful,
        result.total,
        if result.cancelled { " (cancelled)" } else { "" }
    )?;
    for error in &result.errors {
        writeln!(out, "  {}: {}", error.name, error.error)?;
    }
    Ok(())
}

fn validate(config: &Config, input: &InputArgs, out: &mut dyn Write) -> Result<u8> {
    let raw = read_input(input)?;
    let report = config.names.validator().validate_all(&raw);
    for error in &report.errors {
        writeln!(out, "{}", error)?;
    }
    if report.is_valid() {
        writeln!(out, "{} names OK", report.names.len())?;
        Ok(EXIT_SUCCESS)
    } else {
        writeln!(
            out,
            "{} valid, {} invalid",
            report.names.len(),
            report.errors.len()
        )?;
        Ok(EXIT_INVALID_INPUT)
    }
}

fn preview(config: &Config, args: &PreviewArgs, out: &mut dyn Write) -> Result<u8> {
    let name = match config.names.validator().validate_name(&args.name) {
        Ok(name) => name,
        Err(reason) => {
            writeln!(out, "{}: {}", args.name.trim(), reason)?;
            return Ok(EXIT_INVALID_INPUT);
        }
    };

    let family = args.font.as_deref().or(config.preview.font_family.as_deref());
    let mut session = PreviewSession::with_font(config.geometry.clone(), family);
    let (width, height) = (config.preview.width, config.preview.height);
    session
        .camera
        .update_aspect_ratio(width as f32, height as f32);
    session.load_name(&name)?;
    if args.yaw.is_some() || args.pitch.is_some() {
        let yaw = args.yaw.unwrap_or(session.camera.yaw.to_degrees());
        let pitch = args.pitch.unwrap_or(session.camera.pitch.to_degrees());
        session.camera.set_view(yaw, pitch);
    }

    let path = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}_preview.svg", name.file_stem())));
    let summary = format!(
        "{:?} glyphs, {} triangles",
        session.glyph_source(),
        session.model().map_or(0, |model| model.triangle_count())
    );

    if !(args.turntable || config.preview.auto_rotate) {
        write_svg(&path, &session.render_svg(width, height))?;
        writeln!(out, "Wrote {} ({})", path.display(), summary)?;
        return Ok(EXIT_SUCCESS);
    }

    session.toggle_auto_rotate();
    let step = 360.0 / (AUTO_ROTATE_SPEED_DEG * TURNTABLE_FRAMES as f32);
    for frame in 1..=TURNTABLE_FRAMES {
        if frame > 1 {
            session.tick(step);
        }
        let frame_path = turntable_frame_path(&path, frame);
        write_svg(&frame_path, &session.render_svg(width, height))?;
        writeln!(out, "Wrote {}", frame_path.display())?;
    }
    writeln!(out, "{} turntable frames ({})", TURNTABLE_FRAMES, summary)?;
    Ok(EXIT_SUCCESS)
}

fn write_svg(path: &Path, svg: &str) -> Result<()> {
    std::fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))
}

/// `tag.svg` -> `tag_01.svg`
fn turntable_frame_path(path: &Path, frame: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "preview".to_string());
    path.with_file_name(format!("{}_{:02}.svg", stem, frame))
}

fn fonts(out: &mut dyn Write) -> Result<u8> {
    let families = list_font_families();
    for family in &families {
        writeln!(out, "{}", family)?;
    }
    info!("Found {} font families", families.len());
    Ok(EXIT_SUCCESS)
}

fn check_openscad(config: &Config, out: &mut dyn Write) -> Result<u8> {
    let runner = match OpenScadRunner::resolve(
        config.export.openscad_path.as_deref(),
        config.export.openscad_timeout(),
    ) {
        Ok(runner) => runner,
        Err(e) => {
            writeln!(out, "{}", e)?;
            return Ok(EXIT_FAILURE);
        }
    };
    match runner.version() {
        Ok(version) => {
            writeln!(out, "{}: {}", runner.executable().display(), version)?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            writeln!(out, "{}: {}", runner.executable().display(), e)?;
            Ok(EXIT_FAILURE)
        }
    }
}

fn init_config(path: Option<&Path>, force: bool, out: &mut dyn Write) -> Result<u8> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default()
        .save_to_file(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writeln!(out, "Wrote default configuration to {}", path.display())?;
    Ok(EXIT_SUCCESS)
}
