//! Command-line parsing.
//!
//! Arguments are parsed by hand into a [`Cli`]; nothing here touches the
//! filesystem except [`InputArgs::read`].

use nametagkit_settings::ExporterKind;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: nametagkit [OPTIONS] <COMMAND>

Commands:
  generate [NAMES...]     Generate tags and package them into a zip archive
      --file <PATH|->         Read names from a file, one per line (- for stdin)
      --out <DIR>             Output directory
      --exporter <KIND>       native or openscad
      --merged                Union touching bodies before export
      --sources               Include OpenSCAD sources and the batch script
      --loose                 Write STL files directly instead of an archive
  validate [NAMES...]     Check names and list every invalid line
      --file <PATH|->         Read names from a file (- for stdin)
  preview <NAME>          Render a shaded SVG preview of one tag
      --font <FAMILY>         Use an installed font instead of the built-in glyphs
      --out <FILE>            SVG file to write (default: <NAME>_preview.svg)
      --yaw <DEG>             Camera yaw in degrees
      --pitch <DEG>           Camera pitch in degrees
      --turntable             Write one full auto-rotate turn as numbered frames
  fonts                   List installed font families for --font
  check-openscad          Locate OpenSCAD and print its version
  init-config [PATH]      Write the default configuration
      --force                 Overwrite an existing file
  help                    Print this message
  version                 Print version information

Options:
  -v, --verbose           Debug logging
      --log-json          Log as JSON lines
  -c, --config <PATH>     Configuration file (TOML or JSON)
  -h, --help              Print this message
  -V, --version           Print version information
";

/// Argument errors; always reported together with [`USAGE`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("no command given")]
    MissingCommand,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("unknown option '{option}' for {command}")]
    UnknownOption { command: String, option: String },

    #[error("option '{0}' needs a value")]
    MissingValue(String),

    #[error("invalid value '{value}' for {option}: {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    MissingArgument(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// Options accepted before the command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub log_json: bool,
    pub config: Option<PathBuf>,
}

/// Where the names come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputArgs {
    pub names: Vec<String>,
    /// `-` reads standard input
    pub file: Option<PathBuf>,
}

impl InputArgs {
    /// Raw newline-separated input, exactly as the validator expects it.
    pub fn read(&self) -> std::io::Result<String> {
        let mut raw = match &self.file {
            Some(path) if path.as_os_str() == "-" => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
            Some(path) => std::fs::read_to_string(path)?,
            None => String::new(),
        };
        if !self.names.is_empty() {
            if !raw.is_empty() && !raw.ends_with('\n') {
                raw.push('\n');
            }
            raw.push_str(&self.names.join("\n"));
        }
        Ok(raw)
    }

    fn is_empty(&self) -> bool {
        self.names.is_empty() && self.file.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateArgs {
    pub input: InputArgs,
    pub out: Option<PathBuf>,
    pub exporter: Option<ExporterKind>,
    pub merged: bool,
    pub sources: bool,
    pub loose: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewArgs {
    pub name: String,
    pub font: Option<String>,
    pub out: Option<PathBuf>,
    pub yaw: Option<f32>,
    pub pitch: Option<f32>,
    pub turntable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Generate(GenerateArgs),
    Validate(InputArgs),
    Preview(PreviewArgs),
    CheckOpenScad,
    Fonts,
    InitConfig { path: Option<PathBuf>, force: bool },
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub global: GlobalOptions,
    pub command: Command,
}

/// Cursor over the remaining arguments.
struct Args {
    items: std::vec::IntoIter<String>,
}

impl Args {
    fn next(&mut self) -> Option<String> {
        self.items.next()
    }

    fn value(&mut self, option: &str) -> Result<String, CliError> {
        self.items
            .next()
            .ok_or_else(|| CliError::MissingValue(option.to_string()))
    }

    fn number(&mut self, option: &str) -> Result<f32, CliError> {
        let value = self.value(option)?;
        value.parse::<f32>().map_err(|e| CliError::InvalidValue {
            option: option.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        })
    }
}

fn unknown(command: &str, option: &str) -> CliError {
    CliError::UnknownOption {
        command: command.to_string(),
        option: option.to_string(),
    }
}

fn is_option(arg: &str) -> bool {
    arg.starts_with('-') && arg != "-"
}

impl Cli {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut args = Args {
            items: items.into_iter(),
        };
        let mut global = GlobalOptions::default();

        let command = loop {
            let Some(arg) = args.next() else {
                return Err(CliError::MissingCommand);
            };
            match arg.as_str() {
                "-v" | "--verbose" => global.verbose = true,
                "--log-json" => global.log_json = true,
                "-c" | "--config" => global.config = Some(PathBuf::from(args.value(&arg)?)),
                "-h" | "--help" | "help" => break Command::Help,
                "-V" | "--version" | "version" => break Command::Version,
                "generate" => break parse_generate(&mut args, &mut global)?,
                "validate" => break Command::Validate(parse_input(&mut args, &mut global)?),
                "preview" => break parse_preview(&mut args, &mut global)?,
                "check-openscad" => {
                    break parse_bare(&arg, Command::CheckOpenScad, &mut args, &mut global)?
                }
                "fonts" => break parse_bare(&arg, Command::Fonts, &mut args, &mut global)?,
                "init-config" => break parse_init_config(&mut args, &mut global)?,
                other if is_option(other) => return Err(unknown("nametagkit", other)),
                other => return Err(CliError::UnknownCommand(other.to_string())),
            }
        };

        Ok(Self { global, command })
    }
}

/// Global options are also accepted after the command.
fn take_global(
    arg: &str,
    args: &mut Args,
    global: &mut GlobalOptions,
) -> Result<bool, CliError> {
    match arg {
        "-v" | "--verbose" => global.verbose = true,
        "--log-json" => global.log_json = true,
        "-c" | "--config" => global.config = Some(PathBuf::from(args.value(arg)?)),
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_input(args: &mut Args, global: &mut GlobalOptions) -> Result<InputArgs, CliError> {
    let mut input = InputArgs::default();
    while let Some(arg) = args.next() {
        if take_global(&arg, args, global)? {
            continue;
        }
        match arg.as_str() {
            "-f" | "--file" => input.file = Some(PathBuf::from(args.value(&arg)?)),
            "--" => input.names.extend(args.items.by_ref()),
            other if is_option(other) => return Err(unknown("validate", other)),
            _ => input.names.push(arg),
        }
    }
    if input.is_empty() {
        return Err(CliError::MissingArgument(
            "no names given (pass names or --file)".into(),
        ));
    }
    Ok(input)
}

fn parse_generate(args: &mut Args, global: &mut GlobalOptions) -> Result<Command, CliError> {
    let mut generate = GenerateArgs::default();
    while let Some(arg) = args.next() {
        if take_global(&arg, args, global)? {
            continue;
        }
        match arg.as_str() {
            "-f" | "--file" => generate.input.file = Some(PathBuf::from(args.value(&arg)?)),
            "-o" | "--out" => generate.out = Some(PathBuf::from(args.value(&arg)?)),
            "--exporter" => {
                let value = args.value(&arg)?;
                let kind = value
                    .parse::<ExporterKind>()
                    .map_err(|e| CliError::InvalidValue {
                        option: arg.clone(),
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
                generate.exporter = Some(kind);
            }
            "--merged" => generate.merged = true,
            "--sources" => generate.sources = true,
            "--loose" => generate.loose = true,
            "--" => generate.input.names.extend(args.items.by_ref()),
            other if is_option(other) => return Err(unknown("generate", other)),
            _ => generate.input.names.push(arg),
        }
    }
    if generate.input.is_empty() {
        return Err(CliError::MissingArgument(
            "no names given (pass names or --file)".into(),
        ));
    }
    Ok(Command::Generate(generate))
}

fn parse_preview(args: &mut Args, global: &mut GlobalOptions) -> Result<Command, CliError> {
    let mut preview = PreviewArgs::default();
    let mut name = None;
    while let Some(arg) = args.next() {
        if take_global(&arg, args, global)? {
            continue;
        }
        match arg.as_str() {
            "--font" => preview.font = Some(args.value(&arg)?),
            "-o" | "--out" => preview.out = Some(PathBuf::from(args.value(&arg)?)),
            "--yaw" => preview.yaw = Some(args.number(&arg)?),
            "--pitch" => preview.pitch = Some(args.number(&arg)?),
            "--turntable" => preview.turntable = true,
            other if is_option(other) => return Err(unknown("preview", other)),
            _ if name.is_none() => name = Some(arg),
            _ => return Err(CliError::UnexpectedArgument(arg)),
        }
    }
    preview.name = name.ok_or_else(|| CliError::MissingArgument("preview needs a name".into()))?;
    Ok(Command::Preview(preview))
}

fn parse_init_config(args: &mut Args, global: &mut GlobalOptions) -> Result<Command, CliError> {
    let mut path = None;
    let mut force = false;
    while let Some(arg) = args.next() {
        if take_global(&arg, args, global)? {
            continue;
        }
        match arg.as_str() {
            "--force" => force = true,
            other if is_option(other) => return Err(unknown("init-config", other)),
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => return Err(CliError::UnexpectedArgument(arg)),
        }
    }
    Ok(Command::InitConfig { path, force })
}

/// Commands that take no arguments of their own.
fn parse_bare(
    name: &str,
    command: Command,
    args: &mut Args,
    global: &mut GlobalOptions,
) -> Result<Command, CliError> {
    while let Some(arg) = args.next() {
        if take_global(&arg, args, global)? {
            continue;
        }
        if is_option(&arg) {
            return Err(unknown(name, &arg));
        }
        return Err(CliError::UnexpectedArgument(arg));
    }
    Ok(command)
}
