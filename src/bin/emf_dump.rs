use anyhow::{Context, Result, bail, format_err};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use dialoguer::Confirm;
use indoc::indoc;
use log::{Level, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use emfinfo::{DecoderSettings, EmfFile, PRIMARY_HEADER_SIZE};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum OutputFormat {
    Text,
    Json,
}

struct EmfDump {
    settings: DecoderSettings,
    input: PathBuf,
    output_format: OutputFormat,
    indent: bool,
    explain: bool,
    output: Box<dyn Write>,
    verbosity_level: Option<Level>,
}

impl EmfDump {
    pub fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let input = PathBuf::from(
            matches
                .get_one::<String>("INPUT")
                .ok_or_else(|| format_err!("missing input"))?,
        );

        let format = matches
            .get_one::<String>("output-format")
            .map(String::as_str)
            .unwrap_or("text");
        let output_format = match format {
            "json" | "jsonl" => OutputFormat::Json,
            _ => OutputFormat::Text,
        };

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(Level::Info),
            2 => Some(Level::Debug),
            3 => Some(Level::Trace),
            _ => {
                eprintln!("using more than -vvv does not affect verbosity level");
                Some(Level::Trace)
            }
        };

        let output: Box<dyn Write> = if let Some(path) = matches.get_one::<String>("output-target")
        {
            Box::new(
                Self::create_output_file(path, !matches.get_flag("no-confirm-overwrite"))
                    .with_context(|| {
                        format!("An error occurred while creating output file at `{path}`")
                    })?,
            )
        } else {
            Box::new(io::stdout())
        };

        let primary_header_size = matches
            .get_one::<usize>("primary-header-size")
            .copied()
            .unwrap_or(PRIMARY_HEADER_SIZE);

        Ok(EmfDump {
            settings: DecoderSettings::new().primary_header_size(primary_header_size),
            input,
            output_format,
            indent: format != "jsonl",
            explain: matches.get_flag("explain"),
            output,
            verbosity_level,
        })
    }

    /// Main entry point for `EmfDump`
    pub fn run(&mut self) -> Result<()> {
        self.try_to_initialize_logging();

        let emf = match self.input.to_str() {
            Some("-") => EmfFile::from_reader(io::stdin().lock()),
            _ => EmfFile::from_path(&self.input),
        };
        let emf = emf
            .with_context(|| format!("Failed to read metafile {}", self.input.display()))?
            .with_configuration(self.settings.clone());

        if self.explain {
            if let Err(e) = emf.probe_emf_plus_header() {
                eprintln!("no EMF+ header: {e}");
            }
        }

        let report = emf.report();
        match self.output_format {
            OutputFormat::Text => report.write_text(&mut self.output)?,
            OutputFormat::Json => writeln!(self.output, "{}", report.to_json(self.indent)?)?,
        }
        self.output.flush()?;

        Ok(())
    }

    /// If `prompt` is passed, will display a confirmation prompt before overwriting files.
    fn create_output_file(path: impl AsRef<Path>, prompt: bool) -> Result<File> {
        let p = path.as_ref();

        if p.is_dir() {
            bail!(
                "There is a directory at {}, refusing to overwrite",
                p.display()
            );
        }

        if p.exists() && prompt {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Are you sure you want to override output file at {}",
                    p.display()
                ))
                .default(false)
                .interact()
                .context("Failed to write confirmation prompt to term")?;

            if !confirmed {
                bail!("Cancelled");
            }
        }

        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(File::create(p)?)
    }

    fn try_to_initialize_logging(&self) {
        if let Some(level) = self.verbosity_level {
            let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
            if let Err(e) = TermLogger::init(
                level.to_level_filter(),
                config,
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ) {
                eprintln!("Failed to initialize logging: {}", e);
            }
        }
    }
}

fn command() -> Command {
    Command::new("EMF Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility to inspect EMF headers and their EMF+ header")
        .arg(
            Arg::new("INPUT")
                .required(true)
                .help("Path to an .emf file, or `-` to read from stdin."),
        )
        .arg(
            Arg::new("output-format")
                .short('o')
                .long("format")
                .value_parser(["text", "json", "jsonl"])
                .default_value("text")
                .help("Sets the output format")
                .long_help(indoc!(
                    r#"
                    Sets the output format:
                        "text"  - prints a human readable summary.
                        "json"  - prints an indented JSON document.
                        "jsonl" - same as json, on a single line.
                    "#
                )),
        )
        .arg(
            Arg::new("output-target")
                .long("output")
                .short('f')
                .value_name("PATH")
                .help("Writes output to the file specified instead of stdout, errors will still be printed to stderr. \
                       Will ask for confirmation before overwriting files, to allow overwriting, pass `--no-confirm-overwrite`. \
                       Will create parent directories if needed."),
        )
        .arg(
            Arg::new("no-confirm-overwrite")
                .long("no-confirm-overwrite")
                .action(ArgAction::SetTrue)
                .help("When set, will not ask for confirmation before overwriting files, useful for automation"),
        )
        .arg(
            Arg::new("primary-header-size")
                .long("primary-header-size")
                .value_name("BYTES")
                .value_parser(value_parser!(usize))
                .help("Base added to the description offset when looking for the EMF+ comment record (default: 108)."),
        )
        .arg(
            Arg::new("explain")
                .long("explain")
                .action(ArgAction::SetTrue)
                .help("When no EMF+ header is found, print the reason to stderr."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("-v - info, -vv - debug, -vvv - trace"),
        )
}

fn main() {
    let matches = command().get_matches();

    let result = EmfDump::from_cli_matches(&matches).and_then(|mut app| app.run());
    if let Err(e) = result {
        eprintln!("{:?}", e);
        exit(1);
    }
}
