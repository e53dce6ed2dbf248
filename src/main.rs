use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use tempfile::NamedTempFile;

use lamulana_script::{decode_container, encode_container, FontTable};

const FONT_FILE_NAME: &str = "fontChars.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Binary script (.dat) to text
    Decode,
    /// Text script (.txt) to binary
    Encode,
}

#[derive(Parser)]
#[command(name = "lmscript", version)]
#[command(about = "LA-MULANA script decoder/encoder", long_about = None)]
struct Cli {
    /// Script to convert: a .dat file is decoded, a .txt file is encoded
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Font character table [default: fontChars.txt next to FILE]
    #[arg(short, long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Output file [default: FILE_dec.txt or FILE_enc.dat next to FILE]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Conversion direction, instead of guessing from the extension
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// More logging, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

// everything a run needs, resolved up front
#[derive(Debug)]
struct Config {
    input: PathBuf,
    font: PathBuf,
    output: PathBuf,
    mode: Mode,
}

impl Config {
    fn from_cli(cli: Cli) -> Result<Self> {
        let mode = match cli.mode {
            Some(mode) => mode,
            None => match cli.input.extension().and_then(|ext| ext.to_str()) {
                Some("dat") => Mode::Decode,
                Some("txt") => Mode::Encode,
                _ => bail!(
                    "can't tell whether to decode or encode {}, pass --mode",
                    cli.input.display()
                ),
            },
        };
        let dir = cli.input.parent().unwrap_or_else(|| Path::new(""));
        let font = cli.font.unwrap_or_else(|| dir.join(FONT_FILE_NAME));
        let output = match cli.output {
            Some(output) => output,
            None => {
                let stem = cli
                    .input
                    .file_stem()
                    .with_context(|| format!("{} has no file name", cli.input.display()))?
                    .to_string_lossy();
                match mode {
                    Mode::Decode => dir.join(format!("{}_dec.txt", stem)),
                    Mode::Encode => dir.join(format!("{}_enc.dat", stem)),
                }
            }
        };
        Ok(Config {
            input: cli.input,
            font,
            output,
            mode,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_font(path: &Path) -> Result<FontTable> {
    if !path.is_file() {
        bail!("{} not found", path.display());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read font table {}", path.display()))?;
    let font = FontTable::from_lines(&text)
        .with_context(|| format!("bad font table {}", file_name(path)))?;
    Ok(font)
}

// the output only appears once it is complete
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;
    tmp.write_all(contents)?;
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn run(config: &Config) -> Result<()> {
    if !config.input.is_file() {
        bail!("{} doesn't exist", file_name(&config.input));
    }
    let font = load_font(&config.font)?;
    println!("{} contains {} characters.", file_name(&config.font), font.len());

    let output = match config.mode {
        Mode::Decode => {
            println!("Decoding {}...", file_name(&config.input));
            let bytes = fs::read(&config.input)
                .with_context(|| format!("failed to read {}", config.input.display()))?;
            decode_container(&bytes, &font)
                .with_context(|| format!("failed to decode {}", file_name(&config.input)))?
                .into_bytes()
        }
        Mode::Encode => {
            println!("Encoding {}...", file_name(&config.input));
            let text = fs::read_to_string(&config.input)
                .with_context(|| format!("failed to read {}", config.input.display()))?;
            encode_container(&text, &font)
                .with_context(|| format!("failed to encode {}", file_name(&config.input)))?
        }
    };

    write_atomic(&config.output, &output)?;
    info!("wrote {} bytes to {}", output.len(), config.output.display());
    println!("Wrote {}", file_name(&config.output));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = Config::from_cli(cli)?;
    log::debug!("{:?}", config);
    run(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("lmscript").chain(args.iter().copied()))
    }

    #[test]
    fn test_mode_from_extension() {
        let config = Config::from_cli(cli(&["data/script.dat"])).unwrap();
        assert_eq!(config.mode, Mode::Decode);
        assert_eq!(config.font, Path::new("data").join("fontChars.txt"));
        assert_eq!(config.output, Path::new("data").join("script_dec.txt"));

        let config = Config::from_cli(cli(&["data/script.txt"])).unwrap();
        assert_eq!(config.mode, Mode::Encode);
        assert_eq!(config.output, Path::new("data").join("script_enc.dat"));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(Config::from_cli(cli(&["script.bin"])).is_err());
        let config = Config::from_cli(cli(&["script.bin", "--mode", "decode"])).unwrap();
        assert_eq!(config.mode, Mode::Decode);
        assert_eq!(config.output, PathBuf::from("script_dec.txt"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_cli(cli(&[
            "script.dat",
            "--font",
            "fonts/jp.txt",
            "-o",
            "out.txt",
        ]))
        .unwrap();
        assert_eq!(config.font, PathBuf::from("fonts/jp.txt"));
        assert_eq!(config.output, PathBuf::from("out.txt"));
    }
}
