//! sprite-anim — inspect and dry-run animation scripts from the terminal.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sprite_anim::anim::{AnimationLoader, LoadError};
use sprite_anim::config::{self, AnimConfig};

#[derive(Parser, Debug)]
#[command(name = "sprite-anim", version, about = "Sprite animation script tool")]
struct Cli {
    /// Config file (default: ~/.sprite-anim/config.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a script and list its parameters and states.
    Check {
        file: PathBuf,
    },
    /// Apply parameter writes, then tick and print the frame after each tick.
    Play {
        file: PathBuf,
        /// Parameter write, applied in order.
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        sets: Vec<(String, String)>,
        /// Number of ticks to run.
        #[arg(long, default_value_t = 10)]
        ticks: u32,
    },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sprite_anim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match config::load_config_from(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("failed to read config {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => config::load_config().unwrap_or_default(),
    };

    let result = match &cli.command {
        Command::Check { file } => check(file, config),
        Command::Play { file, sets, ticks } => play(file, config, sets, *ticks),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn check(file: &Path, config: AnimConfig) -> Result<(), LoadError> {
    let loader = AnimationLoader::new(config);
    let anim = loader.load(file)?;

    println!("parameters:");
    for p in anim.parameters() {
        println!("  {} {}", p.ty, p.name);
    }
    println!("states:");
    for state in anim.definition().states.values() {
        println!(
            "  {:<24} {} frame(s)  line {}",
            format!("\"{}\"", state.key),
            state.textures.len(),
            state.line
        );
    }
    Ok(())
}

fn play(
    file: &Path,
    config: AnimConfig,
    sets: &[(String, String)],
    ticks: u32,
) -> Result<(), LoadError> {
    let loader = AnimationLoader::new(config);
    let mut anim = loader.load(file)?;

    for (name, value) in sets {
        anim.set_string(name, value)?;
    }
    println!("key: \"{}\"", anim.current_key());

    for tick in 1..=ticks {
        anim.tick()?;
        let frame = anim.current_frame()?;
        let path = loader
            .images()
            .path(frame)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("#{}", frame.0));
        println!("{tick:>4}  [{}] {path}", anim.frame_index()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_parsing() {
        assert_eq!(
            parse_assignment("facing=left"),
            Ok(("facing".to_string(), "left".to_string()))
        );
        assert_eq!(
            parse_assignment("label="),
            Ok(("label".to_string(), String::new()))
        );
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("facing").is_err());
    }

    #[test]
    fn cli_parses_play() {
        let cli = Cli::try_parse_from([
            "sprite-anim",
            "play",
            "hero.anim",
            "--set",
            "action=run",
            "--set",
            "hurt=true",
            "--ticks",
            "3",
        ])
        .unwrap();
        match cli.command {
            Command::Play { sets, ticks, .. } => {
                assert_eq!(sets.len(), 2);
                assert_eq!(sets[1], ("hurt".to_string(), "true".to_string()));
                assert_eq!(ticks, 3);
            }
            other => panic!("expected play, got {other:?}"),
        }
    }
}
