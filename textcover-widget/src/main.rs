//! textcover — command-line front end for the text cover widget.
//!
//! Each subcommand maps to one widget lifecycle event (`update`, `delete`),
//! the settings editor (`settings show|save`), or a standalone render.
//! Logging goes through `env_logger`; set `RUST_LOG=info` to see it.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use textcover_core::{rotation_angle, WidgetId, WidgetSettings};
use textcover_text::{render, RenderConfig};
use textcover_widget::{build_engine, App, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "textcover", version, about = "Render text covers for home-screen widgets")]
struct Cli {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Preference file, overrides the config.
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,
    /// Widget image directory, overrides the config.
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render text to a PNG file without touching any widget.
    Render {
        /// Text to render; `\n` starts a new line.
        #[arg(long)]
        text: String,
        /// Text size in pixels (defaults to the configured size).
        #[arg(long)]
        size: Option<f32>,
        /// Rotation selector position (angle = position * 45).
        #[arg(long, conflicts_with = "angle", allow_hyphen_values = true)]
        rotation: Option<i32>,
        /// Rotation in degrees, clockwise.
        #[arg(long, allow_hyphen_values = true)]
        angle: Option<i32>,
        /// Draw every line at the left edge.
        #[arg(long)]
        no_center: bool,
        /// Output PNG file.
        #[arg(long)]
        out: PathBuf,
    },
    /// Re-render the given widgets from their stored settings.
    Update {
        #[arg(required = true)]
        ids: Vec<i32>,
    },
    /// Forget the stored settings of the given widgets.
    Delete {
        #[arg(required = true)]
        ids: Vec<i32>,
    },
    /// Inspect or change the settings of a front/back widget pair.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print the settings the editor would open with.
    Show(Pair),
    /// Validate, display and store new settings for both widgets.
    Save {
        #[command(flatten)]
        pair: Pair,
        #[arg(long)]
        text: String,
        /// Rotation selector position, 0..=7.
        #[arg(long, default_value_t = 0)]
        rotation: i32,
        #[arg(long)]
        no_center: bool,
    },
}

#[derive(Args, Debug)]
struct Pair {
    #[arg(long)]
    front: i32,
    #[arg(long)]
    back: i32,
}

/// Turn the two-character sequence `\n` into a line break.
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(prefs) = &cli.prefs {
        config.prefs_path = prefs.clone();
    }
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn widget_ids(ids: &[i32]) -> Vec<WidgetId> {
    ids.iter().copied().map(WidgetId).collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Render {
            text,
            size,
            rotation,
            angle,
            no_center,
            out,
        } => {
            // Standalone render needs neither the store nor the host.
            let mut engine = build_engine(&config);
            let degrees = angle.or(rotation.map(rotation_angle)).unwrap_or(0);
            let render_config =
                RenderConfig::new(size.unwrap_or(config.text_size), degrees, !no_center);
            let image = render(&mut engine, &unescape_newlines(&text), &render_config)?;
            image
                .save_png(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            info!("Rendered {}x{} to {}", image.width(), image.height(), out.display());
            println!("{}", out.display());
        }
        Command::Update { ids } => {
            let mut app = App::start(config)?;
            let report = app.update(&widget_ids(&ids));
            for id in &report.updated {
                println!("updated {}", app.host().image_path(*id).display());
            }
            if !report.is_complete() {
                for (id, err) in &report.failed {
                    eprintln!("widget {id}: {err}");
                }
                bail!("{} widget(s) kept their previous image", report.failed.len());
            }
        }
        Command::Delete { ids } => {
            let mut app = App::start(config)?;
            app.delete(&widget_ids(&ids))?;
        }
        Command::Settings(SettingsCommand::Show(pair)) => {
            let app = App::start(config)?;
            let editor = app.editor(WidgetId(pair.front), WidgetId(pair.back));
            let settings = app.load_settings(&editor);
            println!("text:     {:?}", settings.text);
            println!("rotation: {} ({}°)", settings.rotation_position, settings.angle());
            println!("centered: {}", settings.center_text);
        }
        Command::Settings(SettingsCommand::Save {
            pair,
            text,
            rotation,
            no_center,
        }) => {
            let mut app = App::start(config)?;
            let editor = app.editor(WidgetId(pair.front), WidgetId(pair.back));
            let form = WidgetSettings {
                text: unescape_newlines(&text),
                rotation_position: rotation,
                center_text: !no_center,
            };
            if let Err(e) = app.save_settings(&editor, &form) {
                eprintln!("{}", e.inline_message());
                return Err(e.into());
            }
            println!("saved widgets {} and {}", editor.front(), editor.back());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_unescape_newlines() {
        assert_eq!(unescape_newlines("Hello\\nWorld"), "Hello\nWorld");
        assert_eq!(unescape_newlines("plain"), "plain");
    }

    #[test]
    fn test_parse_render_negative_angle() {
        let cli = Cli::try_parse_from([
            "textcover", "render", "--text", "Hi", "--angle", "-90", "--out", "x.png",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Render { angle: Some(-90), .. }));
    }

    #[test]
    fn test_rotation_conflicts_with_angle() {
        let parsed = Cli::try_parse_from([
            "textcover", "render", "--text", "Hi", "--rotation", "1", "--angle", "45", "--out",
            "x.png",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "textcover", "--prefs", "p.json", "update", "1", "2", "--out-dir", "imgs",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.prefs_path, PathBuf::from("p.json"));
        assert_eq!(config.output_dir, PathBuf::from("imgs"));
        assert!(matches!(cli.command, Command::Update { ref ids } if ids == &[1, 2]));
    }
}
