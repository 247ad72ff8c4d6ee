//! `serial-label`: look up serial ranges, render labels, and print them.

mod render;
mod session;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use serial_label_core::alias::{
    DESCRIPTION, PART_NUMBER, QUANTITY, RANGE_FROM, RANGE_TO, REVISION, TEMPLATE,
};
use serial_label_core::{
    AliasGroup, FieldId, LabelContent, RenderRequest, Template, resolve_column,
    resolve_template,
};
use serial_label_print_client::{FilePrinter, Printer, send_copies};
use serial_label_render::{
    PlaceholderEncoder, RenderAssets, RenderReport, load_font, load_logo, render_raster,
    render_zpl,
};
use tracing::{debug, warn};

use crate::render::{Format, print_error, print_json, print_report_pretty, print_table};
use crate::session::{DEFAULT_SETTINGS_FILE, Session};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "serial-label",
    version,
    about = "Look up serial numbers in range datasets and render or print product labels"
)]
struct Cli {
    /// Output mode: "pretty" for terminal text, "json" for machine-readable
    /// JSON. Defaults to "pretty" when stdout is a TTY, "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug)]
struct SettingsArg {
    /// Settings file (missing keys take their defaults).
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Find the dataset row whose serial range contains SERIAL.
    Lookup {
        serial: String,
        /// Dataset file (.csv or .json).
        #[arg(long)]
        data: PathBuf,
        #[command(flatten)]
        settings: SettingsArg,
    },

    /// Show which dataset columns the built-in aliases resolve to.
    Columns {
        /// Dataset file (.csv or .json).
        #[arg(long)]
        data: PathBuf,
    },

    /// Render a label to PNG and/or ZPL. Without SERIAL, sample content is used.
    Render {
        serial: Option<String>,
        /// Dataset file; required when SERIAL is given.
        #[arg(long, requires = "serial")]
        data: Option<PathBuf>,
        #[command(flatten)]
        settings: SettingsArg,
        /// Write the bitmap here.
        #[arg(long, required_unless_present = "zpl")]
        png: Option<PathBuf>,
        /// Write the ZPL document here.
        #[arg(long)]
        zpl: Option<PathBuf>,
        /// Template id (1, 2, or 3) overriding the settings.
        #[arg(long)]
        template: Option<String>,
        /// Logo image overriding the settings.
        #[arg(long)]
        logo: Option<PathBuf>,
        /// TrueType font overriding the settings.
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Render a label as ZPL and send it to a printer or file.
    Print {
        serial: String,
        /// Dataset file (.csv or .json).
        #[arg(long)]
        data: PathBuf,
        #[command(flatten)]
        settings: SettingsArg,
        /// Printer address: `IP`, `IP:PORT`, `host`, or `host:PORT`.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        printer: Option<String>,
        /// Append the document to this file instead of printing.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Replace the contents of `--file` instead of appending.
        #[arg(long, requires = "file")]
        overwrite: bool,
        /// Number of copies.
        #[arg(long, default_value_t = 1)]
        copies: usize,
        /// Template id (1, 2, or 3) overriding the settings.
        #[arg(long)]
        template: Option<String>,
        /// Logo image overriding the settings.
        #[arg(long)]
        logo: Option<PathBuf>,
    },

    /// Show or manage the settings file.
    Settings {
        #[command(subcommand)]
        action: SettingsCmd,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCmd {
    /// Print the settings in effect (file merged over defaults).
    Show {
        #[command(flatten)]
        settings: SettingsArg,
    },
    /// Write the defaults if the settings file does not exist.
    Init {
        #[command(flatten)]
        settings: SettingsArg,
    },
    /// Overwrite the settings file with the defaults.
    Reset {
        #[command(flatten)]
        settings: SettingsArg,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match run(cli.cmd, format) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            print_error(format, &err);
            process::exit(1);
        }
    }
}

/// Run one command. `Ok(false)` means the command completed but its
/// outcome is a failure (serial not found).
fn run(cmd: Cmd, format: Format) -> Result<bool> {
    match cmd {
        Cmd::Lookup {
            serial,
            data,
            settings,
        } => cmd_lookup(&serial, &data, &settings.settings, format),
        Cmd::Columns { data } => cmd_columns(&data, format).map(|()| true),
        Cmd::Render {
            serial,
            data,
            settings,
            png,
            zpl,
            template,
            logo,
            font,
        } => {
            let mut session = Session::open(settings.settings);
            apply_template_override(&mut session, template.as_deref())?;
            let label = match (serial.as_deref(), data.as_deref()) {
                (Some(serial), Some(data)) => {
                    session.load_dataset(data)?;
                    match found_content(&session, serial)? {
                        Some(found) => found,
                        None => return not_found(serial, format),
                    }
                }
                (Some(_), None) => bail!("--data is required when a serial is given"),
                _ => (LabelContent::sample(), session.settings().template),
            };
            let assets = load_assets(&session, logo.as_deref(), font.as_deref());
            cmd_render(&session, &label, &assets, png.as_deref(), zpl.as_deref(), format)
                .map(|()| true)
        }
        Cmd::Print {
            serial,
            data,
            settings,
            printer,
            file,
            overwrite,
            copies,
            template,
            logo,
        } => {
            let mut session = Session::open(settings.settings);
            apply_template_override(&mut session, template.as_deref())?;
            session.load_dataset(&data)?;
            let Some(label) = found_content(&session, &serial)? else {
                return not_found(&serial, format);
            };
            let assets = load_assets(&session, logo.as_deref(), None);
            let target = match (printer, file) {
                (Some(addr), _) => Target::Printer(addr),
                (None, Some(path)) => Target::File { path, overwrite },
                (None, None) => bail!("pass --printer or --file"),
            };
            cmd_print(&session, &label, &assets, &target, copies, format).map(|()| true)
        }
        Cmd::Settings { action } => cmd_settings(action, format).map(|()| true),
    }
}

// ── Shared steps ────────────────────────────────────────────────────────

fn apply_template_override(session: &mut Session, raw: Option<&str>) -> Result<()> {
    if let Some(raw) = raw {
        let Some(template) = Template::parse(raw) else {
            bail!("invalid template '{raw}' (expected 1, 2, or 3)");
        };
        session.settings_mut().template = template;
    }
    Ok(())
}

/// Label content and effective template for `serial`, or `None` when no
/// row's range contains it.
fn found_content(session: &Session, serial: &str) -> Result<Option<(LabelContent, Template)>> {
    let result = session.lookup(serial)?;
    Ok(result.row().map(|row| {
        (
            LabelContent::from_match(row, serial),
            resolve_template(session.settings().template, Some(row)),
        )
    }))
}

fn not_found(serial: &str, format: Format) -> Result<bool> {
    match format {
        Format::Pretty => eprintln!("serial '{}' not found in any range", serial.trim()),
        Format::Json => print_json(&json!({
            "success": false,
            "status": "not_found",
            "serial": serial.trim(),
        })),
    }
    Ok(false)
}

/// Logo and font from the flags, falling back to the settings' paths.
/// Files that fail to load are skipped with a warning.
fn load_assets(session: &Session, logo: Option<&Path>, font: Option<&Path>) -> RenderAssets {
    let settings = session.settings();
    let mut assets = RenderAssets::new();

    let logo_path = logo
        .map(Path::to_path_buf)
        .or_else(|| settings.logo_path.as_ref().map(PathBuf::from));
    if let Some(path) = logo_path {
        match load_logo(&path) {
            Ok(img) => assets = assets.with_logo(img),
            Err(e) => warn!(error = %e, "logo not loaded, using company text"),
        }
    }

    let font_path = font
        .map(Path::to_path_buf)
        .or_else(|| settings.font_path.as_ref().map(PathBuf::from));
    if let Some(path) = font_path {
        match load_font(&path) {
            Ok(f) => assets = assets.with_font(f),
            Err(e) => warn!(error = %e, "font not loaded, using built-in font"),
        }
    }
    debug!(?assets, "render assets");
    assets
}

fn report_json(report: &RenderReport) -> serde_json::Value {
    serde_json::to_value(report).unwrap_or_default()
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_lookup(serial: &str, data: &Path, settings_path: &Path, format: Format) -> Result<bool> {
    let mut session = Session::open(settings_path);
    session.load_dataset(data)?;
    let result = session.lookup(serial)?;

    let found = result.row().map(|row| {
        (
            LabelContent::from_match(row, serial),
            resolve_template(session.settings().template, Some(row)),
        )
    });

    match format {
        Format::Json => {
            let mut out = json!({
                "success": found.is_some(),
                "serial": serial.trim(),
                "match_count": result.match_count(),
                "result": result,
            });
            if let Some((content, template)) = &found {
                out["template"] = json!(template.id());
                out["fields"] = json!(content);
            }
            print_json(&out);
        }
        Format::Pretty => match &found {
            Some((content, template)) => {
                println!("found: key {} in {} row(s)", result.key(), result.match_count());
                if result.match_count() > 1 {
                    println!("note: multiple ranges match, using the first");
                }
                let described = format!("{template} ({})", template.describe());
                let mut rows = vec![("template", described)];
                for f in RenderRequest::build(session.settings(), content, *template).fields {
                    rows.push((f.caption, f.text));
                }
                print_table(rows);
            }
            None => println!("not found: key {} is outside every range", result.key()),
        },
    }
    Ok(found.is_some())
}

fn cmd_columns(data: &Path, format: Format) -> Result<()> {
    let mut session = Session::open(DEFAULT_SETTINGS_FILE);
    let dataset = session.load_dataset(data)?;
    let groups: [(&str, &AliasGroup); 7] = [
        ("range_from", &*RANGE_FROM),
        ("range_to", &*RANGE_TO),
        ("description", &*DESCRIPTION),
        ("part_number", &*PART_NUMBER),
        ("revision", &*REVISION),
        ("quantity", &*QUANTITY),
        ("template", &*TEMPLATE),
    ];
    let resolved: Vec<(&str, Option<&str>)> = groups
        .iter()
        .map(|(name, group)| {
            (*name, resolve_column(group, dataset.columns().iter().map(String::as_str)))
        })
        .collect();

    match format {
        Format::Json => {
            let map: serde_json::Map<_, _> = resolved
                .iter()
                .map(|(name, col)| ((*name).to_string(), json!(col)))
                .collect();
            print_json(&json!({
                "success": true,
                "columns": dataset.columns(),
                "rows": dataset.len(),
                "resolved": map,
            }));
        }
        Format::Pretty => {
            println!("{} columns, {} rows", dataset.columns().len(), dataset.len());
            print_table(
                resolved
                    .iter()
                    .map(|(name, col)| (*name, col.unwrap_or("(none)").to_string())),
            );
        }
    }
    Ok(())
}

fn cmd_render(
    session: &Session,
    (content, template): &(LabelContent, Template),
    assets: &RenderAssets,
    png: Option<&Path>,
    zpl: Option<&Path>,
    format: Format,
) -> Result<()> {
    let request = RenderRequest::build(session.settings(), content, *template);
    let mut outputs = Vec::new();
    let mut reports = serde_json::Map::new();

    if let Some(path) = png {
        let label = render_raster(&request, &PlaceholderEncoder, assets);
        label
            .write_png(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        if format == Format::Pretty {
            println!("wrote {} (template {template})", path.display());
            print_report_pretty(label.report());
        }
        reports.insert("png".into(), report_json(label.report()));
        outputs.push(path.display().to_string());
    }

    if let Some(path) = zpl {
        let label = render_zpl(&request, assets);
        label
            .write_to(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        if format == Format::Pretty {
            println!("wrote {} (template {template})", path.display());
            print_report_pretty(label.report());
        }
        reports.insert("zpl".into(), report_json(label.report()));
        outputs.push(path.display().to_string());
    }

    if format == Format::Json {
        print_json(&json!({
            "success": true,
            "template": template.id(),
            "serial": content.get(FieldId::Serial),
            "outputs": outputs,
            "reports": reports,
        }));
    }
    Ok(())
}

enum Target {
    Printer(String),
    File { path: PathBuf, overwrite: bool },
}

fn open_printer(target: &Target) -> Result<Box<dyn Printer>> {
    match target {
        #[cfg(feature = "tcp")]
        Target::Printer(addr) => {
            let printer = serial_label_print_client::TcpPrinter::connect(
                addr,
                serial_label_print_client::PrinterConfig::default(),
            )
            .with_context(|| format!("failed to connect to printer {addr}"))?;
            Ok(Box::new(printer))
        }
        #[cfg(not(feature = "tcp"))]
        Target::Printer(_) => bail!("built without TCP printer support"),
        Target::File { path, overwrite: true } => Ok(Box::new(FilePrinter::create(path)?)),
        Target::File { path, overwrite: false } => Ok(Box::new(FilePrinter::append(path)?)),
    }
}

fn cmd_print(
    session: &Session,
    (content, template): &(LabelContent, Template),
    assets: &RenderAssets,
    target: &Target,
    copies: usize,
    format: Format,
) -> Result<()> {
    let request = RenderRequest::build(session.settings(), content, *template);
    let label = render_zpl(&request, assets);
    let mut printer = open_printer(target)?;
    let sent = send_copies(&mut printer, label.as_str(), copies).context("print failed")?;

    let destination = match target {
        Target::Printer(addr) => addr.clone(),
        Target::File { path, .. } => path.display().to_string(),
    };
    match format {
        Format::Json => print_json(&json!({
            "success": true,
            "destination": destination,
            "copies": sent,
            "template": template.id(),
            "report": report_json(label.report()),
        })),
        Format::Pretty => {
            println!("sent {sent} label(s) to {destination} (template {template})");
            print_report_pretty(label.report());
        }
    }
    Ok(())
}

fn cmd_settings(action: SettingsCmd, format: Format) -> Result<()> {
    let (status, session) = match action {
        SettingsCmd::Show { settings } => ("shown", Session::open(settings.settings)),
        SettingsCmd::Init { settings } => {
            let session = Session::open(settings.settings);
            if session.settings_path().exists() {
                ("exists", session)
            } else {
                session.save_settings()?;
                ("created", session)
            }
        }
        SettingsCmd::Reset { settings } => {
            let mut session = Session::open(settings.settings);
            session.reset_settings()?;
            ("reset", session)
        }
    };
    let path = session.settings_path().display().to_string();

    match format {
        Format::Json => print_json(&json!({
            "success": true,
            "status": status,
            "path": path,
            "settings": session.settings(),
        })),
        Format::Pretty => match status {
            "shown" => println!("{}", session.settings().to_json_pretty()),
            "exists" => println!("{path} already exists, left unchanged"),
            _ => println!("{status} {path}"),
        },
    }
    Ok(())
}
