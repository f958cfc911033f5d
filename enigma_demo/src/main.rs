use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use enigma_core::{
    ComponentKind, MachineSettings, RotorCatalog, SearchSpace, SymbolAlphabet, assemble,
    crib_search, load_settings, save_settings,
};
use env_logger::Env;
use hex::FromHex;
use log::{LevelFilter, debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_CATALOG_SEED: &str = "enigma-extended-catalog";

#[derive(Parser)]
#[command(name = "enigma", author, version, about = "Rotor cipher machine simulator")]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    /// Use the 94-symbol alphabet with a generated rotor box.
    #[arg(long, global = true)]
    extended: bool,
    /// Seed for the generated rotor box (`hex:` prefix for raw bytes).
    #[arg(long, global = true, value_name = "SEED")]
    catalog_seed: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct MachineArgs {
    /// Rotor names, leftmost first, e.g. "I II III".
    #[arg(long, default_value = "I II III")]
    rotors: String,
    #[arg(long, default_value = "B")]
    reflector: String,
    /// 1-based ring settings, e.g. "01 01 01".
    #[arg(long, default_value = "01 01 01")]
    rings: String,
    /// Initial positions, e.g. "A A A".
    #[arg(long, default_value = "A A A")]
    positions: String,
    /// Plugboard pair such as AB; repeat for more leads.
    #[arg(long = "plug", value_name = "PAIR")]
    plugs: Vec<String>,
    /// Load the settings from a JSON file instead of the flags above.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode (or decode) a message.
    Encode {
        #[command(flatten)]
        machine: MachineArgs,
        #[arg(long, value_name = "TEXT")]
        message: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List the rotors and reflectors in the active catalog.
    Catalog {
        #[arg(long)]
        json: bool,
    },
    /// Recover a message by sweeping reflectors and initial positions.
    Crack {
        #[command(flatten)]
        machine: MachineArgs,
        #[arg(long, value_name = "TEXT")]
        ciphertext: String,
        /// Known plaintext fragment; repeat to accept any of several.
        #[arg(long, required = true)]
        crib: Vec<String>,
        /// Keep the given positions and only sweep reflectors.
        #[arg(long)]
        keep_positions: bool,
        /// Also try every reflector with two pairs of its wires crossed.
        #[arg(long)]
        cross_reflector_wires: bool,
    },
    /// Write the flag-specified settings to a JSON file.
    SaveSettings {
        #[command(flatten)]
        machine: MachineArgs,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let catalog = build_catalog(cli.extended, cli.catalog_seed.as_deref())?;
    match cli.command {
        Commands::Encode {
            machine,
            message,
            input,
            out,
        } => cmd_encode(&catalog, &machine, message, input, out),
        Commands::Catalog { json } => cmd_catalog(&catalog, json),
        Commands::Crack {
            machine,
            ciphertext,
            crib,
            keep_positions,
            cross_reflector_wires,
        } => cmd_crack(
            &catalog,
            &machine,
            &ciphertext,
            &crib,
            keep_positions,
            cross_reflector_wires,
        ),
        Commands::SaveSettings { machine, out } => cmd_save_settings(&machine, &out),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn build_catalog(extended: bool, seed: Option<&str>) -> Result<RotorCatalog> {
    if !extended {
        if seed.is_some() {
            bail!("--catalog-seed only applies together with --extended");
        }
        return Ok(RotorCatalog::classic());
    }
    let seed = parse_seed(seed.unwrap_or(DEFAULT_CATALOG_SEED))?;
    let catalog = RotorCatalog::from_seed(Arc::new(SymbolAlphabet::extended()), &seed)
        .context("generating extended catalog")?;
    debug!(
        "extended catalog seed_len={} symbols={}",
        seed.len(),
        catalog.alphabet().len()
    );
    Ok(catalog)
}

fn resolve_settings(args: &MachineArgs) -> Result<MachineSettings> {
    if let Some(path) = &args.settings {
        return load_settings(path)
            .with_context(|| format!("loading settings from {}", path.display()));
    }
    let settings = MachineSettings::parse(
        &args.rotors,
        &args.reflector,
        &args.rings,
        &args.positions,
        &args.plugs,
    )?;
    Ok(settings)
}

fn cmd_encode(
    catalog: &RotorCatalog,
    args: &MachineArgs,
    message: Option<String>,
    input: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let settings = resolve_settings(args)?;
    let text = resolve_message(message, input)?;
    let assembly = assemble(catalog, &settings).context("assembling machine")?;
    for diagnostic in &assembly.diagnostics {
        warn!(
            "plug pair {:?} skipped: {}",
            diagnostic.pair, diagnostic.error
        );
    }
    let mut machine = assembly.into_machine();
    let output = machine.encode(&text)?;
    debug!(
        "encode cmd symbols={} final_positions={:?}",
        output.chars().count(),
        machine.positions()
    );
    match out {
        Some(path) => {
            fs::write(&path, &output)
                .with_context(|| format!("writing output to {}", path.display()))?;
            println!(
                "Encoded {} symbols and wrote them to {}",
                output.chars().count(),
                path.display()
            );
        }
        None => println!("{output}"),
    }
    Ok(())
}

fn cmd_catalog(catalog: &RotorCatalog, json: bool) -> Result<()> {
    if json {
        let entries: Vec<_> = catalog
            .entries()
            .map(|(name, entry)| serde_json::json!({ "name": name, "entry": entry }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for (name, entry) in catalog.entries() {
        let kind = match entry.kind {
            ComponentKind::Rotor => "rotor",
            ComponentKind::Reflector => "reflector",
        };
        let notch = entry
            .notch
            .map(|symbol| symbol.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{name:<6} {kind:<9} notch {notch:<2} {}", entry.wiring);
    }
    Ok(())
}

fn cmd_crack(
    catalog: &RotorCatalog,
    args: &MachineArgs,
    ciphertext: &str,
    cribs: &[String],
    keep_positions: bool,
    cross_reflector_wires: bool,
) -> Result<()> {
    let base = resolve_settings(args)?;
    let mut space = SearchSpace::new(base)
        .context("building search space")?
        .with_reflectors(catalog.reflector_names());
    if cross_reflector_wires {
        space = space.crossing_reflector_wires(catalog)?;
    }
    if !keep_positions {
        space = space.sweeping_positions();
    }
    println!(
        "Trying {} candidate settings...",
        space.size(catalog.alphabet())
    );
    let hits = crib_search(
        catalog,
        ciphertext,
        cribs,
        space.candidates(catalog.alphabet()),
    );
    if hits.is_empty() {
        println!("No candidate produced any of the cribs.");
    }
    for hit in hits {
        let positions: String = hit.settings.positions.iter().collect();
        let rewiring = if hit.settings.reflector_rewiring.is_empty() {
            String::new()
        } else {
            format!(" rewired {}", hit.settings.reflector_rewiring.join(" "))
        };
        println!(
            "reflector {}{} positions {} -> {}",
            hit.settings.reflector, rewiring, positions, hit.plaintext
        );
    }
    Ok(())
}

fn cmd_save_settings(args: &MachineArgs, out: &Path) -> Result<()> {
    let settings = resolve_settings(args)?;
    save_settings(out, &settings)
        .with_context(|| format!("writing settings to {}", out.display()))?;
    println!("Wrote settings to {}", out.display());
    Ok(())
}

fn resolve_message(message: Option<String>, input: Option<PathBuf>) -> Result<String> {
    match (message, input) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => fs::read_to_string(&path)
            .map(|text| text.trim_end_matches(['\r', '\n']).to_string())
            .with_context(|| format!("reading message from {}", path.display())),
        (Some(_), Some(_)) => bail!("Provide either --message or --input, not both."),
        (None, None) => bail!("Provide --message TEXT or --input FILE to encode."),
    }
}

fn parse_seed(seed: &str) -> Result<Vec<u8>> {
    if let Some(hex) = seed.strip_prefix("hex:") {
        let bytes = Vec::from_hex(hex.trim())
            .with_context(|| "failed to parse hex-encoded catalog seed".to_string())?;
        Ok(bytes)
    } else {
        Ok(seed.as_bytes().to_vec())
    }
}
