use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use mutiny::{
    FieldCase, FixtureGenerator, GenerationConfig, JsonEncoder, Payload, PayloadDescription,
    Selection,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mutiny")]
#[command(about = "Generate combinatorial API payload fixtures", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SelectionArgs {
    /// Path to the JSON payload description
    description: PathBuf,

    /// Activate a category on a field, e.g. --select CountryCode=erroneous
    #[arg(short, long = "select", value_name = "FIELD=CATEGORY", value_parser = parse_selection)]
    selections: Vec<(String, Selection)>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one request body per combination
    Generate {
        #[command(flatten)]
        input: SelectionArgs,

        /// Wire naming convention: snake, camel, kebab or preserve
        #[arg(long, default_value = "snake")]
        case: FieldCase,

        /// Fail when a field has no active candidates instead of dropping it
        #[arg(long)]
        strict: bool,

        /// Refuse to generate more fixtures than this
        #[arg(long)]
        max_fixtures: Option<usize>,

        /// Pretty-print bodies (only with --output)
        #[arg(long, requires = "output")]
        pretty: bool,

        /// Write fixture_NNNN.json files into this directory instead of
        /// printing one body per line
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the active candidates per field and the number of combinations
    Inspect {
        #[command(flatten)]
        input: SelectionArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            input,
            case,
            strict,
            max_fixtures,
            pretty,
            output,
        } => {
            let payload = load_payload(&input)?;
            let config = GenerationConfig {
                field_formatter: case.formatter(),
                strict,
                max_fixtures,
            };
            generate_fixtures(&payload, config, pretty, output.as_deref())
        }
        Commands::Inspect { input } => {
            let payload = load_payload(&input)?;
            inspect(&payload)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_selection(arg: &str) -> Result<(String, Selection), String> {
    let (field, category) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=CATEGORY, got '{}'", arg))?;
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", arg));
    }
    let selection = category.parse::<Selection>().map_err(|e| e.to_string())?;
    Ok((field.to_string(), selection))
}

fn load_payload(input: &SelectionArgs) -> Result<PayloadDescription> {
    let text = fs::read_to_string(&input.description).context(format!(
        "Failed to read description '{}'",
        input.description.display()
    ))?;
    let payload: PayloadDescription = serde_json::from_str(&text).context(format!(
        "Failed to parse description '{}'",
        input.description.display()
    ))?;

    let selections = input
        .selections
        .iter()
        .map(|(field, selection)| (field.as_str(), *selection));
    let payload = payload
        .select_all(selections)
        .context("Failed to apply selections")?;

    tracing::debug!(fields = payload.len(), "loaded payload description");
    Ok(payload)
}

fn generate_fixtures(
    payload: &PayloadDescription,
    config: GenerationConfig,
    pretty: bool,
    output: Option<&Path>,
) -> Result<()> {
    let encoder = if pretty {
        JsonEncoder::pretty()
    } else {
        JsonEncoder::new()
    };
    let fixtures = FixtureGenerator::new()
        .config(config)
        .encoder(encoder)
        .generate(payload)
        .context("Failed to generate fixtures")?;

    let Some(dir) = output else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for fixture in &fixtures {
            out.write_all(fixture.body())?;
            out.write_all(b"\n")?;
        }
        return Ok(());
    };

    fs::create_dir_all(dir)
        .context(format!("Failed to create output directory '{}'", dir.display()))?;

    for (idx, fixture) in fixtures.iter().enumerate() {
        let path = dir.join(format!("fixture_{:04}.json", idx + 1));
        fs::write(&path, fixture.body())
            .context(format!("Failed to write '{}'", path.display()))?;
    }

    println!(
        "{}",
        format!(
            "✓ Wrote {} fixture{} to {}",
            fixtures.len(),
            if fixtures.len() == 1 { "" } else { "s" },
            dir.display()
        )
        .green()
    );

    Ok(())
}

fn inspect(payload: &PayloadDescription) -> Result<()> {
    let plan = FixtureGenerator::new().plan(payload);
    let fields = payload.fields();

    if fields.is_empty() {
        println!("{}", "Description has no fields.".yellow());
        return Ok(());
    }

    println!("{}", format!("{} field(s):", fields.len()).bold());
    println!();

    for ((name, field), (_, count)) in fields.iter().zip(&plan.fields) {
        let selection = match field {
            mutiny::FieldRef::Candidates(set) => set.selection().to_string(),
            mutiny::FieldRef::Plain(_) => "plain".to_string(),
        };

        if *count == 0 {
            print!("  {} ", "●".bright_red());
            print!("{}", name.red().bold());
            println!(
                " [{}] {}",
                selection,
                "no candidates, left out of every fixture".bright_black()
            );
        } else {
            print!("  {} ", "●".bright_green());
            print!("{}", name.cyan().bold());
            println!(
                " [{}] {} candidate{}",
                selection,
                count,
                if *count == 1 { "" } else { "s" }
            );
        }
    }

    println!();
    match plan.combinations {
        Some(total) => println!("{}", format!("Combinations: {}", total).bold()),
        None => println!("{}", "Combinations: overflow".yellow().bold()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(
            parse_selection("CountryCode=erroneous"),
            Ok(("CountryCode".to_string(), Selection::Erroneous))
        );
        assert!(parse_selection("CountryCode").is_err());
        assert!(parse_selection("=fail").is_err());
        assert!(parse_selection("CountryCode=sometimes").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
