mod error;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use error::{CliError, CliResult};
use gf_project::{RunSetup, load_setup};
use gf_solver::{DiagnosisMap, DischargeProfile, RunOutcome, Workers, run_map, run_profile};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gf-cli")]
#[command(about = "galvaflow CLI - galvanostatic diagnosis maps and discharge profiles", long_about = None)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run file and the isotherm it references
    Validate {
        /// Path to the run YAML file
        run_path: PathBuf,
    },
    /// Simulate one discharge and export its trace and concentration snapshot
    Profile {
        /// Path to the run YAML file
        run_path: PathBuf,
        /// Output prefix; writes <prefix>_trace.csv and <prefix>_concentration.csv
        /// (defaults to printing the trace to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute the diagnosis map over the run file's (logℓ, logξ) grid
    Map {
        /// Path to the run YAML file
        run_path: PathBuf,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Worker threads (overrides the run file; 0 = all execution units)
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long, value_enum, default_value_t = MapFormat::Csv)]
        format: MapFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MapFormat {
    Csv,
    Json,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { run_path } => cmd_validate(&run_path),
        Commands::Profile { run_path, output } => cmd_profile(&run_path, output.as_deref()),
        Commands::Map {
            run_path,
            output,
            threads,
            format,
        } => cmd_map(&run_path, output.as_deref(), threads, format),
    }
}

fn cmd_validate(run_path: &Path) -> CliResult<()> {
    println!("Validating run file: {}", run_path.display());
    let setup = load_setup(run_path)?;
    println!("✓ Run file is valid");
    print_setup(&setup);
    Ok(())
}

fn print_setup(setup: &RunSetup) {
    if let Some(name) = &setup.name {
        println!("  Name: {}", name);
    }
    let m = &setup.material;
    println!("  Geometry: {}", m.geometry);
    println!("  Isotherm: {}", setup.equilibrium.name());
    println!("  Specific capacity: {} mAh/g", m.specific_capacity_mah_g);
    println!("  Cutoff: {} V", m.cutoff_v);
    if let Some(p) = &setup.profile {
        println!(
            "  Profile: logℓ = {}, logξ = {}, target SOC = {}",
            p.point.log_ell, p.point.log_xi, p.target_soc
        );
    }
    if let Some(map) = &setup.map {
        println!(
            "  Map: {} x {} points",
            map.grid.log_ell.len(),
            map.grid.log_xi.len()
        );
    }
}

fn write_file(path: &Path, content: &str) -> CliResult<()> {
    std::fs::write(path, content).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// `<prefix><suffix>` next to the prefix, keeping its directory.
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn cmd_profile(run_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let setup = load_setup(run_path)?;
    let request = setup.profile.as_ref().ok_or_else(|| CliError::MissingSection {
        path: run_path.to_path_buf(),
        section: "profile",
    })?;

    tracing::debug!(?request, "profile request");
    let start = Instant::now();
    let profile = run_profile(request, &setup.material, &setup.equilibrium)?;
    let solve_s = start.elapsed().as_secs_f64();

    let trace = output::trace_csv(&profile.trace);
    match output {
        Some(prefix) => {
            let trace_path = with_suffix(prefix, "_trace.csv");
            write_file(&trace_path, &trace)?;
            println!(
                "✓ Exported {} trace samples to {}",
                profile.trace.len(),
                trace_path.display()
            );
            match &profile.snapshot {
                Some(snapshot) => {
                    let path = with_suffix(prefix, "_concentration.csv");
                    write_file(&path, &output::snapshot_csv(snapshot))?;
                    println!("✓ Exported concentration snapshot to {}", path.display());
                }
                None => println!(
                    "  No iteration landed within the snapshot band around SOC {}",
                    request.target_soc
                ),
            }
        }
        None => print!("{}", trace),
    }

    print_profile_summary(&profile, solve_s);
    Ok(())
}

fn print_profile_summary(profile: &DischargeProfile, solve_s: f64) {
    // stdout carries data only
    let d = &profile.derived;
    eprintln!("\nRun summary:");
    eprintln!("  Particle size convention: {:?}", d.convention);
    eprintln!("  C-rate: {:.4e} 1/h", d.c_rate);
    eprintln!("  Particle size: {:.4e} cm", d.particle_size);
    eprintln!("  Time step: {:.4e} s", d.time_step);
    match profile.outcome {
        RunOutcome::Converged {
            final_soc,
            final_potential,
            iterations,
        } => {
            eprintln!("  Reached cutoff after {} iterations", iterations);
            eprintln!("  Final SOC: {:.6}", final_soc);
            eprintln!("  Final potential: {:.6} V", final_potential);
        }
        RunOutcome::NonConvergent {
            iterations,
            last_soc,
            last_potential,
        } => {
            eprintln!("  Iteration cap ({}) reached before cutoff", iterations);
            eprintln!("  Last SOC: {:.6}", last_soc);
            eprintln!("  Last potential: {:.6} V", last_potential);
        }
    }
    eprintln!("\nTiming summary:");
    eprintln!("  Solve:   {:.3}s", solve_s);
}

fn cmd_map(
    run_path: &Path,
    output: Option<&Path>,
    threads: Option<usize>,
    format: MapFormat,
) -> CliResult<()> {
    let setup = load_setup(run_path)?;
    let mut request = setup.map.clone().ok_or_else(|| CliError::MissingSection {
        path: run_path.to_path_buf(),
        section: "map",
    })?;
    match threads {
        Some(0) => request.workers = Workers::Available,
        Some(n) => request.workers = Workers::Exactly(n),
        None => {}
    }
    tracing::debug!(workers = ?request.workers, convention = ?request.convention, "map request");

    eprintln!(
        "Running diagnosis map: {} points ({} logℓ x {} logξ)",
        request.grid.len(),
        request.grid.log_ell.len(),
        request.grid.log_xi.len()
    );
    let map = run_map(&request, &setup.material, &setup.equilibrium)?;

    let content = match format {
        MapFormat::Csv => output::map_csv(&map),
        MapFormat::Json => serde_json::to_string_pretty(&map)?,
    };
    match output {
        Some(path) => {
            write_file(path, &content)?;
            println!("✓ Exported {} map points to {}", map.entries.len(), path.display());
        }
        None => print!("{}", content),
    }

    print_map_summary(&map);
    Ok(())
}

fn print_map_summary(map: &DiagnosisMap) {
    let points = map.entries.len().max(1);
    eprintln!("\nTiming summary:");
    eprintln!("  Wall clock:  {:.3}s", map.elapsed_s);
    eprintln!(
        "  Point solves: {:.3}s total, {:.4}s mean",
        map.solve_time_s,
        map.solve_time_s / points as f64
    );
    let stuck = map.non_convergent();
    if stuck > 0 {
        eprintln!("  Non-convergent points: {}", stuck);
    }
}
