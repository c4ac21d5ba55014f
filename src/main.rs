use std::num::NonZeroU64;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::Level;

use round_robin_simulator::config::{self, ConfigError, ReportFormat, SimulatorConfig, EINVAL};
use round_robin_simulator::workload::{self, WorkloadError};
use round_robin_simulator::{
    MetricsCalculator, SchedulingAlgorithm, Simulation, SimulationError, SimulationMetrics,
};

/// Simula planificación Round Robin y reporta los tiempos promedio de espera y respuesta.
#[derive(Parser, Debug)]
#[command(name = "rr-sim", version)]
struct Cli {
    /// Archivo con la carga de trabajo (cantidad seguida de ternas pid llegada ráfaga)
    workload: PathBuf,

    /// Quantum en ticks; si se omite se toma de `simulation.quantum` en la configuración
    quantum: Option<String>,

    /// Archivo de configuración TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Formato del reporte
    #[arg(short, long, value_enum)]
    report: Option<ReportFormat>,

    /// Incluir los promedios de FCFS como línea base
    #[arg(long)]
    compare_fcfs: bool,

    /// Aumenta el detalle del log en stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("configuración: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Workload(#[from] WorkloadError),
    #[error("simulación: {0}")]
    Simulation(#[from] SimulationError),
    #[error("falta el quantum: páselo como argumento o en simulation.quantum")]
    MissingQuantum,
}

impl AppError {
    fn exit_code(&self) -> u8 {
        let code = match self {
            Self::Config(ConfigError::Io(e)) => e.raw_os_error().unwrap_or(1),
            Self::Config(_) | Self::MissingQuantum => EINVAL,
            Self::Workload(e) => e.exit_code(),
            Self::Simulation(_) => 1,
        };
        u8::try_from(code).unwrap_or(1)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    // ---------- CONFIGURACIÓN ----------
    let settings = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => SimulatorConfig::default(),
    };
    init_logging(cli.verbose, &settings)?;

    let quantum = resolve_quantum(cli.quantum.as_deref(), &settings)?;
    let format = cli.report.unwrap_or(settings.report.format);
    let compare_fcfs = cli.compare_fcfs || settings.report.compare_fcfs;

    // ---------- CARGA DE TRABAJO ----------
    let processes = workload::load_workload(&cli.workload)?;
    let baseline_processes = compare_fcfs.then(|| processes.clone());

    // ---------- SIMULACIÓN ----------
    let algorithm = SchedulingAlgorithm::round_robin(quantum);
    tracing::info!("Algoritmo: {}", algorithm.description());
    let metrics = Simulation::new(processes, algorithm)?.run()?;

    let baseline = match baseline_processes {
        Some(processes) => Some(Simulation::new(processes, SchedulingAlgorithm::fcfs())?.run()?),
        None => None,
    };

    // ---------- REPORTE ----------
    print_results(format, &metrics, baseline.as_ref());
    Ok(())
}

fn init_logging(verbose: u8, settings: &SimulatorConfig) -> Result<(), ConfigError> {
    let level = match verbose {
        0 => settings.logging.level()?,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// La línea de comandos tiene prioridad sobre el archivo de configuración.
fn resolve_quantum(
    argument: Option<&str>,
    settings: &SimulatorConfig,
) -> Result<NonZeroU64, AppError> {
    match argument {
        Some(value) => Ok(workload::parse_quantum(value)?),
        None => settings.simulation.quantum.ok_or(AppError::MissingQuantum),
    }
}

fn print_results(
    format: ReportFormat,
    metrics: &SimulationMetrics,
    baseline: Option<&SimulationMetrics>,
) {
    let calculator = MetricsCalculator::new();

    match format {
        ReportFormat::Summary => {
            println!(
                "Average waiting time: {}",
                MetricsCalculator::format_average(metrics.average_waiting_time)
            );
            println!(
                "Average response time: {}",
                MetricsCalculator::format_average(metrics.average_response_time)
            );
        }
        ReportFormat::Table => print!("{}", calculator.generate_report(metrics)),
        ReportFormat::Csv => print!("{}", calculator.generate_csv_report(metrics)),
    }

    if let Some(baseline) = baseline {
        println!(
            "FCFS average waiting time: {}",
            MetricsCalculator::format_average(baseline.average_waiting_time)
        );
        println!(
            "FCFS average response time: {}",
            MetricsCalculator::format_average(baseline.average_response_time)
        );
    }
}
