//! Ejemplo: comparación de FCFS contra Round Robin con distintos quantums

use std::num::NonZeroU64;

use round_robin_simulator::{MetricsCalculator, Process, SchedulingAlgorithm, Simulation};

fn workload() -> Vec<Process> {
    vec![
        Process::new(1, 0, 7),
        Process::new(2, 2, 4),
        Process::new(3, 4, 1),
        Process::new(4, 5, 4),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ejemplo: FCFS vs Round Robin ===\n");

    let calculator = MetricsCalculator::new();

    println!("1. Ejecutando simulación con FCFS...");
    let fcfs_metrics = Simulation::new(workload(), SchedulingAlgorithm::fcfs())?.run()?;
    println!("{}", calculator.generate_report(&fcfs_metrics));

    println!("\n=== Comparación de Algoritmos ===");
    println!("| Algoritmo                 | Espera prom. | Respuesta prom. |");
    println!("|---------------------------|--------------|-----------------|");
    println!(
        "| {:<25} | {:>12} | {:>15} |",
        fcfs_metrics.algorithm.to_string(),
        MetricsCalculator::format_average(fcfs_metrics.average_waiting_time),
        MetricsCalculator::format_average(fcfs_metrics.average_response_time),
    );

    for quantum in [1, 2, 3, 5] {
        let Some(quantum) = NonZeroU64::new(quantum) else {
            continue;
        };
        let metrics =
            Simulation::new(workload(), SchedulingAlgorithm::round_robin(quantum))?.run()?;
        println!(
            "| {:<25} | {:>12} | {:>15} |",
            metrics.algorithm.to_string(),
            MetricsCalculator::format_average(metrics.average_waiting_time),
            MetricsCalculator::format_average(metrics.average_response_time),
        );
    }

    Ok(())
}
