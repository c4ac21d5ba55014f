//! # Módulo de Métricas y Reportes
//!
//! Este módulo se encarga de calcular las métricas de la simulación una vez
//! que todos los procesos terminaron, y de generar reportes de texto y CSV.

use crate::process::{Pid, Process, Tick};
use crate::scheduler::SchedulingAlgorithm;
use crate::simulation::{SimulationError, Slice};

/// Métricas individuales de un proceso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMetrics {
    pub pid: Pid,
    pub arrival_time: Tick,
    pub burst_time: Tick,
    /// Primer tick en el que fue despachado
    pub first_scheduled: Tick,
    /// Tick de finalización registrado por la simulación
    pub completion: Tick,
    /// Espera acumulada tras el primer despacho
    pub waiting_time: Tick,
    /// Ticks entre la llegada y el primer despacho
    pub response_time: Tick,
}

/// Métricas agregadas de toda la simulación.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationMetrics {
    /// Algoritmo con el que se obtuvo el resultado
    pub algorithm: SchedulingAlgorithm,
    /// Métricas de cada proceso, en el orden de la carga de trabajo
    pub processes: Vec<ProcessMetrics>,
    /// Promedios en precisión simple, como se muestran con dos decimales
    pub average_waiting_time: f32,
    pub average_response_time: f32,
    /// Pids en el orden en que terminaron
    pub completion_order: Vec<Pid>,
    /// Porciones de CPU ejecutadas, en orden cronológico
    pub timeline: Vec<Slice>,
    /// Ticks transcurridos desde el inicio del reloj hasta su valor final
    pub total_ticks: Tick,
}

/// Calculadora de métricas para la simulación.
///
/// Las sumas se calculan a partir de la contabilidad final de cada proceso,
/// nunca de acumuladores modificados durante el ciclo de despacho.
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calcula las métricas de un proceso terminado.
    ///
    /// # Returns
    ///
    /// `ProcessMetrics` del proceso, o `InvariantViolation` si el proceso no
    /// fue despachado o no terminó, o si su espera resultaría negativa
    pub fn calculate_process_metrics(
        &self,
        process: &Process,
    ) -> Result<ProcessMetrics, SimulationError> {
        let waiting_time = process.waiting_contribution()?;
        let response_time = process.response_contribution()?;

        // Ambas contribuciones garantizan que los ticks están registrados
        let (Some(first_scheduled), Some(completion)) =
            (process.first_scheduled_tick(), process.completion_tick())
        else {
            return Err(SimulationError::InvariantViolation {
                pid: process.pid,
                detail: "contabilidad incompleta".to_string(),
            });
        };

        Ok(ProcessMetrics {
            pid: process.pid,
            arrival_time: process.arrival_time,
            burst_time: process.original_burst(),
            first_scheduled,
            completion,
            waiting_time,
            response_time,
        })
    }

    /// Calcula las métricas agregadas de toda la simulación.
    ///
    /// # Arguments
    ///
    /// * `processes` - Procesos terminados, en el orden original
    /// * `algorithm` - Algoritmo usado en la simulación
    /// * `timeline` - Porciones ejecutadas
    /// * `completion_order` - Orden en que terminaron los procesos
    /// * `start` - Tick inicial del reloj
    /// * `end` - Tick final del reloj
    pub fn calculate_simulation_metrics(
        &self,
        processes: &[Process],
        algorithm: SchedulingAlgorithm,
        timeline: Vec<Slice>,
        completion_order: Vec<Pid>,
        start: Tick,
        end: Tick,
    ) -> Result<SimulationMetrics, SimulationError> {
        if processes.is_empty() {
            return Err(SimulationError::EmptyWorkload);
        }

        let process_metrics = processes
            .iter()
            .map(|process| self.calculate_process_metrics(process))
            .collect::<Result<Vec<_>, _>>()?;

        let total_waiting: Tick = process_metrics.iter().map(|m| m.waiting_time).sum();
        let total_response: Tick = process_metrics.iter().map(|m| m.response_time).sum();
        let count = process_metrics.len() as f32;

        Ok(SimulationMetrics {
            algorithm,
            processes: process_metrics,
            average_waiting_time: total_waiting as f32 / count,
            average_response_time: total_response as f32 / count,
            completion_order,
            timeline,
            total_ticks: end.saturating_sub(start),
        })
    }

    /// Genera un reporte detallado de los resultados de la simulación.
    pub fn generate_report(&self, metrics: &SimulationMetrics) -> String {
        let mut report = String::new();

        report.push_str("\n=== REPORTE DE RESULTADOS ===\n\n");
        report.push_str(&format!(
            "{:^8} {:^10} {:^10} {:^10} {:^14} {:^10} {:^10}\n",
            "PID", "Llegada", "Ráfaga", "Despacho", "Finalización", "Espera", "Respuesta"
        ));
        report.push_str(&format!("{}\n", "-".repeat(78)));

        for process in &metrics.processes {
            report.push_str(&format!(
                "{:^8} {:^10} {:^10} {:^10} {:^14} {:^10} {:^10}\n",
                process.pid,
                process.arrival_time,
                process.burst_time,
                process.first_scheduled,
                process.completion,
                process.waiting_time,
                process.response_time,
            ));
        }

        report.push_str("\n=== ESTADÍSTICAS RESUMIDAS ===\n");
        report.push_str(&format!("Algoritmo: {}\n", metrics.algorithm.description()));
        report.push_str(&format!("Procesos completados: {}\n", metrics.processes.len()));
        report.push_str(&format!(
            "Tiempo promedio de espera: {}\n",
            Self::format_average(metrics.average_waiting_time)
        ));
        report.push_str(&format!(
            "Tiempo promedio de respuesta: {}\n",
            Self::format_average(metrics.average_response_time)
        ));
        report.push_str(&format!("Ticks simulados: {}\n", metrics.total_ticks));
        report.push_str(&format!(
            "Orden de finalización: {:?}\n",
            metrics.completion_order
        ));
        report.push_str(&format!(
            "Línea de tiempo: {}\n",
            Self::format_timeline(&metrics.timeline)
        ));

        report
    }

    /// Genera un reporte en formato CSV, una fila por proceso.
    pub fn generate_csv_report(&self, metrics: &SimulationMetrics) -> String {
        let mut csv = String::new();

        csv.push_str("Pid,ArrivalTime,BurstTime,FirstScheduled,Completion,WaitTime,ResponseTime\n");

        for process in &metrics.processes {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                process.pid,
                process.arrival_time,
                process.burst_time,
                process.first_scheduled,
                process.completion,
                process.waiting_time,
                process.response_time,
            ));
        }

        csv
    }

    /// Formatea un promedio con dos decimales.
    ///
    /// El redondeo se hace sobre el valor `f32`: `3 / 40` se muestra como
    /// `0.08`, mientras que en `f64` daría `0.07`.
    pub fn format_average(value: f32) -> String {
        format!("{:.2}", value)
    }

    /// Formatea la línea de tiempo como `P<pid>[inicio-fin)`.
    pub fn format_timeline(timeline: &[Slice]) -> String {
        timeline
            .iter()
            .map(|slice| format!("P{}[{}-{})", slice.pid, slice.start, slice.end))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}
