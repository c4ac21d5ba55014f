//! # Simulador de Planificación Round Robin
//!
//! Esta biblioteca simula un planificador Round Robin preemptivo sobre un
//! conjunto fijo de procesos, cada uno con su tiempo de llegada y su ráfaga
//! de CPU, y calcula el tiempo promedio de espera y el tiempo promedio de
//! respuesta. Es un simulador de eventos discretos sobre ticks enteros.
//!
//! ## Características principales
//!
//! - **Cola de listos por índices**: los procesos viven en un vector estable y
//!   la cola FIFO guarda sus posiciones, con consulta de pertenencia en O(1).
//! - **Reloj tick a tick**: las llegadas se inyectan en cada avance del reloj,
//!   también a mitad de un quantum y mientras la CPU está ociosa.
//! - **Desempate determinista**: las llegadas simultáneas se encolan en el
//!   orden de la carga de trabajo original.
//! - **Métricas a posteriori**: los promedios se calculan a partir de la
//!   contabilidad final de cada proceso.
//!
//! ## Estructura del proyecto
//!
//! - `process`: registro de cada proceso y sus contribuciones a las métricas
//! - `ready_queue`: cola FIFO de procesos listos
//! - `scheduler`: algoritmos de planificación (Round Robin y FCFS)
//! - `simulation`: reloj de simulación, inyección de llegadas y ciclo de despacho
//! - `metrics`: cálculo de promedios y reportes
//! - `workload`: lectura del archivo de procesos y del quantum
//! - `config`: constantes y archivo de configuración TOML

pub mod config;
pub mod metrics;
pub mod process;
pub mod ready_queue;
pub mod scheduler;
pub mod simulation;
pub mod workload;

// Re-exportar las estructuras principales para facilitar su uso
pub use metrics::{MetricsCalculator, ProcessMetrics, SimulationMetrics};
pub use process::{Pid, Process, Tick};
pub use ready_queue::ReadyQueue;
pub use scheduler::SchedulingAlgorithm;
pub use simulation::{DispatchState, Simulation, SimulationError, Slice};
