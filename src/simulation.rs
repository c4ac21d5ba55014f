//! # Módulo de Simulación Principal
//!
//! Este módulo contiene el reloj de simulación y el ciclo de despacho:
//! selección de la cabeza de la cola de listos, ejecución tick a tick durante
//! un quantum, inyección de llegadas en cada tick y avance en vacío cuando no
//! hay procesos listos pero quedan procesos por llegar.

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::metrics::{MetricsCalculator, SimulationMetrics};
use crate::process::{Pid, Process, Tick};
use crate::ready_queue::ReadyQueue;
use crate::scheduler::SchedulingAlgorithm;

/// Errores fatales de la simulación.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("la carga de trabajo no contiene procesos")]
    EmptyWorkload,
    #[error("el proceso {pid} tiene una ráfaga de cero ticks")]
    ZeroBurst { pid: Pid },
    #[error("desbordamiento del reloj simulado en el tick {tick}")]
    ClockOverflow { tick: Tick },
    #[error("invariante violada en el proceso {pid}: {detail}")]
    InvariantViolation { pid: Pid, detail: String },
}

/// Estado del ciclo de despacho.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Cola vacía, pero quedan procesos sin terminar que aún no llegan
    Idle,
    /// Hay al menos un proceso listo para ser despachado
    Dispatching,
    /// Todos los procesos terminaron
    Draining,
}

/// Porción de CPU efectivamente ejecutada por un proceso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub pid: Pid,
    /// Tick de inicio (inclusive)
    pub start: Tick,
    /// Tick de fin (exclusivo)
    pub end: Tick,
}

impl Slice {
    pub fn len(&self) -> Tick {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Orquestador de la simulación Round Robin.
///
/// La `Simulation` es dueña exclusiva del vector de procesos y de la cola de
/// listos mientras dura la ejecución. Los procesos se referencian por su
/// índice en el vector, que define también el orden de desempate entre
/// llegadas simultáneas.
pub struct Simulation {
    processes: Vec<Process>,
    ready: ReadyQueue,
    algorithm: SchedulingAlgorithm,
    start_tick: Tick,
    clock: Tick,
    unfinished: usize,
    timeline: Vec<Slice>,
    completion_order: Vec<Pid>,
    metrics_calculator: MetricsCalculator,
}

impl Simulation {
    /// Prepara una simulación sobre una carga de trabajo fija.
    ///
    /// El reloj arranca en la menor llegada; sólo el primer proceso (en orden
    /// de entrada) con esa llegada se encola aquí. Los demás con la misma
    /// llegada entran en la primera pasada de inyección.
    ///
    /// # Arguments
    ///
    /// * `processes` - Procesos en el orden original de la carga de trabajo
    /// * `algorithm` - Algoritmo de planificación a utilizar
    ///
    /// # Returns
    ///
    /// La simulación lista para ejecutar, o un error si la carga está vacía o
    /// contiene ráfagas de cero ticks
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::num::NonZeroU64;
    /// use round_robin_simulator::{Process, SchedulingAlgorithm, Simulation};
    ///
    /// let processes = vec![Process::new(1, 0, 4), Process::new(2, 0, 4)];
    /// let algorithm = SchedulingAlgorithm::round_robin(NonZeroU64::new(2).unwrap());
    /// let mut simulation = Simulation::new(processes, algorithm).unwrap();
    /// let metrics = simulation.run().unwrap();
    /// assert_eq!(metrics.average_waiting_time, 3.0);
    /// assert_eq!(metrics.average_response_time, 1.0);
    /// ```
    pub fn new(
        processes: Vec<Process>,
        algorithm: SchedulingAlgorithm,
    ) -> Result<Self, SimulationError> {
        if let Some(process) = processes.iter().find(|p| p.original_burst() == 0) {
            return Err(SimulationError::ZeroBurst { pid: process.pid });
        }

        // `min_by_key` devuelve el primer mínimo: desempate por orden de entrada
        let (first_index, start_tick) = processes
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.arrival_time)
            .map(|(index, p)| (index, p.arrival_time))
            .ok_or(SimulationError::EmptyWorkload)?;

        let mut ready = ReadyQueue::with_capacity(processes.len());
        ready.push_back(first_index);

        Ok(Self {
            unfinished: processes.len(),
            processes,
            ready,
            algorithm,
            start_tick,
            clock: start_tick,
            timeline: Vec::new(),
            completion_order: Vec::new(),
            metrics_calculator: MetricsCalculator::new(),
        })
    }

    /// Ejecuta la simulación completa y retorna las métricas resultantes.
    pub fn run(&mut self) -> Result<SimulationMetrics, SimulationError> {
        info!(
            "Simulación iniciada ({}): {} procesos, tick inicial {}",
            self.algorithm,
            self.processes.len(),
            self.start_tick
        );

        while self.step()? != DispatchState::Draining {}

        info!(
            "Simulación completada en el tick {} ({} porciones)",
            self.clock,
            self.timeline.len()
        );

        self.metrics_calculator.calculate_simulation_metrics(
            &self.processes,
            self.algorithm,
            self.timeline.clone(),
            self.completion_order.clone(),
            self.start_tick,
            self.clock,
        )
    }

    /// Realiza una única transición del ciclo de despacho.
    ///
    /// Desde `Dispatching` ejecuta un despacho completo; desde `Idle` avanza el
    /// reloj hasta que alguien llegue; `Draining` es terminal.
    ///
    /// # Returns
    ///
    /// El estado alcanzado tras la transición
    pub fn step(&mut self) -> Result<DispatchState, SimulationError> {
        match self.state() {
            DispatchState::Draining => {}
            DispatchState::Idle => self.advance_idle()?,
            DispatchState::Dispatching => self.dispatch()?,
        }
        Ok(self.state())
    }

    /// Estado actual del ciclo de despacho.
    pub fn state(&self) -> DispatchState {
        if self.unfinished == 0 {
            DispatchState::Draining
        } else if self.ready.is_empty() {
            DispatchState::Idle
        } else {
            DispatchState::Dispatching
        }
    }

    /// Encola, en orden de entrada, los procesos que llegan en el tick actual.
    ///
    /// Se omiten los procesos terminados, los que ya están en la cola y el
    /// proceso `exclude` (el que está siendo despachado).
    pub fn inject_arrivals(&mut self, exclude: Option<usize>) {
        for (index, process) in self.processes.iter().enumerate() {
            if Some(index) == exclude {
                continue;
            }
            if process.arrival_time == self.clock
                && !process.is_finished()
                && self.ready.push_back(index)
            {
                trace!("t={} llegada del proceso {}", self.clock, process.pid);
            }
        }
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }

    /// Porciones ejecutadas hasta el momento, en orden cronológico.
    pub fn timeline(&self) -> &[Slice] {
        &self.timeline
    }

    fn dispatch(&mut self) -> Result<(), SimulationError> {
        let Some(index) = self.ready.pop_front() else {
            return Ok(());
        };
        let start = self.clock;

        if self.processes[index].mark_scheduled(start) {
            debug!("t={} primer despacho del proceso {}", start, self.processes[index].pid);
        }

        // Llegadas simultáneas al despacho entran antes de consumir el quantum
        self.inject_arrivals(Some(index));

        let slice = self
            .algorithm
            .calculate_slice(self.processes[index].remaining_burst());
        for _ in 0..slice {
            self.advance_clock()?;
            self.processes[index].execute_tick();
            self.inject_arrivals(Some(index));
        }

        let pid = self.processes[index].pid;
        self.timeline.push(Slice {
            pid,
            start,
            end: self.clock,
        });
        debug!("proceso {} ejecutó [{}, {})", pid, start, self.clock);

        if self.processes[index].is_finished() {
            // La finalización se registra un tick después del último ejecutado
            let completion = self
                .clock
                .checked_add(1)
                .ok_or(SimulationError::ClockOverflow { tick: self.clock })?;
            self.processes[index].mark_completed(completion)?;
            self.completion_order.push(pid);
            self.unfinished -= 1;
            debug!("proceso {} finalizado (tick {})", pid, completion);
        } else {
            self.ready.push_back(index);
        }

        Ok(())
    }

    fn advance_idle(&mut self) -> Result<(), SimulationError> {
        loop {
            self.advance_clock()?;
            trace!("t={} CPU ociosa", self.clock);
            self.inject_arrivals(None);
            if !self.ready.is_empty() || self.unfinished == 0 {
                return Ok(());
            }
        }
    }

    fn advance_clock(&mut self) -> Result<(), SimulationError> {
        self.clock = self
            .clock
            .checked_add(1)
            .ok_or(SimulationError::ClockOverflow { tick: self.clock })?;
        Ok(())
    }
}
