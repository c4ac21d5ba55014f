//! # Módulo de Algoritmos de Planificación
//!
//! Este módulo define las políticas que decide cuántos ticks corre un
//! proceso cada vez que es despachado: Round Robin con quantum fijo y FCFS
//! como línea base no preemptiva.

use std::fmt;
use std::num::NonZeroU64;

use crate::process::Tick;

/// Algoritmos de planificación disponibles para la simulación.
///
/// Ambos comparten la misma cola FIFO; sólo cambia la longitud de la porción
/// de CPU que recibe el proceso despachado.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulingAlgorithm {
    /// First-Come First-Served: cada proceso corre hasta terminar.
    Fcfs,

    /// Round Robin: cada despacho dura a lo sumo `quantum` ticks y el
    /// proceso vuelve al final de la cola si no terminó.
    RoundRobin {
        /// Ticks máximos por despacho
        quantum: NonZeroU64,
    },
}

impl SchedulingAlgorithm {
    /// Crea un algoritmo FCFS.
    pub fn fcfs() -> Self {
        Self::Fcfs
    }

    /// Crea un algoritmo Round Robin con el quantum especificado.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::num::NonZeroU64;
    /// use round_robin_simulator::SchedulingAlgorithm;
    ///
    /// let quantum = NonZeroU64::new(3).unwrap();
    /// let algorithm = SchedulingAlgorithm::round_robin(quantum);
    /// assert_eq!(algorithm.calculate_slice(7), 3);
    /// ```
    pub fn round_robin(quantum: NonZeroU64) -> Self {
        Self::RoundRobin { quantum }
    }

    /// Calcula la porción de CPU para un proceso con `remaining` ticks pendientes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::num::NonZeroU64;
    /// use round_robin_simulator::SchedulingAlgorithm;
    ///
    /// let fcfs = SchedulingAlgorithm::fcfs();
    /// assert_eq!(fcfs.calculate_slice(5), 5);
    ///
    /// let rr = SchedulingAlgorithm::round_robin(NonZeroU64::new(3).unwrap());
    /// assert_eq!(rr.calculate_slice(5), 3);
    /// assert_eq!(rr.calculate_slice(2), 2);
    /// ```
    pub fn calculate_slice(&self, remaining: Tick) -> Tick {
        match self {
            Self::Fcfs => remaining,
            Self::RoundRobin { quantum } => remaining.min(quantum.get()),
        }
    }

    /// Descripción textual del algoritmo y sus parámetros.
    pub fn description(&self) -> String {
        match self {
            Self::Fcfs => "First-Come First-Served (no preemptivo)".to_string(),
            Self::RoundRobin { quantum } => {
                format!("Round Robin preemptivo (quantum: {} ticks)", quantum)
            }
        }
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::RoundRobin { quantum } => write!(f, "Round Robin (quantum {})", quantum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantum(value: u64) -> NonZeroU64 {
        NonZeroU64::new(value).unwrap()
    }

    #[test]
    fn test_fcfs_creation() {
        let algorithm = SchedulingAlgorithm::fcfs();
        assert_eq!(algorithm, SchedulingAlgorithm::Fcfs);
        assert_eq!(algorithm.calculate_slice(12), 12);
    }

    #[test]
    fn test_round_robin_creation() {
        let algorithm = SchedulingAlgorithm::round_robin(quantum(4));

        match algorithm {
            SchedulingAlgorithm::RoundRobin { quantum: q } => assert_eq!(q.get(), 4),
            _ => panic!("Expected RoundRobin variant"),
        }
    }

    #[test]
    fn test_slice_calculation() {
        let fcfs = SchedulingAlgorithm::fcfs();
        assert_eq!(fcfs.calculate_slice(8), 8);

        let rr_small = SchedulingAlgorithm::round_robin(quantum(3));
        assert_eq!(rr_small.calculate_slice(8), 3);

        let rr_large = SchedulingAlgorithm::round_robin(quantum(10));
        assert_eq!(rr_large.calculate_slice(8), 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SchedulingAlgorithm::fcfs()), "FCFS");
        assert_eq!(
            format!("{}", SchedulingAlgorithm::round_robin(quantum(2))),
            "Round Robin (quantum 2)"
        );
        assert!(SchedulingAlgorithm::round_robin(quantum(2))
            .description()
            .contains("quantum: 2 ticks"));
    }
}
