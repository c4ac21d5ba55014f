//! # Módulo de Procesos
//!
//! Este módulo define el registro de cada proceso de la carga de trabajo:
//! la descripción inmutable (pid, llegada, ráfaga) y el estado mutable que
//! el reloj de simulación actualiza tick a tick.

use crate::simulation::SimulationError;

/// Unidad discreta de tiempo simulado.
pub type Tick = u64;

/// Identificador opaco de proceso, sólo usado para reportes.
pub type Pid = u32;

/// Representa un proceso de la carga de trabajo.
///
/// Los campos de descripción (`pid`, `arrival_time`, `burst_time`) se fijan al
/// crear el proceso. El resto es contabilidad que sólo modifica la simulación:
/// ráfaga restante, ejecución acumulada, primer despacho y finalización.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    /// Identificador del proceso
    pub pid: Pid,
    /// Tick en el que el proceso pasa a ser elegible
    pub arrival_time: Tick,
    /// Ráfaga total original
    burst_time: Tick,
    /// Ticks de CPU que aún necesita
    remaining: Tick,
    /// Ticks efectivamente ejecutados
    total_execution: Tick,
    /// Primer tick en el que fue despachado
    first_scheduled: Option<Tick>,
    /// Tick de finalización (uno después del último tick ejecutado)
    completion: Option<Tick>,
}

impl Process {
    /// Crea un nuevo proceso sin ejecución previa.
    ///
    /// # Arguments
    ///
    /// * `pid` - Identificador del proceso
    /// * `arrival_time` - Tick de llegada
    /// * `burst_time` - Ticks de CPU requeridos en total
    ///
    /// # Examples
    ///
    /// ```rust
    /// use round_robin_simulator::Process;
    ///
    /// let process = Process::new(1, 0, 5);
    /// assert_eq!(process.remaining_burst(), 5);
    /// assert!(!process.is_finished());
    /// ```
    pub fn new(pid: Pid, arrival_time: Tick, burst_time: Tick) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            remaining: burst_time,
            total_execution: 0,
            first_scheduled: None,
            completion: None,
        }
    }

    /// Ráfaga original con la que se creó el proceso.
    pub fn original_burst(&self) -> Tick {
        self.burst_time
    }

    /// Ticks de CPU que faltan para terminar.
    pub fn remaining_burst(&self) -> Tick {
        self.remaining
    }

    /// Ticks ejecutados hasta el momento.
    pub fn total_execution(&self) -> Tick {
        self.total_execution
    }

    pub fn first_scheduled_tick(&self) -> Option<Tick> {
        self.first_scheduled
    }

    pub fn completion_tick(&self) -> Option<Tick> {
        self.completion
    }

    /// `true` cuando la ráfaga restante llegó a cero.
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Registra el primer despacho. Las llamadas posteriores no tienen efecto.
    pub(crate) fn mark_scheduled(&mut self, tick: Tick) -> bool {
        if self.first_scheduled.is_some() {
            return false;
        }
        self.first_scheduled = Some(tick);
        true
    }

    /// Consume un tick de CPU.
    pub(crate) fn execute_tick(&mut self) {
        debug_assert!(self.remaining > 0, "proceso {} ejecutado sin ráfaga", self.pid);
        self.remaining -= 1;
        self.total_execution += 1;
    }

    /// Registra la finalización. Sólo válido una vez y con ráfaga agotada.
    pub(crate) fn mark_completed(&mut self, tick: Tick) -> Result<(), SimulationError> {
        if !self.is_finished() || self.completion.is_some() {
            return Err(SimulationError::InvariantViolation {
                pid: self.pid,
                detail: "finalización registrada dos veces o con ráfaga pendiente".to_string(),
            });
        }
        self.completion = Some(tick);
        Ok(())
    }

    /// Tiempo de espera acumulado tras el primer despacho.
    ///
    /// Calculado como `(finalización - primer despacho) - ejecución total`.
    /// No incluye la latencia inicial entre llegada y primer despacho.
    ///
    /// # Returns
    ///
    /// La contribución del proceso, o `InvariantViolation` si el proceso no
    /// terminó o si la resta resultaría negativa
    pub fn waiting_contribution(&self) -> Result<Tick, SimulationError> {
        let (first, completion) = match (self.first_scheduled, self.completion) {
            (Some(first), Some(completion)) => (first, completion),
            _ => return Err(self.violation("proceso sin despacho o sin finalizar")),
        };

        completion
            .checked_sub(first)
            .and_then(|span| span.checked_sub(self.total_execution))
            .ok_or_else(|| self.violation("tiempo de espera negativo"))
    }

    /// Tiempo de respuesta: ticks desde la llegada hasta el primer despacho.
    pub fn response_contribution(&self) -> Result<Tick, SimulationError> {
        let first = self
            .first_scheduled
            .ok_or_else(|| self.violation("proceso nunca despachado"))?;

        first
            .checked_sub(self.arrival_time)
            .ok_or_else(|| self.violation("despachado antes de su llegada"))
    }

    fn violation(&self, detail: &str) -> SimulationError {
        SimulationError::InvariantViolation {
            pid: self.pid,
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_creation() {
        let process = Process::new(7, 3, 4);
        assert_eq!(process.pid, 7);
        assert_eq!(process.arrival_time, 3);
        assert_eq!(process.original_burst(), 4);
        assert_eq!(process.remaining_burst(), 4);
        assert_eq!(process.total_execution(), 0);
        assert_eq!(process.first_scheduled_tick(), None);
        assert_eq!(process.completion_tick(), None);
    }

    #[test]
    fn test_first_schedule_is_recorded_once() {
        let mut process = Process::new(1, 0, 3);
        assert!(process.mark_scheduled(2));
        assert!(!process.mark_scheduled(5));
        assert_eq!(process.first_scheduled_tick(), Some(2));
    }

    #[test]
    fn test_execution_moves_work() {
        let mut process = Process::new(1, 0, 2);
        process.execute_tick();
        assert_eq!(process.remaining_burst(), 1);
        assert_eq!(process.total_execution(), 1);
        process.execute_tick();
        assert!(process.is_finished());
        assert_eq!(process.total_execution(), process.original_burst());
    }

    #[test]
    fn test_completion_only_once() {
        let mut process = Process::new(1, 0, 1);
        // Con ráfaga pendiente no se puede finalizar
        assert!(process.mark_completed(1).is_err());

        process.execute_tick();
        assert!(process.mark_completed(2).is_ok());
        assert!(process.mark_completed(3).is_err());
        assert_eq!(process.completion_tick(), Some(2));
    }

    #[test]
    fn test_contributions() {
        let mut process = Process::new(1, 1, 2);
        process.mark_scheduled(3);
        process.execute_tick();
        process.execute_tick();
        process.mark_completed(8).unwrap();

        assert_eq!(process.waiting_contribution().unwrap(), 3);
        assert_eq!(process.response_contribution().unwrap(), 2);
    }

    #[test]
    fn test_negative_waiting_is_reported() {
        let mut process = Process::new(4, 0, 3);
        process.mark_scheduled(0);
        for _ in 0..3 {
            process.execute_tick();
        }
        process.mark_completed(2).unwrap();

        match process.waiting_contribution() {
            Err(SimulationError::InvariantViolation { pid, .. }) => assert_eq!(pid, 4),
            other => panic!("Expected InvariantViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_unscheduled_process_has_no_contribution() {
        let process = Process::new(2, 0, 1);
        assert!(process.waiting_contribution().is_err());
        assert!(process.response_contribution().is_err());
    }
}
