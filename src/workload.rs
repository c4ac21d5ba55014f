//! # Módulo de Carga de Trabajo
//!
//! Lectura del archivo de procesos y del quantum recibido por línea de
//! comandos. El archivo contiene el número de procesos seguido de una terna
//! `pid llegada ráfaga` por proceso; cualquier byte que no sea dígito actúa
//! como separador.
//!
//! A diferencia del lector de referencia en C (`next_int` en `rr.c`), que
//! rechaza un número que termina justo en el fin de archivo, aquí ese último
//! número se acepta: `"1 5 0 3"` sin salto de línea final es una carga válida.

use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::EINVAL;
use crate::process::Process;

/// Errores del adaptador de entrada. Todos terminan el proceso sin salida parcial.
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("no se pudo leer '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fin de archivo mientras se buscaba {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("el valor de {field} excede el rango soportado")]
    NumberOverflow { field: &'static str },
    #[error("la carga de trabajo no contiene procesos")]
    EmptyWorkload,
    #[error("quantum inválido '{value}': se espera un entero positivo")]
    InvalidQuantum { value: String },
}

impl WorkloadError {
    /// Código de salida del proceso asociado a cada tipo de error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. } => source.raw_os_error().unwrap_or(1),
            _ => EINVAL,
        }
    }
}

/// Lee y parsea un archivo de carga de trabajo.
pub fn load_workload(path: impl AsRef<Path>) -> Result<Vec<Process>, WorkloadError> {
    let path = path.as_ref();
    let contents = fs::read(path).map_err(|source| {
        tracing::error!("No se pudo leer la carga de trabajo '{}': {}", path.display(), source);
        WorkloadError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let processes = parse_workload(&contents)?;
    tracing::info!(
        "Carga de trabajo '{}': {} procesos",
        path.display(),
        processes.len()
    );
    Ok(processes)
}

/// Parsea el contenido de un archivo de carga de trabajo.
///
/// El contenido posterior a la última terna se ignora.
///
/// # Examples
///
/// ```rust
/// use round_robin_simulator::workload::parse_workload;
///
/// let processes = parse_workload(b"2\n1, 0, 7\n2, 2, 4\n").unwrap();
/// assert_eq!(processes.len(), 2);
/// assert_eq!(processes[1].arrival_time, 2);
/// assert_eq!(processes[1].original_burst(), 4);
/// ```
pub fn parse_workload(contents: &[u8]) -> Result<Vec<Process>, WorkloadError> {
    let mut scanner = NumberScanner::new(contents);

    let count = scanner.next_number("el número de procesos")?;
    if count == 0 {
        return Err(WorkloadError::EmptyWorkload);
    }

    let count = usize::try_from(count)
        .map_err(|_| WorkloadError::NumberOverflow { field: "el número de procesos" })?;
    let mut processes = Vec::with_capacity(count.min(contents.len()));

    for _ in 0..count {
        let pid = scanner.next_number("un pid")?;
        let pid = u32::try_from(pid).map_err(|_| WorkloadError::NumberOverflow { field: "un pid" })?;
        let arrival_time = scanner.next_number("un tiempo de llegada")?;
        let burst_time = scanner.next_number("un tiempo de ráfaga")?;
        processes.push(Process::new(pid, arrival_time, burst_time));
    }

    Ok(processes)
}

/// Parsea el quantum: sólo dígitos, no vacío y mayor que cero.
///
/// # Examples
///
/// ```rust
/// use round_robin_simulator::workload::parse_quantum;
///
/// assert_eq!(parse_quantum("3").unwrap().get(), 3);
/// assert!(parse_quantum("0").is_err());
/// assert!(parse_quantum("-2").is_err());
/// ```
pub fn parse_quantum(value: &str) -> Result<NonZeroU64, WorkloadError> {
    let invalid = || WorkloadError::InvalidQuantum {
        value: value.to_string(),
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    value
        .parse::<u64>()
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or_else(invalid)
}

/// Recorre el contenido extrayendo enteros decimales sin signo.
struct NumberScanner<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> NumberScanner<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn next_number(&mut self, expected: &'static str) -> Result<u64, WorkloadError> {
        while self
            .bytes
            .get(self.position)
            .is_some_and(|b| !b.is_ascii_digit())
        {
            self.position += 1;
        }

        if self.position >= self.bytes.len() {
            return Err(WorkloadError::UnexpectedEof { expected });
        }

        let mut value: u64 = 0;
        while let Some(byte) = self.bytes.get(self.position).filter(|b| b.is_ascii_digit()) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(byte - b'0')))
                .ok_or(WorkloadError::NumberOverflow { field: expected })?;
            self.position += 1;
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_workload() {
        let processes = parse_workload(b"4\n1, 0, 7\n2, 2, 4\n3, 4, 1\n4, 5, 4\n").unwrap();
        assert_eq!(processes.len(), 4);
        assert_eq!(processes[0], Process::new(1, 0, 7));
        assert_eq!(processes[3], Process::new(4, 5, 4));
    }

    #[test]
    fn test_any_non_digit_is_a_delimiter() {
        let processes = parse_workload(b"count=2; [9 -1 x3] (8|0|2)").unwrap();
        assert_eq!(processes, vec![Process::new(9, 1, 3), Process::new(8, 0, 2)]);
    }

    #[test]
    fn test_number_may_end_at_eof() {
        let processes = parse_workload(b"1 5 0 3").unwrap();
        assert_eq!(processes, vec![Process::new(5, 0, 3)]);
    }

    #[test]
    fn test_trailing_content_is_ignored() {
        let processes = parse_workload(b"1\n1 0 2\n99 99 99\n").unwrap();
        assert_eq!(processes.len(), 1);
    }

    #[test]
    fn test_truncated_workload() {
        match parse_workload(b"2\n1 0 2\n2 1\n") {
            Err(WorkloadError::UnexpectedEof { expected }) => {
                assert_eq!(expected, "un tiempo de ráfaga")
            }
            other => panic!("Expected UnexpectedEof, got {:?}", other),
        }
        assert!(matches!(
            parse_workload(b""),
            Err(WorkloadError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_empty_workload() {
        assert!(matches!(
            parse_workload(b"0\n"),
            Err(WorkloadError::EmptyWorkload)
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(matches!(
            parse_workload(b"1 4294967296 0 1"),
            Err(WorkloadError::NumberOverflow { field: "un pid" })
        ));
        assert!(matches!(
            parse_workload(b"1 1 0 99999999999999999999"),
            Err(WorkloadError::NumberOverflow { .. })
        ));
    }

    #[test]
    fn test_parse_quantum() {
        assert_eq!(parse_quantum("10").unwrap().get(), 10);
        for bad in ["", "0", "00", "3a", " 3", "+3", "99999999999999999999"] {
            assert!(
                matches!(parse_quantum(bad), Err(WorkloadError::InvalidQuantum { .. })),
                "quantum '{}' debería ser inválido",
                bad
            );
        }
    }

    #[test]
    fn test_load_workload_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "2\n1 0 4\n2 0 4").unwrap();
        file.flush().unwrap();

        let processes = load_workload(file.path()).unwrap();
        assert_eq!(processes.len(), 2);
    }

    #[test]
    fn test_missing_file_exit_code() {
        let error = load_workload("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(error, WorkloadError::Io { .. }));
        // ENOENT
        assert_eq!(error.exit_code(), 2);
        assert_eq!(WorkloadError::EmptyWorkload.exit_code(), EINVAL);
    }
}
