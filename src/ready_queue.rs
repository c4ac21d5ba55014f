//! # Módulo de Cola de Listos
//!
//! Cola FIFO de índices sobre el vector estable de procesos. Cada índice
//! aparece a lo sumo una vez; la pertenencia se consulta en O(1).

use std::collections::VecDeque;

/// Cola de procesos listos para ejecutar, identificados por su posición en
/// la carga de trabajo original.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    order: VecDeque<usize>,
    members: Vec<bool>,
}

impl ReadyQueue {
    /// Crea una cola vacía con capacidad para `process_count` procesos.
    pub fn with_capacity(process_count: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(process_count),
            members: vec![false; process_count],
        }
    }

    /// Encola un proceso al final.
    ///
    /// # Returns
    ///
    /// `true` si se encoló, `false` si el índice ya estaba en la cola
    pub fn push_back(&mut self, index: usize) -> bool {
        if index >= self.members.len() {
            self.members.resize(index + 1, false);
        }
        if self.members[index] {
            return false;
        }
        self.members[index] = true;
        self.order.push_back(index);
        true
    }

    /// Retira el proceso en la cabeza de la cola.
    pub fn pop_front(&mut self) -> Option<usize> {
        let index = self.order.pop_front()?;
        self.members[index] = false;
        Some(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Recorre los índices en orden FIFO.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = ReadyQueue::with_capacity(4);
        queue.push_back(2);
        queue.push_back(0);
        queue.push_back(3);

        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![2, 0, 3]);
        assert_eq!(queue.pop_front(), Some(2));
        assert_eq!(queue.pop_front(), Some(0));
        assert_eq!(queue.pop_front(), Some(3));
        assert_eq!(queue.pop_front(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_no_duplicates() {
        let mut queue = ReadyQueue::with_capacity(2);
        assert!(queue.push_back(1));
        assert!(!queue.push_back(1));
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(1));
        assert!(!queue.contains(0));
    }

    #[test]
    fn test_requeue_after_pop() {
        let mut queue = ReadyQueue::with_capacity(2);
        queue.push_back(0);
        queue.push_back(1);

        let head = queue.pop_front().unwrap();
        assert!(!queue.contains(head));
        assert!(queue.push_back(head));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn test_grows_past_capacity() {
        let mut queue = ReadyQueue::default();
        assert!(queue.push_back(5));
        assert!(queue.contains(5));
        assert!(!queue.contains(9));
    }
}
