//! Task queue and completion history

use std::collections::VecDeque;

/// Pending tasks (FIFO) plus the ordered log of dequeued tasks
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    pending: VecDeque<String>,
    completed: Vec<String>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tasks at the tail, preserving their order
    pub fn extend<I>(&mut self, tasks: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.pending.extend(tasks);
    }

    /// Remove the head task, recording it as completed first
    pub fn dequeue(&mut self) -> Option<String> {
        let head = self.pending.front()?.clone();
        self.completed.push(head);
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Snapshot of pending tasks, head first
    pub fn pending(&self) -> Vec<String> {
        self.pending.iter().cloned().collect()
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = TaskQueue::new();
        queue.extend(tasks(&["a", "b"]));
        queue.extend(tasks(&["c"]));

        assert_eq!(queue.dequeue().as_deref(), Some("a"));
        assert_eq!(queue.dequeue().as_deref(), Some("b"));
        assert_eq!(queue.dequeue().as_deref(), Some("c"));
        assert_eq!(queue.dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dequeued_head_matches_recorded_completion() {
        let mut queue = TaskQueue::new();
        queue.extend(tasks(&["first", "second"]));

        let task = queue.dequeue().unwrap();
        assert_eq!(queue.completed().last(), Some(&task));
        assert_eq!(queue.pending(), tasks(&["second"]));
    }

    #[test]
    fn test_completed_tracks_dequeue_order_across_appends() {
        let mut queue = TaskQueue::new();
        queue.extend(tasks(&["a", "b"]));

        let mut dequeued = Vec::new();
        for round in 0..5 {
            let before = queue.pending_len() + queue.completed().len();
            dequeued.push(queue.dequeue().unwrap());
            // Re-planning appends a variable number of follow-ups
            queue.extend((0..round % 3).map(|i| format!("r{}-{}", round, i)));
            assert!(queue.pending_len() + queue.completed().len() >= before);
        }

        assert_eq!(queue.completed().len(), 5);
        assert_eq!(queue.completed(), dequeued.as_slice());
    }

    #[test]
    fn test_dequeue_empty_leaves_history_untouched() {
        let mut queue = TaskQueue::new();
        assert_eq!(queue.dequeue(), None);
        assert!(queue.completed().is_empty());
    }
}
