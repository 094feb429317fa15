//! Shared qualification pool.

use super::{QualificationMark, QualificationPolicy};

/// Players marked as advancing, in the order they qualified.
#[derive(Debug, Clone)]
pub struct QualificationPool {
    capacity: usize,
    members: Vec<String>,
}

impl QualificationPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Decide how a leaderboard leader is marked, admitting them if the
    /// policy allows.
    pub fn settle(&mut self, policy: QualificationPolicy, name: &str) -> QualificationMark {
        match policy {
            QualificationPolicy::Reference => QualificationMark::Unmarked,
            _ if self.contains(name) => QualificationMark::QualifiedElsewhere,
            QualificationPolicy::Compete if self.is_full() => QualificationMark::Unmarked,
            QualificationPolicy::Seed | QualificationPolicy::Compete => {
                self.members.push(name.to_string());
                QualificationMark::Qualified
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compete_until_full() {
        let mut pool = QualificationPool::new(2);

        assert_eq!(
            pool.settle(QualificationPolicy::Compete, "a"),
            QualificationMark::Qualified
        );
        assert_eq!(
            pool.settle(QualificationPolicy::Compete, "b"),
            QualificationMark::Qualified
        );
        assert!(pool.is_full());
        assert_eq!(
            pool.settle(QualificationPolicy::Compete, "c"),
            QualificationMark::Unmarked
        );
        assert_eq!(pool.members(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_already_qualified_is_not_counted_twice() {
        let mut pool = QualificationPool::new(8);
        pool.settle(QualificationPolicy::Seed, "a");

        assert_eq!(
            pool.settle(QualificationPolicy::Compete, "a"),
            QualificationMark::QualifiedElsewhere
        );
        assert_eq!(
            pool.settle(QualificationPolicy::Seed, "a"),
            QualificationMark::QualifiedElsewhere
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_already_qualified_when_full() {
        let mut pool = QualificationPool::new(1);
        pool.settle(QualificationPolicy::Compete, "a");

        assert_eq!(
            pool.settle(QualificationPolicy::Compete, "a"),
            QualificationMark::QualifiedElsewhere
        );
    }

    #[test]
    fn test_seed_ignores_capacity() {
        let mut pool = QualificationPool::new(1);
        pool.settle(QualificationPolicy::Compete, "a");

        assert_eq!(
            pool.settle(QualificationPolicy::Seed, "b"),
            QualificationMark::Qualified
        );
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_reference_never_admits() {
        let mut pool = QualificationPool::new(8);
        assert_eq!(
            pool.settle(QualificationPolicy::Reference, "a"),
            QualificationMark::Unmarked
        );
        pool.settle(QualificationPolicy::Compete, "a");
        assert_eq!(
            pool.settle(QualificationPolicy::Reference, "a"),
            QualificationMark::Unmarked
        );
        assert_eq!(pool.len(), 1);
    }
}
