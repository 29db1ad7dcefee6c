//! Edge detection for boolean conditions.

/// A change of a boolean signal between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// `false → true`
    Rising,
    /// `true → false`
    Falling,
}

impl Edge {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
        }
    }
}

/// Remembers the last observed value and reports transitions.
///
/// The initial value is `false`, so a condition that already holds on the
/// first observation produces a rising edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    #[must_use]
    pub fn last(self) -> bool {
        self.last
    }

    /// Record `value` and return the edge it forms, if any.
    pub fn observe(&mut self, value: bool) -> Option<Edge> {
        let edge = match (self.last, value) {
            (false, true) => Some(Edge::Rising),
            (true, false) => Some(Edge::Falling),
            _ => None,
        };
        self.last = value;
        edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_edges_only_on_change() {
        let mut detector = EdgeDetector::default();
        let edges: Vec<_> = [false, true, true, false, true]
            .into_iter()
            .map(|value| detector.observe(value))
            .collect();
        assert_eq!(
            edges,
            vec![
                None,
                Some(Edge::Rising),
                None,
                Some(Edge::Falling),
                Some(Edge::Rising)
            ]
        );
        assert!(detector.last());
    }

    #[test]
    fn should_report_rising_edge_when_first_value_is_true() {
        let mut detector = EdgeDetector::default();
        assert_eq!(detector.observe(true), Some(Edge::Rising));
    }
}
