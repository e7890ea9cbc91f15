//! Hierarchical grouping for accordion display
//!
//! Sequences group under their cycle phase, sessions under their sequence,
//! steps under their session. One pass over the child list builds a lookup
//! keyed by parent id; parents without children get an empty bucket, never
//! an absent one. Children pointing at an unknown parent are dropped (the
//! backend resolves the references, the console only displays them).

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{CyclePhase, Sequence, Session, Step};
use crate::services::ordering::next_order;

/// One accordion bucket: a parent with its ordered children and the
/// suggested order number for a new child.
#[derive(Debug, Clone, Serialize)]
pub struct Group<P, C> {
    pub parent: P,
    pub children: Vec<C>,
    /// Pre-filled "order" value for the create form under this parent
    pub next_order: i64,
}

/// Group `children` under `parents`, preserving parent order.
pub fn group_by_parent<P, C>(
    parents: Vec<P>,
    children: Vec<C>,
    parent_id: impl Fn(&P) -> &str,
    child_parent: impl Fn(&C) -> &str,
    child_order: impl Fn(&C) -> i64,
) -> Vec<Group<P, C>> {
    let mut buckets: HashMap<String, Vec<C>> = parents
        .iter()
        .map(|p| (parent_id(p).to_string(), Vec::new()))
        .collect();

    for child in children {
        if let Some(bucket) = buckets.get_mut(child_parent(&child)) {
            bucket.push(child);
        }
    }

    parents
        .into_iter()
        .map(|parent| {
            let mut children = buckets.remove(parent_id(&parent)).unwrap_or_default();
            children.sort_by_key(&child_order);
            let next_order = next_order(children.iter().map(&child_order));
            Group {
                parent,
                children,
                next_order,
            }
        })
        .collect()
}

pub fn sequences_by_phase(
    phases: Vec<CyclePhase>,
    sequences: Vec<Sequence>,
) -> Vec<Group<CyclePhase, Sequence>> {
    group_by_parent(phases, sequences, |p| &p.id, |s| &s.cycle_phase, |s| s.order)
}

pub fn sessions_by_sequence(
    sequences: Vec<Sequence>,
    sessions: Vec<Session>,
) -> Vec<Group<Sequence, Session>> {
    group_by_parent(sequences, sessions, |p| &p.id, |s| &s.sequence, |s| s.order)
}

pub fn steps_by_session(sessions: Vec<Session>, steps: Vec<Step>) -> Vec<Group<Session, Step>> {
    group_by_parent(sessions, steps, |p| &p.id, |s| &s.session, |s| s.order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(id: &str) -> CyclePhase {
        CyclePhase {
            id: id.to_string(),
            name: format!("phase {id}"),
            description: None,
            color: None,
            order: 0,
        }
    }

    fn sequence(id: &str, phase: &str, order: i64) -> Sequence {
        Sequence {
            id: id.to_string(),
            name: format!("sequence {id}"),
            cycle_phase: phase.to_string(),
            order,
            description: None,
        }
    }

    #[test]
    fn every_phase_gets_a_bucket() {
        let groups = sequences_by_phase(
            vec![phase("A"), phase("B"), phase("C")],
            vec![sequence("1", "A", 1), sequence("2", "B", 1)],
        );

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].children.len(), 1);
        assert_eq!(groups[1].children.len(), 1);
        // empty, not absent
        assert!(groups[2].children.is_empty());
        assert_eq!(groups[2].next_order, 1);
    }

    #[test]
    fn children_sort_by_order_within_a_bucket() {
        let groups = sequences_by_phase(
            vec![phase("A")],
            vec![
                sequence("late", "A", 3),
                sequence("early", "A", 1),
                sequence("mid", "A", 2),
            ],
        );
        let names: Vec<&str> = groups[0].children.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(names, ["early", "mid", "late"]);
        assert_eq!(groups[0].next_order, 4);
    }

    #[test]
    fn orphan_children_are_dropped() {
        let groups = sequences_by_phase(vec![phase("A")], vec![sequence("1", "ghost", 1)]);
        assert!(groups[0].children.is_empty());
    }
}
