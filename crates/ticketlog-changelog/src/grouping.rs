//! Grouping and ordering of classified commits

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::{DisplayCommit, Group, Note};

/// Comparator applied to breaking-change notes
pub type NoteOrder = dyn Fn(&Note, &Note) -> Ordering + Send + Sync;

/// Bucket commits by category title.
///
/// Groups come out ordered by title. Inside a group commits are ordered by
/// ticket id (commits without a ticket last), then by subject; the sort is
/// stable so equal keys keep their input order.
pub fn group_commits(commits: impl IntoIterator<Item = DisplayCommit>) -> Vec<Group> {
    let mut buckets: BTreeMap<String, Group> = BTreeMap::new();

    for commit in commits {
        let title = commit.category.title();
        buckets
            .entry(title.to_string())
            .or_insert_with(|| Group::new(title))
            .add_commit(commit);
    }

    buckets
        .into_values()
        .map(|mut group| {
            group.commits.sort_by(compare_commits);
            group
        })
        .collect()
}

fn compare_commits(a: &DisplayCommit, b: &DisplayCommit) -> Ordering {
    let by_ticket = match (a.ticket_id(), b.ticket_id()) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_ticket.then_with(|| a.subject.cmp(&b.subject))
}

/// Concatenate the notes of `commits` in encounter order, then stably sort
/// them with `order` when one is given.
pub fn collect_notes<'a>(
    commits: impl IntoIterator<Item = &'a DisplayCommit>,
    order: Option<&NoteOrder>,
) -> Vec<Note> {
    let mut notes: Vec<Note> = commits
        .into_iter()
        .flat_map(|c| c.notes.iter().cloned())
        .collect();

    if let Some(order) = order {
        notes.sort_by(|a, b| order(a, b));
    }

    notes
}
