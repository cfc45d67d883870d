use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// A commit together with the id it is stored under
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LogEntry {
    oid: ObjectId,
    commit: Commit,
}

impl LogEntry {
    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn commit(&self) -> &Commit {
        &self.commit
    }

    pub fn parents(&self) -> &[ObjectId] {
        self.commit.parents()
    }

    /// Medium format block, `commit <id>` header then author, date and indented message
    pub fn display(&self) -> String {
        let mut lines = vec![format!("commit {}", self.oid)];
        if self.commit.is_merge() {
            lines.push(format!(
                "Merge: {}",
                self.commit
                    .parents()
                    .iter()
                    .map(ObjectId::to_short_oid)
                    .collect::<Vec<_>>()
                    .join(" ")
            ));
        }
        lines.push(format!("Author: {}", self.commit.author().display_name()));
        lines.push(format!("Date:   {}", self.commit.author().readable_timestamp()));
        lines.push(String::new());
        lines.extend(
            self.commit
                .message()
                .lines()
                .map(|line| format!("    {line}")),
        );

        lines.join("\n")
    }
}

/// History reachable from a commit, newest first
///
/// Walks breadth-first over every parent link so both sides of a merge are listed,
/// each commit once.
#[derive(new)]
pub struct RevList<'r> {
    repository: &'r Repository,
    start: Option<ObjectId>,
}

impl<'r> RevList<'r> {
    /// Log entries in walk order; loading stops at the first unreadable commit
    pub fn walk(self) -> impl Iterator<Item = anyhow::Result<LogEntry>> + 'r {
        let repository = self.repository;

        self.start
            .into_iter()
            .flat_map(move |start| repository.ancestors(start))
            .map(move |oid| {
                let oid = oid?;
                let commit = repository.database().load_commit(&oid)?;
                Ok(LogEntry::new(oid, commit))
            })
    }
}
