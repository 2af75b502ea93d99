//! Output rendering (JSON snapshots, HTML dashboard)

pub mod dashboard;
pub mod snapshot;

pub use dashboard::render_requesters_dashboard;
pub use snapshot::{
    author_entries, load_snapshot, topic_entries, write_snapshot, AuthorsSnapshot, SnapshotHeader,
    TopicsSnapshot,
};
