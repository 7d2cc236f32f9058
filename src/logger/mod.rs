//! Activity logging: JSONL on disk plus a bounded in-memory ring.

pub mod jsonl;
pub mod ring;
