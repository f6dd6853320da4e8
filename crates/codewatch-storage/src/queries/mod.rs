//! SQL for patterns and relations. Every function takes a plain
//! `&Connection` so it runs on the writer, inside a transaction, or on a
//! pooled reader.

pub mod patterns;
pub mod relations;
