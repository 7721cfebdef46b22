//! Mutation services: create/update/move/list/delete per entity type.
//!
//! Handlers are expected to have already bound the target entities and run
//! the access evaluator; services apply validated input, persist, and hand
//! back view projections. Owner/author fields always come from the
//! authenticated actor, parent references from the bound parent.

pub mod board;
pub mod comment;
pub mod list;
pub mod task;
pub mod workspace;
