//! Model <-> entity mappers

mod edge;
