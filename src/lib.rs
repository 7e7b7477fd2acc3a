//! Interactive explorer for keyword co-occurrence in text: a force-directed
//! node-link diagram over keywords extracted from a plain-text file.

pub mod app;
pub mod graph;
pub mod nlp;
pub mod util;
