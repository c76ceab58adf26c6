pub mod logs;
pub mod sequences;
