// lib.rs
pub mod alignment_record;
pub mod alignment_set;
pub mod bam;
pub mod chain;
pub mod classify;
pub mod commands;
pub mod paf;
pub mod params;
pub mod pipeline;
pub mod report;
pub mod split;
