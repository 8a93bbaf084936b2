//! Ports - Trait definitions for the job's external collaborators.

pub mod repository;
pub mod storage;
