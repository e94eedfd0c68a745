//! Vocab Cycle - Time-boxed vocabulary learning engine
//!
//! A learner studies catalog words inside a learning cycle: a window with a
//! start and an end. Words are assigned to the cycle, practiced through
//! generated multiple-choice quizzes and marked learned, and the cycle is
//! renewed when its window closes.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
