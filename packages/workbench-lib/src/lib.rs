pub mod automaton;
pub mod config;
pub mod error;
pub mod label;
pub mod logger;
pub mod pda;
pub mod random;
pub mod simulation;
pub mod tm;
pub mod transducer;
pub mod transform;
pub mod validation;
