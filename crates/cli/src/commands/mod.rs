pub mod memory_demo;
pub mod run;
