pub mod capture;
pub mod visualizer;
