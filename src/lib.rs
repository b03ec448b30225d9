pub mod columns;
pub mod dataset;
pub mod embedding;
pub mod explore;
pub mod export;
pub mod filters;
pub mod radar;
pub mod scatter;
pub mod similarity;
pub mod state;
pub mod swarm;
