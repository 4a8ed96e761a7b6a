pub mod config;
pub mod family;
pub mod io;
pub mod json;
pub mod phylo;
pub mod pipeline;
