mod assembler;

pub use assembler::{ImageSource, InputAssembler, InputAssemblerConfig};
