pub mod decode;
pub mod fs;
