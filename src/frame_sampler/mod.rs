pub mod frame_sequence;
pub mod sampler;
#[cfg(test)]
mod tests;
