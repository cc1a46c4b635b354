#[cfg(test)]
pub mod impl_fake;
pub mod impl_logger;
pub mod interface;
