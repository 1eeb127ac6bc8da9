//! Payload codecs: bit-level reader/writer and scaled-value quantization.
pub mod bits;
pub mod scaled;
