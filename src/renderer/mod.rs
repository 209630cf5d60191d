//! WebGPU ripple background
//!
//! Clicks and hits push ripples into a small ring buffer; every frame the
//! whole buffer is uploaded as uniforms and a full-screen fragment shader
//! turns it into decaying waves.

pub mod error;
pub mod ripple_buffer;
pub mod ripple_effect;
pub mod ripple_pipeline;
pub mod vertex;

pub use error::RippleError;
pub use ripple_buffer::{RippleBuffer, RippleEvent, RippleSnapshot};
pub use ripple_effect::{
    ClientRect, RippleBackend, RippleEffect, RippleSink, RippleUniforms, fit_surface,
};
pub use ripple_pipeline::RippleGpu;
