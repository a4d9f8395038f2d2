//! Defines the `Sampler` trait - an object that can randomly sample from a `Network`.

use crate::model::Instantiation;
use crate::util::Result;

pub mod forward;

pub use self::forward::ForwardSampler;

pub trait Sampler {

    /// Sample a full assignment from the associated `Network`.
    fn sample(&mut self) -> Result<Instantiation>;

}
