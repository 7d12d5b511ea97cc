//! Provider contracts, consumer-driven contracts and their registries.

mod consumer;
mod definition;
pub mod fixtures;
mod registry;

pub use consumer::{
    ConsumerContract, Interaction, InteractionRequest, InteractionResponse, ShapeOptions,
};
pub use definition::{Contract, ContractBuilder};
pub use registry::{ConsumerContractRegistry, ContractRegistry};
