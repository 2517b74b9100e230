pub mod static_context;

pub use static_context::{StaticNetworkBuilder, StaticNetworkContext};
