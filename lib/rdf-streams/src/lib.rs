#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod error;
mod factory;

pub use factory::{IdGeneration, QueryPlan, TopologyFactory, TopologyFactoryConfig};

pub mod model {
    pub use rdf_streams_model::*;
}

pub mod functions {
    pub use rdf_streams_functions::*;
}

pub mod logical {
    pub use rdf_streams_logical::*;
}

pub mod physical {
    pub use rdf_streams_physical::*;
}

pub mod engine {
    pub use rdf_streams_engine::*;
}
