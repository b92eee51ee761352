//! RDF/SHACL vocabulary constants, treated as opaque IRIs by the rest of the crate.

pub mod sh;
