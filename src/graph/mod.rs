//! GraphPort: decouples `conformance` from a concrete RDF backend. `lower`
//! only ever needs one operation — run a unary SPARQL query and collect the
//! bound `?v` values — so that's the entire trait surface.

use std::collections::HashSet;

use oxigraph::{
    model::{Graph, GraphNameRef, QuadRef, Term},
    sparql::{QueryResults, SparqlEvaluator},
    store::Store,
};

use crate::err::ShaclError;

pub trait GraphPort {
    /// Executes a `SELECT ?v WHERE { ... }` query (as produced by
    /// [`crate::lower::lower`]) and returns the distinct bound `?v` values.
    fn query_unary(&self, query: &str) -> Result<HashSet<Term>, ShaclError>;
}

/// A `GraphPort` backed by an in-memory oxigraph `Store` loaded from a data
/// graph, mirroring `validation::dataset::ValidationDataset`'s loading
/// pattern. Unlike that dataset, there's no separate shapes graph here:
/// `lower`'s queries run entirely against data.
pub struct OxigraphGraphPort {
    store: Store,
}

impl OxigraphGraphPort {
    pub fn new(data_graph: &Graph) -> Result<Self, ShaclError> {
        let store = Store::new()
            .map_err(|e| ShaclError::Io(format!("failed to create conformance store: {}", e)))?;

        for triple in data_graph.iter() {
            store
                .insert(QuadRef::new(
                    triple.subject,
                    triple.predicate,
                    triple.object,
                    GraphNameRef::DefaultGraph,
                ))
                .map_err(|e| ShaclError::Io(format!("failed to load data graph into conformance store: {}", e)))?;
        }

        Ok(Self { store })
    }
}

impl GraphPort for OxigraphGraphPort {
    fn query_unary(&self, query: &str) -> Result<HashSet<Term>, ShaclError> {
        log::debug!("executing unary query: {}", query.replace('\n', " "));

        let prepared = SparqlEvaluator::new()
            .parse_query(query)
            .map_err(|e| ShaclError::Query(format!("failed to parse lowered query: {}", e)))?;

        let results = prepared
            .on_store(&self.store)
            .execute()
            .map_err(|e| ShaclError::Query(format!("failed to execute lowered query: {}", e)))?;

        let QueryResults::Solutions(solutions) = results else {
            return Err(ShaclError::Query(
                "lowered query did not return solutions".to_string(),
            ));
        };

        let mut values = HashSet::new();
        for solution in solutions {
            let solution = solution
                .map_err(|e| ShaclError::Query(format!("failed to read query solution: {}", e)))?;
            if let Some(term) = solution.get("v") {
                values.insert(term.clone());
            }
        }

        Ok(values)
    }
}
