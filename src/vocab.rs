//! Well-known vocabulary: the CAPEC namespace and the built-in predicates
//! the stores materialize (`rdf:type`, `rdfs:subClassOf`).

/// Namespace under which the CAPEC schema and individuals are minted.
pub const DEFAULT_NS: &str = "http://krstProj.com/capec#";

/// Built-in predicate linking an individual to a class.
pub const RDF_TYPE: &str = "rdf:type";

/// Built-in predicate for direct subclass edges, materialized at freeze.
pub const RDFS_SUB_CLASS_OF: &str = "rdfs:subClassOf";

/// Whether a property id is one of the built-ins registered by
/// [`crate::store::SchemaStore`] itself.
pub fn is_builtin_property(id: &str) -> bool {
    id == RDF_TYPE || id == RDFS_SUB_CLASS_OF
}

/// Replace characters that are not legal inside a local IRI fragment.
///
/// The replacement table is fixed: `%` is escaped first so the escapes
/// introduced for `#` are not double-escaped.
pub fn well_formed_iri(raw: &str) -> String {
    raw.replace('%', "%25")
        .replace('[', "(")
        .replace(']', ")")
        .replace('#', "%23")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_iri_escapes() {
        assert_eq!(well_formed_iri("a[b]c"), "a(b)c");
        assert_eq!(well_formed_iri("50%#x"), "50%25%23x");
        assert_eq!(well_formed_iri("plain"), "plain");
    }

    #[test]
    fn test_builtin_properties() {
        assert!(is_builtin_property(RDF_TYPE));
        assert!(is_builtin_property(RDFS_SUB_CLASS_OF));
        assert!(!is_builtin_property("hasName"));
    }
}
