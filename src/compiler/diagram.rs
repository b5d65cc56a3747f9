//! Diagram compiler
//!
//! Renders a model snapshot as a PlantUML entity-relationship document for
//! the external rendering service.

use crate::model::{Attribute, Cardinality, Entity};
use crate::store::ModelSnapshot;

pub struct DiagramCompiler;

impl DiagramCompiler {
    /// Compile a snapshot into PlantUML source
    pub fn compile(snapshot: &ModelSnapshot) -> String {
        let mut doc = String::from("@startuml\n");

        for entity in &snapshot.entities {
            Self::emit_entity(entity, &mut doc);
        }

        for (supertype, subtype) in Self::generalization_edges(snapshot) {
            doc.push_str(&format!("{} <|-- {}\n", supertype, subtype));
        }

        for relationship in &snapshot.relationships {
            doc.push_str(&format!(
                "{} {} {} : {}\n",
                relationship.entity1,
                Self::edge_style(relationship.cardinality),
                relationship.entity2,
                relationship.name
            ));
        }

        doc.push_str("@enduml\n");
        doc
    }

    fn emit_entity(entity: &Entity, doc: &mut String) {
        doc.push_str(&format!("entity {} {{\n", entity.name));
        // Every attribute appears in the diagram, including multivalued and
        // derived ones the schema compiler treats specially.
        for attr in &entity.attributes {
            doc.push_str(&format!(
                "  {}{} : {}\n",
                Self::marker(attr),
                attr.name,
                attr.data_type
            ));
        }
        doc.push_str("}\n");
    }

    /// Leading marker for an attribute line
    ///
    /// Primary key wins over foreign key when an attribute carries both
    /// facets.
    fn marker(attr: &Attribute) -> &'static str {
        if attr.primary_key {
            "* "
        } else if attr.is_foreign_key() {
            "# "
        } else {
            ""
        }
    }

    /// Collect generalization edges as (supertype, subtype) pairs
    ///
    /// Both traversal directions are walked (the child's supertype field and
    /// the parent's subtype list) and deduplicated, so a consistent pair
    /// yields exactly one edge.
    fn generalization_edges(snapshot: &ModelSnapshot) -> Vec<(String, String)> {
        let mut edges: Vec<(String, String)> = Vec::new();
        let push = |supertype: &str, subtype: &str, edges: &mut Vec<(String, String)>| {
            let edge = (supertype.to_string(), subtype.to_string());
            if !edges.contains(&edge) {
                edges.push(edge);
            }
        };

        for entity in &snapshot.entities {
            if let Some(ref supertype) = entity.supertype {
                push(supertype, &entity.name, &mut edges);
            }
        }
        for entity in &snapshot.entities {
            for subtype in &entity.subtypes {
                push(&entity.name, subtype, &mut edges);
            }
        }
        edges
    }

    /// Fixed three-way mapping from cardinality to PlantUML edge syntax
    fn edge_style(cardinality: Cardinality) -> &'static str {
        match cardinality {
            Cardinality::OneToOne => "||--||",
            Cardinality::OneToMany => "||--o{",
            Cardinality::ManyToMany => "}o--o{",
        }
    }
}
