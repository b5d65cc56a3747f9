//! Schema compiler
//!
//! Generates Oracle-flavored DDL statements from a model snapshot.

use crate::compiler::CompileError;
use crate::model::{Attribute, Cardinality, Entity, Relationship};
use crate::store::ModelSnapshot;

pub struct SchemaCompiler;

impl SchemaCompiler {
    /// Compile a snapshot into an ordered sequence of SQL statements
    ///
    /// Ordering contract: all sequence-creation statements first, then table
    /// and relationship statements in declaration order.
    pub fn compile(snapshot: &ModelSnapshot) -> Result<Vec<String>, CompileError> {
        let mut sequences = Vec::new();
        let mut statements = Vec::new();

        for entity in &snapshot.entities {
            Self::emit_entity(entity, &mut sequences, &mut statements)?;
        }

        for relationship in &snapshot.relationships {
            Self::emit_relationship(snapshot, relationship, &mut statements)?;
        }

        sequences.extend(statements);
        Ok(sequences)
    }

    /// Compile a snapshot into a single newline-joined SQL script
    pub fn compile_script(snapshot: &ModelSnapshot) -> Result<String, CompileError> {
        Ok(Self::compile(snapshot)?.join("\n"))
    }

    fn emit_entity(
        entity: &Entity,
        sequences: &mut Vec<String>,
        statements: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        let mut lines = Vec::new();
        let mut fk_clauses = Vec::new();

        for attr in &entity.attributes {
            if attr.multivalued {
                // Materialized as a side table, emitted out of band; the
                // attribute contributes nothing to the owning table.
                statements.push(Self::multivalued_table_sql(entity, attr)?);
                continue;
            }
            if attr.derived {
                // Derived attributes are never materialized.
                continue;
            }

            let mut line = format!("    {} {}", attr.name, attr.data_type);
            if attr.primary_key && !entity.weak {
                line.push_str(" PRIMARY KEY");
            }
            lines.push(line);

            if let Some(ref target) = attr.references {
                fk_clauses.push(format!(
                    "    FOREIGN KEY ({}) REFERENCES {}({})",
                    attr.name, target.entity, target.attribute
                ));
            }
        }

        if entity.weak {
            // Weak entities carry an explicit composite key, never inline
            // PRIMARY KEY markers.
            lines.push(format!(
                "    PRIMARY KEY ({})",
                entity.primary_key_names().join(", ")
            ));
        }

        lines.extend(fk_clauses);
        statements.push(format!(
            "CREATE TABLE {} (\n{}\n);",
            entity.name,
            lines.join(",\n")
        ));

        if let Some(attr) = entity.sequence_candidate() {
            sequences.push(format!(
                "CREATE SEQUENCE {}_{}_seq START WITH 1 INCREMENT BY 1 NOCACHE NOCYCLE;",
                entity.name, attr.name
            ));
        }

        Ok(())
    }

    fn multivalued_table_sql(entity: &Entity, attr: &Attribute) -> Result<String, CompileError> {
        let (pk_name, pk_type) = Self::primary_key_of(entity)?;
        Ok(format!(
            "CREATE TABLE {entity}_{attr} (\n    {entity}_id {pk_type},\n    {attr} {attr_type},\n    FOREIGN KEY ({entity}_id) REFERENCES {entity}({pk_name})\n);",
            entity = entity.name,
            attr = attr.name,
            attr_type = attr.data_type,
        ))
    }

    fn emit_relationship(
        snapshot: &ModelSnapshot,
        relationship: &Relationship,
        statements: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        let entity1 = Self::lookup(snapshot, &relationship.entity1)?;
        let entity2 = Self::lookup(snapshot, &relationship.entity2)?;

        match relationship.cardinality {
            Cardinality::OneToOne | Cardinality::OneToMany => {
                let (pk_name, pk_type) = Self::primary_key_of(entity1)?;
                // The uniqueness constraint on the added column is the only
                // thing distinguishing 1:1 from 1:N at the schema level.
                let unique = match relationship.cardinality {
                    Cardinality::OneToOne => " UNIQUE",
                    _ => "",
                };
                statements.push(format!(
                    "ALTER TABLE {} ADD ({}_id {}{});",
                    entity2.name, entity1.name, pk_type, unique
                ));
                statements.push(format!(
                    "ALTER TABLE {e2} ADD CONSTRAINT fk_{e2}_{e1} FOREIGN KEY ({e1}_id) REFERENCES {e1}({pk});",
                    e1 = entity1.name,
                    e2 = entity2.name,
                    pk = pk_name,
                ));
            }
            Cardinality::ManyToMany => {
                let (pk1, type1) = Self::primary_key_of(entity1)?;
                let (pk2, type2) = Self::primary_key_of(entity2)?;
                statements.push(format!(
                    "CREATE TABLE {e1}_{e2} (\n    {e1}_id {type1},\n    {e2}_id {type2},\n    PRIMARY KEY ({e1}_id, {e2}_id),\n    FOREIGN KEY ({e1}_id) REFERENCES {e1}({pk1}),\n    FOREIGN KEY ({e2}_id) REFERENCES {e2}({pk2})\n);",
                    e1 = entity1.name,
                    e2 = entity2.name,
                ));
            }
        }

        Ok(())
    }

    fn lookup<'a>(snapshot: &'a ModelSnapshot, name: &str) -> Result<&'a Entity, CompileError> {
        snapshot
            .entity(name)
            .ok_or_else(|| CompileError::UnknownEntity(name.to_string()))
    }

    fn primary_key_of(entity: &Entity) -> Result<(&str, &str), CompileError> {
        match (&entity.primary_key_attribute, &entity.primary_key_type) {
            (Some(name), Some(data_type)) => Ok((name, data_type)),
            _ => Err(CompileError::MissingPrimaryKey(entity.name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForeignKeyRef;
    use pretty_assertions::assert_eq;

    fn attr(name: &str, data_type: &str, primary_key: bool) -> Attribute {
        Attribute {
            name: name.to_string(),
            data_type: data_type.to_string(),
            primary_key,
            multivalued: false,
            derived: false,
            references: None,
        }
    }

    fn entity(name: &str, attributes: Vec<Attribute>) -> Entity {
        Entity::new(name.to_string(), attributes, false, None)
    }

    fn relationship(e1: &str, e2: &str, name: &str, cardinality: Cardinality) -> Relationship {
        Relationship {
            entity1: e1.to_string(),
            entity2: e2.to_string(),
            name: name.to_string(),
            cardinality,
            participation1: None,
            participation2: None,
        }
    }

    fn cliente_pedido() -> ModelSnapshot {
        ModelSnapshot {
            entities: vec![
                entity(
                    "Cliente",
                    vec![attr("id_cliente", "NUMBER", true), attr("nome", "VARCHAR2(255)", false)],
                ),
                entity(
                    "Pedido",
                    vec![attr("id_pedido", "NUMBER", true), attr("data", "DATE", false)],
                ),
            ],
            relationships: vec![relationship("Cliente", "Pedido", "realiza", Cardinality::OneToMany)],
        }
    }

    #[test]
    fn test_end_to_end_one_to_many() {
        let script = SchemaCompiler::compile_script(&cliente_pedido()).unwrap();

        assert!(script.contains("CREATE TABLE Cliente (\n    id_cliente NUMBER PRIMARY KEY,\n    nome VARCHAR2(255)\n);"));
        assert!(script.contains("CREATE TABLE Pedido (\n    id_pedido NUMBER PRIMARY KEY,\n    data DATE\n);"));
        assert!(script.contains("CREATE SEQUENCE Cliente_id_cliente_seq START WITH 1 INCREMENT BY 1 NOCACHE NOCYCLE;"));
        assert!(script.contains("CREATE SEQUENCE Pedido_id_pedido_seq START WITH 1 INCREMENT BY 1 NOCACHE NOCYCLE;"));
        assert!(script.contains("ALTER TABLE Pedido ADD (Cliente_id NUMBER);"));
        assert!(script.contains(
            "ALTER TABLE Pedido ADD CONSTRAINT fk_Pedido_Cliente FOREIGN KEY (Cliente_id) REFERENCES Cliente(id_cliente);"
        ));
    }

    #[test]
    fn test_sequences_precede_tables() {
        let statements = SchemaCompiler::compile(&cliente_pedido()).unwrap();

        let last_sequence = statements
            .iter()
            .rposition(|s| s.starts_with("CREATE SEQUENCE"))
            .unwrap();
        let first_table = statements
            .iter()
            .position(|s| s.starts_with("CREATE TABLE"))
            .unwrap();
        assert!(last_sequence < first_table);

        let expected: Vec<&str> = statements
            .iter()
            .take(2)
            .map(|s| s.as_str())
            .collect();
        assert_eq!(
            expected,
            vec![
                "CREATE SEQUENCE Cliente_id_cliente_seq START WITH 1 INCREMENT BY 1 NOCACHE NOCYCLE;",
                "CREATE SEQUENCE Pedido_id_pedido_seq START WITH 1 INCREMENT BY 1 NOCACHE NOCYCLE;",
            ]
        );
    }

    #[test]
    fn test_one_sequence_per_entity_first_match_wins() {
        let snapshot = ModelSnapshot {
            entities: vec![Entity::new(
                "Dependente".to_string(),
                vec![attr("id_funcionario", "NUMBER", true), attr("id_dependente", "INT", true)],
                true,
                None,
            )],
            relationships: vec![],
        };
        let statements = SchemaCompiler::compile(&snapshot).unwrap();

        let sequences: Vec<&String> = statements
            .iter()
            .filter(|s| s.starts_with("CREATE SEQUENCE"))
            .collect();
        assert_eq!(sequences.len(), 1);
        assert!(sequences[0].contains("Dependente_id_funcionario_seq"));
    }

    #[test]
    fn test_no_sequence_for_non_integer_primary_key() {
        let snapshot = ModelSnapshot {
            entities: vec![entity("Produto", vec![attr("codigo", "VARCHAR2(20)", true)])],
            relationships: vec![],
        };
        let script = SchemaCompiler::compile_script(&snapshot).unwrap();
        assert!(!script.contains("CREATE SEQUENCE"));
    }

    #[test]
    fn test_multivalued_attribute_becomes_side_table() {
        let mut telefone = attr("telefone", "VARCHAR2(20)", false);
        telefone.multivalued = true;
        let snapshot = ModelSnapshot {
            entities: vec![entity(
                "Cliente",
                vec![attr("id_cliente", "NUMBER", true), telefone, attr("nome", "VARCHAR2(255)", false)],
            )],
            relationships: vec![],
        };
        let statements = SchemaCompiler::compile(&snapshot).unwrap();

        let main_table = statements
            .iter()
            .find(|s| s.starts_with("CREATE TABLE Cliente ("))
            .unwrap();
        assert!(!main_table.contains("telefone"));

        let side_table = statements
            .iter()
            .find(|s| s.starts_with("CREATE TABLE Cliente_telefone ("))
            .unwrap();
        assert_eq!(
            side_table,
            "CREATE TABLE Cliente_telefone (\n    Cliente_id NUMBER,\n    telefone VARCHAR2(20),\n    FOREIGN KEY (Cliente_id) REFERENCES Cliente(id_cliente)\n);"
        );
    }

    #[test]
    fn test_side_table_emitted_before_owning_table() {
        let mut telefone = attr("telefone", "VARCHAR2(20)", false);
        telefone.multivalued = true;
        let snapshot = ModelSnapshot {
            entities: vec![entity("Cliente", vec![attr("id_cliente", "NUMBER", true), telefone])],
            relationships: vec![],
        };
        let statements = SchemaCompiler::compile(&snapshot).unwrap();

        let side = statements
            .iter()
            .position(|s| s.starts_with("CREATE TABLE Cliente_telefone"))
            .unwrap();
        let owner = statements
            .iter()
            .position(|s| s.starts_with("CREATE TABLE Cliente ("))
            .unwrap();
        assert!(side < owner);
    }

    #[test]
    fn test_derived_attribute_emits_nothing() {
        let mut idade = attr("idade", "NUMBER", false);
        idade.derived = true;
        let snapshot = ModelSnapshot {
            entities: vec![entity(
                "Cliente",
                vec![attr("id_cliente", "NUMBER", true), idade],
            )],
            relationships: vec![],
        };
        let script = SchemaCompiler::compile_script(&snapshot).unwrap();
        assert!(!script.contains("idade"));
    }

    #[test]
    fn test_many_to_many_associative_table() {
        let mut snapshot = cliente_pedido();
        snapshot.relationships = vec![relationship("Cliente", "Pedido", "realiza", Cardinality::ManyToMany)];
        let statements = SchemaCompiler::compile(&snapshot).unwrap();

        let assoc = statements
            .iter()
            .find(|s| s.starts_with("CREATE TABLE Cliente_Pedido ("))
            .unwrap();
        assert_eq!(
            assoc,
            "CREATE TABLE Cliente_Pedido (\n    Cliente_id NUMBER,\n    Pedido_id NUMBER,\n    PRIMARY KEY (Cliente_id, Pedido_id),\n    FOREIGN KEY (Cliente_id) REFERENCES Cliente(id_cliente),\n    FOREIGN KEY (Pedido_id) REFERENCES Pedido(id_pedido)\n);"
        );

        // No column lands on either side
        assert!(!statements.iter().any(|s| s.starts_with("ALTER TABLE")));
    }

    #[test]
    fn test_one_to_one_differs_from_one_to_many_only_by_unique() {
        let one_to_many = SchemaCompiler::compile(&cliente_pedido()).unwrap();

        let mut snapshot = cliente_pedido();
        snapshot.relationships = vec![relationship("Cliente", "Pedido", "realiza", Cardinality::OneToOne)];
        let one_to_one = SchemaCompiler::compile(&snapshot).unwrap();

        assert_eq!(one_to_many.len(), one_to_one.len());
        for (a, b) in one_to_many.iter().zip(one_to_one.iter()) {
            if a == b {
                continue;
            }
            assert_eq!(a, "ALTER TABLE Pedido ADD (Cliente_id NUMBER);");
            assert_eq!(b, "ALTER TABLE Pedido ADD (Cliente_id NUMBER UNIQUE);");
        }
        assert!(one_to_one.contains(&"ALTER TABLE Pedido ADD (Cliente_id NUMBER UNIQUE);".to_string()));
    }

    #[test]
    fn test_weak_entity_composite_key() {
        let snapshot = ModelSnapshot {
            entities: vec![Entity::new(
                "Dependente".to_string(),
                vec![
                    attr("id_funcionario", "NUMBER", true),
                    attr("id_dependente", "NUMBER", true),
                    attr("nome", "VARCHAR2(255)", false),
                ],
                true,
                None,
            )],
            relationships: vec![],
        };
        let script = SchemaCompiler::compile_script(&snapshot).unwrap();

        let inline_pk_count = script.matches(" PRIMARY KEY,").count()
            + script.matches(" PRIMARY KEY\n").count();
        assert_eq!(inline_pk_count, 0);
        assert_eq!(script.matches("PRIMARY KEY (id_funcionario, id_dependente)").count(), 1);
    }

    #[test]
    fn test_foreign_key_attribute_clause() {
        let mut id_cliente = attr("id_cliente", "NUMBER", false);
        id_cliente.references = Some(ForeignKeyRef {
            entity: "Cliente".to_string(),
            attribute: "id_cliente".to_string(),
        });
        let snapshot = ModelSnapshot {
            entities: vec![
                entity("Cliente", vec![attr("id_cliente", "NUMBER", true)]),
                entity("Endereco", vec![attr("id_endereco", "NUMBER", true), id_cliente]),
            ],
            relationships: vec![],
        };
        let script = SchemaCompiler::compile_script(&snapshot).unwrap();

        assert!(script.contains(
            "CREATE TABLE Endereco (\n    id_endereco NUMBER PRIMARY KEY,\n    id_cliente NUMBER,\n    FOREIGN KEY (id_cliente) REFERENCES Cliente(id_cliente)\n);"
        ));
    }

    #[test]
    fn test_supertype_produces_no_ddl() {
        let parent = entity("Funcionario", vec![attr("id_funcionario", "NUMBER", true)]);
        let child = Entity::new(
            "Gerente".to_string(),
            vec![attr("id_gerente", "NUMBER", true)],
            false,
            Some("Funcionario".to_string()),
        );
        let snapshot = ModelSnapshot {
            entities: vec![parent, child],
            relationships: vec![],
        };
        let script = SchemaCompiler::compile_script(&snapshot).unwrap();
        assert!(!script.contains("fk_Gerente_Funcionario"));
        assert!(script.contains("CREATE TABLE Gerente ("));
    }

    #[test]
    fn test_unknown_relationship_endpoint_fails_fast() {
        let snapshot = ModelSnapshot {
            entities: vec![entity("Cliente", vec![attr("id_cliente", "NUMBER", true)])],
            relationships: vec![relationship("Cliente", "Pedido", "realiza", Cardinality::OneToMany)],
        };
        let err = SchemaCompiler::compile(&snapshot).unwrap_err();
        assert_eq!(err, CompileError::UnknownEntity("Pedido".to_string()));
    }

    #[test]
    fn test_statements_follow_declaration_order() {
        let mut snapshot = cliente_pedido();
        snapshot.entities.push(entity("Produto", vec![attr("id_produto", "NUMBER", true)]));
        snapshot
            .relationships
            .push(relationship("Pedido", "Produto", "contem", Cardinality::ManyToMany));
        let statements = SchemaCompiler::compile(&snapshot).unwrap();

        let cliente = statements.iter().position(|s| s.starts_with("CREATE TABLE Cliente (")).unwrap();
        let pedido = statements.iter().position(|s| s.starts_with("CREATE TABLE Pedido (")).unwrap();
        let produto = statements.iter().position(|s| s.starts_with("CREATE TABLE Produto (")).unwrap();
        let alter = statements.iter().position(|s| s.starts_with("ALTER TABLE Pedido ADD (")).unwrap();
        let assoc = statements.iter().position(|s| s.starts_with("CREATE TABLE Pedido_Produto (")).unwrap();

        assert!(cliente < pedido && pedido < produto);
        assert!(produto < alter && alter < assoc);
    }
}
