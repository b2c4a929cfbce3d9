use serde::Serialize;
use serde_json::Value;

/// Reference to an already-persisted entity, serialized as `{"id": n}` so the
/// server links the new record instead of cascading a create.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EntityRef {
    pub id: i64,
}

/// Controlled-vocabulary entry describing how a data publication was produced.
#[derive(Debug, Clone, Serialize)]
pub struct DataPublicationType {
    pub name: String,
    pub description: String,
    pub facility: EntityRef,
}

/// Authorization rule. A rule with no `grouping` applies to everyone,
/// including unauthenticated users, which is how tables are made public.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub crud_flags: String,
    pub what: String,
}

impl Rule {
    /// Whole-table rule: `crud_flags` over every row of `table`.
    pub fn for_table(crud_flags: &str, table: &str) -> Self {
        Rule {
            crud_flags: crud_flags.to_owned(),
            what: format!("SELECT o FROM {table} o"),
        }
    }
}

/// A relationship field on `origin` that unauthenticated queries may traverse.
#[derive(Debug, Clone, Serialize)]
pub struct PublicStep {
    pub origin: String,
    pub field: String,
}

/// ICAT wire envelope. The entityManager endpoint takes each record as a
/// single-key object, `{"EntityType": {..fields..}}`.
pub trait IcatEntity: Serialize {
    const ENTITY_TYPE: &'static str;

    fn envelope(&self) -> Value {
        serde_json::json!({ (Self::ENTITY_TYPE): self })
    }
}

impl IcatEntity for DataPublicationType {
    const ENTITY_TYPE: &'static str = "DataPublicationType";
}

impl IcatEntity for Rule {
    const ENTITY_TYPE: &'static str = "Rule";
}

impl IcatEntity for PublicStep {
    const ENTITY_TYPE: &'static str = "PublicStep";
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_wraps_fields_under_entity_type() {
        let dpt = DataPublicationType {
            name: "User-defined".into(),
            description: "User-defined".into(),
            facility: EntityRef { id: 1 },
        };

        assert_eq!(
            dpt.envelope(),
            json!({"DataPublicationType": {
                "name": "User-defined",
                "description": "User-defined",
                "facility": {"id": 1},
            }})
        );
    }

    #[test]
    fn table_rule_uses_camel_case_crud_flags() {
        let rule = Rule::for_table("R", "Instrument");
        assert_eq!(
            rule.envelope(),
            json!({"Rule": {"crudFlags": "R", "what": "SELECT o FROM Instrument o"}})
        );
    }
}
