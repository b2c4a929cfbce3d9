//! One-shot provisioning routines for a freshly deployed catalog. Both are
//! straight-line sequences of create calls: nothing is retried, partial
//! application is not rolled back, and a duplicate rejection on a re-run is
//! surfaced as the fatal error it is.

use serde_json::Value;
use tracing::info;

use crate::catalog::CatalogOps;
use crate::entity::{DataPublicationType, EntityRef, IcatEntity, PublicStep};
use crate::error::IcatResult;

/// Name and description of the publication type registered for the facility.
pub const USER_DEFINED: &str = "User-defined";

/// Lookup tables every unauthenticated user may read, in submission order.
pub const PUBLIC_TABLES: [&str; 8] = [
    "Instrument",
    "ParameterType",
    "InvestigationType",
    "DatasetType",
    "SampleType",
    "DatafileFormat",
    "Facility",
    "FacilityCycle",
];

/// (origin, field) relationship paths opened for public traversal, in
/// submission order.
pub const PUBLIC_STEPS: [(&str, &str); 19] = [
    ("Datafile", "dataset"),
    ("Datafile", "parameters"),
    ("Dataset", "investigation"),
    ("Dataset", "parameters"),
    ("Dataset", "type"),
    ("Investigation", "facility"),
    ("Investigation", "facilityCycles"),
    ("Investigation", "investigationInstruments"),
    ("Investigation", "investigationUsers"),
    ("Investigation", "parameters"),
    ("Investigation", "publications"),
    ("Investigation", "samples"),
    ("Investigation", "studyInvestigations"),
    ("InvestigationInstrument", "instrument"),
    ("InvestigationUser", "user"),
    ("Instrument", "instrumentScientists"),
    ("InstrumentScientist", "user"),
    ("Sample", "type"),
    ("Study", "user"),
];

/// Administrator credentials for one authentication plugin.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub mechanism: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    fn pairs(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_owned(), self.username.clone()),
            ("password".to_owned(), self.password.clone()),
        ]
    }
}

/// Register the "User-defined" data-publication type for one facility:
/// log in, look the facility up, create a single record referencing it.
pub async fn register_data_publication_type(
    catalog: &mut impl CatalogOps,
    auth: &Credentials,
    facility_id: i64,
) -> IcatResult<()> {
    catalog.login(&auth.mechanism, &auth.pairs()).await?;

    let facility = catalog.get("Facility", facility_id).await?;
    info!(
        facility = facility["name"].as_str().unwrap_or("?"),
        facility_id, "registering '{USER_DEFINED}' data-publication type"
    );

    let record = DataPublicationType {
        name: USER_DEFINED.to_owned(),
        description: USER_DEFINED.to_owned(),
        facility: EntityRef { id: facility_id },
    };
    catalog.create(record.envelope()).await
}

/// Seed the rules and public steps that make the catalog browsable without
/// logging in. Three phases, strictly in order: one bulk rule call for
/// [`PUBLIC_TABLES`], then construction of all [`PUBLIC_STEPS`] records,
/// then one bulk create for the lot.
pub async fn open_public_access(
    catalog: &mut impl CatalogOps,
    auth: &Credentials,
) -> IcatResult<()> {
    catalog.login(&auth.mechanism, &auth.pairs()).await?;

    catalog.create_rules("R", &PUBLIC_TABLES).await?;
    info!(tables = PUBLIC_TABLES.len(), "public read rules created");

    let steps: Vec<Value> = PUBLIC_STEPS
        .iter()
        .map(|(origin, field)| {
            PublicStep {
                origin: (*origin).to_owned(),
                field: (*field).to_owned(),
            }
            .envelope()
        })
        .collect();
    catalog.create_many(steps).await?;
    info!(steps = PUBLIC_STEPS.len(), "public steps created");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::error::IcatError;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Login(String),
        Get(String, i64),
        Create(Value),
        CreateMany(Vec<Value>),
        CreateRules(String, Vec<String>),
    }

    /// Records every call; the non-login ops take `&self`, hence the Mutex.
    #[derive(Default)]
    struct MockCatalog {
        calls: Mutex<Vec<Call>>,
        reject_login: bool,
        reject_creates: bool,
    }

    impl MockCatalog {
        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn duplicate_rejection(&self) -> IcatError {
            IcatError::Rejected {
                context: "record creation".into(),
                message: "OBJECT_ALREADY_EXISTS".into(),
            }
        }
    }

    #[async_trait]
    impl CatalogOps for MockCatalog {
        async fn login(
            &mut self,
            mechanism: &str,
            _credentials: &[(String, String)],
        ) -> IcatResult<()> {
            self.record(Call::Login(mechanism.to_owned()));
            if self.reject_login {
                return Err(IcatError::Auth {
                    mechanism: mechanism.to_owned(),
                    message: "bad credentials".into(),
                });
            }
            Ok(())
        }

        async fn get(&self, entity_type: &str, id: i64) -> IcatResult<Value> {
            self.record(Call::Get(entity_type.to_owned(), id));
            Ok(json!({"id": id, "name": "LILS"}))
        }

        async fn create(&self, entity: Value) -> IcatResult<()> {
            self.record(Call::Create(entity));
            if self.reject_creates {
                return Err(self.duplicate_rejection());
            }
            Ok(())
        }

        async fn create_many(&self, entities: Vec<Value>) -> IcatResult<()> {
            self.record(Call::CreateMany(entities));
            if self.reject_creates {
                return Err(self.duplicate_rejection());
            }
            Ok(())
        }

        async fn create_rules(&self, crud_flags: &str, tables: &[&str]) -> IcatResult<()> {
            self.record(Call::CreateRules(
                crud_flags.to_owned(),
                tables.iter().map(|t| (*t).to_owned()).collect(),
            ));
            Ok(())
        }
    }

    fn admin() -> Credentials {
        Credentials {
            mechanism: "simple".into(),
            username: "root".into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn publication_type_is_one_lookup_and_one_create() {
        let mut catalog = MockCatalog::default();
        register_data_publication_type(&mut catalog, &admin(), 1)
            .await
            .unwrap();

        let calls = catalog.calls();
        assert_eq!(calls[0], Call::Login("simple".into()));
        assert_eq!(calls[1], Call::Get("Facility".into(), 1));
        assert_eq!(
            calls[2],
            Call::Create(json!({"DataPublicationType": {
                "name": "User-defined",
                "description": "User-defined",
                "facility": {"id": 1},
            }}))
        );
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn public_access_is_one_rule_call_then_one_bulk_create() {
        let mut catalog = MockCatalog::default();
        open_public_access(&mut catalog, &admin()).await.unwrap();

        let calls = catalog.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[1],
            Call::CreateRules(
                "R".into(),
                PUBLIC_TABLES.iter().map(|t| (*t).to_owned()).collect(),
            )
        );

        let expected: Vec<Value> = PUBLIC_STEPS
            .iter()
            .map(|(origin, field)| json!({"PublicStep": {"origin": origin, "field": field}}))
            .collect();
        assert_eq!(calls[2], Call::CreateMany(expected));
    }

    #[tokio::test]
    async fn step_count_and_first_entries_match_the_seed_list() {
        assert_eq!(PUBLIC_TABLES.len(), 8);
        assert_eq!(PUBLIC_STEPS.len(), 19);
        assert_eq!(PUBLIC_STEPS[0], ("Datafile", "dataset"));
        assert_eq!(PUBLIC_STEPS[2], ("Dataset", "investigation"));
    }

    #[tokio::test]
    async fn login_failure_stops_before_any_create() {
        let mut catalog = MockCatalog {
            reject_login: true,
            ..Default::default()
        };
        let err = open_public_access(&mut catalog, &admin()).await.unwrap_err();
        assert!(matches!(err, IcatError::Auth { .. }));
        assert_eq!(catalog.calls(), vec![Call::Login("simple".into())]);

        let mut catalog = MockCatalog {
            reject_login: true,
            ..Default::default()
        };
        let err = register_data_publication_type(&mut catalog, &admin(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, IcatError::Auth { .. }));
        assert_eq!(catalog.calls(), vec![Call::Login("simple".into())]);
    }

    #[tokio::test]
    async fn duplicate_rejection_is_fatal_not_skipped() {
        let mut catalog = MockCatalog {
            reject_creates: true,
            ..Default::default()
        };
        let err = register_data_publication_type(&mut catalog, &admin(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, IcatError::Rejected { .. }));

        let mut catalog = MockCatalog {
            reject_creates: true,
            ..Default::default()
        };
        let err = open_public_access(&mut catalog, &admin()).await.unwrap_err();
        // rules went through, the step batch was rejected, nothing rolled back
        assert!(matches!(err, IcatError::Rejected { .. }));
        assert!(matches!(catalog.calls()[1], Call::CreateRules(..)));
    }
}
