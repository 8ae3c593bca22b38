use std::sync::{Arc, Mutex};

use roster_registry::validation::sanitize;
use roster_registry::{AssetRegistry, Authorizer, NameMatchAuthorizer, NewEmployee, QueryService};
use roster_store::{LedgerState, StoreError, TransactionalLedger};

use crate::config::ChaincodeConfig;
use crate::error::{ChaincodeError, ChaincodeResult};
use crate::operation::{Invocation, Operation};
use crate::response::Response;

/// Ledger key holding the application version.
pub const APP_VERSION_KEY: &str = "employee_ui";
/// Ledger key holding the optional numeric `init` argument.
pub const SELFTEST_KEY: &str = "selftest";

/// Single entry point that routes named invocations to the registry and
/// query service.
///
/// Each invocation runs inside its own ledger transaction, committed only
/// when the operation succeeds. Queries never commit. Invocations are
/// serialized: a transaction holds the dispatcher exclusively from `begin`
/// until it is committed or dropped, so concurrent callers observe each
/// other's committed writes.
pub struct Chaincode<L> {
    ledger: L,
    authorizer: Arc<dyn Authorizer>,
    config: ChaincodeConfig,
    serial: Mutex<()>,
}

impl<L: TransactionalLedger> Chaincode<L> {
    pub fn new(ledger: L) -> Self {
        Self::with_config(ledger, ChaincodeConfig::default())
    }

    pub fn with_config(ledger: L, config: ChaincodeConfig) -> Self {
        Self {
            ledger,
            authorizer: Arc::new(NameMatchAuthorizer),
            config,
            serial: Mutex::new(()),
        }
    }

    /// Replace the authorization capability.
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &ChaincodeConfig {
        &self.config
    }

    /// Run an invocation and fold the outcome into a [`Response`].
    pub fn invoke(&self, invocation: &Invocation) -> Response {
        self.execute(invocation).into()
    }

    /// Instantiate the application: record its version and the optional
    /// numeric self-test value.
    pub fn init<S: AsRef<str>>(&self, args: &[S]) -> Response {
        let invocation = Invocation::new(
            Operation::Init.name(),
            args.iter().map(|a| a.as_ref().to_string()),
        );
        self.invoke(&invocation)
    }

    /// Run an invocation, keeping the typed error.
    pub fn execute(&self, invocation: &Invocation) -> ChaincodeResult<Option<Vec<u8>>> {
        let Some(op) = Operation::from_name(&invocation.function) else {
            tracing::warn!(function = %invocation.function, "unknown function");
            return Err(ChaincodeError::UnknownFunction(invocation.function.clone()));
        };

        let span = tracing::info_span!("invoke", op = op.name());
        let _enter = span.enter();

        let arity = op.arity();
        if !arity.accepts(invocation.args.len()) {
            tracing::warn!(got = invocation.args.len(), expected = %arity, "wrong argument count");
            return Err(ChaincodeError::Arity {
                operation: op.name(),
                expected: arity,
                got: invocation.args.len(),
            });
        }

        let _serial = self
            .serial
            .lock()
            .map_err(|_| ChaincodeError::Ledger(StoreError::LockPoisoned))?;
        tracing::info!(args = invocation.args.len(), "invocation started");
        let tx = self.ledger.begin()?;
        let payload = match self.dispatch(op, &invocation.args, &tx) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "invocation rejected");
                return Err(e);
            }
        };

        if op.is_read_only() {
            tracing::info!("query completed");
            return Ok(payload);
        }

        let receipt = self.ledger.commit(tx)?;
        tracing::info!(tx = %receipt.tx_id, writes = receipt.writes, "invocation committed");
        Ok(payload)
    }

    fn dispatch<S: LedgerState>(
        &self,
        op: Operation,
        args: &[String],
        state: &S,
    ) -> ChaincodeResult<Option<Vec<u8>>> {
        let registry = AssetRegistry::with_authorizer(
            state,
            Arc::clone(&self.authorizer),
            self.config.registry.clone(),
        );
        let query = QueryService::new(state);

        match op {
            Operation::Init => {
                if let Some(value) = args.first().filter(|v| !v.is_empty()) {
                    let number: i64 = value
                        .trim()
                        .parse()
                        .map_err(|_| ChaincodeError::NonNumericInit(value.clone()))?;
                    state.put(SELFTEST_KEY, number.to_string().as_bytes())?;
                }
                state.put(APP_VERSION_KEY, self.config.app_version.as_bytes())?;
                Ok(None)
            }
            Operation::Read => Ok(registry.read_raw(&args[0])?),
            Operation::Write => {
                registry.write_raw(&args[0], &args[1])?;
                Ok(None)
            }
            Operation::InitDomain => {
                registry.create_domain(&args[0], &args[1])?;
                Ok(None)
            }
            Operation::InitCompany => {
                registry.create_company(&args[0], &args[1])?;
                Ok(None)
            }
            Operation::InitEmployee => {
                registry.create_employee(&NewEmployee {
                    id: args[0].clone(),
                    employee_name: args[1].clone(),
                    designation: args[2].clone(),
                    dob: args[3].clone(),
                    domain_id: args[4].clone(),
                    domain_name: args[5].clone(),
                    company_id: args[6].clone(),
                    company_name: args[7].clone(),
                })?;
                Ok(None)
            }
            Operation::SetDomain => {
                registry.transfer_domain(&args[0], &args[1], &args[2])?;
                Ok(None)
            }
            Operation::SetCompany => {
                registry.transfer_company(&args[0], &args[1], &args[2])?;
                Ok(None)
            }
            Operation::DisableDomain => {
                registry.disable_domain(&args[0], &args[1])?;
                Ok(None)
            }
            Operation::DisableCompany => {
                registry.disable_company(&args[0], &args[1])?;
                Ok(None)
            }
            Operation::DeleteEmployee => {
                registry.delete_employee(&args[0], &args[1])?;
                Ok(None)
            }
            Operation::ReadAllData => Ok(Some(serde_json::to_vec(&query.list_all_entities()?)?)),
            Operation::GetHistory => Ok(Some(serde_json::to_vec(&query.audit_history(&args[0])?)?)),
            Operation::GetAllEmployee => {
                Ok(Some(serde_json::to_vec(&query.list_by_range(&args[0], &args[1])?)?))
            }
            Operation::GetEmployeeById => {
                sanitize(&args[..1])?;
                let employee = registry.get_employee(&args[0])?;
                Ok(Some(serde_json::to_vec(&employee)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_registry::ErrorKind;
    use roster_store::{CommitReceipt, InMemoryLedger, LedgerTransaction, StoreResult};
    use roster_types::{Employee, Entity};
    use std::sync::Barrier;
    use std::time::Duration;

    fn chaincode() -> Chaincode<InMemoryLedger> {
        Chaincode::new(InMemoryLedger::new())
    }

    fn call(cc: &Chaincode<InMemoryLedger>, function: &str, args: &[&str]) -> Response {
        cc.invoke(&Invocation::new(function, args.iter().copied()))
    }

    fn seeded() -> Chaincode<InMemoryLedger> {
        let cc = chaincode();
        assert!(call(&cc, "init_domain", &["d1", "Eng"]).is_success());
        assert!(call(&cc, "init_domain", &["d2", "Ops"]).is_success());
        assert!(call(&cc, "init_company", &["c1", "Acme"]).is_success());
        assert!(call(
            &cc,
            "init_employee",
            &["e1", "Ann", "SWE", "1990-01-01", "d1", "Eng", "c1", "Acme"]
        )
        .is_success());
        cc
    }

    fn employee(cc: &Chaincode<InMemoryLedger>, id: &str) -> Employee {
        let resp = call(cc, "getEmployeeById", &[id]);
        Employee::from_bytes(resp.payload().unwrap()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_function_is_named() {
        let cc = chaincode();
        let resp = call(&cc, "transfer", &[]);
        assert_eq!(resp.status(), 500);
        assert!(resp.message().unwrap().contains("'transfer'"));
    }

    #[test]
    fn wrong_arity_is_rejected_before_any_write() {
        let cc = chaincode();
        let err = cc
            .execute(&Invocation::new("init_domain", ["d1"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(cc.ledger().is_empty().unwrap());
        assert_eq!(cc.ledger().tx_count().unwrap(), 0);
    }

    #[test]
    fn worked_example() {
        let cc = seeded();
        let e = employee(&cc, "e1");
        assert_eq!(e.domain.id, "d1");
        assert_eq!(e.domain.domain_name, "Eng");

        let err = cc
            .execute(&Invocation::new(
                "init_employee",
                ["e1", "Ann", "SWE", "1990-01-01", "d1", "Eng", "c1", "Acme"],
            ))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let err = cc
            .execute(&Invocation::new("set_domain", ["e1", "d2", "WrongName"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(employee(&cc, "e1"), e);
    }

    #[test]
    fn transfer_and_history() {
        let cc = seeded();
        assert!(call(&cc, "set_domain", &["e1", "d2", "Eng"]).is_success());
        assert_eq!(employee(&cc, "e1").domain.domain_name, "Ops");

        let resp = call(&cc, "getHistory", &["e1"]);
        let trail: serde_json::Value = serde_json::from_slice(resp.payload().unwrap()).unwrap();
        assert_eq!(trail.as_array().unwrap().len(), 2);
        assert_eq!(trail[1]["value"]["domain"]["id"], "d2");
    }

    #[test]
    fn read_all_data_shape() {
        let cc = seeded();
        assert!(call(&cc, "disable_company", &["c1", "Acme"]).is_success());
        let resp = call(&cc, "read_all_data", &[]);
        let all: serde_json::Value = serde_json::from_slice(resp.payload().unwrap()).unwrap();
        assert_eq!(all["employee"].as_array().unwrap().len(), 1);
        assert_eq!(all["domain"].as_array().unwrap().len(), 2);
        assert!(all["company"].as_array().unwrap().is_empty());
    }

    #[test]
    fn get_all_employee_rows() {
        let cc = seeded();
        let resp = call(&cc, "getAllEmployee", &["e0", "e9999999999999999999"]);
        let rows: serde_json::Value = serde_json::from_slice(resp.payload().unwrap()).unwrap();
        assert_eq!(rows[0]["Key"], "e1");
        assert_eq!(rows[0]["Record"]["employeeName"], "Ann");
    }

    #[test]
    fn delete_then_lookup_fails() {
        let cc = seeded();
        assert!(call(&cc, "delete_employee", &["e1", "Eng"]).is_success());
        let resp = call(&cc, "getEmployeeById", &["e1"]);
        assert!(resp.message().unwrap().contains("does not exist"));
    }

    #[test]
    fn generic_read_write() {
        let cc = chaincode();
        assert!(call(&cc, "write", &["abc", "test"]).is_success());
        assert_eq!(call(&cc, "read", &["abc"]).payload(), Some(&b"test"[..]));
        assert_eq!(call(&cc, "read", &["missing"]), Response::ok());
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    #[test]
    fn failed_invocation_leaves_no_writes() {
        let cc = seeded();
        let before = cc.ledger().len().unwrap();
        let txs = cc.ledger().tx_count().unwrap();
        let resp = call(
            &cc,
            "init_employee",
            &["e2", "Bob", "QA", "1991-02-02", "d1", "Eng", "c9", "Nope"],
        );
        assert!(!resp.is_success());
        assert_eq!(cc.ledger().len().unwrap(), before);
        assert_eq!(cc.ledger().tx_count().unwrap(), txs);
        assert_eq!(cc.ledger().open_cursors(), 0);
    }

    #[test]
    fn each_mutation_is_one_commit() {
        let cc = seeded();
        assert_eq!(cc.ledger().tx_count().unwrap(), 4);
        assert!(call(&cc, "read_all_data", &[]).is_success());
        assert_eq!(cc.ledger().tx_count().unwrap(), 4);
    }

    // -----------------------------------------------------------------------
    // Init
    // -----------------------------------------------------------------------

    #[test]
    fn init_records_version_and_selftest() {
        let cc = chaincode();
        assert!(cc.init(&["42"]).is_success());
        assert_eq!(cc.ledger().get(APP_VERSION_KEY).unwrap(), Some(b"4.0.1".to_vec()));
        assert_eq!(cc.ledger().get(SELFTEST_KEY).unwrap(), Some(b"42".to_vec()));
    }

    #[test]
    fn init_without_argument() {
        let cc = chaincode();
        let none: [&str; 0] = [];
        assert!(cc.init(&none).is_success());
        assert!(cc.ledger().get(SELFTEST_KEY).unwrap().is_none());
    }

    #[test]
    fn init_with_empty_argument_skips_selftest() {
        let cc = chaincode();
        assert!(cc.init(&[""]).is_success());
        assert!(cc.ledger().get(SELFTEST_KEY).unwrap().is_none());
        assert_eq!(cc.ledger().get(APP_VERSION_KEY).unwrap(), Some(b"4.0.1".to_vec()));
    }

    #[test]
    fn init_rejects_non_numeric() {
        let cc = chaincode();
        let resp = cc.init(&["forty-two"]);
        assert!(!resp.is_success());
        assert!(cc.ledger().is_empty().unwrap());
    }

    #[test]
    fn custom_app_version() {
        let config = ChaincodeConfig {
            app_version: "9.9.9".into(),
            ..Default::default()
        };
        let cc = Chaincode::with_config(InMemoryLedger::new(), config);
        assert!(call(&cc, "init", &[]).is_success());
        assert_eq!(cc.ledger().get(APP_VERSION_KEY).unwrap(), Some(b"9.9.9".to_vec()));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    /// Ledger whose commits take long enough for racing callers to overlap.
    struct SlowLedger(InMemoryLedger);

    impl TransactionalLedger for SlowLedger {
        type Tx = LedgerTransaction;

        fn begin(&self) -> StoreResult<LedgerTransaction> {
            self.0.begin()
        }

        fn commit(&self, tx: LedgerTransaction) -> StoreResult<CommitReceipt> {
            std::thread::sleep(Duration::from_millis(50));
            self.0.commit(tx)
        }
    }

    #[test]
    fn concurrent_creations_of_one_key_admit_a_single_winner() {
        let cc = Chaincode::new(SlowLedger(InMemoryLedger::new()));
        let barrier = Barrier::new(4);

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let (cc, barrier) = (&cc, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        let name = format!("Name{i}");
                        cc.execute(&Invocation::new("init_domain", ["d1", name.as_str()]))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .filter(|e| e.kind() == ErrorKind::AlreadyExists)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(conflicts, 3);
        assert_eq!(cc.ledger().0.history_of("d1").unwrap().count(), 1);
        assert_eq!(cc.ledger().0.tx_count().unwrap(), 1);
    }
}
