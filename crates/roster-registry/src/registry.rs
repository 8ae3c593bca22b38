use std::sync::Arc;

use roster_store::LedgerState;
use roster_types::{Company, CompanyRef, Domain, DomainRef, Employee, Entity, EntityKind};

use crate::auth::{Authorizer, NameMatchAuthorizer};
use crate::config::RegistryConfig;
use crate::error::{Action, RegistryError, RegistryResult};
use crate::read::{exists, strict_get};
use crate::validation::sanitize;

/// Arguments for [`AssetRegistry::create_employee`].
///
/// `domain_name` and `company_name` are authorization assertions: they must
/// equal the current names of the referenced records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEmployee {
    pub id: String,
    pub employee_name: String,
    pub designation: String,
    pub dob: String,
    pub domain_id: String,
    pub domain_name: String,
    pub company_id: String,
    pub company_name: String,
}

impl NewEmployee {
    fn fields(&self) -> [&str; 8] {
        [
            &self.id,
            &self.employee_name,
            &self.designation,
            &self.dob,
            &self.domain_id,
            &self.domain_name,
            &self.company_id,
            &self.company_name,
        ]
    }
}

/// Enforces existence, uniqueness, relational consistency and authorization
/// for employees, domains and companies.
///
/// The registry holds no state of its own between calls: every operation
/// reads what it needs from the ledger and writes its result back.
pub struct AssetRegistry<S> {
    state: S,
    authorizer: Arc<dyn Authorizer>,
    config: RegistryConfig,
}

impl<S: LedgerState> AssetRegistry<S> {
    /// Registry with name-match authorization and default configuration.
    pub fn new(state: S) -> Self {
        Self::with_authorizer(state, Arc::new(NameMatchAuthorizer), RegistryConfig::default())
    }

    pub fn with_authorizer(
        state: S,
        authorizer: Arc<dyn Authorizer>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            state,
            authorizer,
            config,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ---- Lookups ----

    pub fn get_employee(&self, id: &str) -> RegistryResult<Employee> {
        strict_get(&self.state, id)
    }

    pub fn get_domain(&self, id: &str) -> RegistryResult<Domain> {
        strict_get(&self.state, id)
    }

    pub fn get_company(&self, id: &str) -> RegistryResult<Company> {
        strict_get(&self.state, id)
    }

    // ---- Creation ----

    pub fn create_domain(&self, id: &str, domain_name: &str) -> RegistryResult<Domain> {
        sanitize(&[id, domain_name])?;
        self.check_key_space(EntityKind::Domain, id)?;
        self.ensure_absent::<Domain>(id)?;

        let domain = Domain::new(id, domain_name);
        self.put_entity(&domain)?;
        tracing::debug!(id, name = domain_name, "domain created");
        Ok(domain)
    }

    pub fn create_company(&self, id: &str, company_name: &str) -> RegistryResult<Company> {
        sanitize(&[id, company_name])?;
        self.check_key_space(EntityKind::Company, id)?;
        self.ensure_absent::<Company>(id)?;

        let company = Company::new(id, company_name);
        self.put_entity(&company)?;
        tracing::debug!(id, name = company_name, "company created");
        Ok(company)
    }

    /// Create an employee assigned to an existing domain and company.
    ///
    /// Both name assertions are checked against the live records before the
    /// id collision check, and the stored references are snapshots of those
    /// live records.
    pub fn create_employee(&self, request: &NewEmployee) -> RegistryResult<Employee> {
        sanitize(&request.fields())?;
        self.check_key_space(EntityKind::Employee, &request.id)?;

        let domain = self.get_domain(&request.domain_id)?;
        self.authorize(
            EntityKind::Domain,
            &request.domain_name,
            &domain.domain_name,
            Action::Create,
            EntityKind::Employee,
            &request.id,
        )?;

        let company = self.get_company(&request.company_id)?;
        self.authorize(
            EntityKind::Company,
            &request.company_name,
            &company.company_name,
            Action::Create,
            EntityKind::Employee,
            &request.id,
        )?;

        self.ensure_absent::<Employee>(&request.id)?;

        let employee = Employee::new(
            request.id.clone(),
            request.employee_name.clone(),
            request.designation.clone(),
            request.dob.clone(),
            DomainRef::snapshot(&domain),
            CompanyRef::snapshot(&company),
        );
        self.put_entity(&employee)?;
        tracing::debug!(
            id = %employee.id,
            domain = %domain.id,
            company = %company.id,
            "employee created"
        );
        Ok(employee)
    }

    // ---- Transfers ----

    /// Move an employee to another domain.
    ///
    /// The assertion is checked against the employee's current snapshot, not
    /// the target domain, and before the target is resolved.
    pub fn transfer_domain(
        &self,
        employee_id: &str,
        new_domain_id: &str,
        authorizing_domain_name: &str,
    ) -> RegistryResult<Employee> {
        sanitize(&[employee_id, new_domain_id, authorizing_domain_name])?;

        let mut employee = self.get_employee(employee_id)?;
        self.authorize(
            EntityKind::Domain,
            authorizing_domain_name,
            &employee.domain.domain_name,
            Action::Transfer,
            EntityKind::Employee,
            employee_id,
        )?;

        let domain = self.get_domain(new_domain_id)?;
        employee.domain = DomainRef::new(new_domain_id, domain.domain_name);
        self.put_entity(&employee)?;
        tracing::debug!(employee = employee_id, domain = new_domain_id, "domain transferred");
        Ok(employee)
    }

    /// Move an employee to another company. Mirrors
    /// [`transfer_domain`](Self::transfer_domain).
    pub fn transfer_company(
        &self,
        employee_id: &str,
        new_company_id: &str,
        authorizing_company_name: &str,
    ) -> RegistryResult<Employee> {
        sanitize(&[employee_id, new_company_id, authorizing_company_name])?;

        let mut employee = self.get_employee(employee_id)?;
        self.authorize(
            EntityKind::Company,
            authorizing_company_name,
            &employee.company.company_name,
            Action::Transfer,
            EntityKind::Employee,
            employee_id,
        )?;

        let company = self.get_company(new_company_id)?;
        employee.company = CompanyRef::new(new_company_id, company.company_name);
        self.put_entity(&employee)?;
        tracing::debug!(employee = employee_id, company = new_company_id, "company transferred");
        Ok(employee)
    }

    // ---- Soft disable ----

    /// Mark a domain disabled. The domain authorizes this by its own name.
    pub fn disable_domain(
        &self,
        id: &str,
        authorizing_domain_name: &str,
    ) -> RegistryResult<Domain> {
        sanitize(&[id, authorizing_domain_name])?;

        let mut domain = self.get_domain(id)?;
        self.authorize(
            EntityKind::Domain,
            authorizing_domain_name,
            &domain.domain_name,
            Action::Disable,
            EntityKind::Domain,
            id,
        )?;

        domain.enabled = false;
        self.put_entity(&domain)?;
        tracing::debug!(id, "domain disabled");
        Ok(domain)
    }

    pub fn disable_company(
        &self,
        id: &str,
        authorizing_company_name: &str,
    ) -> RegistryResult<Company> {
        sanitize(&[id, authorizing_company_name])?;

        let mut company = self.get_company(id)?;
        self.authorize(
            EntityKind::Company,
            authorizing_company_name,
            &company.company_name,
            Action::Disable,
            EntityKind::Company,
            id,
        )?;

        company.enabled = false;
        self.put_entity(&company)?;
        tracing::debug!(id, "company disabled");
        Ok(company)
    }

    // ---- Deletion ----

    /// Hard-delete an employee, authorized by its snapshot domain name.
    pub fn delete_employee(&self, id: &str, authorizing_domain_name: &str) -> RegistryResult<()> {
        sanitize(&[id, authorizing_domain_name])?;

        let employee = self.get_employee(id)?;
        self.authorize(
            EntityKind::Domain,
            authorizing_domain_name,
            &employee.domain.domain_name,
            Action::Delete,
            EntityKind::Employee,
            id,
        )?;

        self.state.delete(id)?;
        tracing::debug!(id, "employee deleted");
        Ok(())
    }

    // ---- Unchecked passthroughs ----

    /// Read any key. A missing key is `Ok(None)`.
    pub fn read_raw(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        sanitize(&[key])?;
        Ok(self.state.get(key)?)
    }

    /// Write any key. Only the argument shape is checked.
    pub fn write_raw(&self, key: &str, value: &str) -> RegistryResult<()> {
        sanitize(&[key, value])?;
        self.state.put(key, value.as_bytes())?;
        Ok(())
    }

    // ---- Internals ----

    fn put_entity<E: Entity>(&self, entity: &E) -> RegistryResult<()> {
        let bytes = entity.to_bytes()?;
        self.state.put(entity.id(), &bytes)?;
        Ok(())
    }

    fn ensure_absent<E: Entity>(&self, id: &str) -> RegistryResult<()> {
        if exists::<E, S>(&self.state, id)? {
            return Err(RegistryError::AlreadyExists {
                kind: E::KIND,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn check_key_space(&self, kind: EntityKind, id: &str) -> RegistryResult<()> {
        if self.config.enforce_key_spaces && !kind.owns_key(id) {
            return Err(RegistryError::InvalidArgument(format!(
                "{kind} id '{id}' is outside the {kind} key range {}",
                kind.range()
            )));
        }
        Ok(())
    }

    fn authorize(
        &self,
        authority: EntityKind,
        asserted: &str,
        actual: &str,
        action: Action,
        target: EntityKind,
        target_id: &str,
    ) -> RegistryResult<()> {
        if self.authorizer.authorize(asserted, actual) {
            return Ok(());
        }
        tracing::debug!(%authority, asserted, %action, %target, target_id, "authorization refused");
        Err(RegistryError::Unauthorized {
            authority,
            asserted: asserted.to_string(),
            action,
            target,
            target_id: target_id.to_string(),
        })
    }
}
