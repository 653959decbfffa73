// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The adapter over a local and a central legacy database.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use bms_interop::{OperationRegistry, RecordCountCache, RecordCountCacheEntry, SessionRegistry};
use bms_interop_domain::{EntityKind, SystemGroupInfo, UserInfo};
use bms_interop_persistence::users::{UserRecord, find_user};
use bms_interop_persistence::{
    ConnectionManager, ConnectionParameters, GenotypeAliasProvider,
    GenotypeProvider, GenusProvider, Progress, silent_progress,
};
use tracing::{info, warn};

use crate::auth::{CredentialCheck, DalSession, PasswordCheck, SessionExpiryOption};
use crate::error::ApiError;
use crate::operation::{DalOperation, ExecutionContext, OperationResult, SharedProvider};
use crate::response::DalResponseBuilder;

pub const DATABASE_VERSION: &str = "0.1";

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const INTERNAL_ERROR: &str = "Internal error";

/// The providers operations are bound to.
#[derive(Clone)]
pub struct Providers {
    pub genus: SharedProvider,
    pub genotype: SharedProvider,
    pub genotype_alias: SharedProvider,
}

impl Providers {
    /// The federated providers over the given connections.
    #[must_use]
    pub fn federated(connections: &Arc<ConnectionManager>, batch_size: Option<u64>) -> Self {
        let genotype = GenotypeProvider::new(Arc::clone(connections));
        let genotype_alias = GenotypeAliasProvider::new(Arc::clone(connections));
        let (genotype, genotype_alias) = match batch_size {
            Some(size) => (
                genotype.with_batch_size(size),
                genotype_alias.with_batch_size(size),
            ),
            None => (genotype, genotype_alias),
        };
        Self {
            genus: Arc::new(GenusProvider::new(Arc::clone(connections))),
            genotype: Arc::new(genotype),
            genotype_alias: Arc::new(genotype_alias),
        }
    }
}

/// Registers the adapter's operation templates.
///
/// # Errors
///
/// Returns `ApiError::Configuration` if a template is not recognised or
/// registered twice.
pub fn register_operations(
    registry: &mut OperationRegistry<SharedProvider>,
    providers: &Providers,
) -> Result<(), ApiError> {
    registry
        .register("get/genus/_id", EntityKind::Genus, Arc::clone(&providers.genus))?
        .register("list/genus", EntityKind::Genus, Arc::clone(&providers.genus))?
        .register(
            "get/genotype/_id",
            EntityKind::Genotype,
            Arc::clone(&providers.genotype),
        )?
        .register(
            "list/genotype/_nperpage/page/_num",
            EntityKind::Genotype,
            Arc::clone(&providers.genotype),
        )?
        .register(
            "get/genotypealias/_id",
            EntityKind::GenotypeAlias,
            Arc::clone(&providers.genotype_alias),
        )?
        .register(
            "list/genotypealias/_nperpage/page/_num",
            EntityKind::GenotypeAlias,
            Arc::clone(&providers.genotype_alias),
        )?
        .register(
            "genotype/_genoid/list/alias",
            EntityKind::GenotypeAlias,
            Arc::clone(&providers.genotype_alias),
        )?;
    Ok(())
}

/// Assembles a [`BmsDalDatabase`].
pub struct BmsDalDatabaseBuilder {
    local: Option<ConnectionParameters>,
    central: ConnectionParameters,
    progress: Arc<Progress>,
    credential_check: Box<dyn CredentialCheck>,
    batch_size: Option<u64>,
    initialise: bool,
}

impl BmsDalDatabaseBuilder {
    #[must_use]
    pub fn local(mut self, params: ConnectionParameters) -> Self {
        self.local = Some(params);
        self
    }

    /// Progress sink used when initialisation is not given one.
    #[must_use]
    pub fn progress(mut self, progress: Arc<Progress>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn credential_check(mut self, check: impl CredentialCheck + 'static) -> Self {
        self.credential_check = Box::new(check);
        self
    }

    /// Rows fetched per statement by federated listings.
    #[must_use]
    pub const fn batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Opens the connections while building instead of on first use.
    #[must_use]
    pub const fn initialise_now(mut self, initialise: bool) -> Self {
        self.initialise = initialise;
        self
    }

    /// Builds the adapter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if local and central address the
    /// same database or an operation template is invalid, and any
    /// connection error when initialising now.
    pub fn build(self) -> Result<BmsDalDatabase, ApiError> {
        let connections = Arc::new(ConnectionManager::new(self.local, self.central)?);
        let providers = Providers::federated(&connections, self.batch_size);

        let mut registry = OperationRegistry::new()?;
        register_operations(&mut registry, &providers)?;

        let database = BmsDalDatabase {
            connections,
            registry,
            operations: OnceLock::new(),
            sessions: SessionRegistry::new(),
            record_counts: RecordCountCache::new(),
            credential_check: self.credential_check,
            default_progress: self.progress,
        };

        if self.initialise {
            database.initialise(None)?;
        }
        Ok(database)
    }
}

/// The DAL database adapter.
///
/// Safe to share between request threads. Connections open lazily on the
/// first login or explicit [`BmsDalDatabase::initialise`].
pub struct BmsDalDatabase {
    connections: Arc<ConnectionManager>,
    registry: OperationRegistry<SharedProvider>,
    operations: OnceLock<Vec<DalOperation>>,
    sessions: SessionRegistry,
    record_counts: RecordCountCache,
    credential_check: Box<dyn CredentialCheck>,
    default_progress: Arc<Progress>,
}

impl BmsDalDatabase {
    /// Starts building an adapter for the given central database.
    #[must_use]
    pub fn builder(central: ConnectionParameters) -> BmsDalDatabaseBuilder {
        BmsDalDatabaseBuilder {
            local: None,
            central,
            progress: Arc::new(silent_progress),
            credential_check: Box::new(PasswordCheck),
            batch_size: None,
            initialise: false,
        }
    }

    /// Opens the connections and loads reference data. Repeated calls are
    /// no-ops while the connections stay open.
    ///
    /// # Errors
    ///
    /// Returns an error if a connection fails or reference data is missing.
    pub fn initialise(&self, progress: Option<&Progress>) -> Result<(), ApiError> {
        let progress = progress.unwrap_or(&*self.default_progress);
        self.connections.initialise(progress)?;
        Ok(())
    }

    #[must_use]
    pub fn is_initialise_required(&self) -> bool {
        !self.connections.is_initialised()
    }

    /// Closes the connections and forgets every session.
    pub fn shutdown(&self) {
        self.connections.shutdown();
        let sessions = self.sessions.clear();
        self.record_counts.clear();
        info!(sessions = sessions.len(), "Adapter shut down");
    }

    /// The operations, built on first use.
    pub fn get_operations(&self) -> &[DalOperation] {
        self.operations.get_or_init(|| {
            let operations = self.registry.build(DalOperation::from_registration);
            info!(count = operations.len(), "Built operation list");
            operations
        })
    }

    /// Names of the entity types reachable through some operation.
    #[must_use]
    pub fn get_entity_names(&self) -> BTreeSet<&'static str> {
        self.get_operations()
            .iter()
            .map(DalOperation::entity_name)
            .collect()
    }

    /// Resolves an entity type by name, ignoring case.
    #[must_use]
    pub fn get_entity_kind(&self, name: &str) -> Option<EntityKind> {
        EntityKind::from_name(name)
            .ok()
            .filter(|kind| self.get_entity_names().contains(kind.name()))
    }

    #[must_use]
    pub const fn get_database_version(&self) -> &'static str {
        DATABASE_VERSION
    }

    /// `<central>$$<local>`, with an empty local part when there is none.
    #[must_use]
    pub fn get_database_path(&self) -> String {
        format!(
            "{}$${}",
            self.connections.central_parameters(),
            self.connections
                .local_parameters()
                .map(ToString::to_string)
                .unwrap_or_default()
        )
    }

    /// Authenticates a user and binds them to the session.
    ///
    /// Opens the connections if needed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` with a generic reason when
    /// the user is unknown, the credential check fails, or the lookup fails.
    pub fn do_login(
        &self,
        session_id: &str,
        user_name: &str,
        expiry: SessionExpiryOption,
        params: &BTreeMap<String, String>,
    ) -> Result<UserInfo, ApiError> {
        let record = self.lookup_user(user_name)?;
        let Some(record) = record else {
            info!(user_name, "Login rejected");
            return Err(ApiError::authentication(INVALID_CREDENTIALS));
        };

        if !self
            .credential_check
            .verify(user_name, record.upswd.as_deref(), params)
        {
            info!(user_name, "Login rejected");
            return Err(ApiError::authentication(INVALID_CREDENTIALS));
        }

        let user = user_info(user_name, &record);
        self.record_counts.open_session(session_id);
        self.sessions.login(session_id, user.clone());
        info!(user_name, user_id = %user.user_id, ?expiry, "User logged in");
        Ok(user)
    }

    fn lookup_user(&self, user_name: &str) -> Result<Option<UserRecord>, ApiError> {
        let connections = self
            .connections
            .initialise(&*self.default_progress)
            .map_err(|e| {
                warn!(error = %e, "Cannot open connections for login");
                ApiError::authentication_caused_by(INTERNAL_ERROR, e)
            })?;
        find_user(connections.central(), user_name).map_err(|e| {
            warn!(user_name, error = %e, "User lookup failed");
            ApiError::authentication_caused_by(INTERNAL_ERROR, e)
        })
    }

    /// Forgets the session and its cached counts. Unknown sessions are
    /// ignored.
    pub fn do_logout(&self, session: &DalSession) {
        let user = self.sessions.logout(&session.session_id);
        let purged = self.record_counts.remove_entries_for(&session.session_id);
        if let Some(user) = user {
            info!(user_name = %user.user_name, purged, "User logged out");
        }
    }

    #[must_use]
    pub fn session_user(&self, session_id: &str) -> Option<UserInfo> {
        self.sessions.get(session_id)
    }

    fn require_user(&self, session: &DalSession) -> Result<UserInfo, ApiError> {
        self.sessions
            .get(&session.session_id)
            .ok_or(ApiError::NotLoggedIn)
    }

    /// Group information for the session's user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` for an unknown session and
    /// `ApiError::MissingReferenceData` if the user's type code has no
    /// definition.
    pub fn get_system_group_info(&self, session: &DalSession) -> Result<SystemGroupInfo, ApiError> {
        let user = self.require_user(session)?;
        let connections = self.connections.current()?;
        let user_type = connections
            .reference()
            .user_type(user.type_code)
            .ok_or_else(|| {
                ApiError::MissingReferenceData(format!(
                    "no user type for type code {}",
                    user.type_code
                ))
            })?;

        Ok(SystemGroupInfo {
            group_id: session.group_id.clone(),
            group_name: user_type.name.clone(),
            group_owner: user_type.is_group_owner(),
        })
    }

    /// Lists the group of the session's user.
    ///
    /// A type code with no definition is listed as an unknown group.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` for an unknown session.
    pub fn perform_list_group(
        &self,
        session: &DalSession,
        builder: &mut dyn DalResponseBuilder,
    ) -> Result<(), ApiError> {
        let user = self.require_user(session)?;
        let connections = self.connections.current()?;

        builder.add_response_meta("SystemGroup");
        match connections.reference().user_type(user.type_code) {
            Some(user_type) => system_group(
                builder,
                &user_type.type_code.to_string(),
                &user_type.code,
                &user_type.name,
            ),
            None => {
                warn!(type_code = user.type_code, "User type has no definition");
                system_group(
                    builder,
                    "0",
                    &format!("Unknown-{}", user.type_code),
                    &format!("Missing user type definition for type code {}", user.type_code),
                );
            }
        }
        Ok(())
    }

    /// Lists every user type as a group.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` for an unknown session.
    pub fn perform_list_all_group(
        &self,
        session: &DalSession,
        builder: &mut dyn DalResponseBuilder,
    ) -> Result<(), ApiError> {
        self.require_user(session)?;
        let connections = self.connections.current()?;

        builder.add_response_meta("SystemGroup");
        for user_type in connections.reference().user_types.values() {
            system_group(
                builder,
                &user_type.type_code.to_string(),
                &user_type.code,
                &user_type.name,
            );
        }
        Ok(())
    }

    /// Lists the columns of an entity type. Needs no session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnknownTable` if no entity type has that name.
    pub fn perform_list_field(
        &self,
        _session: &DalSession,
        table_name: &str,
        builder: &mut dyn DalResponseBuilder,
    ) -> Result<(), ApiError> {
        let kind = self
            .get_entity_kind(table_name)
            .ok_or_else(|| ApiError::UnknownTable(table_name.to_string()))?;

        builder.add_response_meta("SCol");
        for column in kind.columns() {
            builder.start_tag("SCol");
            builder.attribute("Name", column.column);
            builder.attribute("DataType", column.column_type.dal_name());
            builder.attribute("Required", if column.nullable { "0" } else { "1" });
            builder.attribute(
                "ColSize",
                &column.max_length.map(|n| n.to_string()).unwrap_or_default(),
            );
            builder.attribute("CanFilter", if column.derived { "0" } else { "1" });
            builder.end_tag();
        }
        Ok(())
    }

    #[must_use]
    pub fn get_record_count_cache_entry(
        &self,
        session: &DalSession,
        entity: EntityKind,
        filter: Option<&str>,
    ) -> Option<RecordCountCacheEntry> {
        self.record_counts
            .get_entry(&session.session_id, entity, normalise_filter(filter))
    }

    /// Caches a count for a logged-in session. Counts for unknown sessions
    /// are dropped.
    pub fn set_record_count_cache_entry(
        &self,
        session: &DalSession,
        entity: EntityKind,
        filter: Option<&str>,
        count: u64,
    ) {
        self.record_counts.set_entry(
            &session.session_id,
            entity,
            normalise_filter(filter),
            count,
        );
    }

    /// Runs the first operation whose template matches `request_path`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotLoggedIn` for an unknown session,
    /// `ApiError::UnknownOperation` if nothing matches, and any error the
    /// operation raises.
    pub fn execute(
        &self,
        session: &DalSession,
        request_path: &str,
        filter: Option<&str>,
    ) -> Result<OperationResult, ApiError> {
        self.require_user(session)?;

        let (operation, invocation) = self
            .get_operations()
            .iter()
            .find_map(|op| op.match_path(request_path).map(|inv| (op, inv)))
            .ok_or_else(|| ApiError::UnknownOperation(request_path.to_string()))?;

        operation.execute(
            &self.execution_context(session),
            &invocation,
            normalise_filter(filter),
        )
    }

    pub(crate) fn execution_context<'a>(&'a self, session: &'a DalSession) -> ExecutionContext<'a> {
        ExecutionContext {
            session_id: &session.session_id,
            record_counts: &self.record_counts,
        }
    }
}

fn normalise_filter(filter: Option<&str>) -> Option<&str> {
    filter.map(str::trim).filter(|f| !f.is_empty())
}

fn user_info(user_name: &str, record: &UserRecord) -> UserInfo {
    UserInfo {
        user_name: user_name.to_string(),
        user_id: record.userid.to_string(),
        installation_id: record.instalid,
        status: record.ustatus,
        access: record.uaccess,
        type_code: record.utype,
        person_id: record.personid,
        access_date: record.adate.map(|date| date.to_string()),
    }
}

fn system_group(builder: &mut dyn DalResponseBuilder, id: &str, name: &str, description: &str) {
    builder.start_tag("SystemGroup");
    builder.attribute("SystemGroupId", id);
    builder.attribute("SystemGroupName", name);
    builder.attribute("SystemGroupDescription", description);
    builder.end_tag();
}

impl std::fmt::Debug for BmsDalDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BmsDalDatabase")
            .field("connections", &self.connections)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}
