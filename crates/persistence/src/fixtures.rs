// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seeded in-memory legacy databases for tests.
//!
//! Each fixture creates a uniquely named pair of shared-cache in-memory
//! `SQLite` databases and keeps one writable connection to each open for
//! its lifetime, which is what keeps the databases alive.
//!
//! Seed data:
//!
//! | database | germplasm          | names (non-genus)          | genus names         |
//! |----------|--------------------|----------------------------|---------------------|
//! | local    | -2, -1             | -4 (gid 1), -3, -1         | Avena               |
//! | central  | 1..=5, 6 replaced  | 1, 2, 4, 6, 8, 10, 11      | Triticum, Hordeum   |
//!
//! Users live in the central database: `ALICE`/`secret` (system
//! administrator), `BOB`/`hunter2` (breeder) and `CAROL`/`pw`, whose type
//! code has no definition.

use std::sync::atomic::{AtomicU64, Ordering};

use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};

use crate::connections::ConnectionRole;
use crate::error::PersistenceError;
use crate::params::ConnectionParameters;

static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

pub const GENUS_NAME_TYPE: i32 = 1;
pub const ADMIN_USER_TYPE: i32 = 10;
pub const BREEDER_USER_TYPE: i32 = 11;
pub const UNDEFINED_USER_TYPE: i32 = 99;

/// Genotypes in iteration order.
pub const GENOTYPE_IDS: [i32; 7] = [-2, -1, 1, 2, 3, 4, 5];
/// Genotype aliases in iteration order.
pub const GENOTYPE_ALIAS_IDS: [i32; 10] = [-4, -3, -1, 1, 2, 4, 6, 8, 10, 11];
/// Aliases of genotype 1 in iteration order.
pub const GENOTYPE_1_ALIAS_IDS: [i32; 3] = [-4, 1, 2];
/// Genus names in id order.
pub const GENUS_NAMES: [&str; 3] = ["Avena", "Hordeum", "Triticum"];

const SCHEMA: &str = "
CREATE TABLE germplsm (
    gid INTEGER PRIMARY KEY,
    methn INTEGER NOT NULL DEFAULT 0,
    gnpgs INTEGER NOT NULL DEFAULT 0,
    gpid1 INTEGER NOT NULL DEFAULT 0,
    gpid2 INTEGER NOT NULL DEFAULT 0,
    germuid INTEGER NOT NULL DEFAULT 0,
    lgid INTEGER NOT NULL DEFAULT 0,
    glocn INTEGER NOT NULL DEFAULT 0,
    gdate INTEGER NOT NULL DEFAULT 0,
    gref INTEGER NOT NULL DEFAULT 0,
    grplce INTEGER NOT NULL DEFAULT 0,
    mgid INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE names (
    nid INTEGER PRIMARY KEY,
    gid INTEGER NOT NULL,
    ntype INTEGER NOT NULL,
    nstat INTEGER NOT NULL,
    nuid INTEGER NOT NULL DEFAULT 0,
    nval TEXT NOT NULL,
    nlocn INTEGER NOT NULL DEFAULT 0,
    ndate INTEGER NOT NULL DEFAULT 0,
    nref INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE udflds (
    fldno INTEGER PRIMARY KEY,
    ftable TEXT NOT NULL,
    ftype TEXT NOT NULL,
    fcode TEXT NOT NULL,
    fname TEXT NOT NULL,
    ffmt TEXT,
    fdesc TEXT,
    lfldno INTEGER NOT NULL DEFAULT 0,
    fuid INTEGER NOT NULL DEFAULT 0,
    fdate INTEGER NOT NULL DEFAULT 0,
    scaleid INTEGER
);
CREATE TABLE users (
    userid INTEGER PRIMARY KEY,
    instalid INTEGER NOT NULL DEFAULT 0,
    ustatus INTEGER NOT NULL DEFAULT 1,
    uaccess INTEGER NOT NULL DEFAULT 0,
    utype INTEGER NOT NULL,
    uname TEXT NOT NULL,
    upswd TEXT,
    personid INTEGER NOT NULL DEFAULT 0,
    adate INTEGER,
    cdate INTEGER
);
";

const NAME_TYPES: &str = "
INSERT INTO udflds (fldno, ftable, ftype, fcode, fname) VALUES
    (1, 'NAMES', 'NAME', 'GENUS', 'Genus name'),
    (2, 'NAMES', 'NAME', 'CVNAME', 'Cultivar name'),
    (3, 'NAMES', 'NAME', 'ACCNO', 'Accession number');
";

const CENTRAL_SEED: &str = "
INSERT INTO udflds (fldno, ftable, ftype, fcode, fname) VALUES
    (10, 'USERS', 'UTYPE', 'ADMIN', 'SYSTEM ADMINISTRATOR'),
    (11, 'USERS', 'UTYPE', 'BREEDER', 'BREEDER');
INSERT INTO users (userid, instalid, ustatus, uaccess, utype, uname, upswd, personid, adate) VALUES
    (1, 1, 1, 100, 10, 'ALICE', 'secret', 11, 20240115),
    (2, 1, 1, 50, 11, 'BOB', 'hunter2', 12, NULL),
    (3, 1, 1, 10, 99, 'CAROL', 'pw', 13, NULL);
INSERT INTO germplsm (gid, germuid, glocn, grplce) VALUES
    (1, 1, 100, 0),
    (2, 1, 100, 0),
    (3, 2, 200, 0),
    (4, 2, 300, 0),
    (5, 1, 0, 0),
    (6, 1, 0, 1);
INSERT INTO names (nid, gid, ntype, nstat, nval) VALUES
    (1, 1, 2, 1, 'KHAPLI'),
    (2, 1, 3, 0, 'AUS 1234'),
    (3, 1, 1, 0, 'Triticum'),
    (4, 2, 2, 1, 'GABO'),
    (5, 2, 1, 0, 'Triticum'),
    (6, 3, 2, 1, 'SUNCO'),
    (7, 3, 1, 0, 'triticum'),
    (8, 4, 2, 1, 'SCHOONER'),
    (9, 4, 1, 0, 'Hordeum'),
    (10, 5, 3, 1, 'AUS 999'),
    (11, 6, 2, 1, 'OLD'),
    (12, 2, 3, 9, 'DELETED NAME');
";

const LOCAL_SEED: &str = "
INSERT INTO germplsm (gid, germuid, glocn, grplce) VALUES
    (-2, 3, 400, 0),
    (-1, 3, 400, 0);
INSERT INTO names (nid, gid, ntype, nstat, nval) VALUES
    (-4, 1, 3, 0, 'KH-LOCAL'),
    (-3, -2, 2, 1, 'LOCAL TWO'),
    (-2, -1, 1, 0, 'Avena'),
    (-1, -1, 2, 1, 'LOCAL ONE');
";

/// A seeded pair of local and central databases.
pub struct LegacyFixture {
    local: ConnectionParameters,
    central: ConnectionParameters,
    local_db: SqliteConnection,
    central_db: SqliteConnection,
}

impl LegacyFixture {
    /// Creates both databases with the full seed data.
    ///
    /// # Errors
    ///
    /// Returns an error if the databases cannot be created or seeded.
    pub fn new() -> Result<Self, PersistenceError> {
        let mut fixture = Self::with_schema()?;
        fixture.execute(ConnectionRole::Local, LOCAL_SEED)?;
        fixture.execute(ConnectionRole::Central, CENTRAL_SEED)?;
        Ok(fixture)
    }

    /// Creates both databases with the schema and name types only.
    ///
    /// # Errors
    ///
    /// Returns an error if the databases cannot be created.
    pub fn with_schema() -> Result<Self, PersistenceError> {
        let id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let local = ConnectionParameters::new(format!(
            "file:bms_local_{id}?mode=memory&cache=shared"
        ));
        let central = ConnectionParameters::new(format!(
            "file:bms_central_{id}?mode=memory&cache=shared"
        ));

        let mut local_db = SqliteConnection::establish(&local.connection_url)?;
        let mut central_db = SqliteConnection::establish(&central.connection_url)?;
        for conn in [&mut local_db, &mut central_db] {
            conn.batch_execute(SCHEMA)?;
            conn.batch_execute(NAME_TYPES)?;
        }

        Ok(Self {
            local,
            central,
            local_db,
            central_db,
        })
    }

    #[must_use]
    pub fn local_parameters(&self) -> ConnectionParameters {
        self.local.clone()
    }

    #[must_use]
    pub fn central_parameters(&self) -> ConnectionParameters {
        self.central.clone()
    }

    /// Runs arbitrary SQL against one of the databases.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQL fails.
    pub fn execute(&mut self, role: ConnectionRole, sql: &str) -> Result<(), PersistenceError> {
        let conn = match role {
            ConnectionRole::Local => &mut self.local_db,
            ConnectionRole::Central => &mut self.central_db,
        };
        conn.batch_execute(sql)?;
        Ok(())
    }

    /// Adds a central user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_user(
        &mut self,
        user_id: i32,
        user_name: &str,
        password: &str,
        user_type: i32,
    ) -> Result<(), PersistenceError> {
        let sql = format!(
            "INSERT INTO users (userid, utype, uname, upswd) VALUES ({user_id}, {user_type}, '{}', '{}')",
            user_name.replace('\'', "''"),
            password.replace('\'', "''")
        );
        self.execute(ConnectionRole::Central, &sql)
    }

    /// Adds `count` central germplasm records with ids starting at `first_gid`,
    /// each with one preferred cultivar name.
    ///
    /// # Errors
    ///
    /// Returns an error if an insert fails.
    pub fn add_central_genotypes(&mut self, first_gid: i32, count: i32) -> Result<(), PersistenceError> {
        let mut sql = String::new();
        for gid in first_gid..first_gid + count {
            sql.push_str(&format!(
                "INSERT INTO germplsm (gid) VALUES ({gid});\n\
                 INSERT INTO names (nid, gid, ntype, nstat, nval) VALUES ({gid}, {gid}, 2, 1, 'G{gid}');\n"
            ));
        }
        self.execute(ConnectionRole::Central, &sql)
    }
}
