use metrics_exporter_prometheus::PrometheusHandle;
use reciprocity::assessment::{Classification, DomainScores, ScoreCard};
use reciprocity::auth::{FIXTURE_EMAIL, FIXTURE_USER_ID};
use reciprocity::error::AppError;
use reciprocity::records::{
    AssessmentRepository, AssessmentRow, NewAssessment, NewUser, RepositoryError, UserAccount,
    UserRepository,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) database: Arc<SqliteDatabase>,
}

/// SQLite rendition of the original account and assessment tables. The domain
/// columns keep their short-code names because exports and clients read them
/// case-sensitively.
const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    name TEXT,
    role TEXT DEFAULT 'user',
    created_at TEXT
);
CREATE TABLE IF NOT EXISTS assessments (
    id INTEGER PRIMARY KEY,
    user_id INTEGER,
    subject_name TEXT,
    timestamp TEXT,
    TP INTEGER, BI INTEGER, OE INTEGER,
    LC INTEGER, SC INTEGER, PS INTEGER,
    IOS REAL, EOS REAL,
    CLASSIFICATION TEXT,
    CONFIDENCE REAL,
    raw_json TEXT
);
";

/// Shared handle to the assessment database. rusqlite connections are not
/// Sync, so all access funnels through one mutex-guarded connection.
pub(crate) struct SqliteDatabase {
    conn: Mutex<Connection>,
    target: String,
}

impl SqliteDatabase {
    /// Opens (creating if needed) the database file and applies the schema.
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let target = path.as_ref().display().to_string();
        let conn = Connection::open(path.as_ref())
            .map_err(|err| AppError::Storage(format!("could not open {target}: {err}")))?;
        conn.execute_batch(SCHEMA)
            .map_err(|err| AppError::Storage(format!("could not prepare {target}: {err}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
            target,
        })
    }

    pub(crate) fn target(&self) -> &str {
        &self.target
    }

    /// Round-trips a trivial query, the probe behind /health and /db/ping.
    pub(crate) fn ping(&self) -> Result<i64, rusqlite::Error> {
        let conn = self.lock();
        conn.query_row("SELECT 1", [], |row| row.get(0))
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("connection mutex poisoned")
    }
}

#[derive(Clone)]
pub(crate) struct SqliteUserRepository {
    database: Arc<SqliteDatabase>,
}

impl SqliteUserRepository {
    pub(crate) fn new(database: Arc<SqliteDatabase>) -> Self {
        Self { database }
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, user: NewUser) -> Result<UserAccount, RepositoryError> {
        let conn = self.database.lock();
        conn.execute(
            "INSERT INTO users (email, password_hash, name, role, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.email,
                user.password_hash,
                user.name,
                user.role,
                user.created_at
            ],
        )
        .map_err(map_sqlite_error)?;

        Ok(UserAccount {
            id: conn.last_insert_rowid(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        })
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let conn = self.database.lock();
        conn.query_row(
            "SELECT id, email, password_hash, name, role, created_at \
             FROM users WHERE email = ?1",
            params![email],
            |row| {
                Ok(UserAccount {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                    name: row.get(3)?,
                    role: row.get(4)?,
                    created_at: row.get(5)?,
                })
            },
        )
        .optional()
        .map_err(map_sqlite_error)
    }
}

#[derive(Clone)]
pub(crate) struct SqliteAssessmentRepository {
    database: Arc<SqliteDatabase>,
}

impl SqliteAssessmentRepository {
    pub(crate) fn new(database: Arc<SqliteDatabase>) -> Self {
        Self { database }
    }
}

impl AssessmentRepository for SqliteAssessmentRepository {
    fn insert(&self, record: NewAssessment) -> Result<AssessmentRow, RepositoryError> {
        let conn = self.database.lock();
        conn.execute(
            "INSERT INTO assessments \
             (user_id, subject_name, timestamp, TP, BI, OE, LC, SC, PS, \
              IOS, EOS, CLASSIFICATION, CONFIDENCE, raw_json) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                record.user_id,
                record.subject_name,
                record.timestamp,
                record.scores.inputs.tp,
                record.scores.inputs.bi,
                record.scores.inputs.oe,
                record.scores.inputs.lc,
                record.scores.inputs.sc,
                record.scores.inputs.ps,
                record.scores.ios,
                record.scores.eos,
                record.scores.classification.label(),
                record.scores.confidence,
                record.raw_json,
            ],
        )
        .map_err(map_sqlite_error)?;

        Ok(AssessmentRow {
            id: conn.last_insert_rowid(),
            user_id: record.user_id,
            subject_name: record.subject_name,
            timestamp: record.timestamp,
            scores: record.scores,
            raw_json: record.raw_json,
        })
    }

    fn recent(&self, limit: usize) -> Result<Vec<AssessmentRow>, RepositoryError> {
        let conn = self.database.lock();
        let mut statement = conn
            .prepare(
                "SELECT id, user_id, subject_name, timestamp, TP, BI, OE, LC, SC, PS, \
                 IOS, EOS, CLASSIFICATION, CONFIDENCE, raw_json \
                 FROM assessments ORDER BY id DESC LIMIT ?1",
            )
            .map_err(map_sqlite_error)?;
        let rows = statement
            .query_map(params![limit as i64], assessment_from_row)
            .map_err(map_sqlite_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlite_error)?;
        Ok(rows)
    }
}

fn assessment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AssessmentRow> {
    let label: String = row.get(12)?;
    let classification = Classification::from_label(&label).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            12,
            rusqlite::types::Type::Text,
            format!("unknown classification `{label}`").into(),
        )
    })?;
    let ios: f64 = row.get(10)?;
    let eos: f64 = row.get(11)?;

    Ok(AssessmentRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        subject_name: row.get(2)?,
        timestamp: row.get(3)?,
        scores: ScoreCard {
            inputs: DomainScores {
                tp: row.get(4)?,
                bi: row.get(5)?,
                oe: row.get(6)?,
                lc: row.get(7)?,
                sc: row.get(8)?,
                ps: row.get(9)?,
            },
            ios,
            eos,
            // DIFF is not a stored column; rebuild it from the rounded scores.
            diff: ((ios - eos) * 10.0).round() / 10.0,
            confidence: row.get(13)?,
            classification,
        },
        raw_json: row.get(14)?,
    })
}

fn map_sqlite_error(err: rusqlite::Error) -> RepositoryError {
    if err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
        RepositoryError::Conflict
    } else {
        RepositoryError::Unavailable(err.to_string())
    }
}

/// Fixture mode resolves every request to user id 1; seed that row so stored
/// assessments reference a real account. The empty password hash never
/// verifies, so the account cannot be signed into through the login flow.
pub(crate) fn ensure_fixture_user(database: &SqliteDatabase) -> Result<(), AppError> {
    let conn = database.lock();
    conn.execute(
        "INSERT OR IGNORE INTO users (id, email, password_hash, name, role, created_at) \
         VALUES (?1, ?2, '', 'Fixture User', 'user', ?3)",
        params![
            FIXTURE_USER_ID,
            FIXTURE_EMAIL,
            chrono::Utc::now().to_rfc3339()
        ],
    )
    .map_err(|err| AppError::Storage(format!("could not seed fixture user: {err}")))?;
    Ok(())
}
