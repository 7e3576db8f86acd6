use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use log::{debug, info};
use serde::Serialize;
use consents_shared::connection::redact_connection_string;
use consents_shared::consent_record::ConsentRecord;
use consents_shared::consent_sql::{BindStyle, CREATE_CONSENTS_TABLE, upsert_sql};
use consents_shared::error::{ConsentsError, ConsentsResult};

const STOP_ON_ERROR: &str = "ON_ERROR_STOP=1";

/// psql only interpolates `:'name'` variables in script input, never in `-c` strings, so the
/// statements are fed through stdin
const SCRIPT_FROM_STDIN: [&str; 2] = ["-f", "-"];

/// A fully built call to the psql client
#[derive(Debug, Clone)]
pub struct PsqlInvocation {
    program: PathBuf,
    /// the connection string, kept separately so it can be redacted
    database_url: String,
    /// everything after the connection string
    args: Vec<String>,
    /// statements written to stdin, in execution order
    statements: Vec<String>,
}

/// What a dry run prints
#[derive(Debug, Serialize)]
pub struct InvocationPreview<'record> {
    program: String,
    args: Vec<String>,
    stdin: String,
    record: &'record ConsentRecord,
}

impl PsqlInvocation {
    /// Builds `psql <url> -v name=value ... -v ON_ERROR_STOP=1 -f -` with the upsert as the stdin
    /// script. With `create_table` set the table is ensured by an earlier statement of the same
    /// script.
    pub fn upsert(program: &Path, database_url: &str, record: &ConsentRecord, create_table: bool) -> Self {
        let mut args = Vec::new();
        for (name, value) in record.bindings() {
            args.push(String::from("-v"));
            args.push(format!("{}={}", name, value));
        }

        args.push(String::from("-v"));
        args.push(String::from(STOP_ON_ERROR));
        args.extend(SCRIPT_FROM_STDIN.iter().map(|arg| arg.to_string()));

        let mut statements = Vec::new();
        if create_table {
            statements.push(String::from(CREATE_CONSENTS_TABLE));
        }
        statements.push(upsert_sql(BindStyle::PsqlVariables));

        Self {
            program: program.to_path_buf(),
            database_url: database_url.to_string(),
            args,
            statements,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The full argument list, connection string first
    pub fn args(&self) -> Vec<&str> {
        let mut all = vec![self.database_url.as_str()];
        all.extend(self.args.iter().map(|arg| arg.as_str()));
        all
    }

    /// `name=value` pairs bound with `-v`, excluding client settings
    pub fn variable_bindings(&self) -> Vec<&str> {
        self.args.windows(2)
            .filter(|pair| pair[0] == "-v" && pair[1] != STOP_ON_ERROR)
            .map(|pair| pair[1].as_str())
            .collect()
    }

    pub fn statements(&self) -> Vec<&str> {
        self.statements.iter()
            .map(|stmt| stmt.as_str())
            .collect()
    }

    /// The script psql reads from stdin, one statement per line
    pub fn script(&self) -> String {
        let mut script = self.statements.join("\n");
        script.push('\n');
        script
    }

    pub fn preview<'record>(&self, record: &'record ConsentRecord) -> InvocationPreview<'record> {
        let mut args = vec![redact_connection_string(&self.database_url)];
        args.extend(self.args.iter().cloned());

        InvocationPreview {
            program: self.program().display().to_string(),
            args,
            stdin: self.script(),
            record,
        }
    }

    /// Spawns psql, writes the script to its stdin and waits for it. Output goes straight to our
    /// stdout/stderr and is not inspected.
    pub fn run(&self) -> ConsentsResult<()> {
        info!("Invoking {} against {}", self.program.display(), redact_connection_string(&self.database_url));
        debug!("Binding {:?}", self.variable_bindings());
        debug!("Statements: {:?}", self.statements());

        let mut child = Command::new(self.program())
            .args(self.args())
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|err| {
                match err.kind() {
                    ErrorKind::NotFound => ConsentsError::environment("psql not found. Install Postgres client tools."),
                    _ => ConsentsError::environment(format!("Failed to launch {}", self.program.display()))
                        .with_cause(err),
                }
            })?;

        // dropping stdin closes the pipe so psql sees the end of the script
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(self.script().as_bytes()),
            None => Ok(()),
        };

        let status = child.wait()
            .map_err(|err| ConsentsError::execution("Failed to wait for psql").with_cause(err))?;

        if !status.success() {
            let message = match status.code() {
                Some(code) => format!("psql exited with status {}", code),
                None => String::from("psql was terminated by a signal"),
            };
            return Err(ConsentsError::execution(message));
        }

        // a client that exits cleanly before reading everything closes the pipe early
        if let Err(err) = write_result {
            if err.kind() != ErrorKind::BrokenPipe {
                return Err(ConsentsError::execution("Failed to send statements to psql").with_cause(err));
            }
            debug!("psql closed stdin early");
        }

        info!("psql completed successfully");
        Ok(())
    }
}
