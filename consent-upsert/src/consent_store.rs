use std::path::PathBuf;
use log::{debug, error, info};
use tokio::runtime::Builder;
use tokio_postgres::NoTls;
use consents_shared::connection::redact_connection_string;
use consents_shared::consent_record::ConsentRecord;
use consents_shared::consent_sql::{BindStyle, CREATE_CONSENTS_TABLE, upsert_sql};
use consents_shared::error::{ConsentsError, ConsentsResult};
use crate::psql::PsqlInvocation;

/// Something that can write a consent record into the consents table
pub trait ConsentStore {
    fn upsert(&self, record: &ConsentRecord) -> ConsentsResult<()>;
}

/// Writes through the psql command line client
pub struct PsqlConsentStore {
    psql_path: PathBuf,
    database_url: String,
    create_table: bool,
}

impl PsqlConsentStore {
    pub fn new(psql_path: PathBuf, database_url: String, create_table: bool) -> Self {
        Self {
            psql_path,
            database_url,
            create_table,
        }
    }

    pub fn invocation(&self, record: &ConsentRecord) -> PsqlInvocation {
        PsqlInvocation::upsert(&self.psql_path, &self.database_url, record, self.create_table)
    }
}

impl ConsentStore for PsqlConsentStore {
    fn upsert(&self, record: &ConsentRecord) -> ConsentsResult<()> {
        self.invocation(record).run()
    }
}

/// Writes through a direct postgres connection. No external process is involved.
pub struct NativeConsentStore {
    database_url: String,
    create_table: bool,
}

impl NativeConsentStore {
    pub fn new(database_url: String, create_table: bool) -> Self {
        Self {
            database_url,
            create_table,
        }
    }

    async fn upsert_async(&self, record: &ConsentRecord) -> ConsentsResult<u64> {
        info!("Connecting to {}", redact_connection_string(&self.database_url));
        let (client, connection) = tokio_postgres::connect(&self.database_url, NoTls)
            .await
            .map_err(|err| ConsentsError::execution("Failed to connect to database").with_cause(err))?;

        let connection_task = tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!("connection error: {}", err);
            }
        });

        if self.create_table {
            debug!("Ensuring consents table exists");
            client.batch_execute(CREATE_CONSENTS_TABLE)
                .await
                .map_err(|err| ConsentsError::execution("Failed to create consents table").with_cause(err))?;
        }

        let person_name = record.person_name();
        let display_name = record.display_name();
        let email = record.email();
        let updated_at = record.updated_at();

        let affected = client.execute(&upsert_sql(BindStyle::Positional), &[&person_name, &display_name, &email, &updated_at])
            .await
            .map_err(|err| ConsentsError::execution("Failed to upsert consent").with_cause(err))?;

        // dropping the client closes the connection, which ends the task
        drop(client);
        let _ = connection_task.await;

        Ok(affected)
    }
}

impl ConsentStore for NativeConsentStore {
    fn upsert(&self, record: &ConsentRecord) -> ConsentsResult<()> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ConsentsError::environment("Failed to start async runtime").with_cause(err))?;

        let affected = runtime.block_on(self.upsert_async(record))?;
        info!("Upsert affected {} row(s)", affected);
        Ok(())
    }
}
