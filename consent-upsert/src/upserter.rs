use log::info;
use consents_shared::connection::{redact_connection_string, resolve_database_url};
use consents_shared::consent_record::ConsentRecord;
use consents_shared::error::{ConsentsError, ConsentsResult};
use crate::args::Args;
use crate::consent_store::{ConsentStore, NativeConsentStore, PsqlConsentStore};

pub const CONFIRMATION: &str = "Consent updated.";

#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// the row was inserted or updated
    Updated,
    /// dry run, carries the rendered invocation
    Previewed(String),
}

/// Resolves configuration, stamps the record and hands it to the selected store. Configuration
/// problems are reported before any client is started.
pub fn run_upsert<LookupT>(args: &Args, env_lookup: LookupT) -> ConsentsResult<Outcome>
    where LookupT: Fn(&str) -> Option<String>
{
    let database_url = resolve_database_url(args.database_url.as_deref(), env_lookup)?;
    info!("Using database {}", redact_connection_string(&database_url));

    let record = ConsentRecord::new(args.person_name.as_str(), args.display_name.as_str(), args.email.as_str())?;
    info!("Upserting {} at {}", record.person_name(), record.updated_at_text());

    if args.native {
        let store = NativeConsentStore::new(database_url, args.create_table);
        store.upsert(&record)?;
        return Ok(Outcome::Updated);
    }

    let store = PsqlConsentStore::new(args.psql_path.clone(), database_url, args.create_table);
    if args.dry_run {
        let preview = store.invocation(&record).preview(&record);
        let rendered = serde_json::to_string_pretty(&preview)
            .map_err(|err| ConsentsError::configuration("Failed to render invocation").with_cause(err))?;
        return Ok(Outcome::Previewed(rendered));
    }

    store.upsert(&record)?;
    Ok(Outcome::Updated)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use consents_shared::error::ConsentsErrorCategory;
    use crate::args::Args;
    use crate::upserter::{Outcome, run_upsert};

    fn args_with(extra: &[&str]) -> Args {
        let mut argv = vec![
            "consent-upsert",
            "--person-name", "people/123",
            "--display-name", "Jane Doe",
            "--email", "jane@example.com",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    #[test]
    fn run_upsert__fails_before_spawning__when_url_missing() {
        // a client that cannot be found would produce an environment error if it were launched
        let args = args_with(&["--psql-path", "/nonexistent/bin/psql"]);
        let err = run_upsert(&args, no_env).unwrap_err();
        assert_eq!(err.category(), ConsentsErrorCategory::Configuration);
        assert!(format!("{}", err).contains("DATABASE_URL is required"));
    }

    #[test]
    fn run_upsert__reports_missing_client_distinctly() {
        let args = args_with(&["--psql-path", "/nonexistent/bin/psql", "--database-url", "postgres://localhost/app"]);
        let err = run_upsert(&args, no_env).unwrap_err();
        assert_eq!(err.category(), ConsentsErrorCategory::Environment);
        assert!(format!("{}", err).contains("Install Postgres client tools"));
    }

    #[test]
    fn run_upsert__dry_run_prefers_explicit_url() {
        let args = args_with(&["--database-url", "postgres://explicit/app", "--dry-run"]);
        let outcome = run_upsert(&args, |_| Some(String::from("postgres://env/app"))).unwrap();

        let Outcome::Previewed(rendered) = outcome else {
            panic!("expected a preview");
        };
        assert!(rendered.contains("host=explicit dbname=app"));
        assert!(!rendered.contains("host=env"));
    }

    #[test]
    fn run_upsert__dry_run_uses_env_fallback() {
        let args = args_with(&["--dry-run"]);
        let outcome = run_upsert(&args, |_| Some(String::from("postgres://env/app"))).unwrap();
        assert!(matches!(outcome, Outcome::Previewed(rendered) if rendered.contains("host=env dbname=app")));
    }

    #[cfg(unix)]
    #[test]
    fn run_upsert__updated__when_client_succeeds() {
        let args = args_with(&["--psql-path", "true", "--database-url", "postgres://localhost/app"]);
        assert_eq!(run_upsert(&args, no_env).unwrap(), Outcome::Updated);
    }

    #[cfg(unix)]
    #[test]
    fn run_upsert__fails__when_client_fails() {
        let args = args_with(&["--psql-path", "false", "--database-url", "postgres://localhost/app"]);
        let err = run_upsert(&args, no_env).unwrap_err();
        assert_eq!(err.category(), ConsentsErrorCategory::Execution);
    }

    #[test]
    fn run_upsert__rejects_empty_person_name() {
        let args = Args::try_parse_from([
            "consent-upsert",
            "--person-name", "",
            "--display-name", "Jane Doe",
            "--email", "jane@example.com",
            "--database-url", "postgres://localhost/app",
            "--psql-path", "/nonexistent/bin/psql",
        ]).unwrap();
        let err = run_upsert(&args, no_env).unwrap_err();
        assert_eq!(err.category(), ConsentsErrorCategory::Configuration);
    }
}
