use charity_auth::{AuthError, Authenticator, NgoRegistration, RegisterAccount};
use charity_config::{AuthConfig, DatabaseConfig};
use charity_database::{initialize_database, OrganizationStatus, UserRole};
use sqlx::SqlitePool;
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

struct TestContext {
    pool: SqlitePool,
    authenticator: Authenticator,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("auth.sqlite");
        let pool = initialize_database(&DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 2,
        })
        .await?;

        let config = AuthConfig {
            jwt_secret: "authenticator-test-secret".into(),
            token_ttl_seconds: 3_600,
        };
        let authenticator = Authenticator::new(pool.clone(), &config)?;

        Ok(Self {
            pool,
            authenticator,
            _temp_dir: temp_dir,
        })
    }

    async fn count(&self, table: &str) -> TestResult<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn account(email: &str, role: &str) -> RegisterAccount {
    RegisterAccount {
        email: Some(email.into()),
        password: Some("secret123".into()),
        name: Some("Test Account".into()),
        role: Some(role.into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn register_donor_issues_token() -> TestResult {
    let ctx = TestContext::new().await?;

    let registration = ctx.authenticator.register(account("donor@example.org", "DONOR")).await?;
    assert_eq!(registration.user.role, UserRole::Donor);
    assert!(registration.organization.is_none());

    let claims = ctx.authenticator.verify(&registration.token)?;
    assert_eq!(claims.user_id, registration.user.id);
    assert_eq!(claims.role, UserRole::Donor);
    assert!(claims.organization_id.is_none());
    Ok(())
}

#[tokio::test]
async fn register_organization_creates_pending_org_in_same_flow() -> TestResult {
    let ctx = TestContext::new().await?;

    let registration = ctx
        .authenticator
        .register(account("ngo@example.org", "organization"))
        .await?;

    let organization = registration.organization.expect("organization created");
    assert_eq!(organization.status, OrganizationStatus::Pending);
    assert_eq!(organization.description, "No description provided");
    assert_eq!(organization.user_id, registration.user.id);

    let claims = ctx.authenticator.verify(&registration.token)?;
    assert_eq!(claims.organization_id.as_deref(), Some(organization.id.as_str()));
    assert_eq!(ctx.count("organizations").await?, 1);
    Ok(())
}

#[tokio::test]
async fn register_rejects_existing_email() -> TestResult {
    let ctx = TestContext::new().await?;

    ctx.authenticator.register(account("dup@example.org", "DONOR")).await?;
    let result = ctx.authenticator.register(account("DUP@example.org", "VOLUNTEER")).await;

    assert!(matches!(result, Err(AuthError::UserExists)));
    assert_eq!(ctx.count("users").await?, 1);
    Ok(())
}

#[tokio::test]
async fn register_validates_input() -> TestResult {
    let ctx = TestContext::new().await?;

    let missing = RegisterAccount {
        role: None,
        ..account("a@example.org", "DONOR")
    };
    let short_password = RegisterAccount {
        password: Some("12345".into()),
        ..account("b@example.org", "DONOR")
    };

    for (input, message) in [
        (missing, "All fields are required"),
        (account("not-an-email", "DONOR"), "Invalid email format"),
        (short_password, "Password must be at least 6 characters long"),
        (account("c@example.org", "SUPERHERO"), "Invalid role"),
    ] {
        match ctx.authenticator.register(input).await {
            Err(AuthError::Validation(actual)) => assert_eq!(actual, message),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    assert_eq!(ctx.count("users").await?, 0);
    Ok(())
}

#[tokio::test]
async fn register_refuses_admin_role() -> TestResult {
    let ctx = TestContext::new().await?;

    let result = ctx.authenticator.register(account("boss@example.org", "ADMIN")).await;

    assert!(matches!(result, Err(AuthError::AdminSelfRegistration)));
    assert_eq!(ctx.count("users").await?, 0);
    Ok(())
}

#[tokio::test]
async fn register_ngo_stores_contact_details() -> TestResult {
    let ctx = TestContext::new().await?;

    let registration = ctx
        .authenticator
        .register_ngo(NgoRegistration {
            name: Some("River Trust".into()),
            email: Some("river@example.org".into()),
            password: Some("secret123".into()),
            description: Some("Cleaning rivers".into()),
            phone: Some("555-0101".into()),
            ..Default::default()
        })
        .await?;

    assert_eq!(registration.user.role, UserRole::Organization);
    let organization = registration.organization.expect("organization created");
    assert_eq!(organization.phone.as_deref(), Some("555-0101"));
    assert_eq!(organization.email.as_deref(), Some("river@example.org"));

    let missing = ctx
        .authenticator
        .register_ngo(NgoRegistration {
            name: Some("No description".into()),
            email: Some("nd@example.org".into()),
            password: Some("secret123".into()),
            ..Default::default()
        })
        .await;
    assert!(matches!(missing, Err(AuthError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn login_checks_password_and_carries_organization() -> TestResult {
    let ctx = TestContext::new().await?;
    let registration = ctx.authenticator.register(account("org@example.org", "ORGANIZATION")).await?;

    let session = ctx
        .authenticator
        .login(Some("org@example.org"), Some("secret123"))
        .await?;
    assert_eq!(session.user.id, registration.user.id);

    let claims = ctx.authenticator.verify(&session.token)?;
    assert_eq!(
        claims.organization_id,
        registration.organization.map(|organization| organization.id)
    );

    let wrong = ctx.authenticator.login(Some("org@example.org"), Some("wrong-pass")).await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));

    let unknown = ctx.authenticator.login(Some("ghost@example.org"), Some("secret123")).await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));

    let missing = ctx.authenticator.login(Some("org@example.org"), None).await;
    assert!(matches!(missing, Err(AuthError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn create_admin_is_loginable() -> TestResult {
    let ctx = TestContext::new().await?;

    let admin = ctx
        .authenticator
        .create_admin("admin@example.org", "Admin", "supersecret")
        .await?;
    assert_eq!(admin.role, UserRole::Admin);

    let session = ctx
        .authenticator
        .login(Some("admin@example.org"), Some("supersecret"))
        .await?;
    assert_eq!(ctx.authenticator.verify(&session.token)?.role, UserRole::Admin);

    let again = ctx
        .authenticator
        .create_admin("admin@example.org", "Admin", "supersecret")
        .await;
    assert!(matches!(again, Err(AuthError::UserExists)));
    Ok(())
}

#[tokio::test]
async fn verify_rejects_garbage_and_blank_tokens() -> TestResult {
    let ctx = TestContext::new().await?;

    assert!(matches!(ctx.authenticator.verify(""), Err(AuthError::MissingToken)));
    assert!(matches!(
        ctx.authenticator.verify("abc.def.ghi"),
        Err(AuthError::InvalidToken)
    ));
    Ok(())
}
