//! Auth-Service
//!
//! Zentraler Service fuer Registrierung, Login und Admin-Abfrage. Nutzt die
//! DB-Repositories und einen [`TokenAussteller`]. Zwischen zwei Aufrufen
//! haelt der Service keinen Zustand.
//!
//! Speicherfehler werden an jeder Aufrufstelle vollstaendig auf
//! [`AuthError`] abgebildet. Jede `match`-Anweisung nennt alle Varianten
//! von [`DbError`] ohne Wildcard.

use std::sync::Arc;
use std::time::Duration;

use sso_core::{AppId, UserId};
use sso_db::{AppRepository, DbError, NeuerBenutzer, UserRepository};
use tracing::Instrument;

use crate::{
    error::{AuthError, AuthResult},
    kontext::Anfragekontext,
    password::{passwort_hashen_async, passwort_verifizieren_async},
    token::TokenAussteller,
};

/// Standard-Lebensdauer eines Tokens: 1 Stunde
const STANDARD_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Konfiguration des Auth-Service
#[derive(Debug, Clone)]
pub struct AuthKonfig {
    /// Lebensdauer ausgestellter Tokens
    pub token_ttl: Duration,
}

impl Default for AuthKonfig {
    fn default() -> Self {
        Self {
            token_ttl: STANDARD_TOKEN_TTL,
        }
    }
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<U: ?Sized, A: ?Sized, T: ?Sized> {
    user_repo: Arc<U>,
    app_repo: Arc<A>,
    aussteller: Arc<T>,
    konfig: AuthKonfig,
}

impl<U, A, T> AuthService<U, A, T>
where
    U: UserRepository + ?Sized,
    A: AppRepository + ?Sized,
    T: TokenAussteller + ?Sized,
{
    /// Erstellt einen neuen AuthService
    pub fn neu(user_repo: Arc<U>, app_repo: Arc<A>, aussteller: Arc<T>, konfig: AuthKonfig) -> Self {
        Self {
            user_repo,
            app_repo,
            aussteller,
            konfig,
        }
    }

    /// Registriert einen neuen Benutzer und gibt seine ID zurueck
    ///
    /// Die Eindeutigkeit der E-Mail prueft allein der Speicher, es gibt
    /// keine Vorabpruefung.
    pub async fn registrieren(
        &self,
        ctx: &Anfragekontext,
        email: &str,
        passwort: &str,
    ) -> AuthResult<UserId> {
        let span = tracing::info_span!(
            "auth.registrieren",
            email = %email,
            verbleibend = ?ctx.verbleibend()
        );
        async move {
            tracing::info!("Registriere Benutzer");

            let pass_hash = ctx
                .begrenzen(passwort_hashen_async(passwort.to_owned()))
                .await??;

            let ergebnis = ctx
                .begrenzen(self.user_repo.create(NeuerBenutzer {
                    email,
                    pass_hash: &pass_hash,
                }))
                .await?;

            match ergebnis {
                Ok(id) => {
                    tracing::info!(user_id = %id, "Neuer Benutzer registriert");
                    Ok(id)
                }
                Err(DbError::BenutzerExistiert) => {
                    tracing::warn!("Benutzer existiert bereits");
                    Err(AuthError::BenutzerExistiert)
                }
                Err(
                    e @ (DbError::BenutzerNichtGefunden
                    | DbError::AppNichtGefunden
                    | DbError::Sqlx(_)
                    | DbError::Migration(_)),
                ) => Err(speicherfehler("Benutzer speichern fehlgeschlagen", e)),
            }
        }
        .instrument(span)
        .await
    }

    /// Prueft die Anmeldedaten und stellt ein Token fuer die App aus
    ///
    /// Reihenfolge: Benutzer laden, Passwort pruefen, App laden, Token
    /// ausstellen. Die App wird erst nach erfolgreicher Passwortpruefung
    /// aufgeloest.
    pub async fn anmelden(
        &self,
        ctx: &Anfragekontext,
        email: &str,
        passwort: &str,
        app_id: AppId,
    ) -> AuthResult<String> {
        let span = tracing::info_span!(
            "auth.anmelden",
            email = %email,
            app_id = %app_id,
            verbleibend = ?ctx.verbleibend()
        );
        async move {
            tracing::info!("Anmeldeversuch");

            let benutzer = match ctx.begrenzen(self.user_repo.get_by_email(email)).await? {
                Ok(b) => b,
                Err(DbError::BenutzerNichtGefunden) => {
                    tracing::warn!("Benutzer nicht gefunden");
                    return Err(AuthError::UngueltigeAnmeldedaten);
                }
                Err(
                    e @ (DbError::AppNichtGefunden
                    | DbError::BenutzerExistiert
                    | DbError::Sqlx(_)
                    | DbError::Migration(_)),
                ) => return Err(speicherfehler("Benutzer laden fehlgeschlagen", e)),
            };

            let korrekt = ctx
                .begrenzen(passwort_verifizieren_async(
                    passwort.to_owned(),
                    benutzer.pass_hash.clone(),
                ))
                .await??;
            if !korrekt {
                tracing::warn!(user_id = %benutzer.id, "Fehlgeschlagener Login-Versuch");
                return Err(AuthError::UngueltigeAnmeldedaten);
            }

            let app = match ctx.begrenzen(self.app_repo.get_by_id(app_id)).await? {
                Ok(a) => a,
                Err(DbError::AppNichtGefunden) => {
                    tracing::warn!("App nicht gefunden");
                    return Err(AuthError::UngueltigeAppId);
                }
                Err(
                    e @ (DbError::BenutzerNichtGefunden
                    | DbError::BenutzerExistiert
                    | DbError::Sqlx(_)
                    | DbError::Migration(_)),
                ) => return Err(speicherfehler("App laden fehlgeschlagen", e)),
            };

            let token = self
                .aussteller
                .ausstellen(&benutzer, &app, self.konfig.token_ttl)
                .map_err(|e| {
                    tracing::error!(fehler = %e, "Token-Erstellung fehlgeschlagen");
                    AuthError::intern(format!("Token-Erstellung fehlgeschlagen: {e}"))
                })?;

            tracing::info!(user_id = %benutzer.id, "Benutzer angemeldet");
            Ok(token)
        }
        .instrument(span)
        .await
    }

    /// Gibt zurueck, ob der Benutzer Administrator ist
    ///
    /// Ein unbekannter Benutzer ergibt `AuthError::BenutzerNichtGefunden`.
    pub async fn ist_admin(&self, ctx: &Anfragekontext, user_id: UserId) -> AuthResult<bool> {
        let span = tracing::info_span!(
            "auth.ist_admin",
            user_id = %user_id,
            verbleibend = ?ctx.verbleibend()
        );
        async move {
            tracing::debug!("Pruefe Admin-Status");

            match ctx.begrenzen(self.user_repo.is_admin(user_id)).await? {
                Ok(is_admin) => {
                    tracing::info!(is_admin, "Admin-Status geprueft");
                    Ok(is_admin)
                }
                Err(DbError::BenutzerNichtGefunden) => {
                    tracing::warn!("Benutzer nicht gefunden");
                    Err(AuthError::BenutzerNichtGefunden(user_id))
                }
                Err(
                    e @ (DbError::AppNichtGefunden
                    | DbError::BenutzerExistiert
                    | DbError::Sqlx(_)
                    | DbError::Migration(_)),
                ) => Err(speicherfehler("Admin-Status lesen fehlgeschlagen", e)),
            }
        }
        .instrument(span)
        .await
    }
}

/// Loggt einen nicht klassifizierten Speicherfehler und macht ihn intern
fn speicherfehler(kontext: &str, e: DbError) -> AuthError {
    tracing::error!(fehler = %e, "{kontext}");
    AuthError::intern(format!("{kontext}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sso_db::{AppRecord, BenutzerRecord, DbResult};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::token::{token_pruefen, JwtAussteller};

    // Minimaler In-Memory UserRepository fuer Tests
    #[derive(Default)]
    struct TestUserRepo {
        benutzer: Mutex<Vec<BenutzerRecord>>,
        aufrufe: AtomicUsize,
    }

    #[async_trait]
    impl UserRepository for TestUserRepo {
        async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<UserId> {
            self.aufrufe.fetch_add(1, Ordering::SeqCst);
            let mut benutzer = self.benutzer.lock().unwrap();
            if benutzer.iter().any(|u| u.email == data.email) {
                return Err(DbError::BenutzerExistiert);
            }
            let id = UserId(benutzer.len() as i64 + 1);
            benutzer.push(BenutzerRecord {
                id,
                email: data.email.to_string(),
                pass_hash: data.pass_hash.to_string(),
                is_admin: false,
            });
            Ok(id)
        }

        async fn get_by_email(&self, email: &str) -> DbResult<BenutzerRecord> {
            self.aufrufe.fetch_add(1, Ordering::SeqCst);
            self.benutzer
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned()
                .ok_or(DbError::BenutzerNichtGefunden)
        }

        async fn is_admin(&self, id: UserId) -> DbResult<bool> {
            self.aufrufe.fetch_add(1, Ordering::SeqCst);
            self.benutzer
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .map(|u| u.is_admin)
                .ok_or(DbError::BenutzerNichtGefunden)
        }
    }

    impl TestUserRepo {
        fn admin_setzen(&self, id: UserId) {
            let mut benutzer = self.benutzer.lock().unwrap();
            if let Some(u) = benutzer.iter_mut().find(|u| u.id == id) {
                u.is_admin = true;
            }
        }
    }

    #[derive(Default)]
    struct TestAppRepo {
        apps: HashMap<AppId, AppRecord>,
        aufrufe: AtomicUsize,
    }

    impl TestAppRepo {
        fn mit_app(id: i32, secret: &str) -> Self {
            let mut apps = HashMap::new();
            apps.insert(
                AppId(id),
                AppRecord {
                    id: AppId(id),
                    name: format!("app-{id}"),
                    secret: secret.to_string(),
                },
            );
            Self {
                apps,
                aufrufe: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AppRepository for TestAppRepo {
        async fn get_by_id(&self, id: AppId) -> DbResult<AppRecord> {
            self.aufrufe.fetch_add(1, Ordering::SeqCst);
            self.apps.get(&id).cloned().ok_or(DbError::AppNichtGefunden)
        }
    }

    // Speicher, der jede Anfrage mit einer Stoerung beantwortet
    struct KaputterSpeicher;

    #[async_trait]
    impl UserRepository for KaputterSpeicher {
        async fn create(&self, _data: NeuerBenutzer<'_>) -> DbResult<UserId> {
            Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn get_by_email(&self, _email: &str) -> DbResult<BenutzerRecord> {
            Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn is_admin(&self, _id: UserId) -> DbResult<bool> {
            Err(DbError::Sqlx(sqlx::Error::PoolClosed))
        }
    }

    #[async_trait]
    impl AppRepository for KaputterSpeicher {
        async fn get_by_id(&self, _id: AppId) -> DbResult<AppRecord> {
            Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
        }
    }

    // Speicher, der nie rechtzeitig antwortet
    struct LangsamerSpeicher;

    #[async_trait]
    impl UserRepository for LangsamerSpeicher {
        async fn create(&self, _data: NeuerBenutzer<'_>) -> DbResult<UserId> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(UserId(1))
        }

        async fn get_by_email(&self, _email: &str) -> DbResult<BenutzerRecord> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(DbError::BenutzerNichtGefunden)
        }

        async fn is_admin(&self, _id: UserId) -> DbResult<bool> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(true)
        }
    }

    struct KaputterAussteller;

    impl TokenAussteller for KaputterAussteller {
        fn ausstellen(&self, _: &BenutzerRecord, _: &AppRecord, _: Duration) -> AuthResult<String> {
            Err(AuthError::intern("Schluessel unbrauchbar"))
        }
    }

    const SECRET: &str = "test-secret";

    fn test_service() -> (
        AuthService<TestUserRepo, TestAppRepo, JwtAussteller>,
        Arc<TestUserRepo>,
        Arc<TestAppRepo>,
    ) {
        let users = Arc::new(TestUserRepo::default());
        let apps = Arc::new(TestAppRepo::mit_app(1, SECRET));
        let service = AuthService::neu(
            Arc::clone(&users),
            Arc::clone(&apps),
            Arc::new(JwtAussteller::neu()),
            AuthKonfig::default(),
        );
        (service, users, apps)
    }

    #[tokio::test]
    async fn registrieren_und_anmelden() {
        let (service, users, _) = test_service();
        let ctx = Anfragekontext::neu();

        let id = service
            .registrieren(&ctx, "a@x.com", "p")
            .await
            .expect("Registrierung fehlgeschlagen");

        // Gespeichert wird nur der Hash
        let gespeichert = users.get_by_email("a@x.com").await.unwrap();
        assert!(gespeichert.pass_hash.starts_with("$argon2id$"));

        let token = service
            .anmelden(&ctx, "a@x.com", "p", AppId(1))
            .await
            .expect("Anmeldung fehlgeschlagen");
        assert!(!token.is_empty());

        let claims = token_pruefen(&token, SECRET).unwrap();
        assert_eq!(claims.user_id(), id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.app(), AppId(1));
    }

    #[tokio::test]
    async fn doppelte_registrierung_schlaegt_fehl() {
        let (service, _, _) = test_service();
        let ctx = Anfragekontext::neu();

        service.registrieren(&ctx, "dup@x.com", "passwort").await.unwrap();
        let ergebnis = service.registrieren(&ctx, "dup@x.com", "anderes").await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzerExistiert)));
    }

    #[tokio::test]
    async fn falsches_passwort_und_unbekannte_email_gleich() {
        let (service, _, apps) = test_service();
        let ctx = Anfragekontext::neu();
        service.registrieren(&ctx, "user@x.com", "richtig").await.unwrap();

        let falsch = service.anmelden(&ctx, "user@x.com", "falsch", AppId(1)).await;
        let unbekannt = service
            .anmelden(&ctx, "niemand@x.com", "richtig", AppId(1))
            .await;

        let falsch = falsch.unwrap_err();
        let unbekannt = unbekannt.unwrap_err();
        assert!(matches!(falsch, AuthError::UngueltigeAnmeldedaten));
        assert!(matches!(unbekannt, AuthError::UngueltigeAnmeldedaten));
        assert_eq!(falsch.to_string(), unbekannt.to_string());

        // Die App wird bei falschen Anmeldedaten nicht aufgeloest
        assert_eq!(apps.aufrufe.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unbekannte_app_nach_gueltigen_anmeldedaten() {
        let (service, _, _) = test_service();
        let ctx = Anfragekontext::neu();
        service.registrieren(&ctx, "user@x.com", "pw").await.unwrap();

        let ergebnis = service.anmelden(&ctx, "user@x.com", "pw", AppId(99)).await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeAppId)));
    }

    #[tokio::test]
    async fn unbekannte_app_mit_falschen_anmeldedaten_bleibt_anmeldefehler() {
        let (service, _, _) = test_service();
        let ctx = Anfragekontext::neu();

        let ergebnis = service.anmelden(&ctx, "niemand@x.com", "pw", AppId(99)).await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeAnmeldedaten)));
    }

    #[tokio::test]
    async fn wiederholte_anmeldung_liefert_neue_tokens() {
        let (service, _, _) = test_service();
        let ctx = Anfragekontext::neu();
        service.registrieren(&ctx, "user@x.com", "pw").await.unwrap();

        let a = service.anmelden(&ctx, "user@x.com", "pw", AppId(1)).await.unwrap();
        let b = service.anmelden(&ctx, "user@x.com", "pw", AppId(1)).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn admin_flag_wird_durchgereicht() {
        let (service, users, _) = test_service();
        let ctx = Anfragekontext::neu();

        let normal = service.registrieren(&ctx, "n@x.com", "pw").await.unwrap();
        let admin = service.registrieren(&ctx, "a@x.com", "pw").await.unwrap();
        users.admin_setzen(admin);

        assert!(!service.ist_admin(&ctx, normal).await.unwrap());
        assert!(service.ist_admin(&ctx, admin).await.unwrap());
    }

    #[tokio::test]
    async fn admin_unbekannter_benutzer() {
        let (service, _, _) = test_service();
        let ergebnis = service.ist_admin(&Anfragekontext::neu(), UserId(404)).await;
        assert!(matches!(
            ergebnis,
            Err(AuthError::BenutzerNichtGefunden(UserId(404)))
        ));
    }

    #[tokio::test]
    async fn speicherstoerung_wird_intern() {
        let speicher = Arc::new(KaputterSpeicher);
        let service = AuthService::neu(
            Arc::clone(&speicher),
            speicher,
            Arc::new(JwtAussteller::neu()),
            AuthKonfig::default(),
        );
        let ctx = Anfragekontext::neu();

        assert!(matches!(
            service.registrieren(&ctx, "a@x.com", "pw").await,
            Err(AuthError::Intern(_))
        ));
        assert!(matches!(
            service.anmelden(&ctx, "a@x.com", "pw", AppId(1)).await,
            Err(AuthError::Intern(_))
        ));
        assert!(matches!(
            service.ist_admin(&ctx, UserId(1)).await,
            Err(AuthError::Intern(_))
        ));
    }

    #[tokio::test]
    async fn signaturfehler_wird_intern() {
        let users = Arc::new(TestUserRepo::default());
        let service = AuthService::neu(
            users,
            Arc::new(TestAppRepo::mit_app(1, SECRET)),
            Arc::new(KaputterAussteller),
            AuthKonfig::default(),
        );
        let ctx = Anfragekontext::neu();
        service.registrieren(&ctx, "a@x.com", "pw").await.unwrap();

        let ergebnis = service.anmelden(&ctx, "a@x.com", "pw", AppId(1)).await;
        assert!(matches!(ergebnis, Err(AuthError::Intern(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn frist_bricht_speicherzugriff_ab() {
        let service = AuthService::neu(
            Arc::new(LangsamerSpeicher),
            Arc::new(TestAppRepo::default()),
            Arc::new(JwtAussteller::neu()),
            AuthKonfig::default(),
        );
        let ctx = Anfragekontext::mit_timeout(Duration::from_millis(100));

        let ergebnis = service.ist_admin(&ctx, UserId(1)).await;
        assert!(matches!(ergebnis, Err(AuthError::Zeitlimit)));

        let ergebnis = service.anmelden(&ctx, "a@x.com", "pw", AppId(1)).await;
        assert!(matches!(ergebnis, Err(AuthError::Zeitlimit)));
    }

    #[tokio::test]
    async fn abgebrochene_anfrage_schreibt_nicht() {
        let (service, users, _) = test_service();
        let ctx = Anfragekontext::neu();
        ctx.abbrechen();

        let ergebnis = service.registrieren(&ctx, "a@x.com", "pw").await;
        assert!(matches!(ergebnis, Err(AuthError::Abgebrochen)));
        assert!(ergebnis.unwrap_err().ist_wiederholbar());
        assert_eq!(users.aufrufe.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dyn_repositories_werden_unterstuetzt() {
        let users: Arc<dyn UserRepository> = Arc::new(TestUserRepo::default());
        let apps: Arc<dyn AppRepository> = Arc::new(TestAppRepo::mit_app(1, SECRET));
        let aussteller: Arc<dyn TokenAussteller> = Arc::new(JwtAussteller::neu());
        let service = AuthService::neu(users, apps, aussteller, AuthKonfig::default());
        let ctx = Anfragekontext::neu();

        service.registrieren(&ctx, "a@x.com", "pw").await.unwrap();
        assert!(service.anmelden(&ctx, "a@x.com", "pw", AppId(1)).await.is_ok());
    }
}
