//! Passwort-Hashing mit Argon2id
//!
//! Stellt Passwort-Hashfunktionen mit Argon2id bereit. Jeder Hash bekommt
//! ein eigenes zufaelliges Salt; die Kostenparameter sind fest.
//!
//! Hashing blockiert den aufrufenden Thread. Im Service werden nur die
//! `_async`-Varianten verwendet, die auf dem Blocking-Pool von Tokio laufen.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};

/// Argon2id-Parameter fuer sicheres Passwort-Hashing
///
/// Werte gemaess OWASP-Empfehlungen (Stand 2024):
/// - Speicher: 64 MiB
/// - Iterationen: 3
/// - Parallelismus: 1
fn argon2_instanz() -> AuthResult<Argon2<'static>> {
    let params = Params::new(
        64 * 1024, // m_cost: 64 MiB
        3,         // t_cost: 3 Iterationen
        1,         // p_cost: 1 Thread
        None,      // output_len: Standard (32 Bytes)
    )
    .map_err(|e| AuthError::intern(format!("Argon2-Parameter ungueltig: {e}")))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
///
/// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
pub fn passwort_hashen(passwort: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    argon2_instanz()?
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::intern(format!("Passwort-Hashing fehlgeschlagen: {e}")))
}

/// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
///
/// Der Vergleich erfolgt in konstanter Zeit. Gibt `Ok(false)` bei falschem
/// Passwort zurueck; ein unlesbarer Hash ist ein interner Fehler.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::intern(format!("Ungueltiges Hash-Format: {e}")))?;

    match argon2_instanz()?.verify_password(passwort.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::intern(format!("Passwort-Verifikation fehlgeschlagen: {e}"))),
    }
}

/// Wie [`passwort_hashen`], aber auf dem Blocking-Pool
pub async fn passwort_hashen_async(passwort: String) -> AuthResult<String> {
    tokio::task::spawn_blocking(move || passwort_hashen(&passwort))
        .await
        .map_err(|e| AuthError::intern(format!("Hashing-Task fehlgeschlagen: {e}")))?
}

/// Wie [`passwort_verifizieren`], aber auf dem Blocking-Pool
pub async fn passwort_verifizieren_async(passwort: String, hash: String) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || passwort_verifizieren(&passwort, &hash))
        .await
        .map_err(|e| AuthError::intern(format!("Verifikations-Task fehlgeschlagen: {e}")))?
}
