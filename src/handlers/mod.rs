// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod health;
pub mod user;

use crate::error::AppError;

/// Swaps a storage outage for `fallback` on read-only endpoints.
/// The outage is still logged; the flag tells the caller the payload is a stand-in.
pub(crate) fn or_degraded<T>(
    result: Result<T, AppError>,
    context: &str,
    fallback: impl FnOnce() -> T,
) -> Result<(T, bool), AppError> {
    match result {
        Ok(value) => Ok((value, false)),
        Err(e) if e.is_storage_unavailable() => {
            tracing::error!("Storage unavailable while {}: {}", context, e);
            Ok((fallback(), true))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outage_falls_back() {
        let result: Result<Vec<i64>, AppError> = Err(AppError::StorageUnavailable("down".into()));
        let (value, degraded) = or_degraded(result, "testing", Vec::new).unwrap();
        assert!(value.is_empty());
        assert!(degraded);
    }

    #[test]
    fn other_errors_pass_through() {
        let result: Result<i64, AppError> = Err(AppError::NotFound("gone".into()));
        assert!(matches!(
            or_degraded(result, "testing", || 0),
            Err(AppError::NotFound(_))
        ));

        assert_eq!(or_degraded(Ok(7), "testing", || 0).unwrap(), (7, false));
    }
}
