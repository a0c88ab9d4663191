use std::future::{ready, Ready};

use actix_web::http::header::HeaderMap;
use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::domain::Principal;

use super::error::ApiError;

/// Username asserted by the authenticating proxy in front of the service.
pub const USER_HEADER: &str = "X-Authenticated-User";
/// Comma-separated roles of that user.
pub const ROLES_HEADER: &str = "X-Authenticated-Roles";

/// The caller of a request. Extraction fails with 401 when no user is asserted.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(principal_from_headers(req.headers()).map(Authenticated))
    }
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, ApiError> {
    let username = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|username| !username.is_empty())
        .ok_or(ApiError::Unauthenticated(USER_HEADER))?;

    let roles = headers
        .get(ROLES_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(Principal::new(username, roles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_principal_with_roles() {
        let req = TestRequest::default()
            .insert_header((USER_HEADER, "root"))
            .insert_header((ROLES_HEADER, "ROLE_USER, ROLE_ADMIN,"))
            .to_http_request();

        let principal = principal_from_headers(req.headers()).unwrap();

        assert_eq!(principal.username, "root");
        assert_eq!(principal.roles, vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()]);
        assert!(principal.is_admin());
    }

    #[test]
    fn test_roles_are_optional() {
        let req = TestRequest::default()
            .insert_header((USER_HEADER, "alice"))
            .to_http_request();

        let principal = principal_from_headers(req.headers()).unwrap();
        assert!(principal.roles.is_empty());
    }

    #[test]
    fn test_missing_or_blank_user_is_rejected() {
        let missing = TestRequest::default().to_http_request();
        assert!(matches!(
            principal_from_headers(missing.headers()),
            Err(ApiError::Unauthenticated(_))
        ));

        let blank = TestRequest::default()
            .insert_header((USER_HEADER, "   "))
            .to_http_request();
        assert!(matches!(
            principal_from_headers(blank.headers()),
            Err(ApiError::Unauthenticated(_))
        ));
    }
}
