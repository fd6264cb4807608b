//! Request guards
//!
//! Tenant identity comes from the `X-Tenant-Id` header on every data
//! endpoint. Authentication itself is an external concern; the guard only
//! establishes which namespace the request operates in.

use rocket::Request;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};

use vb_domain::value_objects::TenantId;

/// Header carrying the tenant id
pub const TENANT_HEADER: &str = "X-Tenant-Id";

/// Tenant scope of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenant(pub TenantId);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Tenant {
    type Error = &'static str;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one(TENANT_HEADER) {
            Some(raw) => match raw.trim().parse::<TenantId>() {
                Ok(id) => Outcome::Success(Tenant(id)),
                Err(_) => Outcome::Error((Status::BadRequest, "X-Tenant-Id must be numeric")),
            },
            None => Outcome::Error((Status::BadRequest, "missing X-Tenant-Id header")),
        }
    }
}
