//! Request and response bodies for the clinic API.
//!
//! Field names are the wire names; the API speaks Spanish for domain
//! fields and English for auth, and these structs follow it.

use chrono::NaiveDate;
use plexident_core::{Role, UserUpdate};
use serde::{Deserialize, Serialize};

/// Body for `POST /auth/login/`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /auth/login/`.
///
/// Only the access token is used; the refresh token is carried in the
/// response but this client does not rotate tokens, it re-authenticates.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body for `POST /users/`. The only place a password travels next to
/// user data.
#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub nombres: String,
    pub apellidos: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub correo: String,
    pub username: String,
    pub password: String,
    pub rol: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

/// Body for `PUT /users/{id}/`: the shared partial plus an optional
/// password change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdatePayload {
    #[serde(flatten)]
    pub fields: UserUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body for `POST /patients/`.
#[derive(Debug, Clone, Serialize)]
pub struct PatientCreate {
    pub nombres: String,
    pub apellidos: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cedula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
}

/// Body for `PUT /patients/{id}/`. Every field optional; absent fields
/// are left unchanged by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apellidos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cedula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}
